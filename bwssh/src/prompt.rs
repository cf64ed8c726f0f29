//! Master-password collection on the controlling terminal.
//!
//! Opens `/dev/tty` directly so prompt and input share one file descriptor
//! even when stdin/stdout are redirected. Echo is suppressed via `termios`
//! for the duration of the read. When there is no controlling terminal the
//! prompt reports `None` and the caller decides what that means.

#[cfg(unix)]
use std::io;

use zeroize::Zeroizing;

use bwssh_core::Error;

use crate::pipeline::PasswordPrompt;

pub struct TtyPrompt;

#[async_trait::async_trait]
impl PasswordPrompt for TtyPrompt {
    async fn master_password(&self) -> Result<Option<Zeroizing<String>>, Error> {
        // Blocking tty I/O stays off the async executor.
        tokio::task::spawn_blocking(collect_password)
            .await
            .map_err(|e| Error::Other(anyhow::anyhow!("prompt task panicked: {e}")))?
    }
}

#[cfg(unix)]
fn collect_password() -> Result<Option<Zeroizing<String>>, Error> {
    use std::io::Write as _;
    use std::os::unix::io::AsRawFd as _;

    let tty = match std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")
    {
        Ok(tty) => tty,
        // No controlling terminal: non-interactive invocation.
        Err(_) => return Ok(None),
    };
    let fd = tty.as_raw_fd();

    let mut writer = &tty;
    write!(writer, "Master password: ").map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    let value = read_hidden(fd).map_err(io_err)?;
    Ok(Some(Zeroizing::new(value)))
}

#[cfg(not(unix))]
fn collect_password() -> Result<Option<Zeroizing<String>>, Error> {
    Ok(None)
}

#[cfg(unix)]
fn io_err(e: io::Error) -> Error {
    Error::Other(anyhow::anyhow!("terminal prompt failed: {e}"))
}

/// Read one line from `fd` with terminal echo disabled.
///
/// Flushes stale input (`TCSAFLUSH`), saves the current `termios`, clears
/// `ECHO`/`ECHONL`, reads a line, then restores the original settings even
/// on error. The trailing newline is stripped.
#[cfg(unix)]
fn read_hidden(fd: std::os::unix::io::RawFd) -> io::Result<String> {
    use std::io::BufRead as _;
    use std::os::unix::io::FromRawFd as _;

    // SAFETY: fd is valid (the caller just opened it) and term is
    // initialised by tcgetattr before use.
    let orig = unsafe {
        let mut term = std::mem::MaybeUninit::<libc::termios>::uninit();
        if libc::tcgetattr(fd, term.as_mut_ptr()) != 0 {
            return Err(io::Error::last_os_error());
        }
        term.assume_init()
    };

    let mut noecho = orig;
    noecho.c_lflag &= !(libc::ECHO as libc::tcflag_t);
    noecho.c_lflag &= !(libc::ECHONL as libc::tcflag_t);

    // TCSAFLUSH also discards unread bytes sitting in the kernel tty buffer.
    unsafe {
        if libc::tcsetattr(fd, libc::TCSAFLUSH, &noecho) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    let mut line = String::new();
    let result = {
        // SAFETY: the fd is borrowed for the read; ManuallyDrop prevents a
        // double close since the caller's File still owns it.
        let file = unsafe { std::fs::File::from_raw_fd(fd) };
        let file = std::mem::ManuallyDrop::new(file);
        let mut reader = io::BufReader::new(&*file);
        reader.read_line(&mut line)
    };

    // Restore echo before propagating any read error.
    unsafe { libc::tcsetattr(fd, libc::TCSANOW, &orig) };

    // The user's Enter was not echoed; move to the next line ourselves.
    let _ = unsafe { libc::write(fd, b"\n".as_ptr().cast(), 1) };

    result?;
    Ok(line
        .trim_end_matches('\n')
        .trim_end_matches('\r')
        .to_string())
}
