//! Subprocess plumbing for the `bw` CLI.
//!
//! Secrets cross the process boundary through the child's environment only
//! (`BW_SESSION`, `BW_PASSWORD`) — never through argv, which is visible to
//! every local process.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use bwssh_core::VaultSession;

use crate::error::BwCliError;

/// Maximum stderr bytes carried into an error message.
const STDERR_SNIPPET: usize = 400;

/// Handle to the vault CLI binary.
#[derive(Debug, Clone)]
pub struct BwCli {
    program: String,
}

impl BwCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run `bw <args>` to completion and return stdout.
    ///
    /// `--nointeraction` is always appended so the CLI can never stall on
    /// its own prompt; all interaction happens on our side.
    pub(crate) async fn run(
        &self,
        args: &[&str],
        session: Option<&VaultSession>,
        env: &[(&str, &str)],
    ) -> Result<Vec<u8>, BwCliError> {
        let command_desc = format!("{} {}", self.program, args.join(" "));
        debug!(command = %command_desc, "invoking vault CLI");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .arg("--nointeraction")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(session) = session {
            cmd.env("BW_SESSION", session.as_str());
        }
        for (key, value) in env {
            cmd.env(key, value);
        }

        let output = cmd.output().await.map_err(|source| BwCliError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            let status = match output.status.code() {
                Some(code) => format!("exit code {code}"),
                None => "killed by signal".to_string(),
            };
            return Err(BwCliError::CommandFailed {
                command: command_desc,
                status,
                stderr: stderr_snippet(&output.stderr),
            });
        }

        Ok(output.stdout)
    }

    /// Run and deserialise stdout as JSON.
    pub(crate) async fn run_json<T: serde::de::DeserializeOwned>(
        &self,
        args: &[&str],
        session: Option<&VaultSession>,
    ) -> Result<T, BwCliError> {
        let stdout = self.run(args, session, &[]).await?;
        serde_json::from_slice(&stdout).map_err(|source| BwCliError::Json {
            command: format!("{} {}", self.program, args.join(" ")),
            source,
        })
    }
}

/// First line of stderr, truncated at a char boundary.
fn stderr_snippet(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let line = text.trim().lines().next().unwrap_or("").to_string();
    if line.len() <= STDERR_SNIPPET {
        return line;
    }
    let mut end = STDERR_SNIPPET;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    line[..end].to_string()
}
