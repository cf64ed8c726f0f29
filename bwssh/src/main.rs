mod pipeline;
mod prompt;

use std::path::PathBuf;

use anyhow::Result;

use bwssh_agent::{AgentClient, KeyExtractor};
use bwssh_bitwarden::BwVault;
use bwssh_core::config::Config;
use bwssh_core::{FilterSpec, RunReport, VaultSession};

#[tokio::main]
async fn main() -> Result<()> {
    // Reset SIGPIPE to default so piping output to `head` etc. exits cleanly
    // instead of panicking with "broken pipe".
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match Options::parse(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_help();
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(if opts.verbose { "debug" } else { "warn" })
        .with_target(false)
        .init();

    let config = load_config(opts.config.clone());

    let vault = BwVault::new(config.vault.program.clone());
    let agent = match AgentClient::from_env(config.agent.socket.clone()) {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    };
    let extractor = KeyExtractor::new(config.keys.passphrase_fields.clone());

    // An inherited session is validated before use.
    let ambient_session = std::env::var("BW_SESSION")
        .ok()
        .filter(|s| !s.is_empty())
        .map(VaultSession::new);

    let pipeline_opts = pipeline::PipelineOptions {
        dry_run: opts.dry_run,
        filter: FilterSpec::new(opts.filter.as_deref().unwrap_or("")),
    };

    match pipeline::run(
        &vault,
        &agent,
        &extractor,
        &prompt::TtyPrompt,
        ambient_session,
        &pipeline_opts,
    )
    .await
    {
        Ok(report) => {
            print_summary(&report, opts.verbose);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    dry_run: bool,
    verbose: bool,
    filter: Option<String>,
    config: Option<PathBuf>,
}

impl Options {
    /// `Ok(None)` means help was requested.
    fn parse(args: &[String]) -> Result<Option<Self>, String> {
        let mut opts = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dry-run" | "-n" => opts.dry_run = true,
                "--verbose" | "-v" => opts.verbose = true,
                "--filter" | "-f" => {
                    let value = iter.next().ok_or("--filter requires a value")?;
                    opts.filter = Some(value.clone());
                }
                "--config" | "-c" => {
                    let value = iter.next().ok_or("--config requires a value")?;
                    opts.config = Some(PathBuf::from(value));
                }
                "--help" | "-h" => return Ok(None),
                other => {
                    if let Some(v) = other.strip_prefix("--filter=") {
                        opts.filter = Some(v.to_string());
                    } else if let Some(v) = other.strip_prefix("--config=") {
                        opts.config = Some(PathBuf::from(v));
                    } else {
                        return Err(format!("unknown argument: {other}"));
                    }
                }
            }
        }
        Ok(Some(opts))
    }
}

fn print_help() {
    println!(
        "\
bwssh - load SSH keys from a Bitwarden vault into the local ssh-agent

USAGE:
    bwssh [FLAGS]

FLAGS:
    -n, --dry-run          Report which keys would be added without touching the agent
    -v, --verbose          Per-step progress and per-skip reasons
    -f, --filter TEXT      Only items whose name or folder contains TEXT
                           (case-insensitive substring match)
    -c, --config PATH      Config file (default: ~/.config/bwssh/config.toml)
    -h, --help             Show this help

EXIT CODES:
    0    run completed (individual keys may still have been skipped)
    1    unexpected error
    2    vault CLI not found
    3    authentication required (not logged in, or no terminal to prompt on)
    4    authentication failed
    5    SSH agent unreachable

NOTES:
    An existing BW_SESSION is reused while it is still valid; otherwise you
    are prompted once for the master password.

    Private keys travel from the vault straight to the agent socket and are
    never written to disk."
    );
}

fn default_config_path() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("bwssh").join("config.toml")
}

fn load_config(explicit: Option<PathBuf>) -> Config {
    let path = explicit.unwrap_or_else(default_config_path);
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str(&raw) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("ignoring unparseable config {}: {e}", path.display());
            Config::default()
        }
    }
}

fn print_summary(report: &RunReport, verbose: bool) {
    if report.total() == 0 {
        println!("No matching SSH keys found in vault.");
        return;
    }

    if report.dry_run {
        for key in &report.added {
            println!("would add {}", key.label);
        }
        println!(
            "Dry run: {} key(s) would be added, {} skipped.",
            report.added.len(),
            report.skipped.len()
        );
    } else {
        if verbose {
            for key in &report.added {
                match &key.fingerprint {
                    Some(fp) => println!("added {} ({fp})", key.label),
                    None => println!("added {}", key.label),
                }
            }
        }
        println!(
            "{} key(s) added, {} skipped.",
            report.added.len(),
            report.skipped.len()
        );
    }

    if verbose {
        for skip in &report.skipped {
            println!("skipped {}: {}", skip.label, skip.reason);
        }
    } else if !report.skipped.is_empty() {
        println!("Re-run with --verbose for per-skip reasons.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Options>, String> {
        let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Options::parse(&owned)
    }

    #[test]
    fn no_args_gives_defaults() {
        let opts = parse(&[]).unwrap().unwrap();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn flags_are_recognised_in_both_spellings() {
        let opts = parse(&["--dry-run", "-v", "--filter", "work"]).unwrap().unwrap();
        assert!(opts.dry_run);
        assert!(opts.verbose);
        assert_eq!(opts.filter.as_deref(), Some("work"));

        let opts = parse(&["--filter=work", "--config=/tmp/c.toml"]).unwrap().unwrap();
        assert_eq!(opts.filter.as_deref(), Some("work"));
        assert_eq!(opts.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse(&["--help"]).unwrap().is_none());
        assert!(parse(&["-h", "--dry-run"]).unwrap().is_none());
    }

    #[test]
    fn missing_value_and_unknown_flag_are_errors() {
        assert!(parse(&["--filter"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
    }
}
