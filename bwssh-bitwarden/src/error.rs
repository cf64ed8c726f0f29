//! Error types for the Bitwarden CLI wrapper.

#[derive(Debug, thiserror::Error)]
pub enum BwCliError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{command}' failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("'{command}' produced invalid JSON: {source}")]
    Json {
        command: String,
        source: serde_json::Error,
    },

    #[error("'{command}' produced non-UTF-8 output")]
    NonUtf8 { command: String },
}

impl BwCliError {
    /// True when the failure is the CLI binary itself being absent.
    pub fn is_missing_binary(&self) -> bool {
        matches!(
            self,
            Self::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

impl From<BwCliError> for bwssh_core::Error {
    fn from(err: BwCliError) -> Self {
        match err {
            e @ BwCliError::Spawn { .. } if e.is_missing_binary() => {
                Self::DependencyMissing(e.to_string())
            }
            other => Self::Other(anyhow::anyhow!(other)),
        }
    }
}
