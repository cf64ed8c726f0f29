//! Error taxonomy for the load pipeline.
//!
//! Two tiers: pipeline-level errors abort the run and map to a distinct exit
//! code; item-level errors are recorded in the run report and the batch
//! continues.

/// Everything that can go wrong between "invoked" and "summary printed".
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The vault CLI binary is not on the path (or does not answer a
    /// version query).
    #[error("vault CLI unavailable: {0}")]
    DependencyMissing(String),

    /// The agent socket is unset, unconnectable, or dropped mid-call.
    #[error("SSH agent unavailable: {0}")]
    AgentUnavailable(String),

    /// No usable session and no way to obtain one (no TTY, or the vault
    /// CLI has never been logged in).
    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    /// The vault rejected the supplied credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A single item could not be fetched (deleted remotely, session
    /// expired mid-run, or the item carries no secret content).
    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),

    /// No recognisable private key header in any of the item's fields.
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// The key is encrypted and the item has no companion passphrase field.
    #[error("key is encrypted and no passphrase was supplied")]
    PassphraseRequired,

    /// The agent answered with a failure (or the key could not be decrypted
    /// with the supplied passphrase).
    #[error("rejected by agent: {0}")]
    RejectedByAgent(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Pipeline-level errors abort the whole run; everything else is
    /// recorded against the item that caused it.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::RetrievalFailed(_)
                | Self::MalformedKey(_)
                | Self::PassphraseRequired
                | Self::RejectedByAgent(_)
        )
    }

    /// Stable process exit code for a fatal error.
    ///
    /// Documented in `--help`; item-level errors never terminate the process
    /// and so fall through to the generic code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DependencyMissing(_) => 2,
            Self::AuthenticationRequired(_) => 3,
            Self::AuthenticationFailed(_) => 4,
            Self::AgentUnavailable(_) => 5,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_level_errors_are_not_fatal() {
        assert!(!Error::RetrievalFailed("gone".into()).is_fatal());
        assert!(!Error::MalformedKey("no header".into()).is_fatal());
        assert!(!Error::PassphraseRequired.is_fatal());
        assert!(!Error::RejectedByAgent("duplicate".into()).is_fatal());
    }

    #[test]
    fn pipeline_errors_are_fatal() {
        assert!(Error::DependencyMissing("bw".into()).is_fatal());
        assert!(Error::AgentUnavailable("no socket".into()).is_fatal());
        assert!(Error::AuthenticationRequired("no tty".into()).is_fatal());
        assert!(Error::AuthenticationFailed("bad password".into()).is_fatal());
        assert!(Error::Other(anyhow::anyhow!("boom")).is_fatal());
    }

    #[test]
    fn exit_codes_are_distinct_per_fatal_category() {
        let codes = [
            Error::Other(anyhow::anyhow!("boom")).exit_code(),
            Error::DependencyMissing("bw".into()).exit_code(),
            Error::AuthenticationRequired("no tty".into()).exit_code(),
            Error::AuthenticationFailed("bad password".into()).exit_code(),
            Error::AgentUnavailable("no socket".into()).exit_code(),
        ];
        assert_eq!(codes, [1, 2, 3, 4, 5]);
    }
}
