//! TOML configuration.
//!
//! Every field has a default so a missing config file is equivalent to an
//! empty one. Loaded from `$XDG_CONFIG_HOME/bwssh/config.toml` unless
//! `--config` points elsewhere.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault CLI program name or path.
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent socket path override; the default is whatever `SSH_AUTH_SOCK`
    /// points at.
    #[serde(default)]
    pub socket: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Custom field names recognised as the companion passphrase for an
    /// encrypted private key. Matched case-insensitively.
    #[serde(default = "default_passphrase_fields")]
    pub passphrase_fields: Vec<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            passphrase_fields: default_passphrase_fields(),
        }
    }
}

fn default_program() -> String {
    "bw".to_string()
}

fn default_passphrase_fields() -> Vec<String> {
    ["passphrase", "ssh_passphrase", "ssh-passphrase"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.vault.program, "bw");
        assert!(cfg.agent.socket.is_none());
        assert_eq!(
            cfg.keys.passphrase_fields,
            vec!["passphrase", "ssh_passphrase", "ssh-passphrase"]
        );
    }

    #[test]
    fn parse_overrides() {
        let cfg: Config = toml::from_str(
            r#"
            [vault]
            program = "/opt/bitwarden/bw"

            [agent]
            socket = "/run/user/1000/keyring/ssh"

            [keys]
            passphrase_fields = ["unlock-phrase"]
        "#,
        )
        .unwrap();
        assert_eq!(cfg.vault.program, "/opt/bitwarden/bw");
        assert_eq!(
            cfg.agent.socket.as_deref(),
            Some(std::path::Path::new("/run/user/1000/keyring/ssh"))
        );
        assert_eq!(cfg.keys.passphrase_fields, vec!["unlock-phrase"]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: Config = toml::from_str("[vault]\nprogram = \"bw-beta\"\n").unwrap();
        assert_eq!(cfg.vault.program, "bw-beta");
        assert!(!cfg.keys.passphrase_fields.is_empty());
    }

    #[test]
    fn config_roundtrip_serialize() {
        let cfg = Config::default();
        let serialized = toml::to_string(&cfg).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.vault.program, cfg.vault.program);
        assert_eq!(
            deserialized.keys.passphrase_fields,
            cfg.keys.passphrase_fields
        );
    }
}
