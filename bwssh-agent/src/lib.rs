//! SSH key handling for bwssh: extraction from vault payloads and
//! registration with the running agent.
//!
//! # Key discovery
//!
//! Keys are accepted from three sources, in priority order:
//!
//! 1. **Native SSH key items**: the vault's dedicated private-key field.
//! 2. **Recognised custom fields** (`private_key`, `ssh_private_key`, …) on
//!    any item type.
//! 3. **PEM blocks in the notes**, located by scanning for recognised
//!    `-----BEGIN … PRIVATE KEY-----` headers.
//!
//! Encrypted keys are decrypted with a companion passphrase field before
//! submission — the agent protocol only carries plaintext key data.

pub mod client;
pub mod extract;
pub mod pem;

pub use client::AgentClient;
pub use extract::KeyExtractor;
