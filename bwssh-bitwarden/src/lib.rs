//! Bitwarden vault access for bwssh.
//!
//! Everything goes through the official `bw` CLI as a subprocess: a status
//! query, an unlock call, and JSON listing/retrieval calls. The CLI owns
//! authentication state and storage format; this crate only shapes its
//! output into the core types.
//!
//! ```text
//! BwVault ── tokio::process ──► bw status / unlock / list items / get item
//!    │                               │
//!    └── BW_SESSION via child env ◄──┘   (never argv)
//! ```

pub mod backend;
pub mod cli;
pub mod error;
pub mod model;

pub use backend::BwVault;
pub use error::BwCliError;
