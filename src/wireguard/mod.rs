//! WireGuard tunnel inventory, status probing and toggling
//!
//! All tunnel state lives in the external `wg`/`wg-quick` tools and the
//! config directory; nothing here is cached between calls. Every query
//! re-reads ground truth, so this module is a stateless view/controller
//! over the host's live WireGuard state.

pub mod connection;
pub mod inventory;
pub mod runner;
pub mod status;

pub use connection::{Connection, WireGuardManager};
pub use inventory::Inventory;
pub use runner::{CommandRunner, SudoRunner};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireGuardError {
    #[error("Failed to list WireGuard config directory {dir}: {source}")]
    ConfigDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to execute `{command}`: {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed ({status}): {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },
    #[error("Unknown connection: {0}")]
    UnknownConnection(String),
}
