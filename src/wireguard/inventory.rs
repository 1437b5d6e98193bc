//! Tunnel discovery from the WireGuard config directory
//!
//! A tunnel exists iff a `<name>.conf` file exists. The directory is
//! re-listed on every call; there is no cache to go stale.

use super::WireGuardError;
use std::path::PathBuf;

pub struct Inventory {
    config_dir: PathBuf,
}

impl Inventory {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// List configured tunnel names, sorted by name.
    ///
    /// An unlistable directory means the host is misconfigured, not a
    /// transient condition, so the error is surfaced without retry.
    pub fn list_all(&self) -> Result<Vec<String>, WireGuardError> {
        let entries =
            std::fs::read_dir(&self.config_dir).map_err(|source| WireGuardError::ConfigDir {
                dir: self.config_dir.clone(),
                source,
            })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| WireGuardError::ConfigDir {
                dir: self.config_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("conf") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
