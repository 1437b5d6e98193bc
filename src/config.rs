//! Configuration handling for the portal

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub wireguard: WireGuardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Double SHA-256 digest of the portal password.
    /// Generate with `wg-portal hash`.
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WireGuardConfig {
    /// Directory holding one `<name>.conf` per tunnel.
    pub config_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for WireGuardConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("/etc/wireguard"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: the portal runs with defaults so a
    /// fresh install can come up before `init` has been run. A present but
    /// unparseable file is always an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).expect("Failed to serialize config");
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Listen address in `host:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
