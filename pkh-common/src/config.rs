//! Configuration loading for the hub
//!
//! Resolution priority for every setting:
//! 1. Environment variable (highest)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! The optional `[source_priorities]` table maps a `source_type` tag to an
//! integer tier consumed by the ranking policy; a smaller number is a more
//! authoritative source. The table is loaded once at startup and injected
//! into the engine as an immutable value.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the config file explicitly
pub const ENV_CONFIG_PATH: &str = "PKH_CONFIG";
/// Environment variable overriding the database path
pub const ENV_DATABASE_PATH: &str = "PKH_DATABASE_PATH";
/// Environment variable overriding the bind address
pub const ENV_BIND_ADDRESS: &str = "PKH_BIND";

/// Default listen address for the hub service
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5740";

/// On-disk TOML configuration shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Path of the SQLite database file
    pub database_path: Option<PathBuf>,

    /// Listen address, e.g. "127.0.0.1:5740"
    pub bind_address: Option<String>,

    /// Optional source-priority table: source_type -> tier
    /// (smaller tier outranks larger; unmapped sources rank last)
    #[serde(default)]
    pub source_priorities: HashMap<String, i64>,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub source_priorities: HashMap<String, i64>,
}

impl HubConfig {
    /// Resolve configuration from environment + TOML file + defaults
    pub fn resolve() -> Result<Self> {
        let toml_config = match config_file_path() {
            Some(path) if path.exists() => {
                info!("Loading config file: {}", path.display());
                load_toml_config(&path)?
            }
            _ => {
                debug!("No config file found, using environment and defaults");
                TomlConfig::default()
            }
        };
        Ok(Self::from_parts(toml_config))
    }

    /// Combine a parsed TOML config with environment overrides and defaults
    pub fn from_parts(toml_config: TomlConfig) -> Self {
        let database_path = std::env::var(ENV_DATABASE_PATH)
            .map(PathBuf::from)
            .ok()
            .or(toml_config.database_path)
            .unwrap_or_else(default_database_path);

        let bind_address = std::env::var(ENV_BIND_ADDRESS)
            .ok()
            .or(toml_config.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Self {
            database_path,
            bind_address,
            source_priorities: toml_config.source_priorities,
        }
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Locate the config file for the platform
///
/// Checks `PKH_CONFIG` first, then the user config directory
/// (`~/.config/pkh/pkh.toml` on Linux), then `/etc/pkh/pkh.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        let user_config = dir.join("pkh").join("pkh.toml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/pkh/pkh.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Default database location: platform data directory, falling back to CWD
fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("pkh").join("pkh.db"))
        .unwrap_or_else(|| PathBuf::from("pkh.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_config_parses_source_priorities() {
        let content = r#"
            database_path = "/var/lib/pkh/pkh.db"
            bind_address = "0.0.0.0:8080"

            [source_priorities]
            pdf_llm = 1
            supplier_excel = 2
        "#;
        let parsed: TomlConfig = toml::from_str(content).unwrap();
        assert_eq!(
            parsed.database_path,
            Some(PathBuf::from("/var/lib/pkh/pkh.db"))
        );
        assert_eq!(parsed.source_priorities.get("pdf_llm"), Some(&1));
        assert_eq!(parsed.source_priorities.get("supplier_excel"), Some(&2));
    }

    #[test]
    fn toml_config_priorities_default_empty() {
        let parsed: TomlConfig = toml::from_str("").unwrap();
        assert!(parsed.source_priorities.is_empty());
        assert!(parsed.database_path.is_none());
    }

    #[test]
    fn from_parts_applies_defaults() {
        // Only meaningful when the override vars are not set in the test env
        if std::env::var(ENV_DATABASE_PATH).is_ok() || std::env::var(ENV_BIND_ADDRESS).is_ok() {
            return;
        }
        let config = HubConfig::from_parts(TomlConfig::default());
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert!(config.source_priorities.is_empty());
    }
}
