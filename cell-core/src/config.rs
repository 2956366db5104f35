//! Endpoint configuration: defaults, then a TOML file, then environment variables.
//!
//! File: ~/.config/cell/config.toml or /etc/cell/config.toml.
//! Env overrides: CELL_ENDPOINT_NAME, CELL_NAME, CELL_AMQP_SERVICE, CELL_DB_SERVICE.

use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

pub const ENV_ENDPOINT_NAME: &str = "CELL_ENDPOINT_NAME";
pub const ENV_CELL_NAME: &str = "CELL_NAME";
pub const ENV_AMQP_SERVICE: &str = "CELL_AMQP_SERVICE";
pub const ENV_DB_SERVICE: &str = "CELL_DB_SERVICE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellConfig {
    /// Interface name that namespaces flags (default `cell`).
    #[serde(default = "default_endpoint_name")]
    pub endpoint_name: String,
    /// Provider only: the cell published to compute peers.
    #[serde(default)]
    pub cell_name: Option<String>,
    #[serde(default)]
    pub amqp_service: Option<String>,
    #[serde(default)]
    pub db_service: Option<String>,
}

fn default_endpoint_name() -> String {
    "cell".to_string()
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            endpoint_name: default_endpoint_name(),
            cell_name: None,
            amqp_service: None,
            db_service: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid endpoint name {0:?}")]
    InvalidEndpointName(String),
    #[error("missing cell data: {0}")]
    MissingCellData(&'static str),
}

impl CellConfig {
    /// Parse a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: CellConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Strict load: read and parse `path`, then apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&s)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Endpoint name must be usable as a flag namespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.endpoint_name;
        if name.is_empty() || name.contains('.') || name.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidEndpointName(name.clone()));
        }
        Ok(())
    }

    /// The (cell name, amqp service, db service) triple for `send_cell_data`.
    pub fn cell_data(&self) -> Result<(&str, &str, &str), ConfigError> {
        let cell_name = self
            .cell_name
            .as_deref()
            .ok_or(ConfigError::MissingCellData("cell_name"))?;
        let amqp = self
            .amqp_service
            .as_deref()
            .ok_or(ConfigError::MissingCellData("amqp_service"))?;
        let db = self
            .db_service
            .as_deref()
            .ok_or(ConfigError::MissingCellData("db_service"))?;
        Ok((cell_name, amqp, db))
    }

    fn apply_env(&mut self) {
        if let Ok(s) = std::env::var(ENV_ENDPOINT_NAME) {
            self.endpoint_name = s;
        }
        if let Ok(s) = std::env::var(ENV_CELL_NAME) {
            self.cell_name = Some(s);
        }
        if let Ok(s) = std::env::var(ENV_AMQP_SERVICE) {
            self.amqp_service = Some(s);
        }
        if let Ok(s) = std::env::var(ENV_DB_SERVICE) {
            self.db_service = Some(s);
        }
    }
}

/// Load config: defaults, then the first config file found, then env vars.
/// An unreadable file or an invalid result falls back to defaults with a warning.
pub fn load() -> CellConfig {
    let mut config = load_file().unwrap_or_default();
    config.apply_env();
    if let Err(e) = config.validate() {
        warn!("{}; using default endpoint name", e);
        config.endpoint_name = default_endpoint_name();
    }
    config
}

fn config_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut out = Vec::new();
    if let Some(h) = home {
        out.push(h.join(".config/cell/config.toml"));
    }
    out.push(PathBuf::from("/etc/cell/config.toml"));
    out
}

fn load_file() -> Option<CellConfig> {
    let path = config_paths().into_iter().find(|p| p.exists())?;
    let parsed = std::fs::read_to_string(&path)
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })
        .and_then(|s| CellConfig::from_toml(&s));
    match parsed {
        Ok(c) => Some(c),
        Err(e) => {
            warn!("ignoring {}: {}", path.display(), e);
            None
        }
    }
}
