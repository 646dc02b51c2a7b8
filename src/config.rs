//! Runtime configuration, read once from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::catalog::DEFAULT_DATA_DIR;

pub const BIND_ENV: &str = "GUMSHOE_BIND";
pub const DATA_DIR_ENV: &str = "GUMSHOE_DATA_DIR";
pub const STATIC_DIR_ENV: &str = "GUMSHOE_STATIC_DIR";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid GUMSHOE_BIND '{value}': {source}")]
    Bind {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding the ability catalog JSON files.
    pub data_dir: PathBuf,
    /// Prebuilt front-end served for non-API paths when present.
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind = env::var(BIND_ENV).unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind_addr = bind.parse().map_err(|source| ConfigError::Bind {
            value: bind.clone(),
            source,
        })?;
        Ok(Self {
            bind_addr,
            data_dir: data_dir_from_env(),
            static_dir: env::var(STATIC_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }

    /// Defaults with a specific data directory; used by tests and the CLI.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: data_dir.into(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

/// Data directory for one-shot CLI commands: `GUMSHOE_DATA_DIR` or `data`.
pub fn data_dir_from_env() -> PathBuf {
    env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}
