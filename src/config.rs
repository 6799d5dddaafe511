//! Runtime configuration
//!
//! Read from the environment (a `.env` file is honoured by the binaries);
//! command-line flags override individual values.

use crate::error::{CalcError, Result};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_DIST_DIR: &str = "dist";
pub const DEFAULT_STORE_PATH: &str = ".benefits_calc/local_storage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface the static server binds to
    pub host: String,
    pub port: u16,
    /// Directory holding the built front-end
    pub dist_dir: PathBuf,
    /// File backing the local storage used by the password gate
    pub store_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("BENEFITS_CALC_HOST") {
            config.host = host;
        }
        if let Some(port) = get("BENEFITS_CALC_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| CalcError::Config(format!("BENEFITS_CALC_PORT is not a valid port: {}", port)))?;
        }
        if let Some(dist) = get("BENEFITS_CALC_DIST") {
            config.dist_dir = PathBuf::from(dist);
        }
        if let Some(store) = get("BENEFITS_CALC_STORE") {
            config.store_path = PathBuf::from(store);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
