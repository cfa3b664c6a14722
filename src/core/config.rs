//! Configuration management
//!
//! Settings come from an optional YAML file. Its location is `$NOVA_CONFIG`
//! when set, otherwise `config.yaml` in the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "NOVA_CONFIG";

/// Default database file name inside the data directory
pub const DEFAULT_DB_NAME: &str = "invoicing.db";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    #[diagnostic(code(nova::config))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    #[diagnostic(
        code(nova::config),
        help("keys are `database`, `max_reported_errors` and `log`")
    )]
    Parse {
        path: PathBuf,
        source: serde_yml::Error,
    },
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the SQLite database file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// How many rejected import rows are printed
    pub max_reported_errors: usize,

    /// Default log filter directive (e.g. "nova=info")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            max_reported_errors: 20,
            log: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "nova")
}

impl Config {
    /// Location of the config file, if one can be determined
    pub fn path() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => project_dirs().map(|dirs| dirs.config_dir().join("config.yaml")),
        }
    }

    /// Load from the default location; no file means defaults
    pub fn load() -> Result<Self, ConfigError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the database path: explicit flag, then config, then the data directory
    pub fn database_path(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(path) = flag {
            return path.to_path_buf();
        }
        if let Some(path) = &self.database {
            return path.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DEFAULT_DB_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_NAME))
    }
}
