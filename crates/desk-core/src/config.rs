//! Desk configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! dataset_path = "data/mock.json"
//! default_company = "acme"
//! role = "editor"
//! search_debounce_ms = 250
//!
//! [log]
//! filter = "desk=debug,info"
//! format = "json"
//! ```

use desk_model::CompanyId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Mock role flag; there is no authentication behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Everything, including tag management
    Admin,
    /// Article edits and bulk tag actions
    #[default]
    Editor,
    /// Read-only
    Viewer,
}

impl Role {
    /// May create, edit, delete articles and apply bulk tag actions
    #[inline]
    #[must_use]
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Admin | Self::Editor)
    }

    /// May create, edit, delete tags
    #[inline]
    #[must_use]
    pub fn can_manage_tags(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        })
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` overrides it
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Desk configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Mock dataset JSON file
    pub dataset_path: Option<PathBuf>,
    /// Company used when a command does not name one
    pub default_company: Option<CompanyId>,
    pub role: Role,
    /// Delay between the last search keystroke and the filter run
    pub search_debounce_ms: u64,
    pub log: LogConfig,
}

impl DeskConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML
    ///
    /// # Errors
    /// `Parse` on malformed TOML, `Invalid` on out-of-range values
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `Invalid` describing the offending value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_debounce_ms > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "search_debounce_ms {} exceeds 10000",
                self.search_debounce_ms
            )));
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log.filter is empty".to_string()));
        }
        Ok(())
    }

    /// With dataset path
    #[inline]
    #[must_use]
    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = Some(path.into());
        self
    }

    /// With role
    #[inline]
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// With default company
    #[inline]
    #[must_use]
    pub fn with_default_company(mut self, company: impl Into<CompanyId>) -> Self {
        self.default_company = Some(company.into());
        self
    }

    /// Search debounce delay
    #[inline]
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            default_company: None,
            role: Role::default(),
            search_debounce_ms: 300,
            log: LogConfig::default(),
        }
    }
}
