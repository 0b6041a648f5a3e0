//! Application configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML config file (`--config PATH`, or the platform config directory)
//! 3. Environment variables prefixed with `PDFDUPE_` (e.g. `PDFDUPE_EXTENSION=txt`)
//! 4. Command-line flags
//!
//! ```toml
//! # ~/.config/pdfdupe/config.toml
//! extension = "pdf"
//! buffer_size = 65536
//! color = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::scanner::{normalize_extension, DEFAULT_BUFFER_SIZE, DEFAULT_EXTENSION};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "PDFDUPE_";

/// Errors raised by configuration validation and persistence.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The selector extension is empty.
    #[error("extension must not be empty")]
    EmptyExtension,

    /// The hashing buffer has zero size.
    #[error("buffer_size must be at least 1 byte")]
    ZeroBufferSize,

    /// No platform configuration directory could be determined.
    #[error("failed to determine the configuration directory")]
    NoConfigDir,

    /// Serializing the configuration failed.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Writing the configuration file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extension selecting candidate files.
    pub extension: String,
    /// Read buffer size used while hashing, in bytes.
    pub buffer_size: usize,
    /// Colour the rendered plan.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            color: true,
        }
    }
}

impl Config {
    /// Load configuration from the given file (or the default path) and the environment.
    ///
    /// A missing file is not an error. A file or environment value that
    /// cannot be parsed is logged and the defaults are used instead.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);
        match Self::figment(path.as_deref()).extract::<Self>() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Build the layered provider without extracting it.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Apply command-line overrides.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(ref ext) = cli.extension {
            self.extension = ext.clone();
        }
        if let Some(size) = cli.buffer_size {
            self.buffer_size = size;
        }
        if cli.no_color {
            self.color = false;
        }
    }

    /// Normalize and check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty extension or a zero buffer size.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.extension = normalize_extension(&self.extension);
        if self.extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::ZeroBufferSize);
        }
        Ok(self)
    }

    /// Write the configuration as TOML to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)
    }
}

/// The platform-specific configuration file path, if one can be determined.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "pdfdupe", "pdfdupe").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// [`default_config_path`], as an error when unavailable.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if no home directory is known.
pub fn require_config_path() -> Result<PathBuf, ConfigError> {
    default_config_path().ok_or(ConfigError::NoConfigDir)
}
