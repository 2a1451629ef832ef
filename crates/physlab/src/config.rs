//! Runtime configuration for `physlab`.
//!
//! Settings come from an optional TOML file, then CLI flags and environment
//! variables override them. [`Config`] is the resolved result.
//!
//! ```toml
//! store_path = "class-7b.json"
//! strategy = "serialized"
//! leaderboard_limit = 5
//! clamp_inputs = true
//! verbosity = 1
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scoreboard::{DEFAULT_LEADERBOARD_LIMIT, UpdateStrategy};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Store file used when neither the config file nor `--store` names one.
pub const DEFAULT_STORE_PATH: &str = "physlab-users.json";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON document store file.
    pub store_path: PathBuf,

    /// How quiz completions are written.
    pub strategy: UpdateStrategy,

    /// Default number of leaderboard entries.
    pub leaderboard_limit: usize,

    /// Whether simulation inputs are clamped into the interactive ranges.
    pub clamp_inputs: bool,

    /// Log verbosity level (0=warn, 1=info, 2=debug, 3+=trace).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            strategy: UpdateStrategy::default(),
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            clamp_inputs: true,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: None,
            source: Box::new(source),
        })
    }

    /// Reads a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source: Box::new(source),
        })
    }

    /// Resolves the configuration for a command line.
    ///
    /// Loads `--config` if given, applies flag overrides, then validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or the result is invalid.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(store) = &cli.store {
            config.store_path.clone_from(store);
        }
        if cli.verbose > 0 {
            config.verbosity = cli.verbose;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaderboard_limit == 0 {
            return Err(ConfigError::ZeroLeaderboardLimit);
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }
        Ok(())
    }

    /// Export configuration as a diagnostic string.
    #[must_use]
    pub fn to_diagnostic_string(&self) -> String {
        [
            format!("Store: {}", self.store_path.display()),
            format!("Strategy: {:?}", self.strategy),
            format!("Leaderboard limit: {}", self.leaderboard_limit),
            format!("Clamp inputs: {}", self.clamp_inputs),
            format!("Verbosity: {}", self.verbosity),
        ]
        .join("\n")
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML or has unknown keys.
    #[error("invalid config{}: {source}", location(.path.as_deref()))]
    Parse {
        /// File that was parsed, if any.
        path: Option<PathBuf>,
        /// Parser error.
        #[source]
        source: Box<toml::de::Error>,
    },

    /// `leaderboard_limit` is zero.
    #[error("leaderboard_limit must be at least 1")]
    ZeroLeaderboardLimit,

    /// `store_path` is empty.
    #[error("store_path must not be empty")]
    EmptyStorePath,
}

fn location(path: Option<&Path>) -> String {
    path.map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}
