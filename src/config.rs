//! # Registry Configuration
//!
//! Layered configuration for resolution policy and logging.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`config/registry.toml` unless told otherwise)
//! 3. Environment variables prefixed with `CAPREG_`, using `__` to nest
//!    (`CAPREG_RESOLUTION__TIE_BREAK=last_registered`)
//!
//! ```rust,no_run
//! use capability_registry::config::RegistryConfig;
//!
//! # fn main() -> capability_registry::Result<()> {
//! let config = RegistryConfig::load()?;
//! println!("tie break: {:?}", config.resolution.tie_break);
//! # Ok(())
//! # }
//! ```

use crate::error::{RegistryError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "config/registry.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "CAPREG";

/// How to pick between factories that report the same highest score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The earliest registered factory among the tied ones wins.
    #[default]
    FirstRegistered,
    /// The most recently registered factory among the tied ones wins.
    LastRegistered,
}

/// What a resolver does when the chosen factory fails to create a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationFailurePolicy {
    /// Return the creation error to the caller.
    #[default]
    Propagate,
    /// Log the failure at WARN and report "no provider".
    LogAndSkip,
}

/// Resolution policy shared by the resolvers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionOptions {
    pub tie_break: TieBreak,
    pub creation_failure: CreationFailurePolicy,
}

impl ResolutionOptions {
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    #[must_use]
    pub fn with_creation_failure(mut self, policy: CreationFailurePolicy) -> Self {
        self.creation_failure = policy;
        self
    }
}

/// Logging settings consumed by [`crate::logging::init_structured_logging`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `capability_registry=trace`.
    /// When unset the level is derived from the detected environment.
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub resolution: ResolutionOptions,
    pub logging: LoggingConfig,
}

impl RegistryConfig {
    /// Load from [`DEFAULT_CONFIG_FILE`] (if present) and `CAPREG_*` variables.
    pub fn load() -> Result<Self> {
        Self::load_from(Some(Path::new(DEFAULT_CONFIG_FILE)), ENV_PREFIX)
    }

    /// Load from an explicit file and environment prefix.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load_from(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Reading registry configuration file");
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: RegistryConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text, ignoring the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: RegistryConfig = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(level) = &self.logging.level {
            if level.trim().is_empty() {
                return Err(RegistryError::Configuration(
                    "logging.level cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
