//! Project-level picker configuration.
//!
//! # Responsibility
//! - Resolve project-relative output filenames to absolute paths.
//! - Carry the generic name used by training feature-vector files.
//! - Select the log level handed to `init_logging`.
//!
//! # Invariants
//! - `output_dir` is absolute once `validate()` succeeds.
//! - The training generic name is non-empty and filename-safe.

use crate::logging::{default_log_level, normalize_level};
use crate::model::is_file_safe_name;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Generic name upstream training tools expect in feature-vector filenames.
pub const DEFAULT_TRAINING_AUTO_FEATURE_VECTORS_GENERIC: &str = "training_auto_feature_vectors";

#[derive(Debug)]
pub enum ConfigError {
    EmptyOutputDir,
    RelativeOutputDir(PathBuf),
    InvalidGenericName(String),
    InvalidLogLevel(String),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOutputDir => write!(f, "output_dir cannot be empty"),
            Self::RelativeOutputDir(path) => write!(
                f,
                "output_dir must be an absolute path, got `{}`",
                path.display()
            ),
            Self::InvalidGenericName(name) => write!(
                f,
                "training feature vectors generic name `{name}` cannot be used in a filename"
            ),
            Self::InvalidLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::Parse(err) => write!(f, "invalid picker config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerConfig {
    output_dir: PathBuf,
    #[serde(default = "default_generic_name")]
    training_auto_feature_vectors_generic: String,
    #[serde(default)]
    log_level: Option<String>,
}

fn default_generic_name() -> String {
    DEFAULT_TRAINING_AUTO_FEATURE_VECTORS_GENERIC.to_string()
}

impl PickerConfig {
    /// Creates a validated config with default generic name and log level.
    ///
    /// # Errors
    /// - Returns an error when `output_dir` is empty or relative.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config = Self {
            output_dir: output_dir.into(),
            training_auto_feature_vectors_generic: default_generic_name(),
            log_level: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Overrides the training feature vectors generic name.
    pub fn with_training_generic(mut self, name: impl Into<String>) -> Result<Self, ConfigError> {
        self.training_auto_feature_vectors_generic = name.into();
        self.validate()?;
        Ok(self)
    }

    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputDir);
        }
        if !self.output_dir.is_absolute() {
            return Err(ConfigError::RelativeOutputDir(self.output_dir.clone()));
        }
        if !is_file_safe_name(&self.training_auto_feature_vectors_generic) {
            return Err(ConfigError::InvalidGenericName(
                self.training_auto_feature_vectors_generic.clone(),
            ));
        }
        if let Some(level) = &self.log_level {
            normalize_level(level).map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?;
        }
        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolves a project-relative filename under the output directory.
    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    pub fn training_auto_feature_vectors_generic(&self) -> &str {
        &self.training_auto_feature_vectors_generic
    }

    /// Configured log level, or the build-mode default.
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}
