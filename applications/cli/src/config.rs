//! CLI configuration

use audiolab_codec::validation::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_MB};
use audiolab_dsp::DEFAULT_TARGET_PEAK;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "audiolab.toml";

/// Environment variable prefix, e.g. `AUDIOLAB_TARGET_PEAK=0.9`
pub const ENV_PREFIX: &str = "AUDIOLAB";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: usize,

    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    #[serde(default = "default_target_peak")]
    pub target_peak: f32,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `audiolab.toml` in the
    /// working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with AUDIOLAB_)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("allowed_extensions")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "allowed_extensions must list at least one extension".to_string(),
            ));
        }

        if self.max_file_size_mb == 0 {
            return Err(ConfigError::Invalid(
                "max_file_size_mb must be greater than 0".to_string(),
            ));
        }

        if !(self.target_peak > 0.0 && self.target_peak <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "target_peak must be in (0, 1], got {}",
                self.target_peak
            )));
        }

        Ok(())
    }

    /// Upload limit in bytes
    pub fn max_file_size_bytes(&self) -> usize {
        audiolab_codec::validation::megabytes(self.max_file_size_mb)
    }
}

// Default values
fn default_max_file_size_mb() -> usize {
    DEFAULT_MAX_FILE_SIZE_MB
}

fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|e| (*e).to_string())
        .collect()
}

fn default_target_peak() -> f32 {
    DEFAULT_TARGET_PEAK
}

fn default_log_filter() -> String {
    "audiolab=info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            allowed_extensions: default_allowed_extensions(),
            target_peak: default_target_peak(),
            log_filter: default_log_filter(),
        }
    }
}
