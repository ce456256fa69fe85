//! Configuration module for shelvr
//!
//! Manages application configuration: where the library lives, display
//! defaults and the classifier tunables. Configuration is stored in the
//! user's config directory.

mod setup;

pub use setup::first_time_setup;

use crate::discovery::ClassifierSettings;
use crate::session::ViewMode;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys understood by [`ShelvrConfig::get`] and [`ShelvrConfig::set`]
pub const KEYS: [&str; 6] = [
    "data_dir",
    "quiet",
    "view",
    "classifier.file_count_threshold",
    "classifier.image_ratio_threshold",
    "classifier.image_extensions",
];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ShelvrConfig {
    /// Directory holding the library, poster cache and placeholder
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Default layout for title listings
    #[serde(default)]
    pub view: ViewMode,

    /// Video/gallery classification tunables
    #[serde(default)]
    pub classifier: ClassifierSettings,
}

impl ShelvrConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("shelvr").join("config.toml"))
    }

    /// Data directory used when none is configured
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system data directory cannot be determined.
    pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
        dirs::data_local_dir()
            .map(|dir| dir.join("shelvr"))
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
    }

    /// Load configuration from the default location, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it is missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))
    }

    /// Load configuration, running first-time setup if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        if Self::config_path()?.exists() {
            Self::load()
        } else {
            first_time_setup()
        }
    }

    /// The configured data directory, or the platform default
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no directory is configured and the platform
    /// default cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_data_dir(),
        }
    }

    /// Read a setting as display text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` for unknown keys.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "data_dir" => self
                .data_dir
                .as_ref()
                .map_or_else(String::new, |dir| dir.display().to_string()),
            "quiet" => self.quiet.to_string(),
            "view" => self.view.as_str().to_string(),
            "classifier.file_count_threshold" => self.classifier.file_count_threshold.to_string(),
            "classifier.image_ratio_threshold" => self.classifier.image_ratio_threshold.to_string(),
            "classifier.image_extensions" => self.classifier.image_extensions.join(","),
            _ => return Err(ConfigError::NotFound(key.to_string())),
        };
        Ok(value)
    }

    /// Update a setting from text; does not save
    ///
    /// `classifier.image_extensions` takes a comma-separated list and an
    /// empty `data_dir` resets it to the platform default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown keys or values that do not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |e: &dyn std::fmt::Display| ConfigError::Message(format!("Invalid value for {key}: {e}"));
        match key {
            "data_dir" => {
                self.data_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "quiet" => self.quiet = value.parse().map_err(|e| invalid(&e))?,
            "view" => self.view = value.parse().map_err(|e| invalid(&e))?,
            "classifier.file_count_threshold" => {
                self.classifier.file_count_threshold = value.parse().map_err(|e| invalid(&e))?;
            }
            "classifier.image_ratio_threshold" => {
                let ratio: f64 = value.parse().map_err(|e| invalid(&e))?;
                if !(0.0..=1.0).contains(&ratio) {
                    return Err(invalid(&"must be between 0 and 1"));
                }
                self.classifier.image_ratio_threshold = ratio;
            }
            "classifier.image_extensions" => {
                self.classifier.image_extensions = value
                    .split(',')
                    .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                    .filter(|ext| !ext.is_empty())
                    .collect();
            }
            _ => return Err(ConfigError::NotFound(key.to_string())),
        }
        Ok(())
    }
}
