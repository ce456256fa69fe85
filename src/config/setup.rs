//! Interactive setup wizard for first-time configuration

use super::ShelvrConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

/// Interactive first-time setup - prompts for the data directory
///
/// The library, poster cache and placeholder image all live below the
/// chosen directory. The resulting configuration is saved before returning.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The system data directory cannot be determined
/// - User input cannot be read
/// - The configuration cannot be saved
pub fn first_time_setup() -> Result<ShelvrConfig, ConfigError> {
    println!("Welcome to shelvr! Let's choose where your library lives.\n");

    let default_dir = ShelvrConfig::default_data_dir()?;
    let data_dir: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Data directory")
        .default(default_dir.to_string_lossy().to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let config = ShelvrConfig {
        data_dir: Some(PathBuf::from(data_dir.trim())),
        ..ShelvrConfig::default()
    };
    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
