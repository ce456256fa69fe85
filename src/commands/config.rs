//! Config command - read and write settings

use crate::cli::ConfigCommands;
use crate::config::{KEYS, ShelvrConfig};
use crate::ShelvrError;

type Result<T> = std::result::Result<T, ShelvrError>;

/// Execute the config command against `config`, saving after `set`
///
/// # Errors
/// Returns an error for unknown keys, unparsable values or a failed save.
pub fn execute(mut config: ShelvrConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Get { key } => {
            let value = config.get(key).map_err(|_| unknown_key(key))?;
            println!("{value}");
        }
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                ShelvrError::InvalidInput(format!("Expected KEY=VALUE, got '{setting}'"))
            })?;
            let key = key.trim();
            if !KEYS.contains(&key) {
                return Err(unknown_key(key));
            }
            config.set(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {}", config.get(key)?);
            }
        }
    }
    Ok(())
}

fn unknown_key(key: &str) -> ShelvrError {
    ShelvrError::InvalidInput(format!("Unknown config key '{key}'. Valid keys: {}", KEYS.join(", ")))
}
