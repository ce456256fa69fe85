//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and executes the operation against the library.

pub mod config;
pub mod content_type;
pub mod import;
pub mod list;
pub mod open;
pub mod poster;
pub mod remove;
pub mod rescan;
pub mod show;
pub mod tag;
pub mod tags;

// Re-export execute functions for convenience
pub use self::config::execute as config;
pub use content_type::execute as content_type;
pub use import::execute as import;
pub use list::execute as list;
pub use self::open::execute as open;
pub use poster::execute as poster;
pub use remove::execute as remove;
pub use rescan::execute as rescan;
pub use show::execute as show;
pub use tag::{execute as tag, untag};
pub use tags::execute as tags;

use crate::ShelvrError;
use dialoguer::Confirm;

/// Prompt user for yes/no confirmation using dialoguer
///
/// `assume_yes` skips the prompt.
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, ShelvrError> {
    if assume_yes {
        return Ok(true);
    }

    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ShelvrError::InvalidInput(format!("Confirmation failed: {e}")))
}
