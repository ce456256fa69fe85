//! Remove command - delete a title from the library

use super::confirm;
use crate::library::Library;
use crate::{ShelvrError, TitleId};

type Result<T> = std::result::Result<T, ShelvrError>;

/// Execute the remove command
///
/// Only catalog rows and the cached poster are deleted; the media folder is
/// never touched. Returns whether the title was removed.
///
/// # Errors
/// Returns `DbError::NotFound` (wrapped) for an unknown id, or an error if
/// the confirmation prompt or the delete fails.
pub fn execute(library: &Library, id: TitleId, yes: bool, quiet: bool) -> Result<bool> {
    let title = library.db().get_title(id)?;

    if !confirm(&format!("Remove '{}' from the library?", title.name), yes)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(false);
    }

    let removed = library.remove_title(id)?;
    if removed && !quiet {
        println!("Removed '{}' [{id}].", title.name);
    }
    Ok(removed)
}
