//! Poster command - set the artwork of a title

use crate::library::Library;
use crate::{ShelvrError, TitleId};
use std::path::Path;

type Result<T> = std::result::Result<T, ShelvrError>;

/// Execute the poster command
///
/// # Errors
/// Returns an error if the title does not exist or the image cannot be
/// copied into the poster cache.
pub fn execute(library: &Library, id: TitleId, image: &Path, quiet: bool) -> Result<()> {
    let stored = library.set_poster(id, image)?;
    if !quiet {
        println!("Poster of title {id} set to {}", stored.display());
    }
    Ok(())
}
