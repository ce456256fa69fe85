//! Type command - override the detected content type

use crate::{ContentType, ShelvrError, TitleId, db::Database};

type Result<T> = std::result::Result<T, ShelvrError>;

/// Execute the type command
///
/// Stored file rows are kept when switching to gallery and show up again
/// when switching back to video. Use `rescan` to refresh them.
///
/// # Errors
/// Returns `DbError::NotFound` (wrapped) for an unknown id.
pub fn execute(db: &Database, id: TitleId, content_type: ContentType, quiet: bool) -> Result<()> {
    db.set_content_type(id, content_type)?;
    if !quiet {
        println!("Title {id} is now a {content_type} title.");
    }
    Ok(())
}
