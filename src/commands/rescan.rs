//! Rescan command - refresh the file list of a video title

use crate::discovery::FsScanner;
use crate::import::rescan_title;
use crate::{ContentType, ShelvrError, TitleId, db::Database};

type Result<T> = std::result::Result<T, ShelvrError>;

/// Execute the rescan command
///
/// # Errors
/// Returns `DbError::NotFound` (wrapped) for an unknown id.
pub fn execute(db: &Database, id: TitleId, quiet: bool) -> Result<()> {
    let content_type = db.get_title(id)?.content_type;
    let files = rescan_title(db, &FsScanner, id)?;
    if !quiet {
        match content_type {
            ContentType::Video => println!("Title {id} now lists {files} file(s)."),
            ContentType::Gallery => println!("Title {id} is a gallery; files are not tracked."),
        }
    }
    Ok(())
}
