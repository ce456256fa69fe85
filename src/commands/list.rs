//! List command - titles filtered by tags

use crate::session::{Session, ViewMode};
use crate::{ShelvrError, db::Database, output};

type Result<T> = std::result::Result<T, ShelvrError>;

/// Execute the list command
///
/// # Errors
/// Returns an error if the catalog cannot be read.
pub fn execute(db: &Database, tags: &[String], view: ViewMode, json: bool, quiet: bool) -> Result<()> {
    let session = filtered_session(db, tags, view);
    let rows = session.visible_titles()?;

    if json {
        println!("{}", output::json(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        if !quiet {
            if tags.is_empty() {
                println!("No titles in library.");
            } else {
                println!("No titles found with all tags: {}", tags.join(", "));
            }
        }
        return Ok(());
    }

    if !quiet {
        println!("{} title(s):", rows.len());
    }
    for line in output::titles(&rows, session.state().view, quiet) {
        println!("{line}");
    }
    Ok(())
}

/// A session whose filter holds every trimmed, non-empty tag in `tags`
fn filtered_session<'a>(db: &'a Database, tags: &[String], view: ViewMode) -> Session<'a> {
    let mut session = Session::new(db, view);
    for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !session.state().active_tags.contains(tag) {
            session.toggle_tag(tag);
        }
    }
    session
}
