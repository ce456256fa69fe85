//! Show command - details of one title

use crate::library::Library;
use crate::{ShelvrError, TitleId, output};
use serde::Serialize;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, ShelvrError>;

#[derive(Serialize)]
struct ShowJson<'a> {
    #[serde(flatten)]
    details: &'a crate::TitleDetails,
    poster: PathBuf,
}

/// Execute the show command
///
/// # Errors
/// Returns `DbError::NotFound` (wrapped) for an unknown id.
pub fn execute(library: &Library, id: TitleId, json: bool) -> Result<()> {
    let details = library.db().get_title_details(id)?;
    let poster = library.poster_for(&details.title)?;

    if json {
        println!("{}", output::json(&ShowJson { details: &details, poster })?);
    } else {
        for line in output::details(&details, &poster) {
            println!("{line}");
        }
    }
    Ok(())
}
