//! Tag and untag commands - edit the tags of one title

use crate::{ShelvrError, TitleId, db::Database};

type Result<T> = std::result::Result<T, ShelvrError>;

/// Assign tags to a title, creating any that do not exist yet
///
/// Blank names are ignored. Returns the number of new assignments.
///
/// # Errors
/// Returns `DbError::NotFound` (wrapped) for an unknown id.
pub fn execute(db: &Database, id: TitleId, tags: &[String], quiet: bool) -> Result<usize> {
    db.get_title(id)?;
    let mut added = Vec::new();
    for tag in tags {
        if db.create_tag(tag)?.is_none() {
            continue;
        }
        if db.assign_tag(id, tag.trim())? {
            added.push(tag.trim());
        }
    }

    if !quiet {
        if added.is_empty() {
            println!("Title {id} already has all given tags.");
        } else {
            println!("Tagged title {id} with: {}", added.join(", "));
        }
    }
    Ok(added.len())
}

/// Remove tags from a title; tags it does not carry are ignored
///
/// Returns the number of assignments removed.
///
/// # Errors
/// Returns `DbError::NotFound` (wrapped) for an unknown id.
pub fn untag(db: &Database, id: TitleId, tags: &[String], quiet: bool) -> Result<usize> {
    db.get_title(id)?;
    let mut removed = Vec::new();
    for tag in tags {
        if db.unassign_tag(id, tag.trim())? {
            removed.push(tag.trim());
        }
    }

    if !quiet {
        if removed.is_empty() {
            println!("No matching tags on title {id}.");
        } else {
            println!("Removed from title {id}: {}", removed.join(", "));
        }
    }
    Ok(removed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::testing::TestDb;
    use std::path::Path;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_tag_creates_missing_tags() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let id = db.create_title("Alien", Path::new("/media/Alien")).unwrap();

        let added = execute(db, id, &strings(&["scifi", " horror ", "  ", "scifi"]), true).unwrap();

        assert_eq!(added, 2);
        assert_eq!(db.list_tags().unwrap(), vec!["horror", "scifi"]);
        assert_eq!(db.tags_for_title(id).unwrap(), vec!["horror", "scifi"]);
    }

    #[test]
    fn test_untag_ignores_unknown() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let id = db.create_title("Alien", Path::new("/media/Alien")).unwrap();
        execute(db, id, &strings(&["scifi", "horror"]), true).unwrap();

        let removed = untag(db, id, &strings(&["horror", "western"]), true).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(db.tags_for_title(id).unwrap(), vec!["scifi"]);
        assert_eq!(db.list_tags().unwrap(), vec!["horror", "scifi"]);
    }

    #[test]
    fn test_tag_unknown_title_creates_nothing() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let result = execute(db, TitleId(42), &strings(&["scifi"]), true);

        assert!(matches!(result, Err(ShelvrError::DbError(DbError::NotFound(_)))));
        assert!(db.list_tags().unwrap().is_empty());
    }
}
