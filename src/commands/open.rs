//! Open command - launch a title with the platform default application

use crate::{ShelvrError, TitleId, db::Database};
use std::path::PathBuf;
use tracing::info;

type Result<T> = std::result::Result<T, ShelvrError>;

/// Pick the path to open: the folder, or the `index`-th file (1-based)
///
/// # Errors
/// Returns `InvalidInput` if `index` is out of range.
pub fn target(db: &Database, id: TitleId, index: Option<usize>) -> Result<PathBuf> {
    let details = db.get_title_details(id)?;
    let Some(index) = index else {
        return Ok(details.title.folder_path);
    };
    index
        .checked_sub(1)
        .and_then(|i| details.files.get(i).cloned())
        .ok_or_else(|| {
            ShelvrError::InvalidInput(format!(
                "Title {id} has {} file(s); no file number {index}",
                details.files.len()
            ))
        })
}

/// Execute the open command
///
/// # Errors
/// Returns an error if the title or file does not exist or the opener
/// cannot be started.
pub fn execute(db: &Database, id: TitleId, index: Option<usize>, quiet: bool) -> Result<()> {
    let path = target(db, id, index)?;
    if !path.exists() {
        return Err(ShelvrError::InvalidInput(format!(
            "Path no longer exists: {}",
            path.display()
        )));
    }
    info!(path = %path.display(), "opening");
    ::open::that(&path)?;
    if !quiet {
        println!("Opened {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentType;
    use crate::testing::TestDb;
    use std::path::Path;

    #[test]
    fn test_target_defaults_to_folder() {
        let test_db = TestDb::new();
        let id = test_db.db().create_title("Alien", Path::new("/media/Alien")).unwrap();

        assert_eq!(target(test_db.db(), id, None).unwrap(), PathBuf::from("/media/Alien"));
    }

    #[test]
    fn test_target_file_index_is_one_based() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let files = vec![PathBuf::from("/media/S/b.mkv"), PathBuf::from("/media/S/a.mkv")];
        let id = db
            .create_title_with_files("S", Path::new("/media/S"), ContentType::Video, &files)
            .unwrap();

        assert_eq!(target(db, id, Some(1)).unwrap(), PathBuf::from("/media/S/a.mkv"));
        assert_eq!(target(db, id, Some(2)).unwrap(), PathBuf::from("/media/S/b.mkv"));
        assert!(matches!(target(db, id, Some(0)), Err(ShelvrError::InvalidInput(_))));
        assert!(matches!(target(db, id, Some(3)), Err(ShelvrError::InvalidInput(_))));
    }

    #[test]
    fn test_gallery_has_no_files_to_open() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let id = db
            .create_title_with_files("C", Path::new("/media/C"), ContentType::Gallery, &[])
            .unwrap();

        assert!(target(db, id, Some(1)).is_err());
    }
}
