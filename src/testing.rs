//! Testing utilities for shelvr
//!
//! This module provides helper types and functions for writing tests,
//! including a `TestDb` wrapper for temporary catalog management and
//! builders for media folder fixtures.
//!
//! Only available when compiled with `cfg(test)`.

use crate::db::Database;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wrapper for a temporary test catalog that cleans up on drop
///
/// The catalog lives in its own temporary directory, so tests running in
/// parallel never share state.
pub struct TestDb {
    db: Database,
    dir: TempDir,
}

impl TestDb {
    /// Create a new, empty test catalog
    ///
    /// # Panics
    /// Panics if the temporary directory or the database cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = Database::open(dir.path().join("library")).expect("Failed to open test database");
        Self { db, dir }
    }

    /// Get a reference to the underlying database
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Directory that holds the catalog; free to use for other fixtures
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a test file with default content, creating parent directories
///
/// # Errors
/// Returns an `io::Error` if the file cannot be created or written.
pub fn create_test_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(b"test content")?;
    Ok(())
}

/// Create `folder` containing the given relative file paths
///
/// # Panics
/// Panics if any file cannot be created.
pub fn media_folder(folder: &Path, files: &[&str]) -> PathBuf {
    fs::create_dir_all(folder).expect("Failed to create media folder");
    for file in files {
        create_test_file(folder.join(file)).expect("Failed to create media file");
    }
    folder.to_path_buf()
}

/// File names `prefix0.ext`, `prefix1.ext`, ... for building large folders
#[must_use]
pub fn numbered(prefix: &str, ext: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}{i}.{ext}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_cleanup_on_drop() {
        let path;
        {
            let test_db = TestDb::new();
            path = test_db.path().to_path_buf();
            test_db.db().create_title("A", Path::new("/media/A")).unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_media_folder_creates_nested_files() {
        let test_db = TestDb::new();
        let folder = media_folder(&test_db.path().join("show"), &["s1/e1.mkv", "cover.jpg"]);

        assert!(folder.join("s1/e1.mkv").is_file());
        assert!(folder.join("cover.jpg").is_file());
    }

    #[test]
    fn test_numbered() {
        assert_eq!(numbered("img", "png", 2), vec!["img0.png", "img1.png"]);
    }
}
