use std::io;
use std::path::{Path, PathBuf};

/// Filesystem access needed to classify and enumerate a title folder
pub trait FolderScanner {
    /// Regular files that are direct children of `folder`
    ///
    /// # Errors
    /// Returns an `io::Error` if the folder cannot be listed.
    fn list_files(&self, folder: &Path) -> io::Result<Vec<PathBuf>>;

    /// Every file below `folder`, recursively, in no particular order
    ///
    /// Entries that cannot be read are skipped.
    fn walk_files(&self, folder: &Path) -> Vec<PathBuf>;
}
