//! Filesystem-backed folder scanning

use super::traits::FolderScanner;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// [`FolderScanner`] over the real filesystem
///
/// Symlinks to files count as files; symlinked directories are not
/// descended into.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsScanner;

impl FolderScanner for FsScanner {
    fn list_files(&self, folder: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(folder)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn walk_files(&self, folder: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(folder).follow_links(false) {
            match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => warn!(folder = %folder.display(), error = %e, "skipping unreadable entry"),
            }
        }
        files
    }
}
