//! Folder inspection for imports
//!
//! Decides whether a folder is a video collection or an image gallery and,
//! for video collections, enumerates the files to track.

pub mod classifier;
pub mod scan;
pub mod traits;

pub use classifier::{ClassifierSettings, classify};
pub use scan::FsScanner;
pub use traits::FolderScanner;

use crate::ContentType;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Outcome of inspecting one folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderScan {
    pub content_type: ContentType,
    /// Files to register; always empty for galleries
    pub files: Vec<PathBuf>,
    /// The direct listing failed and the folder fell back to video
    pub listing_failed: bool,
}

/// Classify a folder and, if it is a video collection, walk it
///
/// A folder that cannot be listed is logged and treated as a video title
/// with no files, so one bad folder never stops an import batch.
pub fn scan_folder<S: FolderScanner + ?Sized>(
    scanner: &S,
    folder: &Path,
    settings: &ClassifierSettings,
) -> FolderScan {
    let direct = match scanner.list_files(folder) {
        Ok(direct) => direct,
        Err(e) => {
            warn!(folder = %folder.display(), error = %e, "could not analyze folder contents");
            return FolderScan {
                content_type: ContentType::Video,
                files: Vec::new(),
                listing_failed: true,
            };
        }
    };

    let content_type = classify(&direct, settings);
    let files = match content_type {
        ContentType::Video => scanner.walk_files(folder),
        ContentType::Gallery => Vec::new(),
    };
    FolderScan {
        content_type,
        files,
        listing_failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{media_folder, numbered};
    use std::cell::Cell;
    use std::io;

    struct FailingScanner {
        walked: Cell<bool>,
    }

    impl FolderScanner for FailingScanner {
        fn list_files(&self, _folder: &Path) -> io::Result<Vec<PathBuf>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        fn walk_files(&self, _folder: &Path) -> Vec<PathBuf> {
            self.walked.set(true);
            vec![PathBuf::from("never")]
        }
    }

    #[test]
    fn test_video_folder_collects_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let folder = media_folder(&dir.path().join("movie"), &["movie.mkv", "extras/making-of.mkv"]);

        let scan = scan_folder(&FsScanner, &folder, &ClassifierSettings::default());

        assert_eq!(scan.content_type, ContentType::Video);
        assert_eq!(scan.files.len(), 2);
        assert!(!scan.listing_failed);
    }

    #[test]
    fn test_gallery_folder_collects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let names = numbered("page", "png", 40);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let folder = media_folder(&dir.path().join("comic"), &refs);

        let scan = scan_folder(&FsScanner, &folder, &ClassifierSettings::default());

        assert_eq!(scan.content_type, ContentType::Gallery);
        assert!(scan.files.is_empty());
    }

    #[test]
    fn test_subdirectories_do_not_count_towards_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let mut names = numbered("img", "jpg", 10);
        names.extend(numbered("sub/img", "jpg", 40));
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let folder = media_folder(&dir.path().join("mixed"), &refs);

        let scan = scan_folder(&FsScanner, &folder, &ClassifierSettings::default());

        assert_eq!(scan.content_type, ContentType::Video);
        assert_eq!(scan.files.len(), 50);
    }

    #[test]
    fn test_listing_failure_falls_back_to_empty_video() {
        let scanner = FailingScanner { walked: Cell::new(false) };

        let scan = scan_folder(&scanner, Path::new("/nowhere"), &ClassifierSettings::default());

        assert_eq!(scan.content_type, ContentType::Video);
        assert!(scan.files.is_empty());
        assert!(scan.listing_failed);
        assert!(!scanner.walked.get());
    }
}
