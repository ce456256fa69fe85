//! Turning folders into titles
//!
//! A single import classifies one folder and records it, with its files for
//! video titles, in one store transaction. A batch import does the same for
//! every sub-folder of a root and reports a per-folder outcome instead of
//! stopping at the first problem.

use crate::db::{Database, DbError};
use crate::discovery::{ClassifierSettings, FolderScanner, scan_folder};
use crate::{ContentType, ShelvrError, TitleId};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

type Result<T> = std::result::Result<T, ShelvrError>;

/// What happened to one folder during an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ImportOutcome {
    Added {
        id: TitleId,
        name: String,
        content_type: ContentType,
        files: usize,
    },
    /// The folder is already registered
    Skipped,
    Failed { reason: String },
}

/// One line of an [`ImportReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportItem {
    pub folder: PathBuf,
    #[serde(flatten)]
    pub outcome: ImportOutcome,
}

/// Per-folder results of a batch import, in folder name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub items: Vec<ImportItem>,
}

impl ImportReport {
    #[must_use]
    pub fn added(&self) -> usize {
        self.count(|outcome| matches!(outcome, ImportOutcome::Added { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, ImportOutcome::Skipped))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ImportOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ImportOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

/// Name a title after the last component of its folder
fn title_name(folder: &Path) -> String {
    folder.file_name().map_or_else(
        || folder.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Drop paths the store cannot hold, logging each one
fn storable(files: Vec<PathBuf>) -> Vec<PathBuf> {
    files
        .into_iter()
        .filter(|path| {
            let ok = path.to_str().is_some();
            if !ok {
                warn!(path = %path.display(), "skipping file with non UTF-8 path");
            }
            ok
        })
        .collect()
}

/// Import one folder as a title
///
/// # Errors
///
/// Returns `DbError::AlreadyExists` (wrapped) if the folder is already in the
/// library, or another error if the folder path cannot be stored or the
/// write fails. Nothing is written on error.
pub fn import_title<S: FolderScanner + ?Sized>(
    db: &Database,
    scanner: &S,
    folder: &Path,
    settings: &ClassifierSettings,
) -> Result<ImportOutcome> {
    if db.find_by_folder(folder)?.is_some() {
        return Err(DbError::AlreadyExists(folder.display().to_string()).into());
    }

    let name = title_name(folder);
    let scan = scan_folder(scanner, folder, settings);
    let files = storable(scan.files);
    let id = db.create_title_with_files(&name, folder, scan.content_type, &files)?;

    info!(
        id = %id,
        name = %name,
        content_type = %scan.content_type,
        files = files.len(),
        "added title"
    );
    Ok(ImportOutcome::Added {
        id,
        name,
        content_type: scan.content_type,
        files: files.len(),
    })
}

/// Import every direct sub-folder of `root` as its own title
///
/// Folders are processed in name order. Registered folders are skipped and
/// failing folders are recorded; neither stops the batch.
///
/// # Errors
///
/// Returns `ShelvrError::IoFailure` only if `root` itself cannot be listed.
pub fn import_batch<S: FolderScanner + ?Sized>(
    db: &Database,
    scanner: &S,
    root: &Path,
    settings: &ClassifierSettings,
) -> Result<ImportReport> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            folders.push(path);
        }
    }
    folders.sort();

    let mut report = ImportReport::default();
    for folder in folders {
        let outcome = match import_title(db, scanner, &folder, settings) {
            Ok(outcome) => outcome,
            Err(ShelvrError::DbError(DbError::AlreadyExists(_))) => ImportOutcome::Skipped,
            Err(e) => {
                warn!(folder = %folder.display(), error = %e, "import failed");
                ImportOutcome::Failed { reason: e.to_string() }
            }
        };
        report.items.push(ImportItem { folder, outcome });
    }
    Ok(report)
}

/// Walk a video title's folder again and replace its file rows
///
/// Gallery titles are left alone and report zero files. Returns the number
/// of file rows now stored.
///
/// # Errors
///
/// Returns `DbError::NotFound` (wrapped) if the title does not exist, or
/// another error if the write fails.
pub fn rescan_title<S: FolderScanner + ?Sized>(
    db: &Database,
    scanner: &S,
    title: TitleId,
) -> Result<usize> {
    let row = db.get_title(title)?;
    if row.content_type == ContentType::Gallery {
        return Ok(0);
    }
    let files = storable(scanner.walk_files(&row.folder_path));
    let stored = db.replace_files(title, &files)?;
    info!(id = %title, files = stored, "rescanned title");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::FsScanner;
    use crate::testing::{TestDb, media_folder, numbered};
    use std::io;

    /// Fails to list one named folder and defers to the filesystem otherwise
    struct FlakyScanner {
        broken: PathBuf,
    }

    impl FolderScanner for FlakyScanner {
        fn list_files(&self, folder: &Path) -> io::Result<Vec<PathBuf>> {
            if folder == self.broken {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            } else {
                FsScanner.list_files(folder)
            }
        }

        fn walk_files(&self, folder: &Path) -> Vec<PathBuf> {
            FsScanner.walk_files(folder)
        }
    }

    #[test]
    fn test_import_video_title_records_files() {
        let test_db = TestDb::new();
        let folder = media_folder(&test_db.path().join("Alien"), &["alien.mkv", "extras/trailer.mp4"]);

        let outcome = import_title(test_db.db(), &FsScanner, &folder, &ClassifierSettings::default()).unwrap();

        let ImportOutcome::Added { id, name, content_type, files } = outcome else {
            panic!("expected Added, got {outcome:?}");
        };
        assert_eq!(name, "Alien");
        assert_eq!(content_type, ContentType::Video);
        assert_eq!(files, 2);
        let details = test_db.db().get_title_details(id).unwrap();
        assert_eq!(details.files, vec![folder.join("alien.mkv"), folder.join("extras/trailer.mp4")]);
    }

    #[test]
    fn test_import_gallery_records_no_files() {
        let test_db = TestDb::new();
        let pages = numbered("page", "jpg", 36);
        let mut names: Vec<&str> = pages.iter().map(String::as_str).collect();
        names.extend(["a.txt", "b.txt", "c.txt", "d.txt"]);
        let folder = media_folder(&test_db.path().join("Comic"), &names);

        let outcome = import_title(test_db.db(), &FsScanner, &folder, &ClassifierSettings::default()).unwrap();

        let ImportOutcome::Added { id, content_type, files, .. } = outcome else {
            panic!("expected Added, got {outcome:?}");
        };
        assert_eq!(content_type, ContentType::Gallery);
        assert_eq!(files, 0);
        assert!(test_db.db().files_for_title(id).unwrap().is_empty());
    }

    #[test]
    fn test_import_same_folder_twice_is_rejected() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let folder = media_folder(&test_db.path().join("Alien"), &["alien.mkv"]);
        let settings = ClassifierSettings::default();

        import_title(db, &FsScanner, &folder, &settings).unwrap();
        let second = import_title(db, &FsScanner, &folder, &settings);

        assert!(matches!(second, Err(ShelvrError::DbError(DbError::AlreadyExists(_)))));
        assert_eq!(db.count(), 1);
    }

    #[test]
    fn test_trailing_slash_reimport_is_rejected() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let folder = media_folder(&test_db.path().join("Alien"), &["alien.mkv"]);
        let settings = ClassifierSettings::default();
        let mut slashed = folder.clone().into_os_string();
        slashed.push("/");

        let ImportOutcome::Added { id, name, .. } =
            import_title(db, &FsScanner, Path::new(&slashed), &settings).unwrap()
        else {
            panic!("expected Added");
        };
        let second = import_title(db, &FsScanner, &folder, &settings);

        assert_eq!(name, "Alien");
        assert!(matches!(second, Err(ShelvrError::DbError(DbError::AlreadyExists(_)))));
        assert_eq!(db.count(), 1);
        assert_eq!(db.find_by_folder(&folder).unwrap(), Some(id));
        assert_eq!(db.get_title(id).unwrap().folder_path, folder);
    }

    #[test]
    fn test_unlistable_folder_becomes_empty_video() {
        let test_db = TestDb::new();
        let folder = media_folder(&test_db.path().join("Locked"), &["a.mkv"]);
        let scanner = FlakyScanner { broken: folder.clone() };

        let outcome = import_title(test_db.db(), &scanner, &folder, &ClassifierSettings::default()).unwrap();

        assert!(matches!(
            outcome,
            ImportOutcome::Added { content_type: ContentType::Video, files: 0, .. }
        ));
    }

    #[test]
    fn test_batch_reports_every_subfolder() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let root = test_db.path().join("media");
        let settings = ClassifierSettings::default();
        media_folder(&root.join("Brazil"), &["brazil.mkv"]);
        let alien = media_folder(&root.join("Alien"), &["alien.mkv"]);
        media_folder(&root.join("Casablanca"), &[]);
        media_folder(&root, &["loose-file.mkv"]);
        import_title(db, &FsScanner, &alien, &settings).unwrap();

        let report = import_batch(db, &FsScanner, &root, &settings).unwrap();

        let folders: Vec<_> = report.items.iter().map(|item| item.folder.clone()).collect();
        assert_eq!(folders, vec![root.join("Alien"), root.join("Brazil"), root.join("Casablanca")]);
        assert_eq!(report.items[0].outcome, ImportOutcome::Skipped);
        assert_eq!((report.added(), report.skipped(), report.failed()), (2, 1, 0));
        assert_eq!(db.count(), 3);
    }

    #[test]
    fn test_batch_continues_after_broken_folder() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let root = test_db.path().join("media");
        let broken = media_folder(&root.join("A-broken"), &["x.mkv"]);
        media_folder(&root.join("B-fine"), &["y.mkv"]);
        let scanner = FlakyScanner { broken };

        let report = import_batch(db, &scanner, &root, &ClassifierSettings::default()).unwrap();

        assert_eq!(report.added(), 2);
        assert_eq!(db.count(), 2);
    }

    #[test]
    fn test_batch_missing_root_is_io_failure() {
        let test_db = TestDb::new();
        let result = import_batch(
            test_db.db(),
            &FsScanner,
            &test_db.path().join("missing"),
            &ClassifierSettings::default(),
        );
        assert!(matches!(result, Err(ShelvrError::IoFailure(_))));
    }

    #[test]
    fn test_rescan_picks_up_new_files() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let folder = media_folder(&test_db.path().join("Show"), &["e1.mkv"]);
        let settings = ClassifierSettings::default();
        let ImportOutcome::Added { id, .. } = import_title(db, &FsScanner, &folder, &settings).unwrap() else {
            panic!("expected Added");
        };
        media_folder(&folder, &["e2.mkv"]);
        std::fs::remove_file(folder.join("e1.mkv")).unwrap();

        assert_eq!(rescan_title(db, &FsScanner, id).unwrap(), 1);
        assert_eq!(db.files_for_title(id).unwrap(), vec![folder.join("e2.mkv")]);
    }

    #[test]
    fn test_rescan_leaves_gallery_alone() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let id = db.create_title("Comic", &test_db.path().join("Comic")).unwrap();
        db.add_file(id, Path::new("/old/page.jpg")).unwrap();
        db.set_content_type(id, ContentType::Gallery).unwrap();

        assert_eq!(rescan_title(db, &FsScanner, id).unwrap(), 0);
        assert_eq!(db.files_for_title(id).unwrap(), vec![PathBuf::from("/old/page.jpg")]);
    }

    #[test]
    fn test_rescan_missing_title() {
        let test_db = TestDb::new();
        let result = rescan_title(test_db.db(), &FsScanner, TitleId(99));
        assert!(matches!(result, Err(ShelvrError::DbError(DbError::NotFound(_)))));
    }
}
