//! Import command - add folders to the library

use crate::discovery::{ClassifierSettings, FsScanner};
use crate::db::{Database, DbError};
use crate::import::{ImportItem, ImportOutcome, ImportReport, import_batch, import_title};
use crate::{ShelvrError, output};
use std::path::Path;

type Result<T> = std::result::Result<T, ShelvrError>;

/// Execute the import command
///
/// With `single`, `dir` itself becomes one title; otherwise each of its
/// sub-folders does.
///
/// # Errors
/// Returns an error if `dir` does not exist or, for a batch, cannot be
/// listed. Per-folder problems are reported, not returned.
pub fn execute(
    db: &Database,
    dir: &Path,
    single: bool,
    settings: &ClassifierSettings,
    quiet: bool,
) -> Result<ImportReport> {
    let dir = dir.canonicalize().map_err(|e| {
        ShelvrError::InvalidInput(format!("Cannot access folder '{}': {e}", dir.display()))
    })?;

    let report = if single {
        let outcome = match import_title(db, &FsScanner, &dir, settings) {
            Ok(outcome) => outcome,
            Err(ShelvrError::DbError(DbError::AlreadyExists(_))) => ImportOutcome::Skipped,
            Err(e) => return Err(e),
        };
        ImportReport {
            items: vec![ImportItem { folder: dir, outcome }],
        }
    } else {
        import_batch(db, &FsScanner, &dir, settings)?
    };

    for item in &report.items {
        if let Some(line) = output::import_item(item, quiet) {
            println!("{line}");
        }
    }
    if !quiet {
        println!("{}", output::import_summary(&report));
    }
    Ok(report)
}
