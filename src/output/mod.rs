//! Output formatting for CLI display
//!
//! Plain-text renderings of titles, details, tags and import reports, plus
//! the JSON encoding used by `--json`. Everything here returns strings so
//! commands decide where and whether to print.

use crate::import::{ImportItem, ImportOutcome, ImportReport};
use crate::session::ViewMode;
use crate::{ContentType, ShelvrError, TitleDetails, TitleSummary};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

const GRID_CELL_WIDTH: usize = 28;
const GRID_COLUMNS: usize = 3;

/// One listing row: `  [id] name  (folder)`
#[must_use]
pub fn title_row(title: &TitleSummary, quiet: bool) -> String {
    if quiet {
        format!("{}\t{}", title.id, title.name)
    } else {
        format!(
            "  {} {}  {}",
            format!("[{}]", title.id).dimmed(),
            title.name.bold(),
            format!("({})", title.folder_path.display()).dimmed()
        )
    }
}

/// Titles laid out according to `view`
///
/// The grid view shows names only, several per line, truncated to a fixed
/// cell width.
#[must_use]
pub fn titles(rows: &[TitleSummary], view: ViewMode, quiet: bool) -> Vec<String> {
    match view {
        ViewMode::List => rows.iter().map(|row| title_row(row, quiet)).collect(),
        ViewMode::Grid => rows
            .chunks(GRID_COLUMNS)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|row| grid_cell(&format!("{} {}", row.id, row.name)))
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim_end()
                    .to_string()
            })
            .collect(),
    }
}

fn grid_cell(text: &str) -> String {
    let mut cell: String = text.chars().take(GRID_CELL_WIDTH).collect();
    if text.chars().count() > GRID_CELL_WIDTH {
        cell.pop();
        cell.push('…');
    }
    format!("{cell:<GRID_CELL_WIDTH$}")
}

/// Multi-line description of a title
///
/// `poster` is the resolved image to show, which may be the placeholder.
#[must_use]
pub fn details(details: &TitleDetails, poster: &Path) -> Vec<String> {
    let title = &details.title;
    let mut lines = vec![
        format!("{} {}", title.name.bold(), format!("[{}]", title.id).dimmed()),
        format!("  Folder:  {}", title.folder_path.display()),
        format!("  Type:    {}", content_type_label(title.content_type)),
        format!("  Poster:  {}", colorize_path(poster)),
    ];

    if details.tags.is_empty() {
        lines.push("  Tags:    (none)".to_string());
    } else {
        lines.push(format!("  Tags:    {}", details.tags.join(", ")));
    }

    match title.content_type {
        ContentType::Gallery => lines.push("  Files:   (gallery, not tracked)".to_string()),
        ContentType::Video if details.files.is_empty() => lines.push("  Files:   (none)".to_string()),
        ContentType::Video => {
            lines.push(format!("  Files:   {}", details.files.len()));
            for (index, file) in details.files.iter().enumerate() {
                lines.push(format!("    {:>3}. {}", index + 1, colorize_path(file)));
            }
        }
    }
    lines
}

fn content_type_label(content_type: ContentType) -> String {
    match content_type {
        ContentType::Video => content_type.as_str().cyan().to_string(),
        ContentType::Gallery => content_type.as_str().magenta().to_string(),
    }
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(tag: &str, count: usize, quiet: bool) -> String {
    if quiet {
        tag.to_string()
    } else {
        format!("  {tag} (used by {count} title(s))")
    }
}

/// One line per folder of an import
#[must_use]
pub fn import_item(item: &ImportItem, quiet: bool) -> Option<String> {
    let folder = item.folder.display();
    match &item.outcome {
        ImportOutcome::Added { id, .. } if quiet => Some(id.to_string()),
        ImportOutcome::Added { id, content_type, files, .. } => Some(format!(
            "  {} {folder} [{id}] {content_type}, {files} file(s)",
            "added".green()
        )),
        ImportOutcome::Skipped if quiet => None,
        ImportOutcome::Skipped => Some(format!("  {} {folder} (already in library)", "skipped".yellow())),
        ImportOutcome::Failed { reason } => Some(format!("  {} {folder}: {reason}", "failed".red())),
    }
}

/// Closing line of an import
#[must_use]
pub fn import_summary(report: &ImportReport) -> String {
    format!(
        "Imported {} title(s), skipped {}, failed {}.",
        report.added(),
        report.skipped(),
        report.failed()
    )
}

/// Color a path based on file existence (green if exists, red if missing)
#[must_use]
pub fn colorize_path(path: &Path) -> String {
    let formatted = path.display().to_string();
    if path.exists() {
        formatted.green().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Pretty-printed JSON for `--json`
///
/// # Errors
///
/// Returns `ShelvrError::SerializeError` if the value cannot be encoded.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, ShelvrError> {
    Ok(serde_json::to_string_pretty(value)?)
}
