//! Poster image cache
//!
//! Posters are copied into `<data dir>/posters/<title id><ext>` so a title
//! keeps its artwork when the source image moves. Titles without a usable
//! poster fall back to a 1x1 transparent placeholder.

use crate::{ShelvrError, Title, TitleId};
use image::{ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

type Result<T> = std::result::Result<T, ShelvrError>;

pub const PLACEHOLDER_FILE: &str = "placeholder.png";

/// Directory of cached poster copies
#[derive(Debug, Clone)]
pub struct PosterCache {
    dir: PathBuf,
}

impl PosterCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the cache as the poster of `title`
    ///
    /// The copy keeps the source extension. It is written under a temporary
    /// name first and only then replaces the earlier poster, so a failed copy
    /// leaves the current poster in place. Storing the cached file itself is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ShelvrError::IoFailure` if the source is unreadable or the
    /// copy fails, and `InvalidInput` if the source is not a file.
    pub fn store(&self, title: TitleId, source: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(ShelvrError::InvalidInput(format!(
                "Poster image not found: {}",
                source.display()
            )));
        }
        fs::create_dir_all(&self.dir)?;

        let target = match source.extension() {
            Some(ext) => self.dir.join(format!("{title}.{}", ext.to_string_lossy())),
            None => self.dir.join(title.to_string()),
        };
        if same_file(source, &target) {
            debug!(title = %title, poster = %target.display(), "poster already cached");
            return Ok(target);
        }

        let staging = self.dir.join(format!(".{title}.partial"));
        if let Err(e) = fs::copy(source, &staging) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        self.remove_except(title, Some(&target))?;
        fs::rename(&staging, &target)?;
        debug!(title = %title, poster = %target.display(), "cached poster");
        Ok(target)
    }

    /// Delete every cached poster of `title`; returns how many were removed
    ///
    /// # Errors
    ///
    /// Returns `ShelvrError::IoFailure` if the cache cannot be listed or a
    /// file cannot be deleted.
    pub fn remove(&self, title: TitleId) -> Result<usize> {
        self.remove_except(title, None)
    }

    fn remove_except(&self, title: TitleId, keep: Option<&Path>) -> Result<usize> {
        if !self.dir.is_dir() {
            return Ok(0);
        }
        let stem = title.to_string();
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let matches = path.is_file()
                && path.file_stem().is_some_and(|s| s == stem.as_str())
                && keep != Some(path.as_path());
            if matches {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    matches!((fs::canonicalize(a), fs::canonicalize(b)), (Ok(a), Ok(b)) if a == b)
}

/// Write the placeholder image into `data_dir` if it is missing
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the PNG cannot be
/// written.
pub fn ensure_placeholder(data_dir: &Path) -> Result<PathBuf> {
    let path = data_dir.join(PLACEHOLDER_FILE);
    if path.is_file() {
        return Ok(path);
    }
    fs::create_dir_all(data_dir)?;
    RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])).save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}

/// The image to display for a title
///
/// A poster path that is unset or no longer exists on disk resolves to the
/// placeholder.
#[must_use]
pub fn resolve(title: &Title, placeholder: &Path) -> PathBuf {
    match &title.poster_path {
        Some(poster) if poster.is_file() => poster.clone(),
        _ => placeholder.to_path_buf(),
    }
}
