//! On-disk layout of a shelvr data directory
//!
//! ```text
//! <data dir>/
//!   library/          catalog store
//!   posters/          cached poster images, one per title
//!   placeholder.png   shown for titles without a usable poster
//! ```

use crate::db::Database;
use crate::posters::{self, PosterCache};
use crate::{ShelvrError, Title, TitleId};
use std::fs;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, ShelvrError>;

/// An open catalog together with its poster cache
pub struct Library {
    root: PathBuf,
    db: Database,
    posters: PosterCache,
}

impl Library {
    /// Open the library in `root`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the catalog
    /// cannot be opened.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let db = Database::open(root.join("library"))?;
        let posters = PosterCache::new(root.join("posters"));
        Ok(Self { root, db, posters })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    #[must_use]
    pub const fn posters(&self) -> &PosterCache {
        &self.posters
    }

    /// Path of the placeholder image, writing it on first use
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder cannot be written.
    pub fn placeholder(&self) -> Result<PathBuf> {
        posters::ensure_placeholder(&self.root)
    }

    /// The image to display for `title`
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder is needed and cannot be written.
    pub fn poster_for(&self, title: &Title) -> Result<PathBuf> {
        Ok(posters::resolve(title, &self.placeholder()?))
    }

    /// Copy `image` into the poster cache and make it the poster of `title`
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` (wrapped) for an unknown title,
    /// `IoFailure` if the copy fails, or another error if the write fails.
    pub fn set_poster(&self, title: TitleId, image: &Path) -> Result<PathBuf> {
        self.db.get_title(title)?;
        let stored = self.posters.store(title, image)?;
        self.db.set_poster(title, Some(&stored))?;
        Ok(stored)
    }

    /// Delete a title and its cached poster
    ///
    /// Returns `false` if the title did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or the poster cache cannot be updated.
    pub fn remove_title(&self, title: TitleId) -> Result<bool> {
        if !self.db.delete_title(title)? {
            return Ok(false);
        }
        self.posters.remove(title)?;
        Ok(true)
    }
}
