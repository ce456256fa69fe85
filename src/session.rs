//! Application state for the presentation layer
//!
//! `AppState` holds everything a front end needs to redraw: the selected
//! title, the active tag filter and the view mode. A `Session` owns that
//! state and routes every change through the library operations, so the
//! visible listing is always re-derived from the store.

use crate::db::{Database, TagFilter, filter_titles};
use crate::{ShelvrError, TitleDetails, TitleId, TitleSummary};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, ShelvrError>;

/// How title listings are laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
        }
    }
}

impl std::str::FromStr for ViewMode {
    type Err = ShelvrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(Self::List),
            "grid" => Ok(Self::Grid),
            other => Err(ShelvrError::InvalidInput(format!(
                "Unknown view '{other}' (expected 'list' or 'grid')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub selected: Option<TitleId>,
    pub active_tags: TagFilter,
    pub view: ViewMode,
}

/// Controller binding an [`AppState`] to a catalog
pub struct Session<'a> {
    db: &'a Database,
    state: AppState,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(db: &'a Database, view: ViewMode) -> Self {
        Self {
            db,
            state: AppState {
                view,
                ..AppState::default()
            },
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Select or deselect a tag in the active filter
    ///
    /// Returns whether the tag is now active.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        self.state.active_tags.toggle(tag)
    }

    pub fn clear_filters(&mut self) {
        self.state.active_tags.clear();
    }

    /// Titles matching the active filter, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub fn visible_titles(&self) -> Result<Vec<TitleSummary>> {
        Ok(filter_titles(self.db, &self.state.active_tags)?)
    }

    /// Make `title` the current selection
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` (wrapped) if the title does not exist.
    pub fn select(&mut self, title: TitleId) -> Result<TitleDetails> {
        let details = self.db.get_title_details(title)?;
        self.state.selected = Some(title);
        Ok(details)
    }

    /// Details of the selected title, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub fn selected_details(&self) -> Result<Option<TitleDetails>> {
        match self.state.selected {
            Some(id) => Ok(Some(self.db.get_title_details(id)?)),
            None => Ok(None),
        }
    }

    /// Re-query after a mutation
    ///
    /// Drops the selection if the selected title is gone and forgets filter
    /// tags that no longer exist, then returns the refreshed listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub fn refresh(&mut self) -> Result<Vec<TitleSummary>> {
        if let Some(id) = self.state.selected
            && self.db.get_title(id).is_err()
        {
            self.state.selected = None;
        }

        let mut stale = Vec::new();
        for tag in self.state.active_tags.iter() {
            if self.db.tag_id(tag)?.is_none() {
                stale.push(tag.to_string());
            }
        }
        for tag in &stale {
            self.state.active_tags.remove(tag);
        }

        self.visible_titles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDb;
    use std::path::Path;

    fn seed(db: &Database) -> (TitleId, TitleId) {
        let alien = db.create_title("Alien", Path::new("/media/Alien")).unwrap();
        let brazil = db.create_title("Brazil", Path::new("/media/Brazil")).unwrap();
        db.create_tag("scifi").unwrap();
        db.create_tag("dystopia").unwrap();
        db.assign_tag(alien, "scifi").unwrap();
        db.assign_tag(brazil, "scifi").unwrap();
        db.assign_tag(brazil, "dystopia").unwrap();
        (alien, brazil)
    }

    #[test]
    fn test_toggle_narrows_listing() {
        let test_db = TestDb::new();
        seed(test_db.db());
        let mut session = Session::new(test_db.db(), ViewMode::List);

        assert_eq!(session.visible_titles().unwrap().len(), 2);
        assert!(session.toggle_tag("dystopia"));
        let rows = session.visible_titles().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Brazil");

        session.clear_filters();
        assert_eq!(session.visible_titles().unwrap().len(), 2);
    }

    #[test]
    fn test_refresh_drops_deleted_selection_and_tags() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let (alien, _) = seed(db);
        let mut session = Session::new(db, ViewMode::Grid);
        session.select(alien).unwrap();
        session.toggle_tag("scifi");

        db.delete_title(alien).unwrap();
        db.delete_tag("scifi").unwrap();
        let rows = session.refresh().unwrap();

        assert_eq!(session.state().selected, None);
        assert!(session.state().active_tags.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(session.state().view, ViewMode::Grid);
    }

    #[test]
    fn test_select_missing_title_keeps_state() {
        let test_db = TestDb::new();
        let (alien, _) = seed(test_db.db());
        let mut session = Session::new(test_db.db(), ViewMode::List);
        session.select(alien).unwrap();

        assert!(session.select(TitleId(999)).is_err());
        assert_eq!(session.state().selected, Some(alien));
        assert_eq!(session.selected_details().unwrap().unwrap().tags, vec!["scifi"]);
    }

    #[test]
    fn test_view_mode_parsing() {
        assert_eq!("Grid".parse::<ViewMode>().unwrap(), ViewMode::Grid);
        assert!("tiles".parse::<ViewMode>().is_err());
    }
}
