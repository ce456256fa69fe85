//! Tag-intersection queries over the catalog
//!
//! A filter is a set of tag names. An empty filter selects every title; a
//! non-empty filter selects the titles that carry every named tag. Results
//! are always ordered by title name (byte-wise, so case-sensitive) with the
//! id as tie-breaker, and every call reads the current committed state.

use crate::TitleSummary;
use crate::db::{Database, DbError, TitleId};
use std::collections::{BTreeSet, HashSet};

/// Set of tag names a listing is restricted to (AND semantics)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: BTreeSet<String>,
}

impl TagFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; returns `false` if it was already part of the filter
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.tags.insert(tag.into())
    }

    /// Remove a tag; returns `false` if it was not part of the filter
    pub fn remove(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    /// Flip membership of a tag; returns whether it is now selected
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Titles matching a tag filter, ordered by name
///
/// Unknown tag names match nothing, so a filter that names one yields an
/// empty result rather than an error.
///
/// # Errors
///
/// Returns `DbError` if reading the catalog fails.
///
/// # Examples
/// ```no_run
/// use shelvr::db::{Database, TagFilter, filter_titles};
///
/// let db = Database::open("library").unwrap();
/// let filter: TagFilter = ["noir", "1940s"].into_iter().collect();
/// for title in filter_titles(&db, &filter).unwrap() {
///     println!("{} {}", title.id, title.name);
/// }
/// ```
pub fn filter_titles(db: &Database, filter: &TagFilter) -> Result<Vec<TitleSummary>, DbError> {
    let mut titles = db.list_titles()?;

    if !filter.is_empty() {
        let matching = titles_with_all_tags(db, filter)?;
        titles.retain(|title| matching.contains(&title.id));
    }

    titles.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()).then(a.id.cmp(&b.id)));
    Ok(titles)
}

/// Intersection of the title sets of every tag in the filter
fn titles_with_all_tags(db: &Database, filter: &TagFilter) -> Result<HashSet<TitleId>, DbError> {
    let mut matching: Option<HashSet<TitleId>> = None;

    for name in filter.iter() {
        let Some(tag) = db.tag_id(name)? else {
            return Ok(HashSet::new());
        };
        let holders: HashSet<TitleId> = db.titles_with_tag(tag)?.into_iter().collect();
        let narrowed = match matching {
            Some(current) => current.intersection(&holders).copied().collect(),
            None => holders,
        };
        if narrowed.is_empty() {
            return Ok(narrowed);
        }
        matching = Some(narrowed);
    }

    Ok(matching.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDb;
    use std::path::PathBuf;

    fn add(db: &Database, name: &str, tags: &[&str]) -> TitleId {
        let id = db.create_title(name, &PathBuf::from(format!("/media/{name}"))).unwrap();
        for tag in tags {
            db.create_tag(tag).unwrap();
            db.assign_tag(id, tag).unwrap();
        }
        id
    }

    fn names(rows: &[TitleSummary]) -> Vec<&str> {
        rows.iter().map(|row| row.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_all_sorted_by_name() {
        let test_db = TestDb::new();
        let db = test_db.db();
        add(db, "casablanca", &[]);
        add(db, "Brazil", &["A"]);
        add(db, "Alien", &[]);

        let rows = filter_titles(db, &TagFilter::new()).unwrap();

        // Byte order puts upper case before lower case.
        assert_eq!(names(&rows), vec!["Alien", "Brazil", "casablanca"]);
    }

    #[test]
    fn test_filter_is_intersection() {
        let test_db = TestDb::new();
        let db = test_db.db();
        add(db, "Both", &["A", "B"]);
        add(db, "OnlyA", &["A"]);
        add(db, "OnlyB", &["B"]);
        add(db, "All", &["A", "B", "C"]);

        let filter: TagFilter = ["A", "B"].into_iter().collect();
        let rows = filter_titles(db, &filter).unwrap();

        assert_eq!(names(&rows), vec!["All", "Both"]);
    }

    #[test]
    fn test_unknown_tag_yields_nothing() {
        let test_db = TestDb::new();
        let db = test_db.db();
        add(db, "Alien", &["A"]);

        let only_unknown: TagFilter = ["nope"].into_iter().collect();
        let mixed: TagFilter = ["A", "nope"].into_iter().collect();

        assert!(filter_titles(db, &only_unknown).unwrap().is_empty());
        assert!(filter_titles(db, &mixed).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_names_count_once() {
        let test_db = TestDb::new();
        let db = test_db.db();
        add(db, "Alien", &["A"]);

        let filter: TagFilter = ["A", "A"].into_iter().collect();

        assert_eq!(filter.len(), 1);
        assert_eq!(names(&filter_titles(db, &filter).unwrap()), vec!["Alien"]);
    }

    #[test]
    fn test_same_name_ordered_by_id() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let first = db.create_title("Twin", &PathBuf::from("/a/Twin")).unwrap();
        let second = db.create_title("Twin", &PathBuf::from("/b/Twin")).unwrap();

        let rows = filter_titles(db, &TagFilter::new()).unwrap();

        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![first, second]);
    }

    #[test]
    fn test_filter_reflects_latest_state() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let id = add(db, "Alien", &["A"]);
        let filter: TagFilter = ["A"].into_iter().collect();
        assert_eq!(filter_titles(db, &filter).unwrap().len(), 1);

        db.unassign_tag(id, "A").unwrap();
        assert!(filter_titles(db, &filter).unwrap().is_empty());

        db.assign_tag(id, "A").unwrap();
        db.rename_tag("A", "Z").unwrap();
        assert!(filter_titles(db, &filter).unwrap().is_empty());
        let renamed: TagFilter = ["Z"].into_iter().collect();
        assert_eq!(filter_titles(db, &renamed).unwrap().len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut filter = TagFilter::new();
        assert!(filter.toggle("A"));
        assert!(filter.contains("A"));
        assert!(!filter.toggle("A"));
        assert!(filter.is_empty());
    }
}
