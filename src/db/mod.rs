//! Catalog store for shelvr
//!
//! Persists titles, tags, title-tag associations and per-title file listings
//! using sled as the embedded database backend.
//!
//! Each table is one sled tree, with index trees alongside for the lookups
//! the catalog needs:
//! - `titles`: title id -> encoded title record
//! - `title_folders`: folder path -> title id (enforces folder uniqueness)
//! - `tags`: tag id -> tag name
//! - `tag_names`: tag name -> tag id (enforces name uniqueness)
//! - `title_tags`: (title id, tag id) -> ()
//! - `tag_titles`: (tag id, title id) -> () reverse index for filtering
//! - `files`: (title id, file id) -> file path
//! - `meta`: schema version and id sequences
//!
//! sled has no foreign keys, so every delete that must cascade removes the
//! dependent rows inside the same transaction as the parent row.

use crate::{ContentType, Title, TitleDetails, TitleSummary};
use bincode::{Decode, Encode};
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionalTree,
};
use sled::{Db, IVec, Transactional, Tree};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod error;
mod migrate;
pub mod query;
pub mod types;

pub use error::DbError;
pub use query::{TagFilter, filter_titles};
pub use types::{PairKey, PathString, TagId, TitleId};

const SEQ_TITLE: &[u8] = b"seq:title";
const SEQ_TAG: &[u8] = b"seq:tag";
const SEQ_FILE: &[u8] = b"seq:file";
const EMPTY: &[u8] = &[];

/// Title row as stored in the `titles` tree
#[derive(Encode, Decode, Clone, Debug, PartialEq, Eq)]
pub(crate) struct TitleRecord {
    pub name: String,
    pub folder_path: String,
    pub poster_path: Option<String>,
    pub content_type: ContentType,
}

impl TitleRecord {
    fn into_title(self, id: TitleId) -> Title {
        Title {
            id,
            name: self.name,
            folder_path: PathBuf::from(self.folder_path),
            poster_path: self.poster_path.map(PathBuf::from),
            content_type: self.content_type,
        }
    }
}

fn encode<T: Encode>(value: &T) -> Result<Vec<u8>, DbError> {
    Ok(bincode::encode_to_vec(value, bincode::config::standard())?)
}

fn decode<T: Decode<()>>(bytes: &[u8]) -> Result<T, DbError> {
    let (value, _): (T, usize) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}

fn utf8(bytes: &[u8]) -> Result<String, DbError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| DbError::Corrupt(format!("non UTF-8 text: {e}")))
}

fn abort<T>(err: DbError) -> ConflictableTransactionResult<T, DbError> {
    Err(ConflictableTransactionError::Abort(err))
}

/// Reserve `count` consecutive ids from a sequence and return the first one
///
/// Sequences start at 1 and are never rewound, so ids are not reused after
/// deletes.
fn reserve_ids(
    meta: &TransactionalTree,
    sequence: &[u8],
    count: u64,
) -> ConflictableTransactionResult<u64, DbError> {
    let current = match meta.get(sequence)? {
        Some(raw) => match types::id_from_bytes(&raw) {
            Ok(value) => value,
            Err(e) => return abort(e),
        },
        None => 0,
    };
    meta.insert(sequence, &(current + count).to_be_bytes()[..])?;
    Ok(current + 1)
}

/// Database wrapper that encapsulates all catalog operations
pub struct Database {
    db: Db,
    titles: Tree,
    title_folders: Tree,
    tags: Tree,
    tag_names: Tree,
    title_tags: Tree,
    tag_titles: Tree,
    files: Tree,
    meta: Tree,
}

impl Database {
    /// Opens or creates a catalog at the specified path
    ///
    /// Stores written by an older schema are upgraded in place.
    ///
    /// # Examples
    /// ```no_run
    /// use shelvr::db::Database;
    /// let db = Database::open("library").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the database cannot be opened, a tree cannot be
    /// created, or the schema upgrade fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let db = sled::open(path)?;
        let database = Self {
            titles: db.open_tree("titles")?,
            title_folders: db.open_tree("title_folders")?,
            tags: db.open_tree("tags")?,
            tag_names: db.open_tree("tag_names")?,
            title_tags: db.open_tree("title_tags")?,
            tag_titles: db.open_tree("tag_titles")?,
            files: db.open_tree("files")?,
            meta: db.open_tree("meta")?,
            db,
        };
        migrate::upgrade(&database)?;
        Ok(database)
    }

    /// Register a folder as a new video title with no files
    ///
    /// # Errors
    ///
    /// Returns `DbError::AlreadyExists` if the folder is already registered,
    /// or another `DbError` if the write fails.
    pub fn create_title(&self, name: &str, folder_path: &Path) -> Result<TitleId, DbError> {
        self.create_title_with_files(name, folder_path, ContentType::Video, &[])
    }

    /// Register a folder together with its file listing
    ///
    /// The title row, its folder index entry and every file row are written
    /// in one transaction: either all of them land or none do.
    ///
    /// # Errors
    ///
    /// Returns `DbError::AlreadyExists` if the folder is already registered,
    /// `DbError::PathError` if any path is not valid UTF-8, or another
    /// `DbError` if the write fails. No rows are written in any error case.
    pub fn create_title_with_files(
        &self,
        name: &str,
        folder_path: &Path,
        content_type: ContentType,
        files: &[PathBuf],
    ) -> Result<TitleId, DbError> {
        let folder = PathString::new(folder_path)?;
        let file_paths = files
            .iter()
            .map(PathString::new)
            .collect::<Result<Vec<_>, _>>()?;
        let record = encode(&TitleRecord {
            name: name.to_string(),
            folder_path: folder.to_string(),
            poster_path: None,
            content_type,
        })?;

        let id = (&self.titles, &self.title_folders, &self.files, &self.meta).transaction(
            |(titles, folders, files_tx, meta)| {
                if folders.get(folder.as_bytes())?.is_some() {
                    return abort(DbError::AlreadyExists(folder.to_string()));
                }

                let id = reserve_ids(meta, SEQ_TITLE, 1)?;
                titles.insert(&TitleId(id).to_bytes()[..], record.as_slice())?;
                folders.insert(folder.as_bytes(), &TitleId(id).to_bytes()[..])?;

                if !file_paths.is_empty() {
                    let first = reserve_ids(meta, SEQ_FILE, file_paths.len() as u64)?;
                    for (offset, path) in (0u64..).zip(&file_paths) {
                        let key = PairKey::new(id, first + offset);
                        files_tx.insert(&key.to_bytes()[..], path.as_bytes())?;
                    }
                }
                Ok(TitleId(id))
            },
        )?;
        Ok(id)
    }

    /// Append a file row to a title; duplicate paths are allowed
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the title does not exist, or another
    /// `DbError` if the path is not UTF-8 or the write fails.
    pub fn add_file(&self, title: TitleId, path: &Path) -> Result<(), DbError> {
        let path = PathString::new(path)?;
        (&self.titles, &self.files, &self.meta).transaction(|(titles, files, meta)| {
            if titles.get(title.to_bytes())?.is_none() {
                return abort(DbError::NotFound(title));
            }
            let file_id = reserve_ids(meta, SEQ_FILE, 1)?;
            files.insert(&PairKey::new(title.0, file_id).to_bytes()[..], path.as_bytes())?;
            Ok(())
        })?;
        Ok(())
    }

    /// Replace every file row of a title in one transaction
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the title does not exist, or another
    /// `DbError` if a path is not UTF-8 or the write fails.
    pub fn replace_files(&self, title: TitleId, files: &[PathBuf]) -> Result<usize, DbError> {
        let file_paths = files
            .iter()
            .map(PathString::new)
            .collect::<Result<Vec<_>, _>>()?;
        let stale = self.keys_with_prefix(&self.files, &title.to_bytes())?;

        (&self.titles, &self.files, &self.meta).transaction(|(titles, files_tx, meta)| {
            if titles.get(title.to_bytes())?.is_none() {
                return abort(DbError::NotFound(title));
            }
            for key in &stale {
                files_tx.remove(key.clone())?;
            }
            if !file_paths.is_empty() {
                let first = reserve_ids(meta, SEQ_FILE, file_paths.len() as u64)?;
                for (offset, path) in (0u64..).zip(&file_paths) {
                    let key = PairKey::new(title.0, first + offset);
                    files_tx.insert(&key.to_bytes()[..], path.as_bytes())?;
                }
            }
            Ok(())
        })?;
        Ok(file_paths.len())
    }

    /// Set or clear the poster image path of a title
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the title does not exist, or another
    /// `DbError` if the path is not UTF-8 or the write fails.
    pub fn set_poster(&self, title: TitleId, poster: Option<&Path>) -> Result<(), DbError> {
        let poster = poster.map(PathString::new).transpose()?.map(PathString::into_string);
        self.update_title(title, |record| record.poster_path.clone_from(&poster))
    }

    /// Overwrite the content type of a title
    ///
    /// File rows are left untouched in both directions.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the title does not exist, or another
    /// `DbError` if the write fails.
    pub fn set_content_type(&self, title: TitleId, content_type: ContentType) -> Result<(), DbError> {
        self.update_title(title, |record| record.content_type = content_type)
    }

    fn update_title<F>(&self, title: TitleId, apply: F) -> Result<(), DbError>
    where
        F: Fn(&mut TitleRecord),
    {
        self.titles.transaction(|titles| {
            let Some(raw) = titles.get(title.to_bytes())? else {
                return abort(DbError::NotFound(title));
            };
            let mut record: TitleRecord = match decode(&raw) {
                Ok(record) => record,
                Err(e) => return abort(e),
            };
            apply(&mut record);
            let encoded = match encode(&record) {
                Ok(encoded) => encoded,
                Err(e) => return abort(e),
            };
            titles.insert(&title.to_bytes()[..], encoded)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Delete a title together with its tag associations and file rows
    ///
    /// Returns `false` if the title did not exist.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if reading or the cascading delete fails.
    pub fn delete_title(&self, title: TitleId) -> Result<bool, DbError> {
        let Some(existing) = self.find_title(title)? else {
            return Ok(false);
        };
        let folder = existing.folder_path.to_string_lossy().into_owned();
        let tag_ids = self.second_ids_with_prefix(&self.title_tags, &title.to_bytes())?;
        let file_keys = self.keys_with_prefix(&self.files, &title.to_bytes())?;

        (
            &self.titles,
            &self.title_folders,
            &self.title_tags,
            &self.tag_titles,
            &self.files,
        )
            .transaction(|(titles, folders, title_tags, tag_titles, files)| {
                titles.remove(&title.to_bytes()[..])?;
                folders.remove(folder.as_bytes())?;
                for tag in &tag_ids {
                    title_tags.remove(&PairKey::new(title.0, *tag).to_bytes()[..])?;
                    tag_titles.remove(&PairKey::new(*tag, title.0).to_bytes()[..])?;
                }
                for key in &file_keys {
                    files.remove(key.clone())?;
                }
                Ok::<_, ConflictableTransactionError<DbError>>(())
            })?;
        debug!(title = %title, "deleted title");
        Ok(true)
    }

    /// Get a title row
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the title does not exist, or another
    /// `DbError` if the read fails.
    pub fn get_title(&self, title: TitleId) -> Result<Title, DbError> {
        self.find_title(title)?.ok_or(DbError::NotFound(title))
    }

    fn find_title(&self, title: TitleId) -> Result<Option<Title>, DbError> {
        match self.titles.get(title.to_bytes())? {
            Some(raw) => Ok(Some(decode::<TitleRecord>(&raw)?.into_title(title))),
            None => Ok(None),
        }
    }

    /// Get a title with its tags and, for video titles, its files
    ///
    /// Tags are sorted by name and files by path. Gallery titles always
    /// report an empty file list even when rows exist from an earlier video
    /// phase; those rows come back once the title is switched to video.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the title does not exist, or another
    /// `DbError` if a read fails.
    pub fn get_title_details(&self, title: TitleId) -> Result<TitleDetails, DbError> {
        let row = self.get_title(title)?;
        let tags = self.tags_for_title(title)?;
        let files = match row.content_type {
            ContentType::Video => self.files_for_title(title)?,
            ContentType::Gallery => Vec::new(),
        };
        Ok(TitleDetails { title: row, tags, files })
    }

    /// Every stored file path of a title, sorted, regardless of content type
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration fails or a stored path is corrupt.
    pub fn files_for_title(&self, title: TitleId) -> Result<Vec<PathBuf>, DbError> {
        let mut files = self
            .files
            .scan_prefix(title.to_bytes())
            .values()
            .map(|value| utf8(&value?))
            .collect::<Result<Vec<_>, _>>()?;
        files.sort();
        Ok(files.into_iter().map(PathBuf::from).collect())
    }

    /// Names of the tags assigned to a title, sorted
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration fails or a tag row is missing.
    pub fn tags_for_title(&self, title: TitleId) -> Result<Vec<String>, DbError> {
        let mut names = Vec::new();
        for tag in self.second_ids_with_prefix(&self.title_tags, &title.to_bytes())? {
            let raw = self
                .tags
                .get(TagId(tag).to_bytes())?
                .ok_or_else(|| DbError::Corrupt(format!("association to missing tag {tag}")))?;
            names.push(utf8(&raw)?);
        }
        names.sort();
        Ok(names)
    }

    /// Look up the title registered for a folder
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the path is not UTF-8 or the read fails.
    pub fn find_by_folder(&self, folder_path: &Path) -> Result<Option<TitleId>, DbError> {
        let folder = PathString::new(folder_path)?;
        self.title_folders
            .get(folder.as_bytes())?
            .map(|raw| TitleId::from_bytes(&raw))
            .transpose()
    }

    /// Create a tag; the name is trimmed first
    ///
    /// Returns the id of the new or already existing tag, or `None` when the
    /// name is empty after trimming.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the write fails.
    pub fn create_tag(&self, name: &str) -> Result<Option<TagId>, DbError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let id = (&self.tags, &self.tag_names, &self.meta).transaction(|(tags, tag_names, meta)| {
            if let Some(existing) = tag_names.get(name.as_bytes())? {
                return match TagId::from_bytes(&existing) {
                    Ok(id) => Ok(id),
                    Err(e) => abort(e),
                };
            }
            let id = TagId(reserve_ids(meta, SEQ_TAG, 1)?);
            tags.insert(&id.to_bytes()[..], name.as_bytes())?;
            tag_names.insert(name.as_bytes(), &id.to_bytes()[..])?;
            Ok(id)
        })?;
        Ok(Some(id))
    }

    /// Look up a tag id by exact name
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the read fails.
    pub fn tag_id(&self, name: &str) -> Result<Option<TagId>, DbError> {
        self.tag_names
            .get(name.as_bytes())?
            .map(|raw| TagId::from_bytes(&raw))
            .transpose()
    }

    /// Associate an existing tag with a title
    ///
    /// Returns `true` if a new association was written; an unknown tag name
    /// or an existing association is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the title does not exist, or another
    /// `DbError` if the write fails.
    pub fn assign_tag(&self, title: TitleId, tag_name: &str) -> Result<bool, DbError> {
        let changed = (&self.titles, &self.tag_names, &self.title_tags, &self.tag_titles).transaction(
            |(titles, tag_names, title_tags, tag_titles)| {
                if titles.get(title.to_bytes())?.is_none() {
                    return abort(DbError::NotFound(title));
                }
                let Some(raw) = tag_names.get(tag_name.as_bytes())? else {
                    return Ok(false);
                };
                let tag = match TagId::from_bytes(&raw) {
                    Ok(tag) => tag,
                    Err(e) => return abort(e),
                };
                let forward = PairKey::new(title.0, tag.0).to_bytes();
                if title_tags.get(forward)?.is_some() {
                    return Ok(false);
                }
                title_tags.insert(&forward[..], EMPTY)?;
                tag_titles.insert(&PairKey::new(tag.0, title.0).to_bytes()[..], EMPTY)?;
                Ok(true)
            },
        )?;
        Ok(changed)
    }

    /// Remove a tag from a title
    ///
    /// Returns `true` if an association was removed; removing an absent
    /// association is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the write fails.
    pub fn unassign_tag(&self, title: TitleId, tag_name: &str) -> Result<bool, DbError> {
        let changed = (&self.tag_names, &self.title_tags, &self.tag_titles).transaction(
            |(tag_names, title_tags, tag_titles)| {
                let Some(raw) = tag_names.get(tag_name.as_bytes())? else {
                    return Ok(false);
                };
                let tag = match TagId::from_bytes(&raw) {
                    Ok(tag) => tag,
                    Err(e) => return abort(e),
                };
                let removed = title_tags.remove(&PairKey::new(title.0, tag.0).to_bytes()[..])?;
                tag_titles.remove(&PairKey::new(tag.0, title.0).to_bytes()[..])?;
                Ok(removed.is_some())
            },
        )?;
        Ok(changed)
    }

    /// Rename a tag, keeping every association
    ///
    /// The new name is trimmed. Returns `true` if the tag was renamed; an
    /// empty new name, an unknown old name, or an unchanged name is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NameCollision` if another tag already has the new
    /// name (nothing is changed), or another `DbError` if the write fails.
    pub fn rename_tag(&self, old_name: &str, new_name: &str) -> Result<bool, DbError> {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == old_name {
            return Ok(false);
        }
        let renamed = (&self.tags, &self.tag_names).transaction(|(tags, tag_names)| {
            let Some(raw) = tag_names.get(old_name.as_bytes())? else {
                return Ok(false);
            };
            if tag_names.get(new_name.as_bytes())?.is_some() {
                return abort(DbError::NameCollision(new_name.to_string()));
            }
            tag_names.remove(old_name.as_bytes())?;
            tag_names.insert(new_name.as_bytes(), raw.clone())?;
            tags.insert(raw, new_name.as_bytes())?;
            Ok(true)
        })?;
        Ok(renamed)
    }

    /// Delete a tag and every association that references it
    ///
    /// Returns `false` if no tag has this name.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if reading or the cascading delete fails.
    pub fn delete_tag(&self, name: &str) -> Result<bool, DbError> {
        let Some(tag) = self.tag_id(name)? else {
            return Ok(false);
        };
        let title_ids = self.second_ids_with_prefix(&self.tag_titles, &tag.to_bytes())?;

        (&self.tags, &self.tag_names, &self.title_tags, &self.tag_titles).transaction(
            |(tags, tag_names, title_tags, tag_titles)| {
                for title in &title_ids {
                    title_tags.remove(&PairKey::new(*title, tag.0).to_bytes()[..])?;
                    tag_titles.remove(&PairKey::new(tag.0, *title).to_bytes()[..])?;
                }
                tags.remove(&tag.to_bytes()[..])?;
                tag_names.remove(name.as_bytes())?;
                Ok::<_, ConflictableTransactionError<DbError>>(())
            },
        )?;
        debug!(tag = name, associations = title_ids.len(), "deleted tag");
        Ok(true)
    }

    /// All tag names, sorted
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration fails or a tag name is not UTF-8.
    pub fn list_tags(&self) -> Result<Vec<String>, DbError> {
        self.tag_names
            .iter()
            .keys()
            .map(|key| utf8(&key?))
            .collect()
    }

    /// Number of titles carrying a tag; zero for unknown names
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the read fails.
    pub fn tag_usage(&self, name: &str) -> Result<usize, DbError> {
        match self.tag_id(name)? {
            Some(tag) => Ok(self.tag_titles.scan_prefix(tag.to_bytes()).count()),
            None => Ok(0),
        }
    }

    /// Ids of the titles carrying a tag
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration fails.
    pub fn titles_with_tag(&self, tag: TagId) -> Result<Vec<TitleId>, DbError> {
        Ok(self
            .second_ids_with_prefix(&self.tag_titles, &tag.to_bytes())?
            .into_iter()
            .map(TitleId)
            .collect())
    }

    /// Every title as a summary row, in id order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration or decoding fails.
    pub fn list_titles(&self) -> Result<Vec<TitleSummary>, DbError> {
        let mut rows = Vec::new();
        for result in &self.titles {
            let (key, value) = result?;
            let record: TitleRecord = decode(&value)?;
            rows.push(record.into_title(TitleId::from_bytes(&key)?).summary());
        }
        Ok(rows)
    }

    /// Get the number of titles in the catalog
    #[must_use]
    pub fn count(&self) -> usize {
        self.titles.len()
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the flush operation fails.
    pub fn flush(&self) -> Result<(), DbError> {
        self.db.flush()?;
        Ok(())
    }

    fn keys_with_prefix(&self, tree: &Tree, prefix: &[u8]) -> Result<Vec<IVec>, DbError> {
        Ok(tree.scan_prefix(prefix).keys().collect::<Result<Vec<_>, _>>()?)
    }

    fn second_ids_with_prefix(&self, tree: &Tree, prefix: &[u8]) -> Result<Vec<u64>, DbError> {
        self.keys_with_prefix(tree, prefix)?
            .iter()
            .map(|key| PairKey::from_bytes(key).map(|pair| pair.second))
            .collect()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Drop cannot report failure; use flush() where durability matters.
        let _ = self.db.flush();
    }
}
