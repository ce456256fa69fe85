//! Schema versioning for the catalog store
//!
//! Version 1 stores wrote title records without a content type and without a
//! version marker. Version 2 added `content_type`; opening a version 1 store
//! rewrites every title as a video title in one batch and stamps the version.

use super::{DbError, Database, SEQ_FILE, SEQ_TAG, SEQ_TITLE, TitleRecord, decode, encode, types};
use crate::ContentType;
use bincode::{Decode, Encode};
use sled::{Batch, Tree};
use tracing::{debug, info};

pub(crate) const SCHEMA_VERSION: u32 = 2;
const VERSION_KEY: &[u8] = b"schema_version";

/// Title row as written by schema version 1
#[derive(Encode, Decode, Clone, Debug, PartialEq, Eq)]
pub(crate) struct LegacyTitleRecord {
    pub name: String,
    pub folder_path: String,
    pub poster_path: Option<String>,
}

impl From<LegacyTitleRecord> for TitleRecord {
    fn from(legacy: LegacyTitleRecord) -> Self {
        Self {
            name: legacy.name,
            folder_path: legacy.folder_path,
            poster_path: legacy.poster_path,
            content_type: ContentType::Video,
        }
    }
}

pub(super) fn schema_version(db: &Database) -> Result<Option<u32>, DbError> {
    match db.meta.get(VERSION_KEY)? {
        Some(raw) => {
            let bytes: [u8; 4] = raw
                .as_ref()
                .try_into()
                .map_err(|_| DbError::Corrupt("schema version is not a u32".into()))?;
            Ok(Some(u32::from_be_bytes(bytes)))
        }
        None => Ok(None),
    }
}

fn stamp(db: &Database) -> Result<(), DbError> {
    db.meta.insert(VERSION_KEY, &SCHEMA_VERSION.to_be_bytes()[..])?;
    Ok(())
}

/// Bring the store up to the current schema version
pub(super) fn upgrade(db: &Database) -> Result<(), DbError> {
    match schema_version(db)? {
        Some(SCHEMA_VERSION) => Ok(()),
        Some(newer) if newer > SCHEMA_VERSION => Err(DbError::Corrupt(format!(
            "catalog was written by schema version {newer}, this build understands {SCHEMA_VERSION}"
        ))),
        Some(_) => upgrade_from_v1(db),
        None if db.titles.is_empty() => {
            debug!("initializing empty catalog at schema version {SCHEMA_VERSION}");
            stamp(db)
        }
        None => upgrade_from_v1(db),
    }
}

fn upgrade_from_v1(db: &Database) -> Result<(), DbError> {
    let mut batch = Batch::default();
    let mut upgraded = 0usize;

    for result in &db.titles {
        let (key, value) = result?;
        let (legacy, read): (LegacyTitleRecord, usize) =
            bincode::decode_from_slice(&value, bincode::config::standard())?;
        if read != value.len() {
            // Already carries a content type from an interrupted upgrade.
            decode::<TitleRecord>(&value)?;
            continue;
        }
        batch.insert(key, encode(&TitleRecord::from(legacy))?);
        upgraded += 1;
    }
    db.titles.apply_batch(batch)?;

    raise_sequence(&db.meta, SEQ_TITLE, max_first_id(&db.titles, false)?)?;
    raise_sequence(&db.meta, SEQ_TAG, max_first_id(&db.tags, false)?)?;
    raise_sequence(&db.meta, SEQ_FILE, max_first_id(&db.files, true)?)?;

    stamp(db)?;
    info!(titles = upgraded, "upgraded catalog to schema version {SCHEMA_VERSION}");
    Ok(())
}

/// Highest id stored as a key (or as the second half of a pair key)
fn max_first_id(tree: &Tree, pair_keys: bool) -> Result<u64, DbError> {
    if !pair_keys {
        return match tree.last()? {
            Some((key, _)) => types::id_from_bytes(&key),
            None => Ok(0),
        };
    }
    let mut max = 0;
    for key in tree.iter().keys() {
        max = max.max(types::PairKey::from_bytes(&key?)?.second);
    }
    Ok(max)
}

fn raise_sequence(meta: &Tree, sequence: &[u8], floor: u64) -> Result<(), DbError> {
    let current = match meta.get(sequence)? {
        Some(raw) => types::id_from_bytes(&raw)?,
        None => 0,
    };
    if floor > current {
        meta.insert(sequence, &floor.to_be_bytes()[..])?;
    }
    Ok(())
}
