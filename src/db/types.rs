//! Type wrappers for database keys and values
//!
//! This module provides type-safe wrappers for the identifiers and paths that
//! make up keys in the catalog trees.
//!
//! # Types
//!
//! - **`TitleId`** / **`TagId`**: Row identifiers, encoded big-endian so sled's
//!   lexicographic key order matches numeric order
//! - **`PairKey`**: Composite `(u64, u64)` key used by the association and file trees
//! - **`PathString`**: Wrapper that guarantees a path can be represented as valid UTF-8
//!
//! # Examples
//!
//! ```
//! use shelvr::db::types::{PairKey, PathString, TitleId};
//!
//! let key = PairKey::new(7, 42);
//! assert_eq!(PairKey::from_bytes(&key.to_bytes()).unwrap(), key);
//! assert!(key.to_bytes().starts_with(&TitleId(7).to_bytes()));
//!
//! let path_str = PathString::new("movies/Alien").unwrap();
//! assert_eq!(&*path_str, "movies/Alien");
//! ```

use super::error::DbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ID_LEN: usize = std::mem::size_of::<u64>();

pub(crate) fn id_from_bytes(bytes: &[u8]) -> Result<u64, DbError> {
    let raw: [u8; ID_LEN] = bytes
        .try_into()
        .map_err(|_| DbError::Corrupt(format!("expected {ID_LEN}-byte id, got {} bytes", bytes.len())))?;
    Ok(u64::from_be_bytes(raw))
}

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            #[must_use]
            pub const fn to_bytes(self) -> [u8; ID_LEN] {
                self.0.to_be_bytes()
            }

            /// # Errors
            ///
            /// Returns `DbError::Corrupt` if `bytes` is not exactly eight bytes long.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, DbError> {
                id_from_bytes(bytes).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

row_id!(
    /// Identifier of a title row
    TitleId
);

row_id!(
    /// Identifier of a tag row
    TagId
);

/// Two ids concatenated into one 16-byte key
///
/// Used for `title_tags` (title, tag), `tag_titles` (tag, title) and
/// `files` (title, file sequence). Prefix scans on the first id enumerate
/// every row that belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairKey {
    pub first: u64,
    pub second: u64,
}

impl PairKey {
    #[must_use]
    pub const fn new(first: u64, second: u64) -> Self {
        Self { first, second }
    }

    #[must_use]
    pub fn to_bytes(self) -> [u8; 2 * ID_LEN] {
        let mut out = [0u8; 2 * ID_LEN];
        out[..ID_LEN].copy_from_slice(&self.first.to_be_bytes());
        out[ID_LEN..].copy_from_slice(&self.second.to_be_bytes());
        out
    }

    /// # Errors
    ///
    /// Returns `DbError::Corrupt` if `bytes` is not exactly sixteen bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DbError> {
        if bytes.len() != 2 * ID_LEN {
            return Err(DbError::Corrupt(format!(
                "expected {}-byte pair key, got {} bytes",
                2 * ID_LEN,
                bytes.len()
            )));
        }
        Ok(Self {
            first: id_from_bytes(&bytes[..ID_LEN])?,
            second: id_from_bytes(&bytes[ID_LEN..])?,
        })
    }
}

/// Wrapper for a path that guarantees valid UTF-8 string representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathString(String);

impl TryFrom<PathBuf> for PathString {
    type Error = DbError;

    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl TryFrom<&Path> for PathString {
    type Error = DbError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl PathString {
    /// Lexically normalized: trailing separators and `.` components are
    /// dropped, so `/m/Alien/` and `/m/./Alien` both store as `/m/Alien`.
    ///
    /// # Errors
    ///
    /// Returns `DbError::PathError` if the path contains invalid UTF-8 characters.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let normalized: PathBuf = path.as_ref().components().collect();
        normalized
            .to_str()
            .ok_or_else(|| DbError::PathError(path.as_ref().display().to_string()))
            .map(|s| Self(s.to_string()))
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PathString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for PathString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
