//! Database-specific error types
//!
//! This module defines all error types that can occur during catalog operations.
//!
//! # Error Types
//!
//! - **`AlreadyExists`**: A folder is already registered as a title
//! - **`NameCollision`**: A tag rename targets a name another tag already holds
//! - **`NotFound`**: A title id does not exist
//! - **`SledError`** / **`DecodeError`** / **`EncodeError`**: Storage and
//!   serialization failures from sled and bincode
//! - **`Corrupt`**: A stored key or value does not have the expected shape
//!
//! The first three are conditions callers are expected to recover from
//! (report and continue); the rest indicate a broken store.

use super::types::TitleId;
use sled::transaction::TransactionError;
use thiserror::Error;

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// The folder is already registered as a title
    #[error("Folder already in library: {0}")]
    AlreadyExists(String),

    /// Another tag already uses the requested name
    #[error("A tag named '{0}' already exists")]
    NameCollision(String),

    /// No title with this id
    #[error("Title not found: {0}")]
    NotFound(TitleId),

    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// Stored data has an unexpected layout
    #[error("Corrupt catalog entry: {0}")]
    Corrupt(String),

    /// Path cannot be stored because it is not valid UTF-8
    #[error("Path is not valid UTF-8: {0}")]
    PathError(String),
}

impl From<TransactionError<Self>> for DbError {
    fn from(err: TransactionError<Self>) -> Self {
        match err {
            TransactionError::Abort(inner) => inner,
            TransactionError::Storage(storage) => Self::SledError(storage),
        }
    }
}

impl DbError {
    /// True for the conditions a caller reports and moves past
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists(_) | Self::NameCollision(_) | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
