//! Shelvr - a tag-based media library manager
//!
//! This library catalogs media folders as *titles*, labels them with
//! user-defined tags and answers tag-intersection queries over an embedded
//! database. Folders are classified on import as either a video collection,
//! whose individual files are tracked, or an image gallery, which is treated
//! as an opaque set.

use bincode::{Decode, Encode};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod discovery;
pub mod import;
pub mod library;
pub mod logging;
pub mod output;
pub mod posters;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use db::types::{TagId, TitleId};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum ShelvrError {
    /// Database error
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Filesystem read or copy failure
    #[error("I/O error: {0}")]
    IoFailure(#[from] std::io::Error),
    /// Placeholder image could not be written
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
    /// Output serialization failed
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ShelvrError {
    /// True for conditions that are reported to the user and skipped
    /// rather than ending the run.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::DbError(err) => err.is_recoverable(),
            Self::IoFailure(_) | Self::InvalidInput(_) => true,
            _ => false,
        }
    }
}

/// How the contents of a title are treated
#[derive(
    Encode, Decode, Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Individual playable files are tracked
    #[default]
    Video,
    /// Image-dominant folder, files are not tracked individually
    Gallery,
}

impl ContentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Gallery => "gallery",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ShelvrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "gallery" => Ok(Self::Gallery),
            other => Err(ShelvrError::InvalidInput(format!(
                "Unknown content type '{other}' (expected 'video' or 'gallery')"
            ))),
        }
    }
}

/// A row of a title listing
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TitleSummary {
    pub id: TitleId,
    pub name: String,
    pub folder_path: PathBuf,
}

/// A complete title row
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Title {
    pub id: TitleId,
    pub name: String,
    pub folder_path: PathBuf,
    pub poster_path: Option<PathBuf>,
    pub content_type: ContentType,
}

impl Title {
    #[must_use]
    pub fn summary(&self) -> TitleSummary {
        TitleSummary {
            id: self.id,
            name: self.name.clone(),
            folder_path: self.folder_path.clone(),
        }
    }
}

/// A title with its tags and, for video titles, its files resolved
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TitleDetails {
    #[serde(flatten)]
    pub title: Title,
    pub tags: Vec<String>,
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parse() {
        assert_eq!(" Gallery ".parse::<ContentType>().unwrap(), ContentType::Gallery);
        assert_eq!("video".parse::<ContentType>().unwrap(), ContentType::Video);
        assert!(matches!("audio".parse::<ContentType>(), Err(ShelvrError::InvalidInput(_))));
    }

    #[test]
    fn test_content_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ContentType::Gallery).unwrap(), "\"gallery\"");
    }

    #[test]
    fn test_recoverable_errors() {
        let duplicate = ShelvrError::from(db::DbError::AlreadyExists("/media/A".into()));
        let corrupt = ShelvrError::from(db::DbError::Corrupt("bad key".into()));

        assert!(duplicate.is_recoverable());
        assert!(!corrupt.is_recoverable());
    }

    #[test]
    fn test_details_json_is_flat() {
        let details = TitleDetails {
            title: Title {
                id: TitleId(3),
                name: "Alien".into(),
                folder_path: PathBuf::from("/media/Alien"),
                poster_path: None,
                content_type: ContentType::Video,
            },
            tags: vec!["scifi".into()],
            files: vec![PathBuf::from("/media/Alien/alien.mkv")],
        };

        let value = serde_json::to_value(&details).unwrap();

        assert_eq!(value["id"], 3);
        assert_eq!(value["content_type"], "video");
        assert_eq!(value["tags"][0], "scifi");
    }
}
