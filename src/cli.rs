//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for shelvr using the `clap` crate.
//!
//! # Commands
//!
//! - **import**: Add each sub-folder of a directory (or one folder) as a title
//! - **list**: Titles filtered by tags, ordered by name (default)
//! - **show** / **open**: Inspect a title or launch it
//! - **tag** / **untag** / **tags**: Tag assignment and tag management
//! - **poster** / **type** / **rescan** / **remove**: Title maintenance
//! - **config**: Read and write settings
//!
//! # Examples
//!
//! ```
//! use shelvr::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from_args(["shelvr", "list", "-t", "noir"]);
//! assert!(matches!(cli.get_command(), Commands::List { .. }));
//! ```

use crate::ContentType;
use crate::TitleId;
use crate::session::ViewMode;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser, Debug)]
#[command(name = "shelvr")]
#[command(about = "A tag-based media library manager", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log progress to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Use this data directory instead of the configured one
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Import every sub-folder of DIR as a title
    #[command(visible_alias = "i")]
    Import {
        /// Folder to import from
        dir: PathBuf,

        /// Import DIR itself as a single title
        #[arg(short = 's', long = "single")]
        single: bool,
    },

    /// List titles, optionally restricted to those carrying every given tag (default)
    #[command(visible_alias = "ls")]
    List {
        /// Required tag (can specify multiple: -t tag1 -t tag2)
        #[arg(short = 't', long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Layout of the listing (overrides config)
        #[arg(long = "view", value_enum)]
        view: Option<ViewMode>,

        /// Print JSON instead of text
        #[arg(long = "json")]
        json: bool,
    },

    /// Show a title with its poster, tags and files
    Show {
        id: TitleId,

        /// Print JSON instead of text
        #[arg(long = "json")]
        json: bool,
    },

    /// Open a title folder, or one of its files, with the default application
    #[command(visible_alias = "o")]
    Open {
        id: TitleId,

        /// 1-based index into the file list printed by `show`
        #[arg(value_name = "FILE_INDEX")]
        file: Option<usize>,
    },

    /// Remove a title from the library (files on disk are kept)
    #[command(visible_alias = "rm")]
    Remove {
        id: TitleId,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Add tags to a title, creating tags that do not exist yet
    #[command(visible_alias = "t")]
    Tag {
        id: TitleId,

        #[arg(required = true, value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Remove tags from a title
    #[command(visible_alias = "u")]
    Untag {
        id: TitleId,

        #[arg(required = true, value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Manage tags globally
    Tags {
        #[command(subcommand)]
        command: TagsCommands,
    },

    /// Set the poster image of a title
    Poster {
        id: TitleId,

        /// Image to copy into the poster cache
        image: PathBuf,
    },

    /// Override the detected content type of a title
    #[command(name = "type")]
    SetType {
        id: TitleId,

        #[arg(value_enum)]
        content_type: ContentType,
    },

    /// Re-read the file list of a video title from disk
    Rescan { id: TitleId },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Tag management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TagsCommands {
    /// List all tags with the number of titles using them
    #[command(visible_alias = "ls")]
    List,

    /// Create a tag
    Create { name: String },

    /// Rename a tag everywhere it is used
    #[command(visible_alias = "mv")]
    Rename { old: String, new: String },

    /// Delete a tag and remove it from every title
    #[command(visible_alias = "rm")]
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., view=grid)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },
}

impl Cli {
    /// Parse command-line arguments from the environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse from an explicit argument list
    #[must_use]
    pub fn parse_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::parse_from(args)
    }

    /// Get the command, defaulting to an unfiltered listing
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::List {
            tags: Vec::new(),
            view: None,
            json: false,
        })
    }
}
