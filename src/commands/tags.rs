//! Tags command - global tag management

use super::confirm;
use crate::{ShelvrError, cli::TagsCommands, db::{Database, DbError}, output};

type Result<T> = std::result::Result<T, ShelvrError>;

/// Execute the tags management command
///
/// # Errors
/// Returns an error if database operations fail or user interaction fails.
/// A rename onto an existing name is reported, not returned.
pub fn execute(db: &Database, command: &TagsCommands, quiet: bool) -> Result<()> {
    match command {
        TagsCommands::List => list_tags(db, quiet),
        TagsCommands::Create { name } => create_tag(db, name, quiet),
        TagsCommands::Rename { old, new } => rename_tag(db, old.trim(), new, quiet),
        TagsCommands::Delete { name, yes } => delete_tag(db, name.trim(), *yes || quiet, quiet),
    }
}

fn list_tags(db: &Database, quiet: bool) -> Result<()> {
    let tags = db.list_tags()?;

    if tags.is_empty() {
        if !quiet {
            println!("No tags in library.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Tags in library:");
    }
    for tag in tags {
        let count = db.tag_usage(&tag)?;
        println!("{}", output::tag_with_count(&tag, count, quiet));
    }
    Ok(())
}

fn create_tag(db: &Database, name: &str, quiet: bool) -> Result<()> {
    let existed = db.tag_id(name.trim())?.is_some();
    match db.create_tag(name)? {
        None => Err(ShelvrError::InvalidInput("Tag name cannot be empty".into())),
        Some(_) if existed => {
            if !quiet {
                println!("Tag '{}' already exists.", name.trim());
            }
            Ok(())
        }
        Some(_) => {
            if !quiet {
                println!("Created tag '{}'.", name.trim());
            }
            Ok(())
        }
    }
}

fn rename_tag(db: &Database, old: &str, new: &str, quiet: bool) -> Result<()> {
    match db.rename_tag(old, new) {
        Ok(true) => {
            if !quiet {
                println!("Renamed tag '{old}' to '{}'.", new.trim());
            }
        }
        Ok(false) => {
            if !quiet {
                println!("Nothing to rename.");
            }
        }
        Err(DbError::NameCollision(name)) => {
            eprintln!("Cannot rename '{old}': a tag named '{name}' already exists.");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn delete_tag(db: &Database, name: &str, yes: bool, quiet: bool) -> Result<()> {
    if db.tag_id(name)?.is_none() {
        if !quiet {
            println!("Tag '{name}' not found.");
        }
        return Ok(());
    }

    let usage = db.tag_usage(name)?;
    if !confirm(&format!("Delete tag '{name}' (used by {usage} title(s))?"), yes)? {
        if !quiet {
            println!("Cancelled.");
        }
        return Ok(());
    }

    db.delete_tag(name)?;
    if !quiet {
        println!("Deleted tag '{name}' from {usage} title(s).");
    }
    Ok(())
}
