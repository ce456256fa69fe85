//! Shelvr CLI application entry point
//!
//! Catalogs media folders as titles, tags them and lists them by tag.
//!
//! # Usage
//!
//! ```bash
//! # Import every sub-folder of ~/Movies as a title
//! shelvr import ~/Movies
//!
//! # List everything, or only titles tagged both noir and 1940s
//! shelvr
//! shelvr list -t noir -t 1940s
//!
//! # Inspect and launch
//! shelvr show 12
//! shelvr open 12 1
//!
//! # Quiet mode (only output results)
//! shelvr -q list -t noir
//! ```
//!
//! # Configuration
//!
//! On first run, shelvr prompts for the data directory. Configuration is
//! stored in the user's config directory (`~/.config/shelvr/config.toml` on
//! Linux).

use colored::Colorize;
use shelvr::{
    ShelvrError,
    cli::{Cli, Commands},
    commands, config,
    library::Library,
    logging,
};

type Result<T> = std::result::Result<T, ShelvrError>;

fn main() {
    if let Err(e) = run() {
        if e.is_recoverable() {
            eprintln!("{}", e.to_string().yellow());
        } else {
            eprintln!("{} {e}", "Error:".red().bold());
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init_logging(cli.verbose);

    let config = config::ShelvrConfig::load_or_setup()?;
    let quiet = cli.quiet || config.quiet;
    let command = cli.get_command();

    if let Commands::Config { command } = &command {
        return commands::config(config, command, quiet);
    }

    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => config.data_dir()?,
    };
    let library = Library::open(&data_dir)?;
    let db = library.db();

    match &command {
        Commands::Import { dir, single } => {
            commands::import(db, dir, *single, &config.classifier, quiet)?;
        }
        Commands::List { tags, view, json } => {
            commands::list(db, tags, view.unwrap_or(config.view), *json, quiet)?;
        }
        Commands::Show { id, json } => commands::show(&library, *id, *json)?,
        Commands::Open { id, file } => commands::open(db, *id, *file, quiet)?,
        Commands::Remove { id, yes } => {
            commands::remove(&library, *id, *yes || quiet, quiet)?;
        }
        Commands::Tag { id, tags } => {
            commands::tag(db, *id, tags, quiet)?;
        }
        Commands::Untag { id, tags } => {
            commands::untag(db, *id, tags, quiet)?;
        }
        Commands::Tags { command } => commands::tags(db, command, quiet)?,
        Commands::Poster { id, image } => commands::poster(&library, *id, image, quiet)?,
        Commands::SetType { id, content_type } => {
            commands::content_type(db, *id, *content_type, quiet)?;
        }
        Commands::Rescan { id } => commands::rescan(db, *id, quiet)?,
        Commands::Config { .. } => unreachable!(),
    }

    db.flush()?;
    Ok(())
}
