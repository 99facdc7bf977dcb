use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};

use asset_catalog::utils::config;
use asset_catalog::{AssetType, Catalog, Ingested};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog database file (overrides ASSET_CATALOG_DB and .env)
    #[arg(short, long, global = true)]
    db_path: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the catalog schema
    Init {
        /// Store the database path in .env for later runs
        #[arg(long)]
        remember: bool,
    },
    /// Register one file
    Add {
        path: PathBuf,
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Register every visible file below a directory
    AddDir { root: PathBuf },
    Get { id: i64 },
    List,
    Delete { id: i64 },
    #[command(subcommand)]
    Creator(CreatorCommand),
    #[command(subcommand)]
    Tag(TagCommand),
    #[command(subcommand)]
    Source(SourceCommand),
    #[command(subcommand)]
    Search(SearchCommand),
}

#[derive(Subcommand, Debug)]
enum CreatorCommand {
    Add {
        name: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete { id: i64 },
    List,
    Link {
        asset_id: i64,
        creator_id: i64,
        #[arg(long)]
        role: Option<String>,
    },
    Unlink { asset_id: i64, creator_id: i64 },
}

#[derive(Subcommand, Debug)]
enum TagCommand {
    Add { name: String },
    Delete { name: String },
    List,
    /// Attach an existing tag to an asset
    Apply { asset_id: i64, name: String },
    /// Detach a tag from an asset
    Remove { asset_id: i64, name: String },
}

#[derive(Subcommand, Debug)]
enum SourceCommand {
    Add {
        name: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete { id: i64 },
    List,
    Link { asset_id: i64, source_id: i64 },
    Unlink { asset_id: i64, source_id: i64 },
}

#[derive(Subcommand, Debug)]
enum SearchCommand {
    Tag { name: String },
    Creator { name: String },
    Type { asset_type: AssetType },
}

/// Full view of one asset for `get`.
#[derive(Serialize)]
struct AssetDetails {
    #[serde(flatten)]
    asset: asset_catalog::Asset,
    tags: Vec<String>,
    creators: Vec<asset_catalog::CreatorLink>,
    source: Option<asset_catalog::Source>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = config::resolve(args.db_path, Path::new(config::ENV_FILE))?;
    let mut catalog = Catalog::open(&config.db_path)
        .with_context(|| format!("Failed to open catalog at {:?}", config.db_path))?;

    match args.command {
        Command::Init { remember } => {
            if remember {
                config::save_to_env(Path::new(config::ENV_FILE), &config.db_path)?;
            }
            info!("Catalog ready at {:?}", config.db_path);
            println!("{}", config.db_path.display());
        }
        Command::Add { path, title } => {
            let outcome = catalog.add_asset(&path, title.as_deref())?;
            match outcome {
                Ingested::Added(id) => println!("added {}", id),
                Ingested::Duplicate(id) => println!("duplicate of {}", id),
            }
        }
        Command::AddDir { root } => print_json(&catalog.add_directory(&root)?)?,
        Command::Get { id } => {
            let details = match catalog.get_asset(id)? {
                Some(asset) => Some(AssetDetails {
                    tags: catalog.tags_of(id)?,
                    creators: catalog.creators_of(id)?,
                    source: catalog.source_of(id)?,
                    asset,
                }),
                None => None,
            };
            print_json(&details)?;
        }
        Command::List => print_json(&catalog.list_assets()?)?,
        Command::Delete { id } => catalog.delete_asset(id)?,
        Command::Creator(cmd) => match cmd {
            CreatorCommand::Add { name, notes } => catalog.add_creator(&name, notes.as_deref())?,
            CreatorCommand::Edit { id, name, notes } => {
                catalog.edit_creator(id, name.as_deref(), notes.as_deref())?
            }
            CreatorCommand::Delete { id } => catalog.delete_creator(id)?,
            CreatorCommand::List => print_json(&catalog.list_creators()?)?,
            CreatorCommand::Link {
                asset_id,
                creator_id,
                role,
            } => catalog.link_creator(asset_id, creator_id, role.as_deref())?,
            CreatorCommand::Unlink {
                asset_id,
                creator_id,
            } => catalog.unlink_creator(asset_id, creator_id)?,
        },
        Command::Tag(cmd) => match cmd {
            TagCommand::Add { name } => catalog.add_tag(&name)?,
            TagCommand::Delete { name } => catalog.delete_tag(&name)?,
            TagCommand::List => print_json(&catalog.list_tags()?)?,
            TagCommand::Apply { asset_id, name } => catalog.tag_asset(asset_id, &name)?,
            TagCommand::Remove { asset_id, name } => catalog.untag_asset(asset_id, &name)?,
        },
        Command::Source(cmd) => match cmd {
            SourceCommand::Add {
                name,
                category,
                url,
                notes,
            } => catalog.add_source(&name, category.as_deref(), url.as_deref(), notes.as_deref())?,
            SourceCommand::Delete { id } => catalog.delete_source(id)?,
            SourceCommand::List => print_json(&catalog.list_sources()?)?,
            SourceCommand::Link {
                asset_id,
                source_id,
            } => catalog.link_source(asset_id, source_id)?,
            SourceCommand::Unlink {
                asset_id,
                source_id,
            } => catalog.unlink_source(asset_id, source_id)?,
        },
        Command::Search(cmd) => {
            let found = match cmd {
                SearchCommand::Tag { name } => catalog.search_by_tag(&name)?,
                SearchCommand::Creator { name } => catalog.search_by_creator(&name)?,
                SearchCommand::Type { asset_type } => catalog.search_by_type(asset_type)?,
            };
            print_json(&found)?;
        }
    }

    Ok(())
}
