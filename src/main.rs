//! # Directory CLI (`directory`)
//!
//! ## Usage
//!
//! ```bash
//! directory --config ./config/directory.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `directory serve` | Start the JSON HTTP API |
//! | `directory contacts` | Print one page of contacts as JSON |
//! | `directory contact <id>` | Print a single contact as JSON |
//! | `directory categories` | Print all category tags as JSON |
//!
//! `AIRTABLE_API_KEY` and `AIRTABLE_BASE_ID` must be set for every command.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use contact_directory::config::{load_config, Config};
use contact_directory::directory::{Directory, ListQuery};
use contact_directory::paginate::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use contact_directory::server;
use contact_directory::store::airtable::AirtableStore;

/// Contact directory backed by Airtable.
#[derive(Parser)]
#[command(name = "directory", version, about)]
struct Cli {
    /// Path to configuration file (TOML). Defaults apply when it is missing.
    #[arg(long, global = true, default_value = "./config/directory.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve,

    /// Print one page of contacts.
    Contacts {
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Case-insensitive text matched against name, surname, company,
        /// notes and category.
        #[arg(long, default_value = "")]
        search: String,

        /// Case-insensitive text matched against the category field.
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Print a single contact.
    Contact {
        /// Airtable record id (e.g. `recXXXXXXXXXXXXXX`).
        id: String,
    },

    /// Print every category tag.
    Categories,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_directory(config: &Config) -> Result<Directory> {
    let store = AirtableStore::new(&config.airtable).context("Failed to build Airtable client")?;
    Ok(Directory::new(Arc::new(store)))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    log::info!(
        "airtable config: has_api_key={} base_id={} table={}",
        !config.airtable.api_key.is_empty(),
        config.airtable.base_id,
        config.airtable.table
    );

    match cli.command {
        Commands::Serve => {
            server::run_server(&config).await?;
        }
        Commands::Contacts {
            page,
            page_size,
            search,
            category,
        } => {
            let query = ListQuery {
                page,
                page_size,
                search: search.trim().to_string(),
                category: category.trim().to_string(),
            };
            let directory = build_directory(&config)?;
            print_json(&directory.list_contacts(&query).await?)?;
        }
        Commands::Contact { id } => {
            let directory = build_directory(&config)?;
            print_json(&directory.get_contact(&id).await?)?;
        }
        Commands::Categories => {
            let directory = build_directory(&config)?;
            let categories = directory.list_categories().await?;
            print_json(&serde_json::json!({ "categories": categories }))?;
        }
    }

    Ok(())
}
