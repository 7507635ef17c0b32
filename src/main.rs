//! Pantry Tracker - pantry inventory CLI and web UI
//!
//! Records item observations into SQLite, merging repeat entries by
//! normalized name, and tracks consumption down to removal.

use clap::{Parser, Subcommand};
use pantry_tracker::{Pantry, SqliteStore};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Pantry inventory tracker backed by SQLite
#[derive(Parser, Debug)]
#[command(name = "pantry_tracker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value_t = default_db_path())]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record an observation of an item (merges with an existing entry)
    Add {
        /// Item name (matched case-insensitively after trimming)
        name: String,
        /// Number of units observed
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Consume one unit of an item; the entry disappears with its last unit
    Use {
        /// Item name
        name: String,
    },
    /// List all pantry items
    List,
    /// Run the web UI
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

/// Returns the default database path: ~/.local/share/pantry_tracker/pantry.db
fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pantry_tracker")
        .join("pantry.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let db_path = PathBuf::from(&args.database);

    log::info!("Database path: {}", db_path.display());

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let store = match SqliteStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let mut pantry = match Pantry::load(store) {
        Ok(pantry) => pantry,
        Err(e) => {
            log::error!("Failed to load pantry records: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Add { name, quantity } => {
            match pantry.add(&name, quantity) {
                Ok(id) => {
                    // Report the post-merge state, not the observation
                    if let Some(record) = pantry.view().get(id) {
                        println!("{}  x{}", record.name, record.quantity);
                    }
                }
                Err(e) => {
                    log::error!("Failed to add item: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Use { name } => match pantry.consume_by_name(&name) {
            Ok(id) => match pantry.view().get(id) {
                Some(record) => println!("{}  x{}", record.name, record.quantity),
                None => println!("Used up the last unit; item removed"),
            },
            Err(e) => {
                log::error!("Failed to consume item: {}", e);
                std::process::exit(1);
            }
        },
        Command::List => {
            let mut records: Vec<_> = pantry.view().records().cloned().collect();
            records.sort_by(|a, b| a.name.cmp(&b.name));
            if records.is_empty() {
                println!("Pantry is empty");
            }
            for record in records {
                println!("{:>6}  {}  x{}", record.id, record.name, record.quantity);
            }
        }
        Command::Serve { port } => {
            let shared = Arc::new(Mutex::new(pantry));
            if let Err(e) = pantry_tracker::web::serve(shared, port).await {
                log::error!("Web server error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
