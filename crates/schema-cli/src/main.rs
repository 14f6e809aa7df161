//! Schema Browser CLI - terminal front end for schema-library.
//!
//! Loads a schema description document and answers one-shot searches, or runs
//! a line-oriented browsing session over stdin.

mod browse;
mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schema_library::config::DocumentConfig;
use schema_library::{MetadataStore, SearchInterrupt, ViewKind};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "schema-browser")]
#[command(about = "Search database table and column metadata")]
struct Args {
    /// Schema description document
    #[arg(short, long, default_value = DocumentConfig::DEFAULT_FILE_NAME)]
    file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List table names matching every search term
    Tables {
        terms: Vec<String>,

        /// Follow each name with its columns
        #[arg(long)]
        details: bool,
    },
    /// List column names matching every search term
    Columns {
        terms: Vec<String>,

        /// Follow each name with the tables containing it
        #[arg(long)]
        details: bool,
    },
    /// Show the columns of one table
    Table { name: String },
    /// Show the tables containing one column
    Column { name: String },
    /// Show counts and when the schema was generated
    Info,
    /// Interactive search session over stdin
    Browse,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays usable for results
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    info!("Loading schema from {}", args.file.display());
    let store = MetadataStore::load_file(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let store = Arc::new(store);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Tables { terms, details } => {
            commands::list(&store, ViewKind::Tables, &terms, details, args.json, &mut out)?
        }
        Command::Columns { terms, details } => {
            commands::list(&store, ViewKind::Columns, &terms, details, args.json, &mut out)?
        }
        Command::Table { name } => {
            commands::show(&store, ViewKind::Tables, &name, args.json, &mut out)?
        }
        Command::Column { name } => {
            commands::show(&store, ViewKind::Columns, &name, args.json, &mut out)?
        }
        Command::Info => commands::info(&store, args.json, &mut out)?,
        Command::Browse => {
            // Ctrl-C stops a running search; between searches it exits
            let interrupt = SearchInterrupt::new();
            let handler = interrupt.clone();
            ctrlc::set_handler(move || {
                if !handler.interrupt() {
                    std::process::exit(130);
                }
            })
            .context("Failed to install Ctrl-C handler")?;

            let stdin = io::stdin();
            browse::run(store, &args.file, &interrupt, stdin.lock(), &mut out)?
        }
    }

    out.flush()?;
    Ok(())
}
