//! jsonstore CLI
//!
//! Runs CRUD commands directly against a data directory.

use clap::{Args, Parser, Subcommand};
use jsonstore::command::{Command, Response, Status};
use jsonstore::table::TableRef;
use jsonstore::{Config, DecodeMode, Engine, Record, RecordId, StoreError};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// jsonstore CLI
#[derive(Parser, Debug)]
#[command(name = "jsonstore-cli")]
#[command(about = "CLI for the jsonstore flat-file document store")]
#[command(version)]
struct Cli {
    /// Data directory (one sub-directory per database)
    #[arg(short, long, default_value = "./jsonstore_data")]
    data_dir: String,

    /// Treat malformed table files as empty instead of failing
    #[arg(long)]
    lenient: bool,

    /// Indentation width of written tables
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Give up waiting for a table lock after this many milliseconds
    #[arg(long)]
    lock_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Database and table a command targets
#[derive(Args, Debug)]
struct Target {
    /// Database (directory) name
    database: String,

    /// Table (file) name
    table: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append a record (JSON object)
    Create {
        #[command(flatten)]
        target: Target,

        /// The record, e.g. '{"id":1,"name":"a"}'
        record: String,
    },

    /// Read the first record with an id
    Get {
        #[command(flatten)]
        target: Target,

        /// Record id (JSON scalar or plain text)
        id: String,
    },

    /// Merge fields into the first record with an id
    Update {
        #[command(flatten)]
        target: Target,

        /// Record id (JSON scalar or plain text)
        id: String,

        /// Fields to set, e.g. '{"name":"b"}'
        patch: String,
    },

    /// Delete every record with an id
    #[command(alias = "del")]
    Delete {
        #[command(flatten)]
        target: Target,

        /// Record id (JSON scalar or plain text)
        id: String,
    },

    /// Print the whole table
    Dump {
        #[command(flatten)]
        target: Target,
    },
}

fn main() {
    // Initialize tracing/logging (stderr keeps stdout clean for JSON output)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jsonstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = Config::builder()
        .data_dir(&cli.data_dir)
        .indent_width(cli.indent)
        .decode_mode(if cli.lenient {
            DecodeMode::Lenient
        } else {
            DecodeMode::Strict
        });
    if let Some(ms) = cli.lock_timeout_ms {
        builder = builder.lock_timeout_ms(ms);
    }

    let engine = match Engine::open(builder.build()) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let command = match parse_command(cli.command) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid command: {}", e);
            std::process::exit(1);
        }
    };

    let response = Response::from_result(engine.execute(command));
    print_response(&response);

    if response.status == Status::Error {
        std::process::exit(1);
    }
}

/// Rejected command-line arguments
#[derive(Debug, Error)]
enum ArgError {
    #[error("invalid JSON argument: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got: {0}")]
    NotAnObject(String),

    #[error(transparent)]
    Name(#[from] StoreError),
}

/// Build an engine command from CLI arguments
fn parse_command(command: Commands) -> Result<Command, ArgError> {
    Ok(match command {
        Commands::Create { target, record } => Command::Create {
            table: table_ref(target)?,
            record: parse_object(&record)?,
        },
        Commands::Get { target, id } => Command::Read {
            table: table_ref(target)?,
            id: RecordId::parse(&id),
        },
        Commands::Update { target, id, patch } => Command::Update {
            table: table_ref(target)?,
            id: RecordId::parse(&id),
            patch: parse_object(&patch)?,
        },
        Commands::Delete { target, id } => Command::Delete {
            table: table_ref(target)?,
            id: RecordId::parse(&id),
        },
        Commands::Dump { target } => Command::Scan {
            table: table_ref(target)?,
        },
    })
}

fn table_ref(target: Target) -> Result<TableRef, ArgError> {
    Ok(TableRef::new(target.database, target.table)?)
}

/// Parse a JSON object argument
fn parse_object(text: &str) -> Result<Record, ArgError> {
    match serde_json::from_str::<serde_json::Value>(text)? {
        serde_json::Value::Object(fields) => Ok(fields),
        other => Err(ArgError::NotAnObject(other.to_string())),
    }
}

fn print_response(response: &Response) {
    match serde_json::to_string_pretty(&response.body) {
        Ok(text) if response.status == Status::Error => eprintln!("{}", text),
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!("Failed to render response: {}", e),
    }
}
