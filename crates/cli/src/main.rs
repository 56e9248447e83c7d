//! TripNest CLI - Operator tools for provider profiles.
//!
//! # Usage
//!
//! ```bash
//! # Show the cached hotel profile
//! tp-cli snapshot show hotel
//!
//! # Forget the cached tour guide profile
//! tp-cli snapshot clear tour-guide
//!
//! # Fetch, list and delete records
//! tp-cli get hotel 12
//! tp-cli list vehicle
//! tp-cli mine travel-agency
//! tp-cli delete hotel 12
//!
//! # Upload an image and print its hosted URL
//! tp-cli upload vehicle ./van.jpg
//! ```
//!
//! # Environment Variables
//!
//! See `tripnest_client::config`. `TRIPNEST_LOG_JSON=1` switches log output
//! to JSON.
//! The `snapshot` commands read only `TRIPNEST_STORE_PATH`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tripnest_core::EntityKind;

mod commands;

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(author, version, about = "TripNest provider CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or clear cached profile snapshots
    Snapshot {
        #[command(subcommand)]
        action: SnapshotAction,
    },
    /// Fetch one record
    Get {
        /// Entity kind (`hotel`, `tour-guide`, `travel-agency`, `vehicle`)
        kind: EntityKind,
        /// Record id
        id: i64,
    },
    /// List every record of a kind
    List {
        /// Entity kind
        kind: EntityKind,
    },
    /// List the signed-in provider's records
    Mine {
        /// Entity kind
        kind: EntityKind,
    },
    /// Delete one record
    Delete {
        /// Entity kind
        kind: EntityKind,
        /// Record id
        id: i64,
    },
    /// Upload an image and print its hosted URL
    Upload {
        /// Entity kind the image belongs to (selects folder and name prefix)
        kind: EntityKind,
        /// Image file (JPEG, PNG or WebP, at most 10 MB)
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum SnapshotAction {
    /// Print the cached profile
    Show {
        /// Entity kind
        kind: EntityKind,
    },
    /// Remove the cached profile
    Clear {
        /// Entity kind
        kind: EntityKind,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before reading TRIPNEST_LOG_JSON / RUST_LOG
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), commands::CommandError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    // Defaults to info level for the client crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tripnest_client=info,tp_cli=info".into());

    let use_json = std::env::var("TRIPNEST_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    let json_layer = use_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!use_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    use commands::Context;

    match cli.command {
        // Snapshot commands only touch the local store
        Commands::Snapshot { action } => {
            let snapshots = commands::local_snapshots()?;
            match action {
                SnapshotAction::Show { kind } => commands::snapshot::show(&snapshots, kind),
                SnapshotAction::Clear { kind } => commands::snapshot::clear(&snapshots, kind),
            }
        }
        Commands::Get { kind, id } => commands::records::get(&Context::load()?, kind, id).await,
        Commands::List { kind } => commands::records::list(&Context::load()?, kind).await,
        Commands::Mine { kind } => commands::records::mine(&Context::load()?, kind).await,
        Commands::Delete { kind, id } => {
            commands::records::delete(&Context::load()?, kind, id).await
        }
        Commands::Upload { kind, path } => {
            commands::upload::upload(&Context::load()?, kind, &path).await
        }
    }
}
