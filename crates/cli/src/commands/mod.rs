//! Subcommand implementations.

pub mod records;
pub mod snapshot;
pub mod upload;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tripnest_client::api::ApiClient;
use tripnest_client::config::{ClientConfig, ConfigError, store_path_from_env};
use tripnest_client::session::Session;
use tripnest_client::snapshot::SnapshotRepository;
use tripnest_client::store::{FileStore, KeyValueStore, StoreError};
use tripnest_client::ClientError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Configuration and local store shared by every command.
pub struct Context {
    pub config: ClientConfig,
    pub store: Arc<dyn KeyValueStore>,
}

impl Context {
    /// Load configuration from the environment and open the local store.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the store file is
    /// unreadable.
    pub fn load() -> Result<Self, CommandError> {
        let config = ClientConfig::from_env()?;
        let store = open_store(&config.store_path)?;
        Ok(Self { config, store })
    }

    /// Session read from the local store.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthMissing`] if nobody is signed in.
    pub fn session(&self) -> Result<Session, ClientError> {
        Session::from_store(self.store.as_ref())
    }

    /// API client for the signed-in session.
    ///
    /// # Errors
    ///
    /// Returns error if nobody is signed in or the HTTP client fails to build.
    pub fn api(&self) -> Result<ApiClient, ClientError> {
        ApiClient::new(&self.config.api_base_url, self.session()?)
    }

    pub fn snapshots(&self) -> SnapshotRepository {
        SnapshotRepository::new(Arc::clone(&self.store))
    }
}

/// Open the local store file at `path`.
///
/// # Errors
///
/// Returns error if the file cannot be created or holds invalid JSON.
pub fn open_store(path: &Path) -> Result<Arc<dyn KeyValueStore>, CommandError> {
    let store = FileStore::open(path)?;
    tracing::debug!(path = %store.path().display(), "Opened local store");
    Ok(Arc::new(store))
}

/// Snapshot cache over the local store alone. Needs no API or image host
/// settings.
///
/// # Errors
///
/// Returns error if the store file is unreadable.
pub fn local_snapshots() -> Result<SnapshotRepository, CommandError> {
    let store = open_store(&store_path_from_env())?;
    Ok(SnapshotRepository::new(store))
}

/// Write a JSON value to stdout.
///
/// # Errors
///
/// Returns error if the value cannot be encoded.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    let rendered = serde_json::to_string_pretty(value)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}

/// Write a line to stdout.
pub fn print_line(line: &str) {
    #[allow(clippy::print_stdout)]
    {
        println!("{line}");
    }
}
