//! TripNest provider client library.
//!
//! Everything a service provider's front end needs below the view layer:
//! - [`api`] - REST clients for hotels, tour guides, travel agencies and vehicles
//! - [`upload`] - Image validation, naming and hosting
//! - [`wizard`] - Multi-step profile wizards over one generic engine
//! - [`session`], [`store`], [`snapshot`] - Session identity and the local
//!   key-value store holding cached profiles
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tripnest_client::api::{ApiClient, HotelClient};
//! use tripnest_client::config::ClientConfig;
//! use tripnest_client::session::Session;
//! use tripnest_client::snapshot::SnapshotRepository;
//! use tripnest_client::store::{FileStore, KeyValueStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.store_path)?);
//! let session = Session::from_store(store.as_ref())?;
//!
//! let api = ApiClient::new(&config.api_base_url, session)?;
//! let hotels = HotelClient::new(api, SnapshotRepository::new(store));
//! let mine = hotels.mine().await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod upload;
pub mod wizard;

pub use error::{ClientError, ValidationError};
