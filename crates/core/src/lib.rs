//! TripNest Core - Shared types library.
//!
//! This crate provides the types shared by every TripNest provider component:
//! - `client` - API clients, image upload pipeline and profile wizards
//! - `cli` - Operator command-line tools
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, contact details, coordinates, prices and images
//! - [`models`] - Hotel, tour guide, travel agency and vehicle records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
