//! Core types for TripNest.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod email;
pub mod id;
pub mod image;
pub mod kind;
pub mod location;
pub mod price;
pub mod status;

pub use contact::{PhoneError, PhoneNumber};
pub use email::{Email, EmailError};
pub use id::*;
pub use image::ImageFile;
pub use kind::{EntityKind, UnknownEntityKind};
pub use location::{Coordinates, CoordinatesError};
pub use price::{CurrencyCode, Price};
pub use status::*;
