//! Geographic coordinates attached to a selected place.

use serde::{Deserialize, Serialize};

/// Errors that can occur when building [`Coordinates`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinatesError {
    /// Latitude outside -90..=90.
    #[error("latitude {0} is out of range")]
    Latitude(f64),
    /// Longitude outside -180..=180.
    #[error("longitude {0} is out of range")]
    Longitude(f64),
}

/// Latitude/longitude pair of a place picked from the location search.
///
/// Profiles whose location was typed by hand rather than picked carry no
/// coordinates; the API receives `null` for them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinates {
    /// Build a coordinate pair, rejecting values outside the valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatesError`] for out-of-range or non-finite values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinatesError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinatesError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinatesError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }
}
