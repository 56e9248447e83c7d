//! The kinds of entity a service provider manages.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when parsing an unrecognised entity kind name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown entity kind: {0}. Valid kinds: hotel, tour-guide, travel-agency, vehicle")]
pub struct UnknownEntityKind(pub String);

/// An entity type exposed by the marketplace API.
///
/// Each kind fixes its REST base path, the local snapshot key (if the kind
/// is cached locally) and where its images are uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Hotel,
    TourGuide,
    TravelAgency,
    Vehicle,
}

impl EntityKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 4] = [Self::Hotel, Self::TourGuide, Self::TravelAgency, Self::Vehicle];

    /// REST base path, relative to the API root.
    #[must_use]
    pub const fn base_path(self) -> &'static str {
        match self {
            Self::Hotel => "/api/hotels",
            Self::TourGuide => "/api/tour-guides",
            Self::TravelAgency => "/api/travel-agencies",
            Self::Vehicle => "/api/vehicles",
        }
    }

    /// Key of the locally cached profile snapshot.
    ///
    /// Vehicles belong to a fleet list rather than a single profile, so they
    /// have no snapshot.
    #[must_use]
    pub const fn snapshot_key(self) -> Option<&'static str> {
        match self {
            Self::Hotel => Some("hotel_profile"),
            Self::TourGuide => Some("tour_guide_profile"),
            Self::TravelAgency => Some("travel_agency_profile"),
            Self::Vehicle => None,
        }
    }

    /// Prefix of uploaded image file names.
    #[must_use]
    pub const fn upload_prefix(self) -> &'static str {
        match self {
            Self::Hotel => "hotel",
            Self::TourGuide => "tour_guide",
            Self::TravelAgency => "travel_agency",
            Self::Vehicle => "vehicle",
        }
    }

    /// Image host folder for uploaded images.
    #[must_use]
    pub const fn upload_folder(self) -> &'static str {
        match self {
            Self::Hotel => "hotels",
            Self::TourGuide => "tour_guides",
            Self::TravelAgency => "travel_agencies",
            Self::Vehicle => "vehicles",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hotel => "hotel",
            Self::TourGuide => "tour guide",
            Self::TravelAgency => "travel agency",
            Self::Vehicle => "vehicle",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "hotel" | "hotels" => Ok(Self::Hotel),
            "tour-guide" | "tour-guides" | "guide" => Ok(Self::TourGuide),
            "travel-agency" | "travel-agencies" | "agency" => Ok(Self::TravelAgency),
            "vehicle" | "vehicles" => Ok(Self::Vehicle),
            _ => Err(UnknownEntityKind(s.to_owned())),
        }
    }
}
