//! Status enums for fleet vehicles.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vehicle category offered by a travel agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Car,
    Van,
    Suv,
    Bus,
    TukTuk,
    Motorbike,
}

impl VehicleType {
    /// Wire name used in query paths (`/by-type/{type}`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Car => "CAR",
            Self::Van => "VAN",
            Self::Suv => "SUV",
            Self::Bus => "BUS",
            Self::TukTuk => "TUK_TUK",
            Self::Motorbike => "MOTORBIKE",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "CAR" => Ok(Self::Car),
            "VAN" => Ok(Self::Van),
            "SUV" => Ok(Self::Suv),
            "BUS" => Ok(Self::Bus),
            "TUK_TUK" | "TUKTUK" => Ok(Self::TukTuk),
            "MOTORBIKE" => Ok(Self::Motorbike),
            _ => Err(format!("Unknown vehicle type: {s}")),
        }
    }
}

/// Whether a vehicle can currently be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    #[default]
    Available,
    Booked,
    Maintenance,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_from_str_is_lenient() {
        assert_eq!("tuk-tuk".parse::<VehicleType>().unwrap(), VehicleType::TukTuk);
        assert_eq!("Van".parse::<VehicleType>().unwrap(), VehicleType::Van);
        assert!("boat".parse::<VehicleType>().is_err());
    }

    #[test]
    fn test_vehicle_type_wire_name_matches_serde() {
        let json = serde_json::to_string(&VehicleType::TukTuk).unwrap();
        assert_eq!(json, format!("\"{}\"", VehicleType::TukTuk.as_str()));
    }
}
