//! Fleet vehicle wizard.
//!
//! Four steps instead of five: vehicles carry no contact block.

use rust_decimal::Decimal;
use tripnest_core::{Availability, CurrencyCode, Price, ServiceProviderId, Vehicle, VehicleType};

use super::{Draft, PhotoSlot, Step, clean_list, require_photo, require_text};
use crate::error::ValidationError;

/// Seats allowed in one vehicle.
const SEATING_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

/// Form state of the vehicle wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleDraft {
    pub vehicle_type: Option<VehicleType>,
    pub make: String,
    pub model: String,
    pub registration_number: String,
    pub seating_capacity: u32,
    pub price_per_day: Decimal,
    pub currency: CurrencyCode,
    pub with_driver: bool,
    pub availability: Availability,
    pub photo: PhotoSlot,
    pub features: Vec<String>,
}

fn validate_identity(d: &VehicleDraft) -> Result<(), ValidationError> {
    if d.vehicle_type.is_none() {
        return Err(ValidationError::Required("Vehicle type"));
    }
    require_text(&d.make, "Make")?;
    require_text(&d.model, "Model")?;
    require_text(&d.registration_number, "Registration number")
}

fn validate_pricing(d: &VehicleDraft) -> Result<(), ValidationError> {
    if !SEATING_RANGE.contains(&d.seating_capacity) {
        return Err(ValidationError::Invalid {
            field: "Seating capacity",
            reason: format!(
                "must be between {} and {}",
                SEATING_RANGE.start(),
                SEATING_RANGE.end()
            ),
        });
    }
    if d.price_per_day <= Decimal::ZERO {
        return Err(ValidationError::Invalid {
            field: "Price per day",
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn validate_photo(d: &VehicleDraft) -> Result<(), ValidationError> {
    require_photo(&d.photo, "Vehicle photo")
}

// Features are optional.
#[allow(clippy::unnecessary_wraps)]
const fn validate_features(_: &VehicleDraft) -> Result<(), ValidationError> {
    Ok(())
}

impl Draft for VehicleDraft {
    type Record = Vehicle;

    const COMPLETED_ROUTE: &'static str = "/travel-agency/vehicles";

    fn steps() -> Vec<Step<Self>> {
        vec![
            Step {
                title: "Vehicle",
                fields: &["vehicleType", "make", "model", "registrationNumber"],
                validate: validate_identity,
            },
            Step {
                title: "Capacity and pricing",
                fields: &["seatingCapacity", "pricePerDay", "withDriver"],
                validate: validate_pricing,
            },
            Step {
                title: "Photo",
                fields: &["vehiclePhoto"],
                validate: validate_photo,
            },
            Step {
                title: "Features",
                fields: &["features", "availability"],
                validate: validate_features,
            },
        ]
    }

    fn photo(&self) -> &PhotoSlot {
        &self.photo
    }

    fn build_payload(
        &self,
        owner: ServiceProviderId,
        photo_url: Option<String>,
    ) -> Result<Vehicle, ValidationError> {
        let vehicle_type = self
            .vehicle_type
            .ok_or(ValidationError::Required("Vehicle type"))?;

        Ok(Vehicle {
            id: None,
            service_provider_id: Some(owner),
            vehicle_type,
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            registration_number: self.registration_number.trim().to_uppercase(),
            seating_capacity: self.seating_capacity,
            price_per_day: Price::new(self.price_per_day, self.currency),
            availability: self.availability,
            with_driver: self.with_driver,
            vehicle_photo: photo_url,
            features: clean_list(&self.features),
        })
    }

    fn from_record(record: &Vehicle) -> Self {
        Self {
            vehicle_type: Some(record.vehicle_type),
            make: record.make.clone(),
            model: record.model.clone(),
            registration_number: record.registration_number.clone(),
            seating_capacity: record.seating_capacity,
            price_per_day: record.price_per_day.amount,
            currency: record.price_per_day.currency_code,
            with_driver: record.with_driver,
            availability: record.availability,
            photo: PhotoSlot::hosted(record.vehicle_photo.as_deref()),
            features: record.features.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn filled() -> VehicleDraft {
        VehicleDraft {
            vehicle_type: Some(VehicleType::Van),
            make: "Toyota".to_string(),
            model: "KDH 201".to_string(),
            registration_number: "wp pb-4521".to_string(),
            seating_capacity: 14,
            price_per_day: Decimal::new(1_500_000, 2),
            with_driver: true,
            photo: PhotoSlot::hosted(Some("https://img.example/van.jpg")),
            features: vec!["A/C".to_string(), String::new()],
            ..VehicleDraft::default()
        }
    }

    #[test]
    fn test_vehicle_wizard_has_four_steps() {
        assert_eq!(VehicleDraft::steps().len(), 4);
    }

    #[test]
    fn test_vehicle_type_required() {
        let draft = VehicleDraft {
            vehicle_type: None,
            ..filled()
        };
        assert_eq!(
            validate_identity(&draft),
            Err(ValidationError::Required("Vehicle type"))
        );
    }

    #[test]
    fn test_seating_and_price_bounds() {
        let no_seats = VehicleDraft {
            seating_capacity: 0,
            ..filled()
        };
        assert!(validate_pricing(&no_seats).is_err());

        let free = VehicleDraft {
            price_per_day: Decimal::ZERO,
            ..filled()
        };
        assert!(matches!(
            validate_pricing(&free),
            Err(ValidationError::Invalid { field: "Price per day", .. })
        ));

        assert!(validate_pricing(&filled()).is_ok());
    }

    #[test]
    fn test_payload_shape() {
        let payload = filled()
            .build_payload(ServiceProviderId::new(4), Some("https://img.example/van.jpg".to_string()))
            .unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["vehicleType"], "VAN");
        assert_eq!(value["registrationNumber"], "WP PB-4521");
        assert_eq!(value["pricePerDay"]["amount"], json!(15000.0));
        assert_eq!(value["pricePerDay"]["currencyCode"], "LKR");
        assert_eq!(value["availability"], "AVAILABLE");
        assert_eq!(value["features"], json!(["A/C"]));
    }
}
