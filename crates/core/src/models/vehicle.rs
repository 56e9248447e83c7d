//! Fleet vehicle.

use serde::{Deserialize, Serialize};

use super::ProviderRecord;
use crate::types::{Availability, EntityKind, Price, ServiceProviderId, VehicleId, VehicleType};

/// A vehicle in a travel agency's fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VehicleId>,
    #[serde(default)]
    pub service_provider_id: Option<ServiceProviderId>,
    pub vehicle_type: VehicleType,
    pub make: String,
    pub model: String,
    pub registration_number: String,
    pub seating_capacity: u32,
    pub price_per_day: Price,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub with_driver: bool,
    #[serde(default)]
    pub vehicle_photo: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl ProviderRecord for Vehicle {
    type Id = VehicleId;

    const KIND: EntityKind = EntityKind::Vehicle;

    fn id(&self) -> Option<VehicleId> {
        self.id
    }

    fn service_provider_id(&self) -> Option<ServiceProviderId> {
        self.service_provider_id
    }

    fn photo_url(&self) -> Option<&str> {
        self.vehicle_photo.as_deref()
    }
}
