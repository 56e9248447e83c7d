//! Hotel profile.

use serde::{Deserialize, Serialize};

use super::{ContactInfo, ProviderRecord};
use crate::types::{Coordinates, EntityKind, HotelId, ServiceProviderId};

/// A hotel listed by a service provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HotelId>,
    #[serde(default)]
    pub service_provider_id: Option<ServiceProviderId>,
    pub hotel_name: String,
    pub location: String,
    /// `null` when the location was typed rather than picked.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub hotel_photo: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star_rating: Option<u8>,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

impl ProviderRecord for Hotel {
    type Id = HotelId;

    const KIND: EntityKind = EntityKind::Hotel;

    fn id(&self) -> Option<HotelId> {
        self.id
    }

    fn service_provider_id(&self) -> Option<ServiceProviderId> {
        self.service_provider_id
    }

    fn photo_url(&self) -> Option<&str> {
        self.hotel_photo.as_deref()
    }
}
