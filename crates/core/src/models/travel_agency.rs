//! Travel agency profile.

use serde::{Deserialize, Serialize};

use super::{ContactInfo, ProviderRecord};
use crate::types::{Coordinates, EntityKind, ServiceProviderId, TravelAgencyId};

/// A travel agency offering packaged services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelAgency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TravelAgencyId>,
    #[serde(default)]
    pub service_provider_id: Option<ServiceProviderId>,
    pub agency_name: String,
    #[serde(default)]
    pub registration_number: String,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub agency_logo: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

impl ProviderRecord for TravelAgency {
    type Id = TravelAgencyId;

    const KIND: EntityKind = EntityKind::TravelAgency;

    fn id(&self) -> Option<TravelAgencyId> {
        self.id
    }

    fn service_provider_id(&self) -> Option<ServiceProviderId> {
        self.service_provider_id
    }

    fn photo_url(&self) -> Option<&str> {
        self.agency_logo.as_deref()
    }
}
