//! Tour guide profile.

use serde::{Deserialize, Serialize};

use super::{ContactInfo, ProviderRecord};
use crate::types::{Coordinates, EntityKind, ServiceProviderId, TourGuideId};

/// An independent tour guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourGuide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TourGuideId>,
    #[serde(default)]
    pub service_provider_id: Option<ServiceProviderId>,
    pub guide_name: String,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

impl ProviderRecord for TourGuide {
    type Id = TourGuideId;

    const KIND: EntityKind = EntityKind::TourGuide;

    fn id(&self) -> Option<TourGuideId> {
        self.id
    }

    fn service_provider_id(&self) -> Option<ServiceProviderId> {
        self.service_provider_id
    }

    fn photo_url(&self) -> Option<&str> {
        self.profile_photo.as_deref()
    }
}
