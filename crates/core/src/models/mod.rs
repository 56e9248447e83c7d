//! Records exchanged with the marketplace API.
//!
//! The same struct serves as the outgoing create/update payload and as the
//! record the server returns: `id` is absent on create and filled in by the
//! server.

pub mod hotel;
pub mod tour_guide;
pub mod travel_agency;
pub mod vehicle;

pub use hotel::Hotel;
pub use tour_guide::TourGuide;
pub use travel_agency::TravelAgency;
pub use vehicle::Vehicle;

use core::fmt::{Debug, Display};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::types::{Email, EntityKind, PhoneNumber, ServiceProviderId};

/// A record owned by a service provider.
pub trait ProviderRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Typed identifier of the record.
    type Id: Copy + Debug + Display + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Which entity kind this record is.
    const KIND: EntityKind;

    /// Server-assigned id, absent before creation.
    fn id(&self) -> Option<Self::Id>;

    /// Owning service provider, if the server reported one.
    fn service_provider_id(&self) -> Option<ServiceProviderId>;

    /// Hosted URL of the record's image, if any.
    fn photo_url(&self) -> Option<&str>;
}

/// Contact block shared by provider profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<PhoneNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}
