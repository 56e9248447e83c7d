//! Travel agency profile wizard.

use tripnest_core::{ContactInfo, Coordinates, ServiceProviderId, TravelAgency};

use super::{
    Draft, PhotoSlot, Step, clean_list, parse_email, parse_optional_phone, parse_phone,
    require_photo, require_text,
};
use crate::error::ValidationError;

/// Form state of the travel agency wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TravelAgencyDraft {
    pub agency_name: String,
    pub registration_number: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub logo: PhotoSlot,
    pub description: String,
    pub services: Vec<String>,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub website: String,
}

fn validate_identity(d: &TravelAgencyDraft) -> Result<(), ValidationError> {
    require_text(&d.agency_name, "Agency name")?;
    require_text(&d.registration_number, "Registration number")
}

fn validate_location(d: &TravelAgencyDraft) -> Result<(), ValidationError> {
    require_text(&d.location, "Location")
}

fn validate_logo(d: &TravelAgencyDraft) -> Result<(), ValidationError> {
    require_photo(&d.logo, "Agency logo")
}

fn validate_offering(d: &TravelAgencyDraft) -> Result<(), ValidationError> {
    require_text(&d.description, "Description")?;
    if clean_list(&d.services).is_empty() {
        return Err(ValidationError::Required("At least one service"));
    }
    Ok(())
}

fn validate_contact(d: &TravelAgencyDraft) -> Result<(), ValidationError> {
    parse_phone(&d.phone, "Phone number")?;
    parse_optional_phone(&d.whatsapp, "WhatsApp number")?;
    parse_email(&d.email, "Email")?;
    website(&d.website).map(|_| ())
}

/// Optional website; must be an absolute http(s) URL when given.
fn website(value: &str) -> Result<Option<String>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(Some(value.to_string())),
        _ => Err(ValidationError::Invalid {
            field: "Website",
            reason: "must start with http:// or https://".to_string(),
        }),
    }
}

impl Draft for TravelAgencyDraft {
    type Record = TravelAgency;

    const COMPLETED_ROUTE: &'static str = "/travel-agency/dashboard";

    fn steps() -> Vec<Step<Self>> {
        vec![
            Step {
                title: "Agency details",
                fields: &["agencyName", "registrationNumber"],
                validate: validate_identity,
            },
            Step {
                title: "Location",
                fields: &["location", "coordinates"],
                validate: validate_location,
            },
            Step {
                title: "Logo",
                fields: &["agencyLogo"],
                validate: validate_logo,
            },
            Step {
                title: "Services",
                fields: &["description", "services"],
                validate: validate_offering,
            },
            Step {
                title: "Contact details",
                fields: &[
                    "contactInfo.phone",
                    "contactInfo.whatsapp",
                    "contactInfo.email",
                    "contactInfo.website",
                ],
                validate: validate_contact,
            },
        ]
    }

    fn photo(&self) -> &PhotoSlot {
        &self.logo
    }

    fn build_payload(
        &self,
        owner: ServiceProviderId,
        photo_url: Option<String>,
    ) -> Result<TravelAgency, ValidationError> {
        Ok(TravelAgency {
            id: None,
            service_provider_id: Some(owner),
            agency_name: self.agency_name.trim().to_string(),
            registration_number: self.registration_number.trim().to_string(),
            location: self.location.trim().to_string(),
            coordinates: self.coordinates,
            services: clean_list(&self.services),
            agency_logo: photo_url,
            description: self.description.trim().to_string(),
            contact_info: ContactInfo {
                phone: Some(parse_phone(&self.phone, "Phone number")?),
                whatsapp: parse_optional_phone(&self.whatsapp, "WhatsApp number")?,
                email: Some(parse_email(&self.email, "Email")?),
                website: website(&self.website)?,
            },
        })
    }

    fn from_record(record: &TravelAgency) -> Self {
        let contact = &record.contact_info;
        Self {
            agency_name: record.agency_name.clone(),
            registration_number: record.registration_number.clone(),
            location: record.location.clone(),
            coordinates: record.coordinates,
            logo: PhotoSlot::hosted(record.agency_logo.as_deref()),
            description: record.description.clone(),
            services: record.services.clone(),
            phone: contact.phone.as_ref().map(ToString::to_string).unwrap_or_default(),
            whatsapp: contact.whatsapp.as_ref().map(ToString::to_string).unwrap_or_default(),
            email: contact.email.as_ref().map(ToString::to_string).unwrap_or_default(),
            website: contact.website.clone().unwrap_or_default(),
        }
    }
}
