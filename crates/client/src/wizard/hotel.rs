//! Hotel profile wizard.

use tripnest_core::{ContactInfo, Coordinates, Hotel, ServiceProviderId};

use super::{Draft, PhotoSlot, Step, clean_list, parse_email, parse_phone, require_photo, require_text};
use crate::error::ValidationError;

/// Form state of the hotel wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelDraft {
    pub hotel_name: String,
    pub location: String,
    /// Set when a place was picked from search rather than typed.
    pub coordinates: Option<Coordinates>,
    pub photo: PhotoSlot,
    pub description: String,
    pub amenities: Vec<String>,
    pub star_rating: Option<u8>,
    pub phone: String,
    pub email: String,
}

fn validate_name(d: &HotelDraft) -> Result<(), ValidationError> {
    require_text(&d.hotel_name, "Hotel name")
}

fn validate_location(d: &HotelDraft) -> Result<(), ValidationError> {
    require_text(&d.location, "Location")
}

fn validate_photo(d: &HotelDraft) -> Result<(), ValidationError> {
    require_photo(&d.photo, "Hotel photo")
}

fn validate_about(d: &HotelDraft) -> Result<(), ValidationError> {
    require_text(&d.description, "Description")?;
    match d.star_rating {
        Some(stars) if !(1..=5).contains(&stars) => Err(ValidationError::Invalid {
            field: "Star rating",
            reason: "must be between 1 and 5".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_contact(d: &HotelDraft) -> Result<(), ValidationError> {
    parse_phone(&d.phone, "Phone number")?;
    parse_email(&d.email, "Email")?;
    Ok(())
}

impl Draft for HotelDraft {
    type Record = Hotel;

    const COMPLETED_ROUTE: &'static str = "/hotel/dashboard";

    fn steps() -> Vec<Step<Self>> {
        vec![
            Step {
                title: "Hotel name",
                fields: &["hotelName"],
                validate: validate_name,
            },
            Step {
                title: "Location",
                fields: &["location", "coordinates"],
                validate: validate_location,
            },
            Step {
                title: "Photo",
                fields: &["hotelPhoto"],
                validate: validate_photo,
            },
            Step {
                title: "About the hotel",
                fields: &["description", "amenities", "starRating"],
                validate: validate_about,
            },
            Step {
                title: "Contact details",
                fields: &["contactInfo.phone", "contactInfo.email"],
                validate: validate_contact,
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
    ) -> Result<Hotel, ValidationError> {
        Ok(Hotel {
            id: None,
            service_provider_id: Some(owner),
            hotel_name: self.hotel_name.trim().to_string(),
            location: self.location.trim().to_string(),
            coordinates: self.coordinates,
            hotel_photo: photo_url,
            description: self.description.trim().to_string(),
            amenities: clean_list(&self.amenities),
            star_rating: self.star_rating,
            contact_info: ContactInfo {
                phone: Some(parse_phone(&self.phone, "Phone number")?),
                email: Some(parse_email(&self.email, "Email")?),
                ..ContactInfo::default()
            },
        })
    }

    fn from_record(record: &Hotel) -> Self {
        Self {
            hotel_name: record.hotel_name.clone(),
            location: record.location.clone(),
            coordinates: record.coordinates,
            photo: PhotoSlot::hosted(record.hotel_photo.as_deref()),
            description: record.description.clone(),
            amenities: record.amenities.clone(),
            star_rating: record.star_rating,
            phone: record
                .contact_info
                .phone
                .as_ref()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            email: record
                .contact_info
                .email
                .as_ref()
                .map(|e| e.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}
