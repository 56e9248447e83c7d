//! Tour guide profile wizard.

use tripnest_core::{ContactInfo, Coordinates, Email, ServiceProviderId, TourGuide};

use super::{
    Draft, PhotoSlot, Step, clean_list, parse_email, parse_phone, require_photo, require_text,
};
use crate::error::ValidationError;

/// Longest career a guide can claim.
const MAX_EXPERIENCE_YEARS: u32 = 70;

/// Form state of the tour guide wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourGuideDraft {
    pub guide_name: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub languages: Vec<String>,
    pub experience_years: u32,
    pub photo: PhotoSlot,
    pub bio: String,
    pub phone: String,
    pub whatsapp: String,
    /// Optional.
    pub email: String,
}

fn validate_identity(d: &TourGuideDraft) -> Result<(), ValidationError> {
    require_text(&d.guide_name, "Guide name")?;
    require_text(&d.location, "Location")
}

fn validate_skills(d: &TourGuideDraft) -> Result<(), ValidationError> {
    if clean_list(&d.languages).is_empty() {
        return Err(ValidationError::Required("At least one language"));
    }
    if d.experience_years > MAX_EXPERIENCE_YEARS {
        return Err(ValidationError::Invalid {
            field: "Experience",
            reason: format!("must be at most {MAX_EXPERIENCE_YEARS} years"),
        });
    }
    Ok(())
}

fn validate_photo(d: &TourGuideDraft) -> Result<(), ValidationError> {
    require_photo(&d.photo, "Profile photo")
}

fn validate_bio(d: &TourGuideDraft) -> Result<(), ValidationError> {
    require_text(&d.bio, "Bio")
}

fn validate_contact(d: &TourGuideDraft) -> Result<(), ValidationError> {
    parse_phone(&d.phone, "Phone number")?;
    parse_phone(&d.whatsapp, "WhatsApp number")?;
    optional_email(&d.email).map(|_| ())
}

fn optional_email(value: &str) -> Result<Option<Email>, ValidationError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_email(value, "Email").map(Some)
}

impl Draft for TourGuideDraft {
    type Record = TourGuide;

    const COMPLETED_ROUTE: &'static str = "/tour-guide/dashboard";

    fn steps() -> Vec<Step<Self>> {
        vec![
            Step {
                title: "About you",
                fields: &["guideName", "location", "coordinates"],
                validate: validate_identity,
            },
            Step {
                title: "Languages and experience",
                fields: &["languages", "experienceYears"],
                validate: validate_skills,
            },
            Step {
                title: "Profile photo",
                fields: &["profilePhoto"],
                validate: validate_photo,
            },
            Step {
                title: "Bio",
                fields: &["bio"],
                validate: validate_bio,
            },
            Step {
                title: "Contact details",
                fields: &["contactInfo.phone", "contactInfo.whatsapp", "contactInfo.email"],
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
    ) -> Result<TourGuide, ValidationError> {
        Ok(TourGuide {
            id: None,
            service_provider_id: Some(owner),
            guide_name: self.guide_name.trim().to_string(),
            location: self.location.trim().to_string(),
            coordinates: self.coordinates,
            languages: clean_list(&self.languages),
            experience_years: self.experience_years,
            profile_photo: photo_url,
            bio: self.bio.trim().to_string(),
            contact_info: ContactInfo {
                phone: Some(parse_phone(&self.phone, "Phone number")?),
                whatsapp: Some(parse_phone(&self.whatsapp, "WhatsApp number")?),
                email: optional_email(&self.email)?,
                website: None,
            },
        })
    }

    fn from_record(record: &TourGuide) -> Self {
        let contact = &record.contact_info;
        Self {
            guide_name: record.guide_name.clone(),
            location: record.location.clone(),
            coordinates: record.coordinates,
            languages: record.languages.clone(),
            experience_years: record.experience_years,
            photo: PhotoSlot::hosted(record.profile_photo.as_deref()),
            bio: record.bio.clone(),
            phone: contact.phone.as_ref().map(ToString::to_string).unwrap_or_default(),
            whatsapp: contact.whatsapp.as_ref().map(ToString::to_string).unwrap_or_default(),
            email: contact.email.as_ref().map(ToString::to_string).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> TourGuideDraft {
        TourGuideDraft {
            guide_name: "Nimal Perera".to_string(),
            location: "Kandy".to_string(),
            languages: vec!["English".to_string(), "Sinhala".to_string()],
            experience_years: 8,
            bio: "Hill country specialist".to_string(),
            phone: "0771234567".to_string(),
            whatsapp: "+94 77 123 4567".to_string(),
            ..TourGuideDraft::default()
        }
    }

    #[test]
    fn test_every_step_passes_for_complete_draft() {
        let mut draft = filled();
        draft.photo = PhotoSlot::hosted(Some("https://img.example/g.jpg"));
        for step in TourGuideDraft::steps() {
            assert!((step.validate)(&draft).is_ok(), "{} failed", step.title);
        }
    }

    #[test]
    fn test_languages_required() {
        let draft = TourGuideDraft {
            languages: vec![" ".to_string()],
            ..filled()
        };
        assert_eq!(
            validate_skills(&draft),
            Err(ValidationError::Required("At least one language"))
        );
    }

    #[test]
    fn test_whatsapp_required() {
        let draft = TourGuideDraft {
            whatsapp: String::new(),
            ..filled()
        };
        assert_eq!(
            validate_contact(&draft),
            Err(ValidationError::Required("WhatsApp number"))
        );
    }

    #[test]
    fn test_blank_email_is_omitted() {
        let payload = filled()
            .build_payload(ServiceProviderId::new(2), None)
            .unwrap();
        assert_eq!(payload.contact_info.email, None);
        assert_eq!(
            payload.contact_info.whatsapp.unwrap().as_str(),
            "+94771234567"
        );
        assert_eq!(payload.languages, vec!["English", "Sinhala"]);
    }
}
