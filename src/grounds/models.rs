use chrono::{DateTime, Utc};
use url::Url;

use crate::cache::Cache;
use crate::errors::ServiceError;
use crate::validator::Validate;

lazy_static! {
    /// Categories are machine-readable slugs ("football_turf", "cricket_net"),
    /// the display name lives client side.
    static ref CATEGORY_SLUG: regex::Regex = regex::Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub category: String,
    pub media: Vec<String>,
    /// Owner-level switch. A closed ground lists no availability and
    /// rejects new reservations, existing bookings are left alone.
    pub availability: bool,
    pub owner_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGround {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default = "default_availability")]
    pub availability: bool,
    /// Always taken from the authenticated caller, never from the payload.
    #[serde(skip)]
    pub owner_id: i64,
}

fn default_availability() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGround {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub media: Option<Vec<String>>,
    pub availability: Option<bool>,
}

impl UpdateGround {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.media.is_none()
            && self.availability.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub owner_id: Option<i64>,
}

impl Cache for Ground {
    fn cache_key<T: std::fmt::Display>(id: T) -> String {
        format!("ground.{}", id)
    }
}

impl Validate<CreateGround> for CreateGround {
    fn validate(&self) -> Result<(), ServiceError> {
        validate_name(&self.name)?;
        validate_location(&self.location)?;
        validate_category(&self.category)?;
        validate_media(&self.media)?;

        Ok(())
    }
}

impl Validate<UpdateGround> for UpdateGround {
    fn validate(&self) -> Result<(), ServiceError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        if let Some(location) = &self.location {
            validate_location(location)?;
        }

        if let Some(category) = &self.category {
            validate_category(category)?;
        }

        if let Some(media) = &self.media {
            validate_media(media)?;
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        bad_request!("the ground name should not be empty");
    }

    if name.len() > 60 {
        bad_request!("the ground name should not exceed 60 characters");
    }

    Ok(())
}

fn validate_location(location: &str) -> Result<(), ServiceError> {
    if location.trim().is_empty() {
        bad_request!("the ground location should not be empty");
    }

    if location.len() > 120 {
        bad_request!("the ground location should not exceed 120 characters");
    }

    Ok(())
}

fn validate_category(category: &str) -> Result<(), ServiceError> {
    if !CATEGORY_SLUG.is_match(category) {
        bad_request!("the category should be a lowercase slug, e.g. football_turf");
    }

    Ok(())
}

fn validate_media(media: &[String]) -> Result<(), ServiceError> {
    for item in media {
        if Url::parse(item).is_err() {
            bad_request!(format!("invalid media url: {}", item));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;

    fn ground() -> CreateGround {
        CreateGround {
            name: String::from("City Arena"),
            location: String::from("12 Ring Road, Pune"),
            description: None,
            category: String::from("football_turf"),
            media: vec![String::from("https://img.example.com/arena.jpg")],
            availability: true,
            owner_id: 1,
        }
    }

    #[test]
    fn validates_a_sane_ground() {
        assert!(Validator::new(ground()).validate().is_ok());
    }

    #[test]
    fn rejects_blank_names_and_locations() {
        let mut blank_name = ground();
        blank_name.name = String::from("   ");
        assert!(Validator::new(blank_name).validate().is_err());

        let mut blank_location = ground();
        blank_location.location = String::new();
        assert!(Validator::new(blank_location).validate().is_err());
    }

    #[test]
    fn rejects_bad_category_slugs() {
        for bad in &["Football Turf", "FOOTBALL", "9lives", ""] {
            let mut ground = ground();
            ground.category = String::from(*bad);
            assert!(Validator::new(ground).validate().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn rejects_media_that_is_not_a_url() {
        let mut ground = ground();
        ground.media.push(String::from("not a url"));
        assert!(Validator::new(ground).validate().is_err());
    }

    #[test]
    fn partial_updates_only_validate_present_fields() {
        let changes = UpdateGround {
            availability: Some(false),
            ..UpdateGround::default()
        };
        assert!(changes.validate().is_ok());

        let changes = UpdateGround {
            category: Some(String::from("Not A Slug")),
            ..UpdateGround::default()
        };
        assert!(changes.validate().is_err());
    }
}
