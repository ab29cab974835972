use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_optional_url, validate_text};
use crate::error::AppError;

/// Request body for creating an event.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Demo Day 2026")]
    pub title: String,
    /// Markdown description.
    pub description: String,
    #[schema(example = "Main auditorium")]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub registration_url: Option<String>,
    /// URL returned by a previous upload to the `event-images` bucket.
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

pub fn validate_create_event(payload: &CreateEventRequest) -> Result<(), AppError> {
    validate_text("Title", &payload.title, 256)?;
    validate_optional_url("Registration URL", payload.registration_url.as_deref())?;
    validate_optional_url("Image URL", payload.image_url.as_deref())?;
    Ok(())
}

/// Request body for partially updating an event. Absent fields are left alone;
/// nullable fields accept `null` to clear them.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub registration_url: Option<Option<String>>,
    /// Replacing or clearing the image reclaims the previous object.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub is_featured: Option<bool>,
}

pub fn validate_update_event(payload: &UpdateEventRequest) -> Result<(), AppError> {
    if let Some(title) = &payload.title {
        validate_text("Title", title, 256)?;
    }
    if let Some(url) = &payload.registration_url {
        validate_optional_url("Registration URL", url.as_deref())?;
    }
    if let Some(url) = &payload.image_url {
        validate_optional_url("Image URL", url.as_deref())?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    #[schema(example = 1)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub registration_url: Option<String>,
    #[schema(example = "http://127.0.0.1:3000/media/event-images/6f1c2b1e-3f4a-4c55-9b8e-0d1f2a3b4c5d.jpg")]
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::event::Model> for EventResponse {
    fn from(m: crate::entity::event::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            location: m.location,
            starts_at: m.starts_at,
            registration_url: m.registration_url,
            image_url: m.image_url,
            is_featured: m.is_featured,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
