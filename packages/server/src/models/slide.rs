use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{
    double_option, validate_optional_position, validate_optional_url, validate_reorder_ids,
    validate_text,
};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSlideRequest {
    #[schema(example = "Hackathon finals")]
    pub title: String,
    pub caption: Option<String>,
    pub image_url: Option<String>,
    /// Appended at the end when omitted.
    pub position: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

pub fn validate_create_slide(payload: &CreateSlideRequest) -> Result<(), AppError> {
    validate_text("Title", &payload.title, 256)?;
    validate_optional_url("Image URL", payload.image_url.as_deref())?;
    validate_optional_position(payload.position)
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateSlideRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub caption: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

pub fn validate_update_slide(payload: &UpdateSlideRequest) -> Result<(), AppError> {
    if let Some(title) = &payload.title {
        validate_text("Title", title, 256)?;
    }
    if let Some(url) = &payload.image_url {
        validate_optional_url("Image URL", url.as_deref())?;
    }
    validate_optional_position(payload.position)
}

/// Full ordering of the carousel.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ReorderSlidesRequest {
    /// Every slide ID, in display order. Positions are assigned by index.
    #[schema(example = json!([3, 1, 2]))]
    pub slide_ids: Vec<i32>,
}

pub fn validate_reorder_slides(payload: &ReorderSlidesRequest) -> Result<(), AppError> {
    validate_reorder_ids(&payload.slide_ids, "slide_id")
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SlideResponse {
    pub id: i32,
    pub title: String,
    pub caption: Option<String>,
    #[schema(example = "http://127.0.0.1:3000/media/slides/0b6f0f0e-8d3c-4d8e-9d7b-6c1f3e2a9b10.png")]
    pub image_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::slide::Model> for SlideResponse {
    fn from(m: crate::entity::slide::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            caption: m.caption,
            image_url: m.image_url,
            position: m.position,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
