use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_optional_url, validate_text};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateMentorRequest {
    #[schema(example = "Linus Torvalds")]
    pub name: String,
    #[schema(example = "Operating systems")]
    pub expertise: String,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

pub fn validate_create_mentor(payload: &CreateMentorRequest) -> Result<(), AppError> {
    validate_text("Name", &payload.name, 128)?;
    validate_text("Expertise", &payload.expertise, 256)?;
    validate_optional_url("Photo URL", payload.photo_url.as_deref())
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateMentorRequest {
    pub name: Option<String>,
    pub expertise: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub photo_url: Option<Option<String>>,
}

pub fn validate_update_mentor(payload: &UpdateMentorRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_text("Name", name, 128)?;
    }
    if let Some(expertise) = &payload.expertise {
        validate_text("Expertise", expertise, 256)?;
    }
    if let Some(url) = &payload.photo_url {
        validate_optional_url("Photo URL", url.as_deref())?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MentorResponse {
    pub id: i32,
    pub name: String,
    pub expertise: String,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::mentor::Model> for MentorResponse {
    fn from(m: crate::entity::mentor::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            expertise: m.expertise,
            company: m.company,
            bio: m.bio,
            photo_url: m.photo_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
