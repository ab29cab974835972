use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_optional_position, validate_optional_url, validate_text};
use crate::error::AppError;

/// Request body for adding an important member.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateMemberRequest {
    #[schema(example = "Grace Hopper")]
    pub name: String,
    #[schema(example = "President")]
    pub role_title: String,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub avatar_url: Option<String>,
    /// Appended at the end when omitted.
    pub position: Option<i32>,
}

pub fn validate_create_member(payload: &CreateMemberRequest) -> Result<(), AppError> {
    validate_text("Name", &payload.name, 128)?;
    validate_text("Role title", &payload.role_title, 128)?;
    validate_optional_url("LinkedIn URL", payload.linkedin_url.as_deref())?;
    validate_optional_url("Avatar URL", payload.avatar_url.as_deref())?;
    validate_optional_position(payload.position)
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub role_title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub linkedin_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub avatar_url: Option<Option<String>>,
    pub position: Option<i32>,
}

pub fn validate_update_member(payload: &UpdateMemberRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_text("Name", name, 128)?;
    }
    if let Some(title) = &payload.role_title {
        validate_text("Role title", title, 128)?;
    }
    if let Some(url) = &payload.linkedin_url {
        validate_optional_url("LinkedIn URL", url.as_deref())?;
    }
    if let Some(url) = &payload.avatar_url {
        validate_optional_url("Avatar URL", url.as_deref())?;
    }
    validate_optional_position(payload.position)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MemberResponse {
    pub id: i32,
    pub name: String,
    pub role_title: String,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,
    pub avatar_url: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::member::Model> for MemberResponse {
    fn from(m: crate::entity::member::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            role_title: m.role_title,
            bio: m.bio,
            linkedin_url: m.linkedin_url,
            avatar_url: m.avatar_url,
            position: m.position,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
