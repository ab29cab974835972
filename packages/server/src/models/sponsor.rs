use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_optional_position, validate_optional_url, validate_text};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSponsorRequest {
    #[schema(example = "Initech")]
    pub name: String,
    #[schema(example = "gold")]
    pub tier: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub position: Option<i32>,
}

pub fn validate_create_sponsor(payload: &CreateSponsorRequest) -> Result<(), AppError> {
    validate_text("Name", &payload.name, 128)?;
    validate_text("Tier", &payload.tier, 32)?;
    validate_optional_url("Website URL", payload.website_url.as_deref())?;
    validate_optional_url("Logo URL", payload.logo_url.as_deref())?;
    validate_optional_position(payload.position)
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateSponsorRequest {
    pub name: Option<String>,
    pub tier: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub website_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    pub position: Option<i32>,
}

pub fn validate_update_sponsor(payload: &UpdateSponsorRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_text("Name", name, 128)?;
    }
    if let Some(tier) = &payload.tier {
        validate_text("Tier", tier, 32)?;
    }
    if let Some(url) = &payload.website_url {
        validate_optional_url("Website URL", url.as_deref())?;
    }
    if let Some(url) = &payload.logo_url {
        validate_optional_url("Logo URL", url.as_deref())?;
    }
    validate_optional_position(payload.position)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SponsorResponse {
    pub id: i32,
    pub name: String,
    pub tier: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::sponsor::Model> for SponsorResponse {
    fn from(m: crate::entity::sponsor::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            tier: m.tier,
            website_url: m.website_url,
            logo_url: m.logo_url,
            position: m.position,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
