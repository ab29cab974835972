use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_optional_url, validate_text};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateStartupRequest {
    #[schema(example = "Acme Robotics")]
    pub name: String,
    #[schema(example = "Warehouse robots for everyone")]
    pub tagline: String,
    pub website_url: Option<String>,
    #[schema(example = 2024)]
    pub founded_year: Option<i32>,
    pub logo_url: Option<String>,
}

fn validate_founded_year(year: Option<i32>) -> Result<(), AppError> {
    if let Some(year) = year
        && !(1900..=2100).contains(&year)
    {
        return Err(AppError::Validation(
            "Founded year must be between 1900 and 2100".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_startup(payload: &CreateStartupRequest) -> Result<(), AppError> {
    validate_text("Name", &payload.name, 128)?;
    validate_text("Tagline", &payload.tagline, 256)?;
    validate_optional_url("Website URL", payload.website_url.as_deref())?;
    validate_optional_url("Logo URL", payload.logo_url.as_deref())?;
    validate_founded_year(payload.founded_year)
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateStartupRequest {
    pub name: Option<String>,
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub website_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub founded_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
}

pub fn validate_update_startup(payload: &UpdateStartupRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_text("Name", name, 128)?;
    }
    if let Some(tagline) = &payload.tagline {
        validate_text("Tagline", tagline, 256)?;
    }
    if let Some(url) = &payload.website_url {
        validate_optional_url("Website URL", url.as_deref())?;
    }
    if let Some(url) = &payload.logo_url {
        validate_optional_url("Logo URL", url.as_deref())?;
    }
    if let Some(year) = payload.founded_year {
        validate_founded_year(year)?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StartupResponse {
    pub id: i32,
    pub name: String,
    pub tagline: String,
    pub website_url: Option<String>,
    pub founded_year: Option<i32>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::startup::Model> for StartupResponse {
    fn from(m: crate::entity::startup::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            tagline: m.tagline,
            website_url: m.website_url,
            founded_year: m.founded_year,
            logo_url: m.logo_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
