use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_optional_url, validate_text};
use crate::error::AppError;

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateSiteConfigRequest {
    pub site_title: Option<String>,
    pub hero_heading: Option<String>,
    pub hero_subheading: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
}

pub fn validate_update_site_config(payload: &UpdateSiteConfigRequest) -> Result<(), AppError> {
    if let Some(title) = &payload.site_title {
        validate_text("Site title", title, 128)?;
    }
    if let Some(heading) = &payload.hero_heading {
        validate_text("Hero heading", heading, 256)?;
    }
    if let Some(sub) = &payload.hero_subheading {
        validate_text("Hero subheading", sub, 512)?;
    }
    if let Some(Some(email)) = &payload.contact_email {
        let email = email.trim();
        if email.len() > 254 || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AppError::Validation("Contact email is not valid".into()));
        }
    }
    if let Some(url) = &payload.logo_url {
        validate_optional_url("Logo URL", url.as_deref())?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SiteConfigResponse {
    #[schema(example = "Startup Club")]
    pub site_title: String,
    pub hero_heading: String,
    pub hero_subheading: String,
    pub contact_email: Option<String>,
    pub logo_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::site_config::Model> for SiteConfigResponse {
    fn from(m: crate::entity::site_config::Model) -> Self {
        Self {
            site_title: m.site_title,
            hero_heading: m.hero_heading,
            hero_subheading: m.hero_subheading,
            contact_email: m.contact_email,
            logo_url: m.logo_url,
            updated_at: m.updated_at,
        }
    }
}
