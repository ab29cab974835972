use axum::Json;
use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::site_config;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::trim_optional;
use crate::models::site_config::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/site-config",
    tag = "Site Config",
    operation_id = "getSiteConfig",
    summary = "Get the landing page configuration",
    responses(
        (status = 200, description = "Current configuration", body = SiteConfigResponse),
        (status = 404, description = "Not initialized (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_site_config(
    State(state): State<AppState>,
) -> Result<Json<SiteConfigResponse>, AppError> {
    Ok(Json(find_site_config(&state.db).await?.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/site-config",
    tag = "Site Config",
    operation_id = "updateSiteConfig",
    summary = "Update the landing page configuration",
    description = "PATCH semantics. Requires `config:edit` permission. Changing `logo_url` reclaims the previous logo.",
    request_body = UpdateSiteConfigRequest,
    responses(
        (status = 200, description = "Configuration updated", body = SiteConfigResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_site_config(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateSiteConfigRequest>,
) -> Result<Json<SiteConfigResponse>, AppError> {
    auth_user.require_permission("config:edit")?;
    validate_update_site_config(&payload)?;

    let existing = find_site_config(&state.db).await?;
    if payload == UpdateSiteConfigRequest::default() {
        return Ok(Json(existing.into()));
    }

    let previous_logo = existing.logo_url.clone();
    let mut active: site_config::ActiveModel = existing.into();

    if let Some(title) = payload.site_title {
        active.site_title = Set(title.trim().to_string());
    }
    if let Some(heading) = payload.hero_heading {
        active.hero_heading = Set(heading.trim().to_string());
    }
    if let Some(sub) = payload.hero_subheading {
        active.hero_subheading = Set(sub.trim().to_string());
    }
    if let Some(email) = payload.contact_email {
        active.contact_email = Set(trim_optional(email));
    }
    if let Some(url) = payload.logo_url {
        active.logo_url = Set(trim_optional(url));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    state
        .reclaimer
        .reclaim_replaced(previous_logo.as_deref(), model.logo_url.as_deref());

    Ok(Json(model.into()))
}

async fn find_site_config<C: ConnectionTrait>(db: &C) -> Result<site_config::Model, AppError> {
    site_config::Entity::find_by_id(site_config::SINGLETON_ID)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Site configuration not initialized".into()))
}
