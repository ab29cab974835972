use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::sponsor;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::trim_optional;
use crate::models::sponsor::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/sponsors",
    tag = "Sponsors",
    operation_id = "listSponsors",
    summary = "List sponsors",
    description = "Public. Ordered by position.",
    responses((status = 200, description = "All sponsors", body = Vec<SponsorResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_sponsors(
    State(state): State<AppState>,
) -> Result<Json<Vec<SponsorResponse>>, AppError> {
    let sponsors = sponsor::Entity::find()
        .order_by_asc(sponsor::Column::Position)
        .order_by_asc(sponsor::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(sponsors.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/sponsors/{id}",
    tag = "Sponsors",
    operation_id = "getSponsor",
    summary = "Get a sponsor by ID",
    params(("id" = i32, Path, description = "Sponsor ID")),
    responses(
        (status = 200, description = "Sponsor details", body = SponsorResponse),
        (status = 404, description = "Sponsor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_sponsor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SponsorResponse>, AppError> {
    Ok(Json(find_sponsor(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/sponsors",
    tag = "Sponsors",
    operation_id = "createSponsor",
    summary = "Add a sponsor",
    description = "Requires `content:edit` permission. Position is auto-assigned if omitted.",
    request_body = CreateSponsorRequest,
    responses(
        (status = 201, description = "Sponsor created", body = SponsorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_sponsor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSponsorRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_create_sponsor(&payload)?;

    let position = match payload.position {
        Some(p) => p,
        None => next_position(&state.db).await?,
    };

    let now = chrono::Utc::now();
    let model = sponsor::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        tier: Set(payload.tier.trim().to_lowercase()),
        website_url: Set(trim_optional(payload.website_url)),
        logo_url: Set(trim_optional(payload.logo_url)),
        position: Set(position),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(SponsorResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/sponsors/{id}",
    tag = "Sponsors",
    operation_id = "updateSponsor",
    summary = "Update a sponsor",
    description = "PATCH semantics. Requires `content:edit` permission. Changing `logo_url` reclaims the previous logo.",
    params(("id" = i32, Path, description = "Sponsor ID")),
    request_body = UpdateSponsorRequest,
    responses(
        (status = 200, description = "Sponsor updated", body = SponsorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sponsor not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_sponsor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateSponsorRequest>,
) -> Result<Json<SponsorResponse>, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_update_sponsor(&payload)?;

    let existing = find_sponsor(&state.db, id).await?;
    if payload == UpdateSponsorRequest::default() {
        return Ok(Json(existing.into()));
    }

    let previous_logo = existing.logo_url.clone();
    let mut active: sponsor::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(tier) = payload.tier {
        active.tier = Set(tier.trim().to_lowercase());
    }
    if let Some(url) = payload.website_url {
        active.website_url = Set(trim_optional(url));
    }
    if let Some(url) = payload.logo_url {
        active.logo_url = Set(trim_optional(url));
    }
    if let Some(position) = payload.position {
        active.position = Set(position);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    state
        .reclaimer
        .reclaim_replaced(previous_logo.as_deref(), model.logo_url.as_deref());

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sponsors/{id}",
    tag = "Sponsors",
    operation_id = "deleteSponsor",
    summary = "Remove a sponsor",
    description = "Requires `content:delete` permission. The logo is reclaimed in the background.",
    params(("id" = i32, Path, description = "Sponsor ID")),
    responses(
        (status = 204, description = "Sponsor deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Sponsor not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_sponsor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:delete")?;

    let existing = find_sponsor(&state.db, id).await?;
    sponsor::Entity::delete_by_id(id).exec(&state.db).await?;

    if let Some(url) = existing.logo_url {
        state.reclaimer.reclaim(url);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_sponsor<C: ConnectionTrait>(db: &C, id: i32) -> Result<sponsor::Model, AppError> {
    sponsor::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sponsor not found".into()))
}

async fn next_position<C: ConnectionTrait>(db: &C) -> Result<i32, AppError> {
    let max_pos: Option<i32> = sponsor::Entity::find()
        .select_only()
        .column_as(sponsor::Column::Position.max(), "max_pos")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_pos
        .unwrap_or(-1)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Position overflow".into()))
}
