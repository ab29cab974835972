use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::startup;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::trim_optional;
use crate::models::startup::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/startups",
    tag = "Startups",
    operation_id = "listStartups",
    summary = "List club startups",
    description = "Public. Newest founding year first, then by name.",
    responses((status = 200, description = "All startups", body = Vec<StartupResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_startups(
    State(state): State<AppState>,
) -> Result<Json<Vec<StartupResponse>>, AppError> {
    let startups = startup::Entity::find()
        .order_by_desc(startup::Column::FoundedYear)
        .order_by_asc(startup::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(startups.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/startups/{id}",
    tag = "Startups",
    operation_id = "getStartup",
    summary = "Get a startup by ID",
    params(("id" = i32, Path, description = "Startup ID")),
    responses(
        (status = 200, description = "Startup details", body = StartupResponse),
        (status = 404, description = "Startup not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_startup(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StartupResponse>, AppError> {
    Ok(Json(find_startup(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/startups",
    tag = "Startups",
    operation_id = "createStartup",
    summary = "Add a startup",
    description = "Requires `content:edit` permission.",
    request_body = CreateStartupRequest,
    responses(
        (status = 201, description = "Startup created", body = StartupResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_startup(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateStartupRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_create_startup(&payload)?;

    let now = chrono::Utc::now();
    let model = startup::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        tagline: Set(payload.tagline.trim().to_string()),
        website_url: Set(trim_optional(payload.website_url)),
        founded_year: Set(payload.founded_year),
        logo_url: Set(trim_optional(payload.logo_url)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(StartupResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/startups/{id}",
    tag = "Startups",
    operation_id = "updateStartup",
    summary = "Update a startup",
    description = "PATCH semantics. Requires `content:edit` permission. Changing `logo_url` reclaims the previous logo.",
    params(("id" = i32, Path, description = "Startup ID")),
    request_body = UpdateStartupRequest,
    responses(
        (status = 200, description = "Startup updated", body = StartupResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Startup not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_startup(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateStartupRequest>,
) -> Result<Json<StartupResponse>, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_update_startup(&payload)?;

    let existing = find_startup(&state.db, id).await?;
    if payload == UpdateStartupRequest::default() {
        return Ok(Json(existing.into()));
    }

    let previous_logo = existing.logo_url.clone();
    let mut active: startup::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(tagline) = payload.tagline {
        active.tagline = Set(tagline.trim().to_string());
    }
    if let Some(url) = payload.website_url {
        active.website_url = Set(trim_optional(url));
    }
    if let Some(year) = payload.founded_year {
        active.founded_year = Set(year);
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

#[utoipa::path(
    delete,
    path = "/api/v1/startups/{id}",
    tag = "Startups",
    operation_id = "deleteStartup",
    summary = "Remove a startup",
    description = "Requires `content:delete` permission. The logo is reclaimed in the background.",
    params(("id" = i32, Path, description = "Startup ID")),
    responses(
        (status = 204, description = "Startup deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Startup not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_startup(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:delete")?;

    let existing = find_startup(&state.db, id).await?;
    startup::Entity::delete_by_id(id).exec(&state.db).await?;

    if let Some(url) = existing.logo_url {
        state.reclaimer.reclaim(url);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_startup<C: ConnectionTrait>(db: &C, id: i32) -> Result<startup::Model, AppError> {
    startup::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Startup not found".into()))
}
