use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::mentor;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::mentor::*;
use crate::models::shared::trim_optional;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/mentors",
    tag = "Mentors",
    operation_id = "listMentors",
    summary = "List mentors",
    description = "Public. Ordered by name.",
    responses((status = 200, description = "All mentors", body = Vec<MentorResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_mentors(
    State(state): State<AppState>,
) -> Result<Json<Vec<MentorResponse>>, AppError> {
    let mentors = mentor::Entity::find()
        .order_by_asc(mentor::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(mentors.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/mentors/{id}",
    tag = "Mentors",
    operation_id = "getMentor",
    summary = "Get a mentor by ID",
    params(("id" = i32, Path, description = "Mentor ID")),
    responses(
        (status = 200, description = "Mentor details", body = MentorResponse),
        (status = 404, description = "Mentor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_mentor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MentorResponse>, AppError> {
    Ok(Json(find_mentor(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/mentors",
    tag = "Mentors",
    operation_id = "createMentor",
    summary = "Add a mentor",
    description = "Requires `content:edit` permission.",
    request_body = CreateMentorRequest,
    responses(
        (status = 201, description = "Mentor created", body = MentorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_mentor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateMentorRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_create_mentor(&payload)?;

    let now = chrono::Utc::now();
    let model = mentor::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        expertise: Set(payload.expertise.trim().to_string()),
        company: Set(trim_optional(payload.company)),
        bio: Set(trim_optional(payload.bio)),
        photo_url: Set(trim_optional(payload.photo_url)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(MentorResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/mentors/{id}",
    tag = "Mentors",
    operation_id = "updateMentor",
    summary = "Update a mentor",
    description = "PATCH semantics. Requires `content:edit` permission. Changing `photo_url` reclaims the previous photo.",
    params(("id" = i32, Path, description = "Mentor ID")),
    request_body = UpdateMentorRequest,
    responses(
        (status = 200, description = "Mentor updated", body = MentorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mentor not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_mentor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateMentorRequest>,
) -> Result<Json<MentorResponse>, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_update_mentor(&payload)?;

    let existing = find_mentor(&state.db, id).await?;
    if payload == UpdateMentorRequest::default() {
        return Ok(Json(existing.into()));
    }

    let previous_photo = existing.photo_url.clone();
    let mut active: mentor::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(expertise) = payload.expertise {
        active.expertise = Set(expertise.trim().to_string());
    }
    if let Some(company) = payload.company {
        active.company = Set(trim_optional(company));
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(trim_optional(bio));
    }
    if let Some(url) = payload.photo_url {
        active.photo_url = Set(trim_optional(url));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    state
        .reclaimer
        .reclaim_replaced(previous_photo.as_deref(), model.photo_url.as_deref());

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/mentors/{id}",
    tag = "Mentors",
    operation_id = "deleteMentor",
    summary = "Remove a mentor",
    description = "Requires `content:delete` permission. The photo is reclaimed in the background.",
    params(("id" = i32, Path, description = "Mentor ID")),
    responses(
        (status = 204, description = "Mentor deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Mentor not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_mentor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:delete")?;

    let existing = find_mentor(&state.db, id).await?;
    mentor::Entity::delete_by_id(id).exec(&state.db).await?;

    if let Some(url) = existing.photo_url {
        state.reclaimer.reclaim(url);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_mentor<C: ConnectionTrait>(db: &C, id: i32) -> Result<mentor::Model, AppError> {
    mentor::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Mentor not found".into()))
}
