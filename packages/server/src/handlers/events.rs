use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::event;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::event::*;
use crate::models::shared::trim_optional;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    operation_id = "listEvents",
    summary = "List events",
    description = "Public. Featured events first, then by start time, newest first.",
    responses((status = 200, description = "All events", body = Vec<EventResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = event::Entity::find()
        .order_by_desc(event::Column::IsFeatured)
        .order_by_desc(event::Column::StartsAt)
        .all(&state.db)
        .await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    operation_id = "getEvent",
    summary = "Get an event by ID",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EventResponse>, AppError> {
    Ok(Json(find_event(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    operation_id = "createEvent",
    summary = "Create an event",
    description = "Requires `content:edit` permission.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_create_event(&payload)?;

    let now = chrono::Utc::now();
    let model = event::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        location: Set(trim_optional(payload.location)),
        starts_at: Set(payload.starts_at),
        registration_url: Set(trim_optional(payload.registration_url)),
        image_url: Set(trim_optional(payload.image_url)),
        is_featured: Set(payload.is_featured),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    tag = "Events",
    operation_id = "updateEvent",
    summary = "Update an event",
    description = "PATCH semantics. Requires `content:edit` permission. Changing `image_url` reclaims the previously referenced object.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_update_event(&payload)?;

    let existing = find_event(&state.db, id).await?;
    if payload == UpdateEventRequest::default() {
        return Ok(Json(existing.into()));
    }

    let previous_image = existing.image_url.clone();
    let mut active: event::ActiveModel = existing.into();

    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(location) = payload.location {
        active.location = Set(trim_optional(location));
    }
    if let Some(starts_at) = payload.starts_at {
        active.starts_at = Set(starts_at);
    }
    if let Some(url) = payload.registration_url {
        active.registration_url = Set(trim_optional(url));
    }
    if let Some(url) = payload.image_url {
        active.image_url = Set(trim_optional(url));
    }
    if let Some(featured) = payload.is_featured {
        active.is_featured = Set(featured);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    state
        .reclaimer
        .reclaim_replaced(previous_image.as_deref(), model.image_url.as_deref());

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    operation_id = "deleteEvent",
    summary = "Delete an event",
    description = "Requires `content:delete` permission. The event's image is reclaimed in the background.",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:delete")?;

    let existing = find_event(&state.db, id).await?;
    event::Entity::delete_by_id(id).exec(&state.db).await?;

    if let Some(url) = existing.image_url {
        state.reclaimer.reclaim(url);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_event<C: ConnectionTrait>(db: &C, id: i32) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}
