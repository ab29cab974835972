use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::slide;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::trim_optional;
use crate::models::slide::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/slides",
    tag = "Slides",
    operation_id = "listSlides",
    summary = "List year-in-review slides",
    description = "Public. Ordered by position; inactive slides are included with `is_active = false`.",
    responses((status = 200, description = "All slides", body = Vec<SlideResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_slides(State(state): State<AppState>) -> Result<Json<Vec<SlideResponse>>, AppError> {
    let slides = slide::Entity::find()
        .order_by_asc(slide::Column::Position)
        .order_by_asc(slide::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(slides.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/slides/{id}",
    tag = "Slides",
    operation_id = "getSlide",
    summary = "Get a slide by ID",
    params(("id" = i32, Path, description = "Slide ID")),
    responses(
        (status = 200, description = "Slide details", body = SlideResponse),
        (status = 404, description = "Slide not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_slide(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SlideResponse>, AppError> {
    Ok(Json(find_slide(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/slides",
    tag = "Slides",
    operation_id = "createSlide",
    summary = "Create a slide",
    description = "Requires `content:edit` permission. Position is auto-assigned if omitted.",
    request_body = CreateSlideRequest,
    responses(
        (status = 201, description = "Slide created", body = SlideResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_slide(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSlideRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_create_slide(&payload)?;

    let position = match payload.position {
        Some(p) => p,
        None => next_position(&state.db).await?,
    };

    let now = chrono::Utc::now();
    let model = slide::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        caption: Set(trim_optional(payload.caption)),
        image_url: Set(trim_optional(payload.image_url)),
        position: Set(position),
        is_active: Set(payload.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(SlideResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/slides/{id}",
    tag = "Slides",
    operation_id = "updateSlide",
    summary = "Update a slide",
    description = "PATCH semantics. Requires `content:edit` permission. Changing `image_url` reclaims the previous image.",
    params(("id" = i32, Path, description = "Slide ID")),
    request_body = UpdateSlideRequest,
    responses(
        (status = 200, description = "Slide updated", body = SlideResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Slide not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_slide(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateSlideRequest>,
) -> Result<Json<SlideResponse>, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_update_slide(&payload)?;

    let existing = find_slide(&state.db, id).await?;
    if payload == UpdateSlideRequest::default() {
        return Ok(Json(existing.into()));
    }

    let previous_image = existing.image_url.clone();
    let mut active: slide::ActiveModel = existing.into();

    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(caption) = payload.caption {
        active.caption = Set(trim_optional(caption));
    }
    if let Some(url) = payload.image_url {
        active.image_url = Set(trim_optional(url));
    }
    if let Some(position) = payload.position {
        active.position = Set(position);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
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
    path = "/api/v1/slides/{id}",
    tag = "Slides",
    operation_id = "deleteSlide",
    summary = "Delete a slide",
    description = "Requires `content:delete` permission. The slide image is reclaimed in the background.",
    params(("id" = i32, Path, description = "Slide ID")),
    responses(
        (status = 204, description = "Slide deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Slide not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_slide(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:delete")?;

    let existing = find_slide(&state.db, id).await?;
    slide::Entity::delete_by_id(id).exec(&state.db).await?;

    if let Some(url) = existing.image_url {
        state.reclaimer.reclaim(url);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/slides/reorder",
    tag = "Slides",
    operation_id = "reorderSlides",
    summary = "Reorder the carousel",
    description = "Requires `content:edit` permission. The ID array must contain exactly all slides. Positions are assigned by array index starting at 0.",
    request_body = ReorderSlidesRequest,
    responses(
        (status = 204, description = "Slides reordered"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_slides(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReorderSlidesRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_reorder_slides(&payload)?;

    let txn = state.db.begin().await?;

    let existing: HashSet<i32> = slide::Entity::find()
        .select_only()
        .column(slide::Column::Id)
        .into_tuple::<i32>()
        .all(&txn)
        .await?
        .into_iter()
        .collect();
    let requested: HashSet<i32> = payload.slide_ids.iter().copied().collect();
    if existing != requested {
        return Err(AppError::Validation(
            "slide_ids must contain exactly the existing slides".into(),
        ));
    }

    let now = chrono::Utc::now();
    for (i, &slide_id) in payload.slide_ids.iter().enumerate() {
        let position = i32::try_from(i)
            .map_err(|_| AppError::Validation("Too many slides to reorder".into()))?;
        slide::Entity::update_many()
            .filter(slide::Column::Id.eq(slide_id))
            .col_expr(slide::Column::Position, Expr::value(position))
            .col_expr(slide::Column::UpdatedAt, Expr::value(now))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_slide<C: ConnectionTrait>(db: &C, id: i32) -> Result<slide::Model, AppError> {
    slide::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Slide not found".into()))
}

async fn next_position<C: ConnectionTrait>(db: &C) -> Result<i32, AppError> {
    let max_pos: Option<i32> = slide::Entity::find()
        .select_only()
        .column_as(slide::Column::Position.max(), "max_pos")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_pos
        .unwrap_or(-1)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Position overflow".into()))
}
