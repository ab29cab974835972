use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::member;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::member::*;
use crate::models::shared::trim_optional;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/members",
    tag = "Members",
    operation_id = "listMembers",
    summary = "List important members",
    description = "Public. Ordered by position.",
    responses((status = 200, description = "All members", body = Vec<MemberResponse>)),
)]
#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let members = member::Entity::find()
        .order_by_asc(member::Column::Position)
        .order_by_asc(member::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(members.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/members/{id}",
    tag = "Members",
    operation_id = "getMember",
    summary = "Get a member by ID",
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member details", body = MemberResponse),
        (status = 404, description = "Member not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MemberResponse>, AppError> {
    Ok(Json(find_member(&state.db, id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/members",
    tag = "Members",
    operation_id = "createMember",
    summary = "Add an important member",
    description = "Requires `content:edit` permission. Position is auto-assigned if omitted.",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created", body = MemberResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_create_member(&payload)?;

    let position = match payload.position {
        Some(p) => p,
        None => next_position(&state.db).await?,
    };

    let now = chrono::Utc::now();
    let model = member::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        role_title: Set(payload.role_title.trim().to_string()),
        bio: Set(trim_optional(payload.bio)),
        linkedin_url: Set(trim_optional(payload.linkedin_url)),
        avatar_url: Set(trim_optional(payload.avatar_url)),
        position: Set(position),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/members/{id}",
    tag = "Members",
    operation_id = "updateMember",
    summary = "Update a member",
    description = "PATCH semantics. Requires `content:edit` permission. Changing `avatar_url` reclaims the previous avatar.",
    params(("id" = i32, Path, description = "Member ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = MemberResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    auth_user.require_permission("content:edit")?;
    validate_update_member(&payload)?;

    let existing = find_member(&state.db, id).await?;
    if payload == UpdateMemberRequest::default() {
        return Ok(Json(existing.into()));
    }

    let previous_avatar = existing.avatar_url.clone();
    let mut active: member::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(title) = payload.role_title {
        active.role_title = Set(title.trim().to_string());
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(trim_optional(bio));
    }
    if let Some(url) = payload.linkedin_url {
        active.linkedin_url = Set(trim_optional(url));
    }
    if let Some(url) = payload.avatar_url {
        active.avatar_url = Set(trim_optional(url));
    }
    if let Some(position) = payload.position {
        active.position = Set(position);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    state
        .reclaimer
        .reclaim_replaced(previous_avatar.as_deref(), model.avatar_url.as_deref());

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/members/{id}",
    tag = "Members",
    operation_id = "deleteMember",
    summary = "Remove a member",
    description = "Requires `content:delete` permission. The avatar is reclaimed in the background.",
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("content:delete")?;

    let existing = find_member(&state.db, id).await?;
    member::Entity::delete_by_id(id).exec(&state.db).await?;

    if let Some(url) = existing.avatar_url {
        state.reclaimer.reclaim(url);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn find_member<C: ConnectionTrait>(db: &C, id: i32) -> Result<member::Model, AppError> {
    member::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".into()))
}

async fn next_position<C: ConnectionTrait>(db: &C) -> Result<i32, AppError> {
    let max_pos: Option<i32> = member::Entity::find()
        .select_only()
        .column_as(member::Column::Position.max(), "max_pos")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_pos
        .unwrap_or(-1)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Position overflow".into()))
}
