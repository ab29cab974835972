use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{role, role_permission, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{AccountResponse, Credentials, Landing, ProfileResponse, SessionResponse};
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new account",
    description = "Creates an account with the `member` role. Back-office roles are granted by an administrator.",
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Username taken (USERNAME_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username()))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate_new()?;

    let password = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))?;

    let account = user::ActiveModel {
        username: Set(payload.username().to_owned()),
        password: Set(password),
        role: Set(role::DEFAULT_ROLE.to_owned()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UsernameTaken,
        _ => AppError::from(e),
    })?;

    tracing::info!(user_id = account.id, "Account registered");
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in",
    description = "Returns a 7-day JWT with the role, its permissions and where the client should land: `/admin` for admins and editors, `/` otherwise.",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong username or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username()))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Credentials>,
) -> Result<Json<SessionResponse>, AppError> {
    payload.validate_present()?;

    let account = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username()))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let matches = hash::verify_password(&payload.password, &account.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;
    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    let session = open_session(&state, account).await?;
    tracing::info!(role = %session.role, redirect = ?session.redirect, "User logged in");
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current user",
    responses(
        (status = 200, description = "Authenticated user", body = ProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(auth_user: AuthUser) -> Json<ProfileResponse> {
    let redirect = Landing::for_role(&auth_user.role);
    Json(ProfileResponse {
        id: auth_user.user_id,
        username: auth_user.username,
        role: auth_user.role,
        permissions: auth_user.permissions,
        redirect,
    })
}

/// Resolve the role's permissions and sign a token carrying them.
async fn open_session(state: &AppState, account: user::Model) -> Result<SessionResponse, AppError> {
    let permissions: Vec<String> = role_permission::Entity::find()
        .select_only()
        .column(role_permission::Column::Permission)
        .filter(role_permission::Column::Role.eq(&account.role))
        .into_tuple()
        .all(&state.db)
        .await?;

    let token = jwt::sign(
        account.id,
        &account.username,
        &account.role,
        permissions.clone(),
        &state.config.auth.jwt_secret,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

    Ok(SessionResponse {
        token,
        redirect: Landing::for_role(&account.role),
        username: account.username,
        role: account.role,
        permissions,
    })
}
