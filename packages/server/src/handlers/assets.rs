use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{DefaultBodyLimit, Extension, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use common::upload::{
    AssetLinker, AssetPolicy, FileCandidate, UploadError, UploadRequest, UploadStage,
    ValidationError, validate,
};
use tracing::{debug, instrument};

use crate::assets::{OwnerKind, OwnerRef};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::asset::{AssetClearedResponse, AssetUploadResponse};
use crate::state::AppState;

/// Body limit layer for multipart image routes.
pub fn upload_body_limit(limit: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(limit)
}

/// Permission needed to change images of the given kind.
fn required_permission(kind: OwnerKind) -> &'static str {
    match kind {
        OwnerKind::SiteConfig => "config:edit",
        _ => "content:edit",
    }
}

fn log_progress(stage: UploadStage, percent: u8) {
    debug!(?stage, percent, "Upload progress");
}

#[utoipa::path(
    post,
    path = "/api/v1/{kind}/{id}/image",
    tag = "Assets",
    operation_id = "uploadRecordImage",
    summary = "Upload and link a record's image",
    description = "Validates the `file` multipart field against the kind's policy (JPEG, PNG, GIF, WEBP; SVG for logos; 10 MB for member avatars and mentor photos, 15 MB otherwise), \
        stores it under a generated key with bounded retry, and points the record at the new URL. \
        The previously linked object is reclaimed in the background. \
        Requires `content:edit` (`config:edit` for `site-config`).",
    params(
        ("kind" = OwnerKind, Path, description = "Record kind"),
        ("id" = i32, Path, description = "Record ID (`1` for site-config)"),
    ),
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 201, description = "Image stored and linked", body = AssetUploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Record not found (NOT_FOUND)", body = ErrorBody),
        (status = 413, description = "File too large (FILE_TOO_LARGE)", body = ErrorBody),
        (status = 415, description = "Unsupported file type (INVALID_FILE_TYPE)", body = ErrorBody),
        (status = 502, description = "Storage kept failing (UPLOAD_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(kind = ?kind, id))]
pub async fn upload_record_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Extension(kind): Extension<OwnerKind>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(required_permission(kind))?;

    let owner = OwnerRef::new(kind, id);
    let policy = kind.policy();
    let file = read_file_field(multipart, &policy).await?;

    let receipt = state
        .orchestrator()
        .run(
            UploadRequest {
                bucket: kind.bucket(),
                policy: &policy,
                file: &file,
                owner: Some(&owner),
            },
            &log_progress,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AssetUploadResponse::from(receipt))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/{kind}/{id}/image",
    tag = "Assets",
    operation_id = "clearRecordImage",
    summary = "Remove a record's image",
    description = "Sets the record's image reference to null and reclaims the object in the background. \
        Requires `content:edit` (`config:edit` for `site-config`).",
    params(
        ("kind" = OwnerKind, Path, description = "Record kind"),
        ("id" = i32, Path, description = "Record ID"),
    ),
    responses(
        (status = 200, description = "Image unlinked", body = AssetClearedResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Record not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(kind = ?kind, id))]
pub async fn clear_record_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Extension(kind): Extension<OwnerKind>,
    Path(id): Path<i32>,
) -> Result<Json<AssetClearedResponse>, AppError> {
    auth_user.require_permission(required_permission(kind))?;

    let orchestrator = state.orchestrator();
    let previous = orchestrator
        .linker()
        .unlink(&OwnerRef::new(kind, id))
        .await?;

    let removed = state
        .reclaimer
        .reclaim_replaced(previous.as_deref(), None)
        .map(|handle| handle.url().to_string());

    Ok(Json(AssetClearedResponse { removed }))
}

#[utoipa::path(
    post,
    path = "/api/v1/uploads/{kind}",
    tag = "Assets",
    operation_id = "uploadImage",
    summary = "Upload an image without linking it",
    description = "Runs validation and the retried upload into the kind's bucket, without touching any record. \
        Use the returned URL when creating a record. Requires `content:edit` (`config:edit` for `site-config`).",
    params(("kind" = OwnerKind, Path, description = "Record kind the image is meant for")),
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field"),
    responses(
        (status = 201, description = "Image stored", body = AssetUploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 413, description = "File too large (FILE_TOO_LARGE)", body = ErrorBody),
        (status = 415, description = "Unsupported file type (INVALID_FILE_TYPE)", body = ErrorBody),
        (status = 502, description = "Storage kept failing (UPLOAD_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(kind = ?kind))]
pub async fn upload_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(kind): Path<OwnerKind>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission(required_permission(kind))?;

    let policy = kind.policy();
    let file = read_file_field(multipart, &policy).await?;

    let receipt = state
        .orchestrator()
        .run(
            UploadRequest {
                bucket: kind.bucket(),
                policy: &policy,
                file: &file,
                owner: None,
            },
            &log_progress,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AssetUploadResponse::from(receipt))))
}

/// Pull the `file` field out of the form.
///
/// The declared type is checked before any bytes are buffered, and nothing
/// past the policy ceiling is kept in memory.
async fn read_file_field(
    mut multipart: Multipart,
    policy: &AssetPolicy,
) -> Result<FileCandidate, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, 0, policy.max_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = match field.content_type() {
            Some(ct) if ct != "application/octet-stream" => ct.to_string(),
            _ => mime_guess::from_path(&file_name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        let header_only = FileCandidate::new(file_name, content_type, Vec::new());
        validate(&header_only, policy).map_err(UploadError::from)?;

        let data = read_capped(field, policy.max_bytes).await?;
        return Ok(FileCandidate { data, ..header_only });
    }

    Err(AppError::Validation("Missing 'file' field".into()))
}

/// Buffer the field up to `limit` bytes. Past the limit the rest of the field
/// is drained without buffering so the client still gets a clean response.
async fn read_capped(mut field: Field<'_>, limit: u64) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    let mut actual: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, actual, limit))?
    {
        actual += chunk.len() as u64;
        if actual <= limit {
            data.extend_from_slice(&chunk);
        } else if !data.is_empty() {
            data = Vec::new();
        }
    }

    if actual > limit {
        return Err(UploadError::from(ValidationError::TooLarge { actual, limit }).into());
    }
    Ok(data)
}

/// A request body cut off by the route's body limit is an oversized file,
/// whatever else went wrong reading the form is a malformed request.
fn multipart_error(err: MultipartError, read: u64, limit: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let actual = read.max(limit.saturating_add(1));
        return UploadError::from(ValidationError::TooLarge { actual, limit }).into();
    }
    AppError::Validation(format!("Multipart error: {}", err.body_text()))
}
