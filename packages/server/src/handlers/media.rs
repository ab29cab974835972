use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::storage::{ObjectKey, ObjectLocation};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Keys are never reused, so a stored object never changes.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

#[utoipa::path(
    get,
    path = "/media/{bucket}/{key}",
    tag = "Assets",
    operation_id = "getMedia",
    summary = "Fetch a stored object",
    description = "Serves objects of the filesystem and in-memory backends. The content type is derived from the key's extension.",
    params(
        ("bucket" = String, Path, description = "Bucket name"),
        ("key" = String, Path, description = "Object key"),
    ),
    responses(
        (status = 200, description = "Object bytes"),
        (status = 304, description = "Not modified"),
        (status = 404, description = "Object not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, headers))]
pub async fn get_media(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let location = ObjectKey::parse(&key)
        .and_then(|key| ObjectLocation::new(&bucket, key))
        .map_err(|_| AppError::NotFound("Object not found".into()))?;

    let etag = format!("\"{}\"", location.key.as_str());
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag || val == "*")
    {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, etag), (header::CACHE_CONTROL, IMMUTABLE.into())],
        )
            .into_response());
    }

    let data = state.store.get(&location).await?;
    let content_type = mime_guess::from_path(location.key.as_str())
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(header::ETAG, &etag)
        .header(header::CACHE_CONTROL, IMMUTABLE)
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        // SVG logos must not run scripts when opened directly.
        .header(header::CONTENT_SECURITY_POLICY, "default-src 'none'; style-src 'unsafe-inline'; sandbox")
        .body(data.into())
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
