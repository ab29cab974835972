use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use common::upload::{LinkError, UploadError, ValidationError};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `INVALID_FILE_TYPE`,
    /// `FILE_TOO_LARGE`, `UPLOAD_FAILED`, `TOKEN_MISSING`, `TOKEN_INVALID`,
    /// `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`, `USERNAME_TAKEN`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "FILE_TOO_LARGE")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "This file is too large. The maximum size is 15 MB")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    InvalidFileType(String),
    FileTooLarge(String),
    /// Object store kept failing; safe to retry later.
    UploadFailed(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    PermissionDenied,
    NotFound(String),
    UsernameTaken,
    Internal(String),
    /// Server-side failure the client can act on. Only `message` is returned;
    /// `detail` is logged.
    InternalDescribed { detail: String, message: String },
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::InvalidFileType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorBody {
                    code: "INVALID_FILE_TYPE",
                    message: msg,
                },
            ),
            AppError::FileTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    code: "FILE_TOO_LARGE",
                    message: msg,
                },
            ),
            AppError::UploadFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "UPLOAD_FAILED",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid username or password".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "USERNAME_TAKEN",
                    message: "Username is already taken".into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
            AppError::InternalDescribed { detail, message } => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message,
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(location) => {
                AppError::NotFound(format!("Object not found: {location}"))
            }
            StorageError::InvalidLocation(msg) => AppError::Validation(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<LinkError> for AppError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            LinkError::Database(detail) => AppError::Internal(detail),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        let message = err.user_message();
        match err {
            UploadError::Invalid(ValidationError::InvalidType { .. }) => {
                AppError::InvalidFileType(message)
            }
            UploadError::Invalid(ValidationError::TooLarge { .. }) => {
                AppError::FileTooLarge(message)
            }
            UploadError::Upload { source, .. } if !source.is_transient() => {
                tracing::warn!("Upload rejected by store: {source}");
                AppError::Validation(message)
            }
            UploadError::Upload { source, .. } => {
                tracing::warn!("Upload exhausted retries: {source}");
                AppError::UploadFailed(message)
            }
            UploadError::Link {
                source: LinkError::NotFound(_),
                ..
            } => AppError::NotFound(message),
            UploadError::Link { asset, source } => AppError::InternalDescribed {
                detail: format!("failed to link {}: {source}", asset.url),
                message,
            },
        }
    }
}
