//! Unified error handling with the tagged API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Origin tag carried by every envelope, for logging and correlation only.
/// `Root` marks administrative surfaces, `Anonymous` public ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tag {
    Root,
    Anonymous,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub tag: Tag,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(tag: Tag, message: &str, data: T) -> Json<Self> {
        Json(Self {
            tag,
            message: message.to_string(),
            data: Some(data),
        })
    }

    /// Success with no data payload (mutation acknowledgements).
    pub fn message(tag: Tag, message: &str) -> Json<Self> {
        Json(Self {
            tag,
            message: message.to_string(),
            data: None,
        })
    }
}

/// What went wrong, mapped onto an HTTP status code.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

/// Application error: an [`ErrorKind`] plus the surface tag it surfaced on.
///
/// `?` on a `sqlx::Error` produces a `Root`-tagged error; public handlers
/// re-tag with [`AppError::tagged`].
#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub tag: Tag,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ErrorKind::NotFound(message.into()).into()
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ErrorKind::Validation(message.into()).into()
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ErrorKind::BadRequest(message.into()).into()
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ErrorKind::Forbidden(message.into()).into()
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ErrorKind::Conflict(message.into()).into()
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ErrorKind::Internal(message.into()).into()
    }

    /// Override the origin tag (public surfaces).
    pub fn tagged(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl From<ErrorKind> for AppError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            tag: Tag::Root,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        ErrorKind::Database(err).into()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ErrorKind::Validation(errors.to_string()).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.kind {
            ErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            ErrorKind::Validation(_) | ErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            ErrorKind::Forbidden(_) => StatusCode::FORBIDDEN,
            ErrorKind::Conflict(_) => StatusCode::CONFLICT,
            ErrorKind::Database(_) | ErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(tag = ?self.tag, error = %self.kind, "Request failed");
        }

        // Store failures pass the underlying message through verbatim.
        let body = ApiResponse::<()> {
            tag: self.tag,
            message: self.kind.to_string(),
            data: None,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success(Tag::Root, "Post loaded", "hello");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["tag"], "Root");
        assert_eq!(json["message"], "Post loaded");
        assert_eq!(json["data"], "hello");
    }

    #[test]
    fn api_response_message_has_null_data() {
        let response = ApiResponse::<()>::message(Tag::Anonymous, "Post liked");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["tag"], "Anonymous");
        assert!(json["data"].is_null());
    }

    #[test]
    fn app_error_defaults_to_root_tag() {
        let err = AppError::not_found("Post not found");
        assert_eq!(err.tag, Tag::Root);
        assert!(err.is_not_found());
    }

    #[test]
    fn app_error_retag() {
        let err = AppError::not_found("Post not found").tagged(Tag::Anonymous);
        assert_eq!(err.tag, Tag::Anonymous);
    }

    #[test]
    fn sqlx_error_passes_message_through() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err.kind, ErrorKind::Database(_)));
        assert_eq!(err.to_string(), sqlx::Error::RowNotFound.to_string());
    }
}
