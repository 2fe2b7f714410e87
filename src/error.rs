use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Everything a handler can fail with. Messages are already localized (or
/// deliberately raw, for upstream errors) by the time an `AppError` is built.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-caused upload rejection (missing file, empty filename,
    /// unsupported extension).
    #[error("{0}")]
    Validation(String),
    /// The vision API call failed; carries the stringified upstream error.
    #[error("{0}")]
    Upstream(String),
    /// Unknown category or animal id.
    #[error("{0}")]
    NotFound(String),
    /// Any other failure while handling an upload.
    #[error("{0}")]
    Processing(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            AppError::Validation("no file".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("category".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Upstream("timeout".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Processing("io".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
