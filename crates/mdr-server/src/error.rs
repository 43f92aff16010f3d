//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mdr_export::{RenderError, UnsupportedFormat};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Malformed body or missing required field.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown `format` value.
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    /// Render pipeline failure.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    pub(crate) fn missing_field(name: &str) -> Self {
        Self::BadRequest(format!("Missing '{name}' field in request body"))
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            Self::Render(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Render failed");
        }
        (status, axum::Json(json!({"error": self.to_string()}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServerError::missing_field("markdown").status(),
            StatusCode::BAD_REQUEST
        );
        let unsupported = "rtf".parse::<mdr_export::OutputFormat>().unwrap_err();
        assert_eq!(
            ServerError::from(unsupported).status(),
            StatusCode::BAD_REQUEST
        );
        let render = RenderError::Io(std::io::Error::other("disk full"));
        assert_eq!(
            ServerError::from(render).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(
            ServerError::missing_field("format").to_string(),
            "Missing 'format' field in request body"
        );
    }
}
