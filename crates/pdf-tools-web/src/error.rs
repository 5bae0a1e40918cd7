//! HTTP error responses
//!
//! Handlers return `Result<_, AppError>`; every failure renders as a JSON
//! [`ErrorResponse`] and is logged once here.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdf_artifacts::ArtifactError;
use pdf_compose::ComposeError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("Failed to read upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Artifact(_) => StatusCode::BAD_REQUEST,
            AppError::Compose(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Compose(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Multipart(e) => e.status(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Compose(ComposeError::InvalidSettings(_)) => "invalid_settings",
            AppError::Compose(ComposeError::InvalidImage { .. }) => "invalid_image",
            AppError::Compose(ComposeError::InvalidDocument { .. }) => "invalid_pdf",
            AppError::Compose(ComposeError::NoPages) => "no_pages",
            AppError::Compose(_) => "internal_error",
            AppError::Artifact(_) => "invalid_token",
            AppError::Multipart(_) => "invalid_upload",
        }
    }

    fn body(&self, status: StatusCode) -> ErrorResponse {
        if status.is_server_error() {
            ErrorResponse {
                error: "Internal server error".to_string(),
                code: self.code().to_string(),
                message: Some(self.to_string()),
            }
        } else {
            ErrorResponse {
                error: self.to_string(),
                code: self.code().to_string(),
                message: None,
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        } else {
            tracing::warn!(error = %self, code = self.code(), "Request rejected");
        }

        (status, Json(self.body(status))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
