use crate::error::{AppError, Result};
use crate::operation::Operation;
use crate::state::AppState;
use crate::views;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use pdf_artifacts::{ArtifactError, ArtifactToken};

/// Confirmation page; unknown tokens send the user back to the form
pub async fn download_page(
    State(state): State<AppState>,
    Path((slug, token)): Path<(String, String)>,
) -> Response {
    let Some(op) = Operation::from_slug(&slug) else {
        return super::not_found().await.into_response();
    };

    match ArtifactToken::parse(&token) {
        Ok(token) if state.artifacts.contains(&token).await => {
            views::download(op, &token).into_response()
        }
        _ => {
            tracing::debug!(operation = op.slug(), "Unknown token, back to the form");
            Redirect::to(&op.form_path()).into_response()
        }
    }
}

/// Hand out the stored PDF once
pub async fn download_file(
    State(state): State<AppState>,
    Path((slug, token)): Path<(String, String)>,
) -> Result<Response> {
    let Some(op) = Operation::from_slug(&slug) else {
        return Ok(super::not_found().await.into_response());
    };

    // Malformed tokens get the same answer as expired ones
    let token = ArtifactToken::parse(&token).map_err(|_| ArtifactError::NotFound)?;
    let bytes = state.artifacts.take(&token).await.map_err(AppError::from)?;
    tracing::info!(operation = op.slug(), size = bytes.len(), "Artifact downloaded");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, r#"attachment; filename="output.pdf""#),
        ],
        bytes,
    )
        .into_response())
}
