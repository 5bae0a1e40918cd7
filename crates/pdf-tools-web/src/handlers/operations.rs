//! Form submissions
//!
//! Each handler validates the upload, runs the composition, parks the result
//! in the artifact store and redirects to the confirmation page.

use crate::error::Result;
use crate::multipart::Upload;
use crate::operation::Operation;
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::response::Redirect;

pub async fn image_to_pdf(State(state): State<AppState>, multipart: Multipart) -> Result<Redirect> {
    let mut upload = Upload::read(multipart).await?;
    let images = upload.take_images()?;
    let settings = upload.settings()?.layout()?;

    let pdf = pdf_compose::images_to_pdf(images, settings).await?;

    store(&state, Operation::ImageToPdf, pdf).await
}

pub async fn add_pages(State(state): State<AppState>, multipart: Multipart) -> Result<Redirect> {
    let mut upload = Upload::read(multipart).await?;
    let pdf = upload.take_pdf()?;
    let images = upload.take_positioned_images()?;
    let settings = upload.settings()?.layout()?;

    let out = pdf_compose::add_pages(pdf, images, settings).await?;

    store(&state, Operation::AddPages, out).await
}

pub async fn merge_pdf(State(state): State<AppState>, multipart: Multipart) -> Result<Redirect> {
    let mut upload = Upload::read(multipart).await?;
    let pdfs = upload.take_pdfs()?;
    let margin = upload.settings()?.merge_margin()?;

    let out = pdf_compose::merge_pdfs(pdfs, margin).await?;

    store(&state, Operation::Merge, out).await
}

pub async fn add_page_numbers(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect> {
    let mut upload = Upload::read(multipart).await?;
    let pdf = upload.take_pdf()?;
    let raw = upload.settings()?;
    let settings = raw.layout()?;
    let numbering = raw.page_numbers()?;

    let out = pdf_compose::add_page_numbers(pdf, settings, numbering).await?;

    store(&state, Operation::PageNumbers, out).await
}

async fn store(state: &AppState, op: Operation, pdf: Vec<u8>) -> Result<Redirect> {
    let size = pdf.len();
    let token = state.artifacts.put(pdf).await;
    tracing::info!(operation = op.slug(), size, "PDF ready for download");
    Ok(Redirect::to(&op.download_path(&token)))
}
