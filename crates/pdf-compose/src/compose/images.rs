use crate::constants::IMAGE_TO_PDF_QUALITY;
use crate::normalize::NormalizeOptions;
use crate::options::LayoutSettings;
use crate::types::*;
use std::time::Instant;

use super::io::save_pdf_bytes;
use super::output::OutputDocument;
use super::{PreparedImage, image_page, prepare_images};

/// Build a new PDF with one page per image, in the order given.
pub async fn images_to_pdf(images: Vec<ImageAsset>, settings: LayoutSettings) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(ComposeError::NoPages);
    }

    let started = Instant::now();
    let image_count = images.len();

    let options = NormalizeOptions::transcode(IMAGE_TO_PDF_QUALITY);
    let prepared = prepare_images(images, options, settings).await?;
    let bytes = tokio::task::spawn_blocking(move || build(&prepared)).await??;

    tracing::info!(
        images = image_count,
        page_size = ?settings.page_size,
        margin = ?settings.margin,
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Converted images to PDF"
    );

    Ok(bytes)
}

fn build(prepared: &[PreparedImage]) -> Result<Vec<u8>> {
    let mut output = OutputDocument::new();
    for image in prepared {
        let page = image_page(&mut output.doc, image);
        output.push(page);
    }
    save_pdf_bytes(output.finish())
}
