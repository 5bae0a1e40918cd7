//! Document assembly
//!
//! The four operations behind the service. Each one fans the per-asset work
//! (decoding, rotating, re-encoding, parsing) out to the blocking pool,
//! collects the results in submission order, then builds the output
//! document on a single blocking task.

mod images;
mod insert;
mod io;
mod merge;
mod numbers;
mod output;

pub use images::images_to_pdf;
pub use insert::add_pages;
pub use io::{load_pdf, load_pdf_bytes, save_pdf_bytes};
pub use merge::merge_pdfs;
pub use numbers::add_page_numbers;

use crate::layout::{LayoutRequest, LayoutResult, resolve_layout};
use crate::normalize::{NormalizeOptions, NormalizedImage, normalize};
use crate::options::LayoutSettings;
use crate::render::{PageContent, create_image_xobject};
use crate::types::*;
use futures::future::try_join_all;
use lopdf::Document;

/// An image decoded, re-encoded and laid out, ready to become a page
pub(crate) struct PreparedImage {
    pub image: NormalizedImage,
    pub layout: LayoutResult,
    pub target_position: Option<usize>,
}

fn prepare_image(
    asset: &ImageAsset,
    options: &NormalizeOptions,
    settings: &LayoutSettings,
) -> Result<PreparedImage> {
    let image = normalize(asset, options)?;
    let (width_pt, height_pt) = image.size_pt(settings.dpi);
    let request = LayoutRequest::new(
        width_pt,
        height_pt,
        settings.page_size,
        settings.margin,
        settings.orientation,
    );

    Ok(PreparedImage {
        layout: resolve_layout(&request),
        image,
        target_position: asset.target_position,
    })
}

/// Normalize and lay out every image concurrently, keeping input order
pub(crate) async fn prepare_images(
    images: Vec<ImageAsset>,
    options: NormalizeOptions,
    settings: LayoutSettings,
) -> Result<Vec<PreparedImage>> {
    let tasks = images.into_iter().map(|asset| {
        tokio::task::spawn_blocking(move || prepare_image(&asset, &options, &settings))
    });

    try_join_all(tasks).await?.into_iter().collect()
}

/// Parse every PDF concurrently, keeping input order
pub(crate) async fn load_pdfs(pdfs: Vec<PdfAsset>) -> Result<Vec<Document>> {
    try_join_all(pdfs.into_iter().map(load_pdf)).await
}

/// Page content showing one prepared image; the image XObject is added to
/// `doc` right away
pub(crate) fn image_page(doc: &mut Document, prepared: &PreparedImage) -> PageContent {
    let xobject_id = create_image_xobject(doc, &prepared.image);
    let mut page = PageContent::new(prepared.layout.page_width_pt, prepared.layout.page_height_pt);
    page.draw_image(xobject_id, &prepared.layout.draw);
    page
}
