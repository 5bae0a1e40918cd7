use crate::layout::{LayoutRequest, resolve_layout};
use crate::render::{PageContent, create_page_xobject, get_page_box};
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::collections::HashMap;
use std::time::Instant;

use super::io::save_pdf_bytes;
use super::load_pdfs;
use super::output::OutputDocument;

/// Concatenate the pages of several PDFs, in the order given.
///
/// Every source page is re-hosted on a page of its own size plus `margin`
/// on each side.
pub async fn merge_pdfs(pdfs: Vec<PdfAsset>, margin: Margin) -> Result<Vec<u8>> {
    if pdfs.is_empty() {
        return Err(ComposeError::NoPages);
    }

    let started = Instant::now();
    let document_count = pdfs.len();

    let documents = load_pdfs(pdfs).await?;
    let (bytes, page_count) =
        tokio::task::spawn_blocking(move || merge_documents(&documents, margin)).await??;

    tracing::info!(
        documents = document_count,
        pages = page_count,
        margin = ?margin,
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Merged PDFs"
    );

    Ok(bytes)
}

fn merge_documents(documents: &[Document], margin: Margin) -> Result<(Vec<u8>, usize)> {
    let mut output = OutputDocument::new();

    for source in documents {
        // Object ids are per document, so each source gets its own cache
        let mut cache: HashMap<ObjectId, ObjectId> = HashMap::new();

        for page_id in source.get_pages().into_values() {
            let page_box = get_page_box(source, page_id);
            let (width, height) = page_box.display_size();
            let layout = resolve_layout(&LayoutRequest::new(
                width,
                height,
                PageSize::Fit,
                margin,
                Orientation::Portrait,
            ));

            let xobject_id = create_page_xobject(&mut output.doc, source, page_id, &mut cache)?;
            let mut page = PageContent::new(layout.page_width_pt, layout.page_height_pt);
            page.draw_form(xobject_id, &page_box, &layout.draw, layout.scale);
            output.push(page);
        }
    }

    let page_count = output.page_count();
    Ok((save_pdf_bytes(output.finish())?, page_count))
}
