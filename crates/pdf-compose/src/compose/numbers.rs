use crate::constants::PAGE_NUMBER_FONT_SIZE;
use crate::layout::{LayoutRequest, resolve_layout};
use crate::numbering::{format_page_label, label_origin, text_width};
use crate::options::LayoutSettings;
use crate::render::{PageContent, create_helvetica_font, create_page_xobject, get_page_box};
use crate::types::*;
use lopdf::{Document, ObjectId};
use std::collections::HashMap;
use std::time::Instant;

use super::io::{load_pdf, save_pdf_bytes};
use super::output::OutputDocument;

/// Re-host every page of a PDF on the configured page setup and stamp a
/// page label on it.
pub async fn add_page_numbers(
    pdf: PdfAsset,
    settings: LayoutSettings,
    numbering: PageNumberSpec,
) -> Result<Vec<u8>> {
    let started = Instant::now();
    let source_name = pdf.filename.clone();

    let source = load_pdf(pdf).await?;
    let page_count = source.get_pages().len();

    let bytes =
        tokio::task::spawn_blocking(move || number_pages(&source, &settings, &numbering)).await??;

    tracing::info!(
        source = %source_name,
        pages = page_count,
        format = ?numbering.format,
        position = %numbering.position,
        start = numbering.start,
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Added page numbers"
    );

    Ok(bytes)
}

fn number_pages(
    source: &Document,
    settings: &LayoutSettings,
    numbering: &PageNumberSpec,
) -> Result<Vec<u8>> {
    let mut output = OutputDocument::new();
    let font_id = create_helvetica_font(&mut output.doc);
    let margin = settings.margin.points();

    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
    let total = page_ids.len();
    let mut cache: HashMap<ObjectId, ObjectId> = HashMap::new();

    for (index, &page_id) in page_ids.iter().enumerate() {
        let page_box = get_page_box(source, page_id);
        let (width, height) = page_box.display_size();
        let layout = resolve_layout(&LayoutRequest::new(
            width,
            height,
            settings.page_size,
            settings.margin,
            settings.orientation,
        ));

        let xobject_id = create_page_xobject(&mut output.doc, source, page_id, &mut cache)?;
        let mut page = PageContent::new(layout.page_width_pt, layout.page_height_pt);
        page.draw_form(xobject_id, &page_box, &layout.draw, layout.scale);

        let label = format_page_label(numbering, index, total);
        let (x, y) = label_origin(
            numbering.position,
            layout.page_width_pt,
            layout.page_height_pt,
            margin,
            text_width(&label, PAGE_NUMBER_FONT_SIZE),
        );
        page.draw_label(font_id, &label, x, y);

        output.push(page);
    }

    save_pdf_bytes(output.finish())
}
