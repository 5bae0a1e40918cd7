use crate::constants::ADD_PAGES_QUALITY;
use crate::layout::{apply_plan, plan_insertions};
use crate::normalize::NormalizeOptions;
use crate::options::LayoutSettings;
use crate::render::{INHERITABLE_ATTRIBUTES, find_inherited};
use crate::types::*;
use lopdf::{Document, Object, ObjectId};
use std::time::Instant;

use super::io::{load_pdf, save_pdf_bytes};
use super::{PreparedImage, image_page, prepare_images};

/// Insert one page per image into an existing PDF.
///
/// Each image's `target_position` is its 1-based page number in the result;
/// images without one are appended. Existing pages keep their content and
/// relative order.
pub async fn add_pages(
    pdf: PdfAsset,
    images: Vec<ImageAsset>,
    settings: LayoutSettings,
) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(ComposeError::NoPages);
    }

    let started = Instant::now();
    let image_count = images.len();
    let source_name = pdf.filename.clone();

    let options = NormalizeOptions::passthrough(ADD_PAGES_QUALITY);
    let (doc, prepared) = futures::try_join!(
        load_pdf(pdf),
        prepare_images(images, options, settings)
    )?;
    let existing = doc.get_pages().len();

    let bytes = tokio::task::spawn_blocking(move || insert_pages(doc, prepared)).await??;

    tracing::info!(
        source = %source_name,
        existing_pages = existing,
        inserted = image_count,
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Inserted image pages"
    );

    Ok(bytes)
}

fn insert_pages(mut doc: Document, prepared: Vec<PreparedImage>) -> Result<Vec<u8>> {
    let mut tree = PageTree::flatten(&mut doc)?;

    let entries: Vec<_> = prepared
        .into_iter()
        .map(|image| (image.target_position.unwrap_or(usize::MAX), image))
        .collect();
    let plan = plan_insertions(entries, tree.pages.len());

    let root = tree.root;
    let plan: Vec<_> = plan
        .into_iter()
        .map(|step| {
            tracing::debug!(
                final_position = step.final_position,
                apply_index = step.apply_index,
                "Inserting page"
            );
            step.map(|image| image_page(&mut doc, &image).finish(&mut doc, root))
        })
        .collect();
    apply_plan(&mut tree.pages, plan);

    tree.write(&mut doc)?;
    doc.prune_objects();
    save_pdf_bytes(doc)
}

/// The page list of an existing document, flattened under its root node
struct PageTree {
    root: ObjectId,
    pages: Vec<ObjectId>,
}

impl PageTree {
    /// Reparent every page directly under the root `Pages` node.
    ///
    /// Attributes a page inherited from intermediate nodes are copied onto
    /// the page first, so dropping those nodes does not change how it
    /// renders. The root keeps none of them, so new pages inherit nothing.
    fn flatten(doc: &mut Document) -> Result<Self> {
        let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
        let catalog = doc.get_dictionary(catalog_id)?;
        let root = catalog.get(b"Pages")?.as_reference()?;

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

        let mut materialized: Vec<(ObjectId, Vec<(&[u8], Object)>)> = Vec::with_capacity(pages.len());
        for &page_id in &pages {
            let page = doc.get_dictionary(page_id)?;
            let inherited: Vec<(&[u8], Object)> = INHERITABLE_ATTRIBUTES
                .iter()
                .filter(|&&key| page.get(key).is_err())
                .filter_map(|&key| Some((key, find_inherited(doc, page_id, key)?.clone())))
                .collect();
            materialized.push((page_id, inherited));
        }

        for (page_id, inherited) in materialized {
            let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(root));
        }

        let root_dict = doc.get_object_mut(root)?.as_dict_mut()?;
        for key in INHERITABLE_ATTRIBUTES {
            root_dict.remove(key);
        }

        Ok(Self { root, pages })
    }

    /// Store the page order in the root node
    fn write(&self, doc: &mut Document) -> Result<()> {
        let root = doc.get_object_mut(self.root)?.as_dict_mut()?;
        root.set(
            "Kids",
            Object::Array(self.pages.iter().map(|&id| Object::Reference(id)).collect()),
        );
        root.set("Count", Object::Integer(self.pages.len() as i64));
        Ok(())
    }
}
