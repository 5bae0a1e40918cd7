//! Form XObjects from existing pages
//!
//! Merging and page numbering re-host every source page on a fresh page.
//! The source page is wrapped in a Form XObject, which keeps its vector
//! content intact and lets the new page draw it with a single `Do`.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Page-tree attributes a page may inherit from its ancestors
pub const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

// Guards against malformed trees whose Parent chain loops
const MAX_TREE_DEPTH: usize = 64;

/// A page's MediaBox, normalized to origin + size, plus its display rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub llx: f32,
    pub lly: f32,
    pub width: f32,
    pub height: f32,
    /// Clockwise display rotation: 0, 90, 180 or 270
    pub rotation: u16,
}

impl PageBox {
    fn from_array(values: &[Object]) -> Option<Self> {
        if values.len() != 4 {
            return None;
        }
        let mut numbers = [0.0f32; 4];
        for (slot, value) in numbers.iter_mut().zip(values) {
            *slot = extract_number(value)?;
        }
        let [x1, y1, x2, y2] = numbers;
        let (llx, urx) = (x1.min(x2), x1.max(x2));
        let (lly, ury) = (y1.min(y2), y1.max(y2));
        let (width, height) = (urx - llx, ury - lly);
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self {
            llx,
            lly,
            width,
            height,
            rotation: 0,
        })
    }

    /// Size as shown by a viewer, with quarter-turn rotations applied
    pub fn display_size(&self) -> (f32, f32) {
        match self.rotation {
            90 | 270 => (self.height, self.width),
            _ => (self.width, self.height),
        }
    }

    fn to_array(self) -> Vec<Object> {
        vec![
            Object::Real(self.llx),
            Object::Real(self.lly),
            Object::Real(self.llx + self.width),
            Object::Real(self.lly + self.height),
        ]
    }
}

impl Default for PageBox {
    fn default() -> Self {
        Self {
            llx: 0.0,
            lly: 0.0,
            width: DEFAULT_PAGE_DIMENSIONS.0,
            height: DEFAULT_PAGE_DIMENSIONS.1,
            rotation: 0,
        }
    }
}

// =============================================================================
// Inherited Attributes
// =============================================================================

/// Look up a page attribute as written, walking up the `Parent` chain when
/// the page itself does not carry it.
pub fn find_inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Like [`find_inherited`], with a top-level reference resolved
pub fn get_inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    match find_inherited(doc, page_id, key)? {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Source page box in points. Falls back to US Letter when the page has no
/// usable MediaBox anywhere in its ancestry.
pub fn get_page_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let mut page_box: PageBox = get_inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .and_then(|values| PageBox::from_array(values))
        .unwrap_or_default();

    // Rotate must be a multiple of 90; anything else is ignored
    page_box.rotation = get_inherited(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .filter(|degrees| degrees % 90 == 0)
        .map(|degrees| degrees.rem_euclid(360) as u16)
        .unwrap_or(0);

    page_box
}

// =============================================================================
// XObject Creation
// =============================================================================

/// Wrap a source page as a Form XObject in `output`.
///
/// The XObject's BBox is the page MediaBox, so callers drawing it must
/// translate by `-llx, -lly` to put the visible area at the origin. Shared
/// resources are copied once per `cache`.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let page_box = get_page_box(source, page_id);
    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("BBox", Object::Array(page_box.to_array()));
    xobject_dict.set("FormType", Object::Integer(1));

    if let Some(resources) = get_inherited(source, page_id, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Get the decompressed content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            Object::Stream(stream) => Ok(stream_content(stream)),
            _ => Ok(Vec::new()),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

fn stream_content(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                result.extend_from_slice(&stream_content(stream));
                result.push(b'\n');
            }
        }
    }

    Ok(result)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from source to output document, following references.
///
/// The output id for a reference is reserved and cached before its target is
/// copied, so reference cycles terminate.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            // Dangling references become null, as readers treat them
            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
