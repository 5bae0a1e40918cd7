//! Output page construction
//!
//! Every composed page is a single content stream drawing one XObject (an
//! embedded image or a re-hosted source page), optionally followed by a
//! line of Helvetica text.

use crate::constants::{PAGE_NUMBER_FONT_SIZE, PAGE_NUMBER_GRAY};
use crate::layout::Rect;
use crate::normalize::{ColorSpace, NormalizedImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::xobject::PageBox;

/// Resource name of the drawn XObject on every composed page
pub const CONTENT_XOBJECT_NAME: &str = "X0";

/// Resource name of the page-number font
pub const LABEL_FONT_NAME: &str = "F1";

// =============================================================================
// Resources
// =============================================================================

/// Add a JPEG as an Image XObject. The bytes are embedded as-is with
/// `DCTDecode`, so they must already be a baseline or progressive JPEG.
pub fn create_image_xobject(output: &mut Document, image: &NormalizedImage) -> ObjectId {
    let color_space: &[u8] = match image.color_space {
        ColorSpace::Gray => b"DeviceGray",
        ColorSpace::Rgb => b"DeviceRGB",
    };

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(image.width_px as i64));
    dict.set("Height", Object::Integer(image.height_px as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    // Already compressed; keep lopdf from wrapping it in Flate
    let mut stream = Stream::new(dict, image.jpeg_bytes.clone());
    stream.allows_compression = false;
    output.add_object(stream)
}

/// Add the standard Helvetica Type1 font
pub fn create_helvetica_font(output: &mut Document) -> ObjectId {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    output.add_object(font_dict)
}

// =============================================================================
// Pages
// =============================================================================

/// A page under construction
pub struct PageContent {
    width_pt: f32,
    height_pt: f32,
    ops: String,
    xobjects: Dictionary,
    fonts: Dictionary,
}

impl PageContent {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
            ops: String::new(),
            xobjects: Dictionary::new(),
            fonts: Dictionary::new(),
        }
    }

    /// Draw an image XObject into `draw`. Images occupy the unit square, so
    /// the matrix scales straight to the target size.
    pub fn draw_image(&mut self, xobject_id: ObjectId, draw: &Rect) {
        self.xobjects
            .set(CONTENT_XOBJECT_NAME, Object::Reference(xobject_id));
        self.ops.push_str(&format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            draw.width, draw.height, draw.x, draw.y, CONTENT_XOBJECT_NAME
        ));
    }

    /// Draw a page Form XObject into `draw` at a uniform `scale`. The matrix
    /// moves the MediaBox origin onto the rectangle corner and applies the
    /// source page's display rotation, so `draw` holds the page as a viewer
    /// would show it.
    pub fn draw_form(&mut self, xobject_id: ObjectId, source: &PageBox, draw: &Rect, scale: f32) {
        self.xobjects
            .set(CONTENT_XOBJECT_NAME, Object::Reference(xobject_id));
        let [a, b, c, d, e, f] = form_matrix(source, draw, scale);
        self.ops.push_str(&format!(
            "q {} {} {} {} {} {} cm /{} Do Q\n",
            a, b, c, d, e, f, CONTENT_XOBJECT_NAME
        ));
    }

    /// Draw a page label with its baseline origin at (x, y)
    pub fn draw_label(&mut self, font_id: ObjectId, text: &str, x: f32, y: f32) {
        self.fonts.set(LABEL_FONT_NAME, Object::Reference(font_id));
        self.ops.push_str(&format!(
            "BT /{} {} Tf {} {} {} rg {} {} Td ({}) Tj ET\n",
            LABEL_FONT_NAME,
            PAGE_NUMBER_FONT_SIZE,
            PAGE_NUMBER_GRAY,
            PAGE_NUMBER_GRAY,
            PAGE_NUMBER_GRAY,
            x,
            y,
            escape_pdf_string(text)
        ));
    }

    /// Write the page dictionary and its content stream into `output`.
    /// The caller is responsible for listing the page in `parent`'s Kids.
    pub fn finish(self, output: &mut Document, parent: ObjectId) -> ObjectId {
        let mut resources = Dictionary::new();
        if !self.xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(self.xobjects));
        }
        if !self.fonts.is_empty() {
            resources.set("Font", Object::Dictionary(self.fonts));
        }

        let content_id = output.add_object(Stream::new(Dictionary::new(), self.ops.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(parent));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.width_pt),
                Object::Real(self.height_pt),
            ]),
        );
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        output.add_object(page_dict)
    }
}

/// Placement matrix for a Form XObject with the given source box
fn form_matrix(source: &PageBox, draw: &Rect, s: f32) -> [f32; 6] {
    let (llx, lly, w, h) = (source.llx, source.lly, source.width, source.height);
    match source.rotation {
        90 => [0.0, -s, s, 0.0, draw.x - s * lly, draw.y + s * (w + llx)],
        180 => [-s, 0.0, 0.0, -s, draw.x + s * (w + llx), draw.y + s * (h + lly)],
        270 => [0.0, s, -s, 0.0, draw.x + s * (h + lly), draw.y - s * llx],
        _ => [s, 0.0, 0.0, s, draw.x - s * llx, draw.y - s * lly],
    }
}

/// Escape a string for use inside a PDF literal string `( ... )`
pub fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            _ => escaped.push('?'),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_of(doc: &Document, page_id: ObjectId) -> String {
        let page = doc.get_dictionary(page_id).unwrap();
        let content_id = page.get(b"Contents").unwrap().as_reference().unwrap();
        let stream = doc.get_object(content_id).unwrap().as_stream().unwrap();
        String::from_utf8(stream.content.clone()).unwrap()
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("Page 7 of 10"), "Page 7 of 10");
        assert_eq!(escape_pdf_string("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_pdf_string("é"), "?");
    }

    #[test]
    fn test_form_placement_compensates_origin() {
        let mut doc = Document::with_version("1.7");
        let parent = doc.new_object_id();
        let form = doc.new_object_id();

        let mut page = PageContent::new(200.0, 100.0);
        let source = PageBox {
            llx: 10.0,
            lly: 20.0,
            width: 100.0,
            height: 50.0,
            rotation: 0,
        };
        page.draw_form(form, &source, &Rect::new(5.0, 5.0, 200.0, 100.0), 2.0);
        let page_id = page.finish(&mut doc, parent);

        let content = content_of(&doc, page_id);
        assert_eq!(content, "q 2 0 0 2 -15 -35 cm /X0 Do Q\n");
    }

    #[test]
    fn test_form_matrix_maps_rotated_corners() {
        let source = PageBox {
            llx: 0.0,
            lly: 0.0,
            width: 100.0,
            height: 50.0,
            rotation: 90,
        };
        let draw = Rect::new(0.0, 0.0, 50.0, 100.0);
        let [a, b, c, d, e, f] = form_matrix(&source, &draw, 1.0);
        let apply = |x: f32, y: f32| (a * x + c * y + e, b * x + d * y + f);

        // The source top-left corner ends up top-right after a clockwise turn
        assert_eq!(apply(0.0, 50.0), (50.0, 100.0));
        assert_eq!(apply(100.0, 0.0), (0.0, 0.0));

        for rotation in [0, 90, 180, 270] {
            let source = PageBox { rotation, ..source };
            let (w, h) = source.display_size();
            let draw = Rect::new(10.0, 20.0, w, h);
            let [a, b, c, d, e, f] = form_matrix(&source, &draw, 1.0);
            for (x, y) in [(0.0, 0.0), (100.0, 0.0), (0.0, 50.0), (100.0, 50.0)] {
                let (u, v) = (a * x + c * y + e, b * x + d * y + f);
                assert!(u >= draw.x - 0.001 && u <= draw.right() + 0.001, "{} {}", rotation, u);
                assert!(v >= draw.y - 0.001 && v <= draw.top() + 0.001, "{} {}", rotation, v);
            }
        }
    }

    #[test]
    fn test_label_uses_font_resource() {
        let mut doc = Document::with_version("1.7");
        let parent = doc.new_object_id();
        let font = create_helvetica_font(&mut doc);

        let mut page = PageContent::new(612.0, 792.0);
        page.draw_label(font, "7", 300.0, 0.0);
        let page_id = page.finish(&mut doc, parent);

        let content = content_of(&doc, page_id);
        assert!(content.contains("/F1 10 Tf"));
        assert!(content.contains("0.2 0.2 0.2 rg"));
        assert!(content.contains("300 0 Td (7) Tj"));

        let resources = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Resources")
            .unwrap()
            .as_dict()
            .unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert_eq!(fonts.get(b"F1").unwrap().as_reference().unwrap(), font);
        assert!(resources.get(b"XObject").is_err());
    }
}
