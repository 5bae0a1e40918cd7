//! Fresh output documents with a flat page tree

use crate::render::PageContent;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// A new document whose pages all hang off one `Pages` node
pub(crate) struct OutputDocument {
    pub doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl OutputDocument {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Append a page after the ones already pushed
    pub fn push(&mut self, page: PageContent) -> ObjectId {
        let page_id = page.finish(&mut self.doc, self.pages_id);
        self.kids.push(Object::Reference(page_id));
        page_id
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Write the page tree and catalog
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        self.doc
    }
}
