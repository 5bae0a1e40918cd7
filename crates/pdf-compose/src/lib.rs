//! Page composition for the PDF tools service
//!
//! Turns images into pages, inserts image pages into existing documents,
//! merges documents and stamps page numbers. All output pages are laid out
//! by [`layout::resolve_layout`]; the async entry points in [`compose`] do
//! the document work on the blocking pool.

pub mod compose;
pub mod constants;
pub mod layout;
pub mod normalize;
pub mod numbering;
mod options;
pub mod render;
mod types;

pub use compose::{add_page_numbers, add_pages, images_to_pdf, merge_pdfs};
pub use options::*;
pub use types::*;
