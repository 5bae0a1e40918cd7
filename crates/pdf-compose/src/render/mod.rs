//! PDF object construction
//!
//! - Wrapping source pages as Form XObjects (with deep resource copies)
//! - Embedding JPEG data as Image XObjects
//! - Building output pages that draw one XObject and an optional label

mod page;
mod xobject;

pub use page::*;
pub use xobject::*;
