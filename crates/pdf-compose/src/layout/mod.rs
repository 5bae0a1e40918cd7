//! Layout calculations shared by every composition
//!
//! - Page geometry (page size, margins, scaled and centered content)
//! - Insertion planning (where new pages land in a growing document)

mod geometry;
mod insertion;
mod types;

pub use geometry::*;
pub use insertion::*;
pub use types::*;
