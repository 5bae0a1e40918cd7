//! Shared constants for PDF composition
//!
//! This module centralizes magic numbers and constants used throughout
//! the page geometry, image embedding and page-numbering code.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter, rounded the way the margin presets are defined
pub const POINTS_PER_MM: f32 = 2.83465;

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert a pixel length to points at the given resolution
#[inline]
pub fn px_to_pt(px: u32, dpi: u32) -> f32 {
    px as f32 / dpi as f32 * POINTS_PER_INCH
}

// =============================================================================
// Page Dimensions
// =============================================================================

/// ISO A4 in points (portrait)
pub const A4_DIMENSIONS_PT: (f32, f32) = (595.28, 841.89);

/// US Letter in points (portrait)
pub const LETTER_DIMENSIONS_PT: (f32, f32) = (612.0, 792.0);

/// Fallback when a source page has no usable MediaBox
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = LETTER_DIMENSIONS_PT;

// =============================================================================
// Images
// =============================================================================

/// Resolution assumed for uploaded images when none is given
pub const DEFAULT_DPI: u32 = 300;

/// JPEG quality used when converting images to a new PDF
pub const IMAGE_TO_PDF_QUALITY: u8 = 85;

/// JPEG quality used when inserting images into an existing PDF
pub const ADD_PAGES_QUALITY: u8 = 95;

// =============================================================================
// Page Numbers
// =============================================================================

/// Font size for stamped page numbers (points)
pub const PAGE_NUMBER_FONT_SIZE: f32 = 10.0;

/// Gray level of stamped page numbers (0 = black)
pub const PAGE_NUMBER_GRAY: f32 = 0.2;

/// Advance width used for characters missing from [`HELVETICA_WIDTHS`]
pub const HELVETICA_DEFAULT_WIDTH: u16 = 556;

/// Helvetica advance widths (1/1000 em) for printable ASCII, starting at U+0020.
/// Values from the Adobe Core 14 AFM metrics.
pub const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];
