//! Page label text and placement

use crate::constants::{HELVETICA_DEFAULT_WIDTH, HELVETICA_WIDTHS, PAGE_NUMBER_FONT_SIZE};
use crate::types::{HorizontalAlign, PageNumberFormat, PageNumberPosition, PageNumberSpec, VerticalAnchor};

const ROMAN_NUMERALS: [(usize, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Largest number written with standard Roman numerals
pub const MAX_ROMAN: usize = 3999;

/// Uppercase Roman numeral, or `None` outside `1..=MAX_ROMAN`
pub fn to_roman(mut n: usize) -> Option<String> {
    if n == 0 || n > MAX_ROMAN {
        return None;
    }
    let mut out = String::new();
    for &(value, numeral) in ROMAN_NUMERALS.iter() {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    Some(out)
}

/// Label for the page at 0-based `index` of a `total`-page document.
///
/// Roman labels past [`MAX_ROMAN`] are written in arabic digits.
pub fn format_page_label(spec: &PageNumberSpec, index: usize, total: usize) -> String {
    let n = spec.start.saturating_add(index);
    match spec.format {
        PageNumberFormat::Arabic => n.to_string(),
        PageNumberFormat::Roman => to_roman(n).unwrap_or_else(|| n.to_string()),
        PageNumberFormat::PageN => format!("Page {}", n),
        PageNumberFormat::PageNOfM => format!("Page {} of {}", n, total),
        PageNumberFormat::NSlashM => format!("{} / {}", n, total),
    }
}

/// Width of `text` set in Helvetica at `size` points
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|ch| {
            let code = ch as u32;
            if (32..127).contains(&code) {
                HELVETICA_WIDTHS[(code - 32) as usize] as u32
            } else {
                HELVETICA_DEFAULT_WIDTH as u32
            }
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Baseline origin for a label on a `page_width` x `page_height` page.
///
/// Horizontal: left and right sit on the margin, center ignores it.
/// Vertical: bottom labels sit on the margin, top labels one font size
/// below it.
pub fn label_origin(
    position: PageNumberPosition,
    page_width: f32,
    page_height: f32,
    margin: f32,
    label_width: f32,
) -> (f32, f32) {
    let x = match position.horizontal {
        HorizontalAlign::Left => margin,
        HorizontalAlign::Center => (page_width - label_width) / 2.0,
        HorizontalAlign::Right => page_width - margin - label_width,
    };
    let y = match position.vertical {
        VerticalAnchor::Top => page_height - margin - PAGE_NUMBER_FONT_SIZE,
        VerticalAnchor::Bottom => margin,
    };
    (x, y)
}
