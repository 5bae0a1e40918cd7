//! Page geometry
//!
//! One routine decides the output page size and the content rectangle for
//! every composition: images turned into pages, images inserted into an
//! existing PDF, merged pages and re-hosted pages that get a page number.

use crate::types::PageSize;

use super::{LayoutRequest, LayoutResult, Rect};

/// Resolve the output page and the content placement for a request.
///
/// - `Fit`: the page is the content plus the margin on every side and the
///   content is never scaled.
/// - Fixed sizes: the preset (swapped for landscape) minus margins is the
///   printable area; content is scaled uniformly to fit it (upscaling
///   allowed) and centered.
pub fn resolve_layout(request: &LayoutRequest) -> LayoutResult {
    let margin = request.margin.points();
    let content_width = request.content_width_pt;
    let content_height = request.content_height_pt;

    // The printable area of a fit page is the content itself, so the draw
    // origin lands exactly on the margin.
    let (page_width, page_height, area) = match request
        .page_size
        .dimensions_with_orientation(request.orientation)
    {
        Some((width, height)) => (
            width,
            height,
            Rect::new(margin, margin, width - margin * 2.0, height - margin * 2.0),
        ),
        None => (
            content_width + margin * 2.0,
            content_height + margin * 2.0,
            Rect::new(margin, margin, content_width, content_height),
        ),
    };

    let scale = match request.page_size {
        PageSize::Fit => 1.0,
        PageSize::A4 | PageSize::Letter => {
            calculate_fit_scale(content_width, content_height, area.width, area.height)
        }
    };

    let draw_width = content_width * scale;
    let draw_height = content_height * scale;

    LayoutResult {
        page_width_pt: page_width,
        page_height_pt: page_height,
        draw: Rect::new(
            area.x + (area.width - draw_width) / 2.0,
            area.y + (area.height - draw_height) / 2.0,
            draw_width,
            draw_height,
        ),
        scale,
    }
}

/// Largest uniform scale that keeps the source inside the target.
fn calculate_fit_scale(src_width: f32, src_height: f32, target_width: f32, target_height: f32) -> f32 {
    let scale_w = target_width / src_width;
    let scale_h = target_height / src_height;
    scale_w.min(scale_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Margin, Orientation};

    const EPSILON: f32 = 0.01;

    fn request(w: f32, h: f32, size: PageSize, margin: Margin, o: Orientation) -> LayoutRequest {
        LayoutRequest::new(w, h, size, margin, o)
    }

    fn assert_centered(result: &LayoutResult) {
        assert!((result.draw.center_x() - result.page_width_pt / 2.0).abs() < EPSILON);
        assert!((result.draw.center_y() - result.page_height_pt / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_fit_page_wraps_content() {
        for margin in [Margin::None, Margin::Small, Margin::Big] {
            let result = resolve_layout(&request(
                300.0,
                200.0,
                PageSize::Fit,
                margin,
                Orientation::Portrait,
            ));
            let m = margin.points();

            assert_eq!(result.page_width_pt, 300.0 + m * 2.0);
            assert_eq!(result.page_height_pt, 200.0 + m * 2.0);
            assert_eq!(result.draw.width, 300.0);
            assert_eq!(result.draw.height, 200.0);
            assert_eq!(result.draw.x, m);
            assert_eq!(result.draw.y, m);
            assert_eq!(result.scale, 1.0);
            assert_centered(&result);
        }
    }

    #[test]
    fn test_fit_ignores_orientation() {
        let portrait = resolve_layout(&request(
            300.0,
            200.0,
            PageSize::Fit,
            Margin::Small,
            Orientation::Portrait,
        ));
        let landscape = resolve_layout(&request(
            300.0,
            200.0,
            PageSize::Fit,
            Margin::Small,
            Orientation::Landscape,
        ));
        assert_eq!(portrait, landscape);
    }

    #[test]
    fn test_fixed_page_scales_down_wide_content() {
        // 1190.56 wide content on portrait A4 without margins: width-limited, scale 0.5
        let result = resolve_layout(&request(
            1190.56,
            400.0,
            PageSize::A4,
            Margin::None,
            Orientation::Portrait,
        ));

        assert_eq!(result.page_width_pt, 595.28);
        assert_eq!(result.page_height_pt, 841.89);
        assert!((result.scale - 0.5).abs() < 0.0001);
        assert!((result.draw.width - 595.28).abs() < EPSILON);
        assert!((result.draw.height - 200.0).abs() < EPSILON);
        assert!(result.draw.x.abs() < EPSILON);
        assert_centered(&result);
    }

    #[test]
    fn test_fixed_page_upscales_small_content() {
        let result = resolve_layout(&request(
            10.0,
            10.0,
            PageSize::Letter,
            Margin::None,
            Orientation::Portrait,
        ));

        // Square content on 612x792 fills the width
        assert!((result.scale - 61.2).abs() < 0.001);
        assert!((result.draw.width - 612.0).abs() < EPSILON);
        assert!((result.draw.y - 90.0).abs() < EPSILON);
        assert_centered(&result);
    }

    #[test]
    fn test_landscape_swaps_preset() {
        let result = resolve_layout(&request(
            100.0,
            100.0,
            PageSize::Letter,
            Margin::Big,
            Orientation::Landscape,
        ));
        assert_eq!(result.page_width_pt, 792.0);
        assert_eq!(result.page_height_pt, 612.0);

        let printable_height = 612.0 - Margin::Big.points() * 2.0;
        assert!((result.draw.height - printable_height).abs() < EPSILON);
        assert!((result.draw.y - Margin::Big.points()).abs() < EPSILON);
        assert_centered(&result);
    }

    #[test]
    fn test_margin_widths() {
        assert_eq!(Margin::None.points(), 0.0);
        assert!((Margin::Small.points() - 10.0 * 2.83465).abs() < EPSILON);
        assert!((Margin::Big.points() - 20.0 * 2.83465).abs() < EPSILON);
    }

    #[test]
    fn test_draw_stays_inside_printable_area() {
        let sizes = [(50.0, 900.0), (900.0, 50.0), (595.0, 842.0), (1.0, 1.0)];
        for (w, h) in sizes {
            for margin in [Margin::None, Margin::Small, Margin::Big] {
                for orientation in [Orientation::Portrait, Orientation::Landscape] {
                    let result =
                        resolve_layout(&request(w, h, PageSize::A4, margin, orientation));
                    let m = margin.points();
                    assert!(result.draw.width <= result.page_width_pt - 2.0 * m + EPSILON);
                    assert!(result.draw.height <= result.page_height_pt - 2.0 * m + EPSILON);
                    assert!(result.draw.x >= m - EPSILON);
                    assert!(result.draw.y >= m - EPSILON);
                    assert_centered(&result);
                }
            }
        }
    }

}
