//! Layout data types shared by the geometry resolver and the renderers

use crate::types::{Margin, Orientation, PageSize};

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Input to [`resolve_layout`](super::resolve_layout)
///
/// Content dimensions are in points and must be positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRequest {
    pub content_width_pt: f32,
    pub content_height_pt: f32,
    pub page_size: PageSize,
    pub margin: Margin,
    pub orientation: Orientation,
}

impl LayoutRequest {
    pub fn new(
        content_width_pt: f32,
        content_height_pt: f32,
        page_size: PageSize,
        margin: Margin,
        orientation: Orientation,
    ) -> Self {
        Self {
            content_width_pt,
            content_height_pt,
            page_size,
            margin,
            orientation,
        }
    }
}

/// Output of [`resolve_layout`](super::resolve_layout): the page to create
/// and where its content goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    /// Scaled, centered content rectangle
    pub draw: Rect,
    /// Uniform scale applied to the content
    pub scale: f32,
}
