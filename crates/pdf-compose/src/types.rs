use crate::constants::{A4_DIMENSIONS_PT, LETTER_DIMENSIONS_PT, mm_to_pt};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Invalid image '{name}': {reason}")]
    InvalidImage { name: String, reason: String },
    #[error("Invalid PDF '{name}': {reason}")]
    InvalidDocument { name: String, reason: String },
    #[error("No pages to compose")]
    NoPages,
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ComposeError {
    /// True when the failure was caused by the caller's input rather than by
    /// the PDF or imaging libraries.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ComposeError::InvalidSettings(_)
                | ComposeError::InvalidImage { .. }
                | ComposeError::InvalidDocument { .. }
                | ComposeError::NoPages
        )
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Output page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    /// Page sized exactly to its content plus margins
    Fit,
}

impl PageSize {
    /// Preset dimensions in points (portrait), `None` for [`PageSize::Fit`]
    pub fn dimensions_pt(self) -> Option<(f32, f32)> {
        match self {
            PageSize::A4 => Some(A4_DIMENSIONS_PT),
            PageSize::Letter => Some(LETTER_DIMENSIONS_PT),
            PageSize::Fit => None,
        }
    }

    /// Preset dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> Option<(f32, f32)> {
        self.dimensions_pt().map(|(w, h)| match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        })
    }
}

impl FromStr for PageSize {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A4" => Ok(PageSize::A4),
            "LETTER" | "USLETTER" => Ok(PageSize::Letter),
            "FIT" => Ok(PageSize::Fit),
            _ => Err(ComposeError::InvalidSettings(format!(
                "Unknown page size '{}'",
                s
            ))),
        }
    }
}

/// Uniform padding around page content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Margin {
    #[default]
    None,
    /// 10 mm
    Small,
    /// 20 mm
    Big,
}

impl Margin {
    pub fn points(self) -> f32 {
        match self {
            Margin::None => 0.0,
            Margin::Small => mm_to_pt(10.0),
            Margin::Big => mm_to_pt(20.0),
        }
    }
}

impl FromStr for Margin {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Margin::None),
            "small" => Ok(Margin::Small),
            "big" => Ok(Margin::Big),
            _ => Err(ComposeError::InvalidSettings(format!(
                "Invalid margin value '{}'",
                s
            ))),
        }
    }
}

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Portrait: height > width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

impl FromStr for Orientation {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(ComposeError::InvalidSettings(format!(
                "Unknown orientation '{}'",
                s
            ))),
        }
    }
}

/// An uploaded image waiting to become a page
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Clockwise rotation in degrees
    pub rotation_degrees: f32,
    /// 1-based position in the final document (add-pages only)
    pub target_position: Option<usize>,
}

impl ImageAsset {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            rotation_degrees: 0.0,
            target_position: None,
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.target_position = Some(position);
        self
    }
}

/// An uploaded PDF
#[derive(Debug, Clone)]
pub struct PdfAsset {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl PdfAsset {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }
}

/// Page-number text style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageNumberFormat {
    /// `7`
    #[default]
    Arabic,
    /// `VII`
    Roman,
    /// `Page 7`
    PageN,
    /// `Page 7 of 10`
    PageNOfM,
    /// `7 / 10`
    NSlashM,
}

impl FromStr for PageNumberFormat {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "arabic" => Ok(PageNumberFormat::Arabic),
            "roman" => Ok(PageNumberFormat::Roman),
            "page-n" => Ok(PageNumberFormat::PageN),
            "page-n-of-m" => Ok(PageNumberFormat::PageNOfM),
            "n-slash-m" => Ok(PageNumberFormat::NSlashM),
            _ => Err(ComposeError::InvalidSettings(format!(
                "Unknown page number format '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAnchor {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Where the page number is drawn, e.g. `bottom-center`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageNumberPosition {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAlign,
}

impl FromStr for PageNumberPosition {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ComposeError::InvalidSettings(format!("Unknown position '{}'", s));
        let (vertical, horizontal) = s.split_once('-').ok_or_else(invalid)?;

        let vertical = match vertical {
            "top" => VerticalAnchor::Top,
            "bottom" => VerticalAnchor::Bottom,
            _ => return Err(invalid()),
        };
        let horizontal = match horizontal {
            "left" => HorizontalAlign::Left,
            "center" => HorizontalAlign::Center,
            "right" => HorizontalAlign::Right,
            _ => return Err(invalid()),
        };

        Ok(Self {
            vertical,
            horizontal,
        })
    }
}

impl fmt::Display for PageNumberPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertical = match self.vertical {
            VerticalAnchor::Top => "top",
            VerticalAnchor::Bottom => "bottom",
        };
        let horizontal = match self.horizontal {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "right",
        };
        write!(f, "{}-{}", vertical, horizontal)
    }
}

/// Page numbering configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumberSpec {
    pub format: PageNumberFormat,
    pub position: PageNumberPosition,
    /// Number printed on the first page (always >= 1)
    pub start: usize,
}

impl Default for PageNumberSpec {
    fn default() -> Self {
        Self {
            format: PageNumberFormat::Arabic,
            position: PageNumberPosition::default(),
            start: 1,
        }
    }
}
