use crate::constants::DEFAULT_DPI;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Validated page setup shared by image conversion, page insertion and
/// page numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSettings {
    pub page_size: PageSize,
    pub margin: Margin,
    pub orientation: Orientation,
    /// Resolution used to turn image pixels into points
    pub dpi: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            margin: Margin::default(),
            orientation: Orientation::default(),
            dpi: DEFAULT_DPI,
        }
    }
}

impl LayoutSettings {
    pub fn new(page_size: PageSize, margin: Margin, orientation: Orientation) -> Self {
        Self {
            page_size,
            margin,
            orientation,
            dpi: DEFAULT_DPI,
        }
    }

    /// Set the resolution; zero falls back to the default
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = if dpi == 0 { DEFAULT_DPI } else { dpi };
        self
    }
}

/// The `settings` JSON sent with every form, before validation.
///
/// Numbers are accepted as JSON numbers or numeric strings, since HTML
/// forms send everything as text.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSettings {
    pub page_size: Option<String>,
    pub margin: Option<String>,
    pub orientation: Option<String>,
    pub dpi: Option<serde_json::Value>,
    pub page_number_format: Option<String>,
    pub position: Option<String>,
    pub page_number_start: Option<serde_json::Value>,
}

#[cfg(feature = "serde")]
impl RawSettings {
    /// Parse the settings field of a form submission
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ComposeError::InvalidSettings(format!("Malformed settings JSON: {}", e)))
    }

    /// Page setup for image conversion, page insertion and page numbering.
    ///
    /// Page size, margin and orientation are required.
    pub fn layout(&self) -> Result<LayoutSettings> {
        let page_size: PageSize = required(&self.page_size, "pageSize")?.parse()?;
        let margin: Margin = required(&self.margin, "margin")?.parse()?;
        let orientation: Orientation = required(&self.orientation, "orientation")?.parse()?;

        let dpi = self
            .dpi
            .as_ref()
            .and_then(leading_integer)
            .filter(|&dpi| dpi > 0)
            .map(|dpi| dpi.min(u32::MAX as i64) as u32)
            .unwrap_or(DEFAULT_DPI);

        Ok(LayoutSettings {
            page_size,
            margin,
            orientation,
            dpi,
        })
    }

    /// Margin for merging; optional, defaulting to none
    pub fn merge_margin(&self) -> Result<Margin> {
        match non_empty(&self.margin) {
            Some(margin) => margin.parse(),
            None => Ok(Margin::None),
        }
    }

    /// Page-number style. Format and position default when absent; the
    /// start is clamped to at least 1.
    pub fn page_numbers(&self) -> Result<PageNumberSpec> {
        let defaults = PageNumberSpec::default();

        let format = match non_empty(&self.page_number_format) {
            Some(format) => format.parse()?,
            None => defaults.format,
        };
        let position = match non_empty(&self.position) {
            Some(position) => position.parse()?,
            None => defaults.position,
        };
        let start = self
            .page_number_start
            .as_ref()
            .and_then(leading_integer)
            .filter(|&start| start >= 1)
            .map(|start| usize::try_from(start).unwrap_or(usize::MAX))
            .unwrap_or(1);

        Ok(PageNumberSpec {
            format,
            position,
            start,
        })
    }
}

#[cfg(feature = "serde")]
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(feature = "serde")]
fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    non_empty(value)
        .ok_or_else(|| ComposeError::InvalidSettings(format!("Missing required setting: {}", field)))
}

/// Integer prefix of a number or numeric string (`"300dpi"` reads as 300)
#[cfg(feature = "serde")]
fn leading_integer(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            let digits_end = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
                .map(|(i, _)| i)
                .unwrap_or(s.len());
            s[..digits_end].parse().ok()
        }
        _ => None,
    }
}
