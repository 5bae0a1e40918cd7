//! Multipart form decoding
//!
//! Forms send images as `images[N][file]`, `images[N][rotation]` and
//! `images[N][index]`, merge inputs as `pdfs[N]`, a single `pdf`, and a
//! `settings` JSON string. Indexed entries are kept in order of `N`.

use crate::error::{AppError, Result};
use axum::extract::Multipart;
use pdf_compose::{ImageAsset, PdfAsset, RawSettings};
use std::collections::BTreeMap;

/// One `images[N]` group
#[derive(Debug, Default)]
pub struct ImageField {
    pub file: Option<(Vec<u8>, String)>,
    pub rotation: Option<String>,
    pub index: Option<String>,
}

/// Everything a form submitted
#[derive(Debug, Default)]
pub struct Upload {
    pub images: BTreeMap<usize, ImageField>,
    pub pdf: Option<PdfAsset>,
    pub pdfs: BTreeMap<usize, PdfAsset>,
    pub settings: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum FieldName<'a> {
    Image(usize, &'a str),
    Pdfs(usize),
    Pdf,
    Settings,
    Other,
}

fn parse_field_name(name: &str) -> FieldName<'_> {
    if name == "pdf" {
        return FieldName::Pdf;
    }
    if name == "settings" {
        return FieldName::Settings;
    }
    if let Some(rest) = name.strip_prefix("images[") {
        if let Some((n, rest)) = rest.split_once("][") {
            if let (Ok(n), Some(key)) = (n.parse(), rest.strip_suffix(']')) {
                return FieldName::Image(n, key);
            }
        }
    }
    if let Some(n) = name.strip_prefix("pdfs[").and_then(|rest| rest.strip_suffix(']')) {
        if let Ok(n) = n.parse() {
            return FieldName::Pdfs(n);
        }
    }
    FieldName::Other
}

impl Upload {
    /// Drain every field of the request
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut upload = Upload::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);

            match parse_field_name(&name) {
                FieldName::Image(n, "file") => {
                    let bytes = field.bytes().await?.to_vec();
                    let file_name = file_name.unwrap_or_else(|| format!("image_{}", n));
                    upload.images.entry(n).or_default().file = Some((bytes, file_name));
                }
                FieldName::Image(n, "rotation") => {
                    upload.images.entry(n).or_default().rotation = Some(field.text().await?);
                }
                FieldName::Image(n, "index") => {
                    upload.images.entry(n).or_default().index = Some(field.text().await?);
                }
                FieldName::Pdfs(n) => {
                    let bytes = field.bytes().await?.to_vec();
                    let file_name = file_name.unwrap_or_else(|| format!("pdf_{}.pdf", n));
                    upload.pdfs.insert(n, PdfAsset::new(bytes, file_name));
                }
                FieldName::Pdf => {
                    let bytes = field.bytes().await?.to_vec();
                    let file_name = file_name.unwrap_or_else(|| "input.pdf".to_string());
                    upload.pdf = Some(PdfAsset::new(bytes, file_name));
                }
                FieldName::Settings => upload.settings = Some(field.text().await?),
                FieldName::Image(..) | FieldName::Other => {
                    tracing::debug!(field = %name, "Ignoring unknown form field");
                }
            }
        }

        Ok(upload)
    }

    /// Parsed settings; an absent field reads as `{}`
    pub fn settings(&self) -> Result<RawSettings> {
        match self.settings.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => Ok(RawSettings::from_json(json)?),
            _ => Ok(RawSettings::default()),
        }
    }

    /// Images in form order, skipping groups without a file
    pub fn take_images(&mut self) -> Result<Vec<ImageAsset>> {
        let images: Vec<ImageAsset> = std::mem::take(&mut self.images)
            .into_values()
            .filter_map(|field| {
                let (bytes, name) = field.file?;
                let rotation = parse_rotation(field.rotation.as_deref());
                Some(ImageAsset::new(bytes, name).with_rotation(rotation))
            })
            .collect();

        if images.is_empty() {
            return Err(AppError::validation("No images provided"));
        }
        Ok(images)
    }

    /// Images that carry both a file and a target page index
    pub fn take_positioned_images(&mut self) -> Result<Vec<ImageAsset>> {
        let mut images = Vec::new();
        for field in std::mem::take(&mut self.images).into_values() {
            let (Some((bytes, name)), Some(index)) = (field.file, field.index) else {
                continue;
            };
            let position = parse_position(&index).ok_or_else(|| {
                AppError::validation(format!("Invalid page index '{}' for image '{}'", index, name))
            })?;
            let rotation = parse_rotation(field.rotation.as_deref());
            images.push(
                ImageAsset::new(bytes, name)
                    .with_rotation(rotation)
                    .at_position(position),
            );
        }

        if images.is_empty() {
            return Err(AppError::validation("No images provided"));
        }
        Ok(images)
    }

    pub fn take_pdf(&mut self) -> Result<PdfAsset> {
        self.pdf
            .take()
            .ok_or_else(|| AppError::validation("No PDF provided"))
    }

    /// Merge inputs in form order
    pub fn take_pdfs(&mut self) -> Result<Vec<PdfAsset>> {
        let pdfs: Vec<PdfAsset> = std::mem::take(&mut self.pdfs).into_values().collect();
        if pdfs.is_empty() {
            return Err(AppError::validation("No PDF provided"));
        }
        Ok(pdfs)
    }
}

/// Rotation in degrees; anything unparsable means none
fn parse_rotation(value: Option<&str>) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// 1-based page position; negative values pin to the front
fn parse_position(value: &str) -> Option<usize> {
    let position: i64 = value.trim().parse().ok()?;
    Some(position.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(parse_field_name("images[0][file]"), FieldName::Image(0, "file"));
        assert_eq!(parse_field_name("images[12][rotation]"), FieldName::Image(12, "rotation"));
        assert_eq!(parse_field_name("pdfs[3]"), FieldName::Pdfs(3));
        assert_eq!(parse_field_name("pdf"), FieldName::Pdf);
        assert_eq!(parse_field_name("settings"), FieldName::Settings);
        assert_eq!(parse_field_name("images[x][file]"), FieldName::Other);
        assert_eq!(parse_field_name("pdfs[]"), FieldName::Other);
        assert_eq!(parse_field_name("avatar"), FieldName::Other);
    }

    #[test]
    fn test_images_follow_field_order() {
        let mut upload = Upload::default();
        for (n, name) in [(10, "c.png"), (2, "a.png"), (5, "b.png")] {
            upload.images.insert(
                n,
                ImageField {
                    file: Some((vec![1], name.to_string())),
                    ..Default::default()
                },
            );
        }
        upload.images.insert(7, ImageField::default());

        let names: Vec<String> = upload
            .take_images()
            .unwrap()
            .into_iter()
            .map(|image| image.filename)
            .collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_positioned_images() {
        let mut upload = Upload::default();
        upload.images.insert(
            0,
            ImageField {
                file: Some((vec![1], "a.png".into())),
                rotation: Some("90".into()),
                index: Some(" 3 ".into()),
            },
        );
        // No index: skipped
        upload.images.insert(
            1,
            ImageField {
                file: Some((vec![1], "b.png".into())),
                ..Default::default()
            },
        );

        let images = upload.take_positioned_images().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].target_position, Some(3));
        assert_eq!(images[0].rotation_degrees, 90.0);
    }

    #[test]
    fn test_bad_index_names_the_image() {
        let mut upload = Upload::default();
        upload.images.insert(
            0,
            ImageField {
                file: Some((vec![1], "scan.jpg".into())),
                index: Some("first".into()),
                ..Default::default()
            },
        );
        let err = upload.take_positioned_images().unwrap_err();
        assert!(err.to_string().contains("scan.jpg"));
    }

    #[test]
    fn test_missing_inputs() {
        let mut upload = Upload::default();
        assert_eq!(upload.take_images().unwrap_err().to_string(), "No images provided");
        assert_eq!(upload.take_pdf().unwrap_err().to_string(), "No PDF provided");
        assert_eq!(upload.take_pdfs().unwrap_err().to_string(), "No PDF provided");
    }

    #[test]
    fn test_rotation_and_position_parsing() {
        assert_eq!(parse_rotation(Some("45.5")), 45.5);
        assert_eq!(parse_rotation(Some("abc")), 0.0);
        assert_eq!(parse_rotation(None), 0.0);
        assert_eq!(parse_position("-4"), Some(0));
        assert_eq!(parse_position("7"), Some(7));
        assert_eq!(parse_position("2.5"), None);
    }

    #[test]
    fn test_settings_default_to_empty() {
        let upload = Upload::default();
        assert_eq!(upload.settings().unwrap(), RawSettings::default());

        let upload = Upload {
            settings: Some("{oops".into()),
            ..Default::default()
        };
        assert!(upload.settings().is_err());
    }
}
