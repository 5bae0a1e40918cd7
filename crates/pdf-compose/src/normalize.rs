//! Image normalization
//!
//! Uploaded images arrive in any format the `image` crate can decode. PDF
//! embeds JPEG directly, so every image leaves this module as JPEG bytes
//! plus the pixel size and color space needed for the Image XObject.

use crate::constants::px_to_pt;
use crate::types::{ComposeError, ImageAsset, Result};
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat, Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use std::io::Cursor;

/// Color space of the embedded JPEG
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
}

/// How an image should be prepared for embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// JPEG quality (1-100) used when transcoding
    pub quality: u8,
    /// Embed unrotated gray/RGB JPEG uploads without re-encoding
    pub passthrough_jpeg: bool,
}

impl NormalizeOptions {
    pub fn transcode(quality: u8) -> Self {
        Self {
            quality,
            passthrough_jpeg: false,
        }
    }

    pub fn passthrough(quality: u8) -> Self {
        Self {
            quality,
            passthrough_jpeg: true,
        }
    }
}

/// An image ready to become an Image XObject
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    pub jpeg_bytes: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub color_space: ColorSpace,
}

impl NormalizedImage {
    /// Physical size in points at the given resolution
    pub fn size_pt(&self, dpi: u32) -> (f32, f32) {
        (px_to_pt(self.width_px, dpi), px_to_pt(self.height_px, dpi))
    }
}

/// Decode, rotate and re-encode an uploaded image as JPEG.
pub fn normalize(asset: &ImageAsset, options: &NormalizeOptions) -> Result<NormalizedImage> {
    let rotation = normalize_rotation(asset.rotation_degrees);

    if rotation == 0.0 && options.passthrough_jpeg {
        if let Some(image) = try_passthrough(&asset.bytes) {
            tracing::debug!(
                file = %asset.filename,
                width = image.width_px,
                height = image.height_px,
                "Embedding JPEG without re-encoding"
            );
            return Ok(image);
        }
    }

    let decoded = image::load_from_memory(&asset.bytes).map_err(|e| ComposeError::InvalidImage {
        name: asset.filename.clone(),
        reason: e.to_string(),
    })?;

    let rotated = rotate(decoded, rotation);
    encode_jpeg(&rotated, options.quality)
}

/// Map any angle into `[0, 360)`. Non-finite angles count as no rotation.
pub fn normalize_rotation(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Rotate clockwise. Quarter turns are exact; other angles rotate about the
/// centre on a canvas grown to hold the whole image, filled with black.
fn rotate(image: DynamicImage, degrees: f32) -> DynamicImage {
    match degrees {
        d if d == 0.0 => image,
        d if d == 90.0 => image.rotate90(),
        d if d == 180.0 => image.rotate180(),
        d if d == 270.0 => image.rotate270(),
        d => DynamicImage::ImageRgb8(rotate_expanded(&image.to_rgb8(), d)),
    }
}

fn rotate_expanded(image: &RgbImage, degrees: f32) -> RgbImage {
    let theta = degrees.to_radians();
    let (width, height) = (image.width() as f32, image.height() as f32);
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let canvas_width = (width * cos + height * sin).ceil().max(1.0) as u32;
    let canvas_height = (width * sin + height * cos).ceil().max(1.0) as u32;

    let mut canvas = RgbImage::from_pixel(canvas_width, canvas_height, Rgb([0, 0, 0]));
    let offset_x = (canvas_width as i64 - image.width() as i64) / 2;
    let offset_y = (canvas_height as i64 - image.height() as i64) / 2;
    image::imageops::overlay(&mut canvas, image, offset_x, offset_y);

    rotate_about_center(&canvas, theta, Interpolation::Bilinear, Rgb([0, 0, 0]))
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<NormalizedImage> {
    let quality = quality.clamp(1, 100);
    let mut jpeg_bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg_bytes, quality);

    let color_space = if image.color().has_color() {
        let rgb = image.to_rgb8();
        rgb.write_with_encoder(encoder)?;
        ColorSpace::Rgb
    } else {
        let luma = image.to_luma8();
        luma.write_with_encoder(encoder)?;
        ColorSpace::Gray
    };

    Ok(NormalizedImage {
        jpeg_bytes,
        width_px: image.width(),
        height_px: image.height(),
        color_space,
    })
}

/// Reuse the uploaded bytes when they are a JPEG PDF readers can show as-is
fn try_passthrough(bytes: &[u8]) -> Option<NormalizedImage> {
    if image::guess_format(bytes).ok()? != ImageFormat::Jpeg {
        return None;
    }
    let decoder = JpegDecoder::new(Cursor::new(bytes)).ok()?;
    let color_space = match decoder.color_type() {
        ColorType::L8 => ColorSpace::Gray,
        ColorType::Rgb8 => ColorSpace::Rgb,
        // CMYK and friends need Decode arrays; transcode instead
        _ => return None,
    };
    let (width_px, height_px) = decoder.dimensions();

    Some(NormalizedImage {
        jpeg_bytes: bytes.to_vec(),
        width_px,
        height_px,
        color_space,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([10, 120, 240]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    fn dimensions_of(jpeg: &[u8]) -> (u32, u32) {
        let decoded = image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg).unwrap();
        (decoded.width(), decoded.height())
    }

    #[test]
    fn test_png_is_transcoded() {
        let asset = ImageAsset::new(png_bytes(40, 20), "a.png");
        let out = normalize(&asset, &NormalizeOptions::transcode(85)).unwrap();

        assert_eq!((out.width_px, out.height_px), (40, 20));
        assert_eq!(out.color_space, ColorSpace::Rgb);
        assert_eq!(image::guess_format(&out.jpeg_bytes).unwrap(), ImageFormat::Jpeg);
        assert_eq!(dimensions_of(&out.jpeg_bytes), (40, 20));
    }

    #[test]
    fn test_quarter_turns_swap_dimensions() {
        for (degrees, expected) in [(90.0, (20, 40)), (180.0, (40, 20)), (-90.0, (20, 40))] {
            let asset = ImageAsset::new(png_bytes(40, 20), "a.png").with_rotation(degrees);
            let out = normalize(&asset, &NormalizeOptions::transcode(85)).unwrap();
            assert_eq!((out.width_px, out.height_px), expected, "{} degrees", degrees);
        }
    }

    #[test]
    fn test_arbitrary_angle_expands_canvas() {
        let asset = ImageAsset::new(png_bytes(100, 100), "a.png").with_rotation(45.0);
        let out = normalize(&asset, &NormalizeOptions::transcode(85)).unwrap();

        // 100 * sqrt(2) rounded up
        assert_eq!((out.width_px, out.height_px), (142, 142));
    }

    #[test]
    fn test_full_turn_is_no_rotation() {
        assert_eq!(normalize_rotation(360.0), 0.0);
        assert_eq!(normalize_rotation(-270.0), 90.0);
        assert_eq!(normalize_rotation(f32::NAN), 0.0);
    }

    #[test]
    fn test_jpeg_passthrough_keeps_bytes() {
        let original = jpeg_bytes(30, 10);
        let asset = ImageAsset::new(original.clone(), "a.jpg");

        let kept = normalize(&asset, &NormalizeOptions::passthrough(95)).unwrap();
        assert_eq!(kept.jpeg_bytes, original);
        assert_eq!((kept.width_px, kept.height_px), (30, 10));
        assert_eq!(kept.color_space, ColorSpace::Rgb);

        let rotated = normalize(
            &asset.clone().with_rotation(90.0),
            &NormalizeOptions::passthrough(95),
        )
        .unwrap();
        assert_ne!(rotated.jpeg_bytes, original);
        assert_eq!((rotated.width_px, rotated.height_px), (10, 30));
    }

    #[test]
    fn test_gray_images_stay_gray() {
        let img = GrayImage::from_pixel(8, 8, Luma([128]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let out = normalize(&ImageAsset::new(bytes, "g.png"), &NormalizeOptions::transcode(85))
            .unwrap();
        assert_eq!(out.color_space, ColorSpace::Gray);
    }

    #[test]
    fn test_garbage_names_the_image() {
        let asset = ImageAsset::new(b"not an image".to_vec(), "broken.png");
        let err = normalize(&asset, &NormalizeOptions::transcode(85)).unwrap_err();
        match err {
            ComposeError::InvalidImage { name, .. } => assert_eq!(name, "broken.png"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_size_in_points() {
        let image = NormalizedImage {
            jpeg_bytes: Vec::new(),
            width_px: 300,
            height_px: 600,
            color_space: ColorSpace::Rgb,
        };
        assert_eq!(image.size_pt(300), (72.0, 144.0));
        assert_eq!(image.size_pt(72), (300.0, 600.0));
    }
}
