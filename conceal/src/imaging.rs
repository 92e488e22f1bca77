//! Image operations used to build a preview.
//!
//! Thin wrappers over the `image` crate: decode, Gaussian blur, proportional
//! downscaling, centered compositing and PNG encoding. All functions work on
//! [`RgbaImage`] so alpha survives every stage.

use crate::error::{Error, Result};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Default Gaussian blur sigma applied to the source image.
pub const DEFAULT_BLUR_SIGMA: f32 = 10.0;

/// Fully transparent white, the background of the compositing canvas.
const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Decode an encoded image (PNG, JPEG, WebP) into RGBA pixels.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes)
        .map_err(Error::Decode)?
        .to_rgba8();
    ensure_not_empty(&image)?;
    debug!(
        width = image.width(),
        height = image.height(),
        "decoded source image"
    );
    Ok(image)
}

/// Apply a Gaussian blur. A non-positive sigma leaves the image untouched.
#[must_use]
pub fn blur(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma <= 0.0 {
        return image.clone();
    }
    imageops::blur(image, sigma)
}

/// Largest watermark height allowed over a source of the given height.
#[must_use]
pub const fn max_overlay_height(source_height: u32) -> u32 {
    source_height / 3
}

/// Width of an image of `width`×`height` scaled to `new_height`, truncated.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // bounded by the scaled width
pub fn scaled_width(width: u32, height: u32, new_height: u32) -> u32 {
    if height == 0 {
        return width;
    }
    let aspect = f64::from(width) / f64::from(height);
    ((f64::from(new_height) * aspect) as u32).max(1)
}

/// Downscale `image` so its height does not exceed `max_height`, keeping the
/// aspect ratio. Images already within bounds are returned unchanged.
#[must_use]
pub fn fit_height(image: RgbaImage, max_height: u32) -> RgbaImage {
    let max_height = max_height.max(1);
    let (width, height) = image.dimensions();
    if height <= max_height {
        return image;
    }

    let new_width = scaled_width(width, height, max_height);
    debug!(
        from = ?(width, height),
        to = ?(new_width, max_height),
        "scaling overlay"
    );
    imageops::resize(&image, new_width, max_height, FilterType::Lanczos3)
}

/// Offset that centers `inner` inside `outer`, flooring like integer
/// division. Negative when `inner` is larger.
#[must_use]
pub fn centered_offset(outer: (u32, u32), inner: (u32, u32)) -> (i64, i64) {
    let x = (i64::from(outer.0) - i64::from(inner.0)).div_euclid(2);
    let y = (i64::from(outer.1) - i64::from(inner.1)).div_euclid(2);
    (x, y)
}

/// Paste `base` onto a transparent canvas of its own size, then alpha-blend
/// `overlay` centered on top.
#[must_use]
pub fn composite_centered(base: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let (width, height) = base.dimensions();
    let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);
    imageops::replace(&mut canvas, base, 0, 0);

    let (x, y) = centered_offset(base.dimensions(), overlay.dimensions());
    imageops::overlay(&mut canvas, overlay, x, y);
    canvas
}

/// Encode RGBA pixels as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(Error::Encode)?;
    Ok(buf)
}

fn ensure_not_empty(image: &RgbaImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::EmptyImage);
    }
    Ok(())
}

/// The fixed overlay composited onto every preview.
#[derive(Debug, Clone)]
pub struct Watermark {
    image: RgbaImage,
}

impl Watermark {
    /// Load the watermark from disk.
    ///
    /// A missing or undecodable file is a configuration error and is
    /// reported as [`Error::Asset`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| Error::Asset {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        ensure_not_empty(&image)?;
        debug!(path = %path.display(), "watermark loaded");
        Ok(Self { image })
    }

    /// Build a watermark from encoded bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes).map(Self::from_image)
    }

    /// Wrap already decoded pixels.
    #[must_use]
    pub const fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Watermark dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// The watermark scaled for a source of `source_height` pixels.
    #[must_use]
    pub fn scaled_for(&self, source_height: u32) -> RgbaImage {
        fit_height(self.image.clone(), max_overlay_height(source_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_tall_watermark_scaled_to_third() {
        let source_height = 900;
        let scaled = fit_height(solid(300, 600, [0, 0, 0, 255]), max_overlay_height(source_height));

        assert_eq!(scaled.height(), 300);
        assert_eq!(scaled.width(), 150);
    }

    #[test]
    fn test_truncating_height_and_aspect() {
        // 1000 / 3 = 333 (truncated)
        let scaled = fit_height(solid(400, 500, [0, 0, 0, 255]), max_overlay_height(1000));
        assert_eq!(scaled.height(), 333);

        let original = 400.0 / 500.0;
        let actual = f64::from(scaled.width()) / f64::from(scaled.height());
        assert!((original - actual).abs() < 1.0 / 333.0 + f64::EPSILON);
    }

    #[test]
    fn test_small_watermark_untouched() {
        let scaled = fit_height(solid(100, 70, [0, 0, 0, 255]), max_overlay_height(300));
        assert_eq!(scaled.dimensions(), (100, 70));
    }

    #[test]
    fn test_scaled_width_truncates() {
        assert_eq!(scaled_width(7, 3, 2), 4);
        assert_eq!(scaled_width(1, 1000, 1), 1);
    }

    #[test]
    fn test_tiny_source_keeps_one_pixel_overlay() {
        let scaled = fit_height(solid(10, 10, [0, 0, 0, 255]), max_overlay_height(2));
        assert_eq!(scaled.height(), 1);
    }

    #[test]
    fn test_centered_offset() {
        assert_eq!(centered_offset((10, 10), (2, 2)), (4, 4));
        assert_eq!(centered_offset((11, 10), (2, 3)), (4, 3));
        // Wider overlay floors to a negative offset.
        assert_eq!(centered_offset((10, 10), (13, 2)), (-2, 4));
    }

    #[test]
    fn test_composite_centered() {
        let base = solid(10, 10, [255, 0, 0, 255]);
        let overlay = solid(2, 2, [0, 0, 255, 255]);
        let out = composite_centered(&base, &overlay);

        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(out.get_pixel(4, 4), &Rgba([0, 0, 255, 255]));
        assert_eq!(out.get_pixel(5, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(6, 6), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_transparent_overlay_keeps_base() {
        let base = solid(4, 4, [10, 20, 30, 255]);
        let overlay = solid(2, 2, [0, 0, 0, 0]);
        let out = composite_centered(&base, &overlay);
        assert_eq!(out, base);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_png_is_decodable() {
        let image = solid(3, 5, [1, 2, 3, 128]);
        let png = encode_png(&image).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
        assert_eq!(decode(&png).unwrap(), image);
    }

    #[test]
    fn test_blur_is_deterministic() {
        let mut image = solid(16, 16, [0, 0, 0, 255]);
        image.put_pixel(8, 8, Rgba([255, 255, 255, 255]));

        let first = blur(&image, 2.0);
        let second = blur(&image, 2.0);
        assert_eq!(first, second);
        assert_ne!(first, image);
        assert_eq!(blur(&image, 0.0), image);
    }

    #[test]
    fn test_missing_watermark_is_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Watermark::load(dir.path().join("watermark.png")).unwrap_err();
        assert!(matches!(err, Error::Asset { .. }));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_watermark_scaled_for() {
        let watermark = Watermark::from_image(solid(60, 120, [0, 0, 0, 255]));
        assert_eq!(watermark.scaled_for(90).dimensions(), (15, 30));
        assert_eq!(watermark.scaled_for(900).dimensions(), (60, 120));
    }
}
