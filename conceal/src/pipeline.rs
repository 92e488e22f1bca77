//! The preview pipeline.
//!
//! [`Pipeline::render`] turns a source image into an [`ArtifactPair`]:
//!
//! 1. decode the source
//! 2. blur it
//! 3. scale the watermark to at most a third of the source height
//! 4. composite the watermark centered over the blurred image
//! 5. encode the result as PNG
//! 6. embed it in a single-page PDF whose whole page links to the redirect URL
//!
//! The watermark is loaded once when the pipeline is built, so a missing
//! asset fails at startup rather than on the first request.

use crate::artifact::{Artifact, ArtifactPair, artifact_stem};
use crate::document::{PageSize, SinglePageDocument};
use crate::error::{Error, Result};
use crate::imaging::{self, DEFAULT_BLUR_SIGMA, Watermark};
use chrono::{DateTime, Local};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};
use url::Url;

/// Where the source image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A file on disk, typically a catalog template.
    Path(PathBuf),
    /// Encoded image bytes, typically an upload.
    Bytes(Vec<u8>),
}

impl ImageSource {
    fn load(&self) -> Result<RgbaImage> {
        match self {
            Self::Path(path) => {
                let bytes = std::fs::read(path).map_err(|source| Error::Template {
                    path: path.clone(),
                    source,
                })?;
                imaging::decode(&bytes)
            }
            Self::Bytes(bytes) => imaging::decode(bytes),
        }
    }

    /// Short description for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<{} uploaded bytes>", bytes.len()),
        }
    }
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path of the watermark image.
    pub watermark: PathBuf,
    /// Gaussian blur sigma applied to the source.
    pub blur_sigma: f32,
    /// Page size of the generated document.
    pub page: PageSize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            watermark: PathBuf::from("assets/watermark.png"),
            blur_sigma: DEFAULT_BLUR_SIGMA,
            page: PageSize::A4,
        }
    }
}

/// Check that `url` is an absolute http(s) URL with a host.
pub fn validate_redirect_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::invalid_url(url, e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::invalid_url(url, "scheme must be http or https"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_url(url, "missing host"));
    }
    Ok(parsed)
}

/// Blur + watermark + linked PDF.
#[derive(Debug, Clone)]
pub struct Pipeline {
    watermark: Watermark,
    blur_sigma: f32,
    page: PageSize,
}

impl Pipeline {
    /// Build a pipeline, loading the watermark from `config.watermark`.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let watermark = Watermark::load(&config.watermark)?;
        info!(
            watermark = %config.watermark.display(),
            size = ?watermark.dimensions(),
            "pipeline ready"
        );
        Ok(Self::with_watermark(watermark, config))
    }

    /// Build a pipeline around an already loaded watermark.
    #[must_use]
    pub const fn with_watermark(watermark: Watermark, config: &PipelineConfig) -> Self {
        Self {
            watermark,
            blur_sigma: config.blur_sigma,
            page: config.page,
        }
    }

    /// Blur `source` and composite the scaled watermark over it.
    #[must_use]
    pub fn composite(&self, source: &RgbaImage) -> RgbaImage {
        let blurred = imaging::blur(source, self.blur_sigma);
        let overlay = self.watermark.scaled_for(source.height());
        imaging::composite_centered(&blurred, &overlay)
    }

    /// Render `source` into an artifact pair linking to `redirect_url`.
    pub fn render(&self, source: &ImageSource, redirect_url: &str) -> Result<ArtifactPair> {
        self.render_at(source, redirect_url, Local::now())
    }

    /// Like [`render`](Self::render) with an explicit timestamp for naming.
    pub fn render_at(
        &self,
        source: &ImageSource,
        redirect_url: &str,
        at: DateTime<Local>,
    ) -> Result<ArtifactPair> {
        let url = validate_redirect_url(redirect_url)?;

        let image = source.load()?;
        debug!(source = %source.describe(), "rendering preview");

        let composited = self.composite(&image);
        let png = imaging::encode_png(&composited)?;
        let pdf = SinglePageDocument::new(self.page)
            .with_image(&composited)
            .with_link(url.as_str())
            .to_bytes()?;

        let stem = artifact_stem(at);
        info!(
            stem = %stem,
            png_bytes = png.len(),
            pdf_bytes = pdf.len(),
            "preview rendered"
        );

        Ok(ArtifactPair {
            image: Artifact::png(&stem, png),
            document: Artifact::pdf(&stem, pdf),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn pipeline() -> Pipeline {
        let watermark = Watermark::from_image(RgbaImage::from_pixel(40, 80, Rgba([0, 0, 0, 255])));
        let config = PipelineConfig {
            blur_sigma: 1.5,
            ..PipelineConfig::default()
        };
        Pipeline::with_watermark(watermark, &config)
    }

    fn source_png() -> Vec<u8> {
        let mut image = RgbaImage::from_pixel(60, 90, Rgba([250, 250, 250, 255]));
        image.put_pixel(3, 3, Rgba([0, 128, 0, 255]));
        imaging::encode_png(&image).unwrap()
    }

    #[test]
    fn test_render_from_bytes() {
        let pair = pipeline()
            .render(&ImageSource::Bytes(source_png()), "https://example.com/a")
            .unwrap();

        assert!(pair.image.file_name.ends_with(".png"));
        assert!(pair.document.file_name.ends_with(".pdf"));
        assert!(pair.document.bytes.starts_with(b"%PDF"));

        let composited = imaging::decode(&pair.image.bytes).unwrap();
        assert_eq!(composited.dimensions(), (60, 90));
        // Watermark scaled to 90 / 3 = 30 high, 15 wide, centered at (22, 30).
        assert_eq!(composited.get_pixel(30, 45), &Rgba([0, 0, 0, 255]));
        assert_ne!(composited.get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_render_from_template_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.png");
        std::fs::write(&path, source_png()).unwrap();

        let pair = pipeline()
            .render(&ImageSource::Path(path), "http://example.com/b")
            .unwrap();
        assert!(!pair.image.is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let pipeline = pipeline();
        let source = ImageSource::Bytes(source_png());
        let at = Local::now();

        let first = pipeline.render_at(&source, "https://example.com/a", at).unwrap();
        let second = pipeline.render_at(&source, "https://example.com/a", at).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_undecodable_source() {
        let err = pipeline()
            .render(&ImageSource::Bytes(b"nope".to_vec()), "https://example.com")
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_missing_template_file() {
        let err = pipeline()
            .render(
                &ImageSource::Path(PathBuf::from("/nonexistent/template.jpg")),
                "https://example.com",
            )
            .unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_redirect_url_validation() {
        assert!(validate_redirect_url("https://example.com/x").is_ok());
        assert!(validate_redirect_url("http://203.0.113.7/go").is_ok());
        assert!(validate_redirect_url("").is_err());
        assert!(validate_redirect_url("ftp://example.com").is_err());
        assert!(validate_redirect_url("example.com/no-scheme").is_err());
    }

    #[test]
    fn test_missing_watermark_fails_construction() {
        let config = PipelineConfig {
            watermark: PathBuf::from("/nonexistent/watermark.png"),
            ..PipelineConfig::default()
        };
        assert!(matches!(Pipeline::new(&config), Err(Error::Asset { .. })));
    }
}
