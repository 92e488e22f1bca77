//! Error types for the preview pipeline.
//!
//! Every stage of the pipeline (decoding, compositing, encoding, document
//! generation) reports failures through [`Error`].

use std::path::PathBuf;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the pipeline.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The source image could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[source] image::ImageError),

    /// The composited image could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[source] image::ImageError),

    /// The image has zero width or height.
    #[error("image has no pixels")]
    EmptyImage,

    /// A fixed asset (the watermark) is missing or unreadable.
    #[error("asset {}: {source}", path.display())]
    Asset {
        /// Path of the asset.
        path: PathBuf,
        /// Underlying decode or I/O failure.
        #[source]
        source: image::ImageError,
    },

    /// A template file referenced by the catalog could not be read.
    #[error("template {}: {source}", path.display())]
    Template {
        /// Resolved path of the template.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The redirect URL is not an absolute http(s) URL.
    #[error("invalid redirect URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The template catalog is malformed.
    #[error("catalog: {0}")]
    Catalog(String),

    /// PDF generation failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a catalog error with a message.
    #[must_use]
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure is caused by the request input (bad image, bad
    /// template file) rather than by process configuration.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::EmptyImage | Self::Template { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::catalog("duplicate selector");
        assert!(matches!(err, Error::Catalog(_)));
        assert_eq!(err.to_string(), "catalog: duplicate selector");

        let err = Error::invalid_url("ftp://x", "unsupported scheme");
        assert!(err.to_string().contains("ftp://x"));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(Error::EmptyImage.is_input_error());
        assert!(!Error::catalog("x").is_input_error());
    }
}
