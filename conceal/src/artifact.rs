//! Output artifacts.
//!
//! A completed request yields an [`ArtifactPair`]: the composited PNG and the
//! linked PDF. Both live in memory; nothing touches the filesystem unless a
//! caller explicitly writes the pair somewhere.

use crate::error::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// MIME type of the composited image.
pub const PNG_MIME: &str = "image/png";

/// MIME type of the generated document.
pub const PDF_MIME: &str = "application/pdf";

/// File stem for artifacts produced at `at`, e.g. `Screenshot_20240131_093000`.
#[must_use]
pub fn artifact_stem(at: DateTime<Local>) -> String {
    format!("Screenshot_{}", at.format("%Y%m%d_%H%M%S"))
}

/// A named in-memory file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name presented to the user.
    pub file_name: String,
    /// MIME type.
    pub mime_type: &'static str,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Create a PNG artifact.
    pub fn png(stem: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{stem}.png"),
            mime_type: PNG_MIME,
            bytes,
        }
    }

    /// Create a PDF artifact.
    pub fn pdf(stem: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{stem}.pdf"),
            mime_type: PDF_MIME,
            bytes,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the artifact is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The image and document produced for one completed conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    /// Composited PNG.
    pub image: Artifact,
    /// Single-page PDF embedding the image.
    pub document: Artifact,
}

impl ArtifactPair {
    /// Artifacts in delivery order: image first, then document.
    #[must_use]
    pub fn into_vec(self) -> Vec<Artifact> {
        vec![self.image, self.document]
    }

    /// Write both artifacts into `dir`, creating it if needed.
    ///
    /// Returns the written paths in delivery order.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        [&self.image, &self.document]
            .into_iter()
            .map(|artifact| {
                let path = dir.join(&artifact.file_name);
                std::fs::write(&path, &artifact.bytes)?;
                Ok(path)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_stem() {
        let at = Local.with_ymd_and_hms(2024, 1, 31, 9, 30, 5).unwrap();
        assert_eq!(artifact_stem(at), "Screenshot_20240131_093005");
    }

    #[test]
    fn test_artifact_names() {
        let png = Artifact::png("Screenshot_x", vec![1]);
        let pdf = Artifact::pdf("Screenshot_x", vec![2, 3]);
        assert_eq!(png.file_name, "Screenshot_x.png");
        assert_eq!(png.mime_type, PNG_MIME);
        assert_eq!(pdf.file_name, "Screenshot_x.pdf");
        assert_eq!(pdf.len(), 2);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let pair = ArtifactPair {
            image: Artifact::png("s", b"png".to_vec()),
            document: Artifact::pdf("s", b"pdf".to_vec()),
        };

        let out = dir.path().join("out");
        let paths = pair.write_to_dir(&out).unwrap();
        assert_eq!(paths, vec![out.join("s.png"), out.join("s.pdf")]);
        assert_eq!(std::fs::read(&paths[1]).unwrap(), b"pdf");
    }
}
