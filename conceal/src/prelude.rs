//! Convenient re-exports.

pub use crate::artifact::{Artifact, ArtifactPair};
pub use crate::catalog::{TemplateCatalog, TemplateEntry, UPLOAD_SELECTOR};
pub use crate::document::{PageSize, SinglePageDocument};
pub use crate::error::{Error, Result};
pub use crate::imaging::Watermark;
pub use crate::pipeline::{ImageSource, Pipeline, PipelineConfig, validate_redirect_url};
