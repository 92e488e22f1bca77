//! Conceal turns an image into a blurred, watermarked preview and packages it
//! as a single-page PDF whose whole page links to a redirect URL.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use conceal::prelude::*;
//!
//! let pipeline = Pipeline::new(&PipelineConfig::default())?;
//! let pair = pipeline.render(&ImageSource::Path("statement.jpg".into()), "https://example.com/full")?;
//! pair.write_to_dir("out")?;
//! ```

pub mod artifact;
pub mod catalog;
pub mod document;
pub mod error;
pub mod imaging;
pub mod pipeline;
pub mod prelude;

pub use error::{Error, Result};
