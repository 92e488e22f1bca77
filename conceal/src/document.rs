//! Single-page PDF generation.
//!
//! A [`SinglePageDocument`] places one image, fitted and centered, on a page
//! of fixed size and can cover the whole page with a clickable link.
//!
//! Page geometry is expressed in millimetres and converted to PDF points
//! when the document is serialized.

use crate::error::Result;
use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// PDF points per millimetre.
const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Resource name of the embedded image.
const IMAGE_NAME: &str = "Im0";

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width in millimetres.
    pub width: f32,
    /// Page height in millimetres.
    pub height: f32,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: Self = Self {
        width: 210.0,
        height: 297.0,
    };

    /// Page width in points.
    #[must_use]
    pub fn width_pt(self) -> f32 {
        self.width * POINTS_PER_MM
    }

    /// Page height in points.
    #[must_use]
    pub fn height_pt(self) -> f32 {
        self.height * POINTS_PER_MM
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Where an image lands on the page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
    /// Rendered width.
    pub width: f32,
    /// Rendered height.
    pub height: f32,
}

/// Fit an image of `width`×`height` pixels onto `page`, preserving its aspect
/// ratio, and center it.
///
/// The image is first sized to the full page width; if that makes it taller
/// than the page it is sized to the page height instead.
#[must_use]
#[allow(clippy::cast_precision_loss)] // pixel counts are far below f32 precision limits
pub fn fit_centered(width: u32, height: u32, page: PageSize) -> Placement {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);

    let mut rendered_width = page.width;
    let mut rendered_height = page.width * (h / w);
    if rendered_height > page.height {
        rendered_height = page.height;
        rendered_width = rendered_height * (w / h);
    }

    Placement {
        x: (page.width - rendered_width) / 2.0,
        y: (page.height - rendered_height) / 2.0,
        width: rendered_width,
        height: rendered_height,
    }
}

/// Builder for a one-page PDF holding a single image and an optional link.
#[derive(Debug, Clone)]
pub struct SinglePageDocument<'a> {
    page: PageSize,
    image: Option<&'a RgbaImage>,
    link: Option<String>,
}

impl<'a> SinglePageDocument<'a> {
    /// Start a document with the given page size.
    #[must_use]
    pub const fn new(page: PageSize) -> Self {
        Self {
            page,
            image: None,
            link: None,
        }
    }

    /// Place `image` on the page.
    #[must_use]
    pub const fn with_image(mut self, image: &'a RgbaImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Make the whole page a link to `url`.
    #[must_use]
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(url.into());
        self
    }

    /// Placement of the image, if one was set.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        self.image
            .map(|image| fit_centered(image.width(), image.height(), self.page))
    }

    /// Serialize the document to PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut resources = Dictionary::new();
        let mut operations = Vec::new();

        if let (Some(image), Some(placement)) = (self.image, self.placement()) {
            let image_id = add_image(&mut doc, image);
            resources.set("XObject", dictionary! { IMAGE_NAME => image_id });
            operations.extend(draw_image(placement, self.page));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(self.page.width_pt()),
            Object::Real(self.page.height_pt()),
        ];

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
            "MediaBox" => media_box,
        };

        if let Some(url) = &self.link {
            let annotation_id = doc.add_object(link_annotation(url, self.page));
            page.set("Annots", vec![Object::Reference(annotation_id)]);
        }

        let page_id = doc.add_object(page);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buf = Vec::new();
        doc.save_to(&mut buf)?;
        debug!(bytes = buf.len(), linked = self.link.is_some(), "document generated");
        Ok(buf)
    }
}

/// Embed `image` as an RGB image XObject with a grayscale soft mask for its
/// alpha channel.
fn add_image(doc: &mut Document, image: &RgbaImage) -> ObjectId {
    let pixel_count = (image.width() * image.height()) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let width = i64::from(image.width());
    let height = i64::from(image.height());

    let mask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    ));

    doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => mask_id,
        },
        rgb,
    ))
}

/// Content operations drawing the image at `placement`. PDF user space has
/// its origin at the bottom-left, so the top offset is flipped.
fn draw_image(placement: Placement, page: PageSize) -> Vec<Operation> {
    let width = placement.width * POINTS_PER_MM;
    let height = placement.height * POINTS_PER_MM;
    let x = placement.x * POINTS_PER_MM;
    let y = page.height_pt() - placement.y * POINTS_PER_MM - height;

    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(width),
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(height),
                Object::Real(x),
                Object::Real(y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// A borderless link annotation covering the page, opening `url`.
fn link_annotation(url: &str, page: PageSize) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page.width_pt()),
            Object::Real(page.height_pt()),
        ],
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        "A" => dictionary! {
            "Type" => "Action",
            "S" => "URI",
            "URI" => Object::string_literal(url),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_wide_image_fits_page_width() {
        let placement = fit_centered(2000, 1000, PageSize::A4);
        assert!(approx(placement.width, 210.0));
        assert!(approx(placement.height, 105.0));
        assert!(approx(placement.x, 0.0));
        assert!(approx(placement.y, 96.0));
    }

    #[test]
    fn test_tall_image_fits_page_height() {
        let placement = fit_centered(1000, 3000, PageSize::A4);
        assert!(approx(placement.height, 297.0));
        assert!(approx(placement.width, 99.0));
        assert!(approx(placement.x, 55.5));
        assert!(approx(placement.y, 0.0));
    }

    #[test]
    fn test_page_points() {
        assert!((PageSize::A4.width_pt() - 595.276).abs() < 0.01);
        assert!((PageSize::A4.height_pt() - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_document_contains_image_and_link() {
        let image = RgbaImage::from_pixel(4, 2, Rgba([200, 10, 10, 255]));
        let url = "https://example.com/preview";
        let bytes = SinglePageDocument::new(PageSize::A4)
            .with_image(&image)
            .with_link(url)
            .to_bytes()
            .unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let mut saw_link = false;
        let mut saw_image = false;
        for object in doc.objects.values() {
            let dict = match object {
                Object::Dictionary(dict) => dict,
                Object::Stream(stream) => &stream.dict,
                _ => continue,
            };
            if let Ok(Object::Name(subtype)) = dict.get(b"Subtype") {
                if subtype == b"Link" {
                    let action = dict.get(b"A").and_then(Object::as_dict).unwrap();
                    let target = action.get(b"URI").and_then(Object::as_str).unwrap();
                    assert_eq!(target, url.as_bytes());
                    saw_link = true;
                }
                if subtype == b"Image" && dict.has(b"SMask") {
                    assert_eq!(dict.get(b"Width").and_then(Object::as_i64).unwrap(), 4);
                    saw_image = true;
                }
            }
        }
        assert!(saw_link);
        assert!(saw_image);
    }

    #[test]
    fn test_document_without_link_has_no_annotations() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let bytes = SinglePageDocument::new(PageSize::A4)
            .with_image(&image)
            .to_bytes()
            .unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        assert!(!page.has(b"Annots"));
    }
}
