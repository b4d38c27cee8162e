//! Stage 2 of export: place the raster on a single portrait A4 page.
//!
//! The image is anchored at the top-left corner and scaled to the full page
//! width. There is no pagination: a snapshot taller than the page keeps its
//! proportions and runs past the bottom edge.

use std::io::Write;

use chrono::{DateTime, Utc};
use flate2::{write::ZlibEncoder, Compression};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use super::raster::RasterImage;
use super::ExportError;

pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;
const PT_PER_MM: f64 = 72.0 / 25.4;
const IMAGE_NAME: &str = "Im0";
const PRODUCER: &str = "Lyncat";

/// Where the raster lands on the page, in millimetres from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Placement {
    /// Full page width; height follows the image's aspect ratio.
    pub fn full_width(image_width: u32, image_height: u32) -> Result<Self, ExportError> {
        if image_width == 0 || image_height == 0 {
            return Err(ExportError::EmptyImage {
                width: image_width,
                height: image_height,
            });
        }
        Ok(Self {
            width_mm: A4_WIDTH_MM,
            height_mm: image_height as f64 * A4_WIDTH_MM / image_width as f64,
        })
    }

    pub fn overflows_page(&self) -> bool {
        self.height_mm > A4_HEIGHT_MM
    }
}

/// Document-level metadata written into the PDF info dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo<'a> {
    pub title: &'a str,
    pub created_at: DateTime<Utc>,
}

fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_MM
}

fn real(v: f64) -> Object {
    Object::Real(v as _)
}

/// PDF text string: ASCII stays a literal, anything else is UTF-16BE with a BOM.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(s.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn pdf_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(e.to_string())
}

/// Builds the one-page PDF and returns its bytes.
pub fn embed(raster: &RasterImage, info: &DocumentInfo<'_>) -> Result<Vec<u8>, ExportError> {
    let placement = Placement::full_width(raster.width(), raster.height())?;
    let page_w = mm_to_pt(A4_WIDTH_MM);
    let page_h = mm_to_pt(A4_HEIGHT_MM);
    let img_w = mm_to_pt(placement.width_mm);
    let img_h = mm_to_pt(placement.height_mm);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raster.rgb()).map_err(pdf_err)?;
    let pixels = encoder.finish().map_err(pdf_err)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(raster.width()),
            "Height" => i64::from(raster.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        pixels,
    ));

    // PDF space is bottom-up; shift the image so its top edge meets the page top.
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(img_w),
                    real(0.0),
                    real(0.0),
                    real(img_h),
                    real(0.0),
                    real(page_h - img_h),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().map_err(pdf_err)?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(page_w), real(page_h)],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
    });

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
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(info.title),
        "Producer" => Object::string_literal(PRODUCER),
        "CreationDate" => Object::string_literal(
            info.created_at.format("D:%Y%m%d%H%M%SZ").to_string(),
        ),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(pdf_err)?;
    Ok(bytes)
}
