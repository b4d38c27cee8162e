//! Stage 1 of export: turn the captured preview into an RGB raster.
//!
//! The browser paints the preview markup and snapshots it at `CAPTURE_SCALE`
//! device pixels per CSS pixel; what reaches us is that snapshot, encoded as
//! PNG or JPEG. A `Rasterizer` only decodes and validates it.

use tracing::debug;

use super::ExportError;

/// Upscale factor the preview is captured at.
pub const CAPTURE_SCALE: u32 = 2;

/// Decoded 8-bit RGB pixels, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl RasterImage {
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(ExportError::UnsupportedImage(format!(
                "expected {expected} bytes of RGB data for {width}x{height}, got {}",
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }
}

pub trait Rasterizer: Send + Sync {
    fn capture(&self, snapshot: &[u8]) -> Result<RasterImage, ExportError>;
}

/// Decodes a browser-captured PNG/JPEG snapshot.
pub struct SnapshotRasterizer;

impl Rasterizer for SnapshotRasterizer {
    fn capture(&self, snapshot: &[u8]) -> Result<RasterImage, ExportError> {
        if snapshot.is_empty() {
            return Err(ExportError::UnsupportedImage("snapshot is empty".to_string()));
        }

        let decoded = image::load_from_memory(snapshot)
            .map_err(|e| ExportError::UnsupportedImage(e.to_string()))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        debug!(width, height, "Decoded export snapshot");

        RasterImage::from_rgb(width, height, rgb.into_raw())
    }
}

#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 200]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageOutputFormat::Png)
        .unwrap();
    buf.into_inner()
}
