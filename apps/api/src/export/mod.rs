// Export pipeline: captured preview snapshot → single-page A4 PDF download.
// Strictly sequential: rasterize, then embed. No retries, no partial output.

pub mod pdf;
pub mod raster;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use self::pdf::{embed, DocumentInfo, Placement};
use self::raster::Rasterizer;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported snapshot image: {0}")]
    UnsupportedImage(String),

    #[error("snapshot has no area ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

/// A finished export, ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct PdfExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `{title}.pdf`, title passed through as-is.
pub fn pdf_filename(title: &str) -> String {
    format!("{title}.pdf")
}

/// Runs both stages for one snapshot. `created_at` ends up in the PDF info
/// dictionary, so two exports of the same snapshot differ only there.
pub fn export_pdf(
    rasterizer: &dyn Rasterizer,
    snapshot: &[u8],
    title: &str,
    created_at: DateTime<Utc>,
) -> Result<PdfExport, ExportError> {
    let raster = rasterizer.capture(snapshot)?;
    let placement = Placement::full_width(raster.width(), raster.height())?;
    if placement.overflows_page() {
        warn!(
            height_mm = placement.height_mm,
            "Snapshot is taller than one A4 page; content will overflow"
        );
    }

    let bytes = embed(&raster, &DocumentInfo { title, created_at })?;
    info!(
        width = raster.width(),
        height = raster.height(),
        pdf_bytes = bytes.len(),
        "Exported resume PDF"
    );

    Ok(PdfExport {
        filename: pdf_filename(title),
        bytes,
    })
}

/// One export at a time per account. A second request while the first is
/// still assembling is refused rather than queued.
#[derive(Debug, Default)]
pub struct ExportGate {
    running: Mutex<HashSet<Uuid>>,
}

/// Held for the duration of one export; releases the slot on drop.
#[derive(Debug)]
#[must_use]
pub struct ExportPermit {
    gate: Arc<ExportGate>,
    user_id: Uuid,
}

impl ExportGate {
    pub fn try_begin(self: &Arc<Self>, user_id: Uuid) -> Option<ExportPermit> {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        running.insert(user_id).then(|| ExportPermit {
            gate: Arc::clone(self),
            user_id,
        })
    }

    #[cfg(test)]
    pub fn is_running(&self, user_id: Uuid) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&user_id)
    }
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.gate
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.user_id);
    }
}

/// `Content-Disposition` value for a download named `filename`.
///
/// The quoted `filename` is an ASCII fallback with header-unsafe characters
/// replaced; `filename*` carries the exact name (RFC 6266 / RFC 5987).
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len() * 3);
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::raster::{encode_png, SnapshotRasterizer};
    use super::*;

    #[test]
    fn test_export_end_to_end() {
        let png = encode_png(120, 170);
        let export = export_pdf(&SnapshotRasterizer, &png, "Jane Doe CV", Utc::now()).unwrap();

        assert_eq!(export.filename, "Jane Doe CV.pdf");
        assert!(export.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_gate_refuses_second_export_for_same_user() {
        let gate = Arc::new(ExportGate::default());
        let (ada, grace) = (Uuid::new_v4(), Uuid::new_v4());

        let first = gate.try_begin(ada).unwrap();
        assert!(gate.try_begin(ada).is_none());
        assert!(gate.is_running(ada));

        let other = gate.try_begin(grace).unwrap();
        drop(first);
        assert!(!gate.is_running(ada));
        let again = gate.try_begin(ada).unwrap();
        drop((again, other));
    }

    #[test]
    fn test_export_failure_produces_no_output() {
        let result = export_pdf(&SnapshotRasterizer, b"<html>", "CV", Utc::now());
        assert!(matches!(result, Err(ExportError::UnsupportedImage(_))));
    }

    #[test]
    fn test_filename_is_not_sanitized() {
        assert_eq!(pdf_filename("a/b: c?"), "a/b: c?.pdf");
        assert_eq!(pdf_filename(""), ".pdf");
    }

    #[test]
    fn test_content_disposition_plain_title() {
        assert_eq!(
            content_disposition("My Resume.pdf"),
            "attachment; filename=\"My Resume.pdf\"; filename*=UTF-8''My%20Resume.pdf"
        );
    }

    #[test]
    fn test_content_disposition_escapes_unsafe_characters() {
        let value = content_disposition("Zoë \"CV\".pdf");
        assert!(value.starts_with("attachment; filename=\"Zo_ _CV_.pdf\";"));
        assert!(value.ends_with("filename*=UTF-8''Zo%C3%AB%20%22CV%22.pdf"));
        assert!(axum::http::HeaderValue::from_str(&value).is_ok());
    }
}
