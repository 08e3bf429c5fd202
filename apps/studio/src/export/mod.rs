// Export: raster PDF through the preview surface, and a structured DOCX projection.
// Both write through a temp file, so a failed export leaves nothing behind.

pub mod docx;
pub mod pdf;
pub mod raster;
pub mod surface;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::AppError;

pub use docx::{export_docx, DocumentPacker, DocxPacker};
pub use pdf::export_pdf;
pub use raster::{Rasterizer, SvgRasterizer};
pub use surface::PreviewSurface;

/// `<Name>_Resume.<ext>`, with whitespace runs collapsed to `_`.
///
/// A blank name gives `Resume.<ext>`. Path separators never reach the file name.
pub fn export_filename(full_name: &str, extension: &str) -> String {
    let stem: Vec<String> = full_name
        .split_whitespace()
        .map(|word| word.replace(['/', '\\'], "-"))
        .collect();
    if stem.is_empty() {
        format!("Resume.{extension}")
    } else {
        format!("{}_Resume.{extension}", stem.join("_"))
    }
}

/// Allows one export at a time.
#[derive(Default)]
pub struct ExportGate {
    busy: AtomicBool,
}

/// Held for the duration of one export. Dropping it reopens the gate.
pub struct ExportPermit<'a> {
    gate: &'a ExportGate,
}

impl ExportGate {
    pub fn try_acquire(&self) -> Result<ExportPermit<'_>, AppError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::ExportInProgress)?;
        Ok(ExportPermit { gate: self })
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for ExportPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
