use serde::{Deserialize, Serialize};

/// CSS reference resolution. Page pixel sizes are expressed at this DPI.
pub const BASE_DPI: f32 = 96.0;

const MM_PER_INCH: f32 = 25.4;

/// The single physical page format every page is laid out on.
///
/// Pixel dimensions are CSS px at 96 DPI; rasterization multiplies them by a scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFormat {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_px: f32,
}

impl PageFormat {
    /// ISO A4 portrait with half-inch margins.
    pub fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_px: 48.0,
        }
    }

    pub fn width_px(&self) -> f32 {
        (self.width_mm / MM_PER_INCH * BASE_DPI).round()
    }

    pub fn height_px(&self) -> f32 {
        (self.height_mm / MM_PER_INCH * BASE_DPI).round()
    }

    pub fn content_width_px(&self) -> f32 {
        self.width_px() - 2.0 * self.margin_px
    }

    /// Vertical space available to blocks on one page.
    pub fn content_height_px(&self) -> f32 {
        self.height_px() - 2.0 * self.margin_px
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::a4()
    }
}
