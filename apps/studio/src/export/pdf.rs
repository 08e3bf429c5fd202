//! PDF assembly from captured page rasters.
//!
//! Every raster is cut into strips exactly one page tall (relative to its width) and each
//! strip fills one A4 page edge to edge. A raster taller than a page, from an oversized
//! block or the single-page fallback, therefore continues on the following pages instead
//! of being clipped.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use printpdf::image_crate::{self, imageops, DynamicImage, Rgb, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use tracing::info;

use crate::errors::AppError;
use crate::export::export_filename;
use crate::export::raster::{capture_pages, RasterImage, Rasterizer};
use crate::export::surface::PreviewSurface;
use crate::layout::PageFormat;
use crate::storage::file::write_atomically;

const MM_PER_INCH: f32 = 25.4;

/// Captures every page of `surface` and writes `<Name>_Resume.pdf` into `dir`.
///
/// Nothing is written unless every page was captured and the PDF assembled.
pub async fn export_pdf(
    surface: &PreviewSurface,
    rasterizer: &dyn Rasterizer,
    dir: &Path,
    full_name: &str,
) -> Result<PathBuf, AppError> {
    let images = capture_pages(surface, rasterizer).await?;
    let bytes = assemble_pdf(&images, surface.format(), full_name)
        .map_err(|e| AppError::Encode(format!("{e:#}")))?;

    let path = dir.join(export_filename(full_name, "pdf"));
    write_atomically(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "exported PDF");
    Ok(path)
}

/// Builds a PDF with one raster strip per physical page. No rasters yields one blank page.
pub fn assemble_pdf(
    images: &[RasterImage],
    format: PageFormat,
    title: &str,
) -> anyhow::Result<Vec<u8>> {
    let mut strips = Vec::new();
    for (index, raster) in images.iter().enumerate() {
        let decoded = image_crate::load_from_memory(&raster.png)
            .with_context(|| format!("failed to decode captured page {}", index + 1))?;
        strips.extend(slice_into_pages(&decoded.to_rgb8(), format));
    }

    let page_w = Mm(format.width_mm);
    let page_h = Mm(format.height_mm);
    let title = if title.trim().is_empty() {
        "Resume"
    } else {
        title
    };
    let (doc, first_page, first_layer) = PdfDocument::new(title, page_w, page_h, "Layer 1");

    for (index, strip) in strips.into_iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(page_w, page_h, format!("Layer {}", index + 1))
        };
        let dpi = strip.width() as f32 * MM_PER_INCH / format.width_mm;
        let transform = ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            rotate: None,
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            dpi: Some(dpi),
        };
        let current_layer = doc.get_page(page).get_layer(layer);
        Image::from_dynamic_image(&DynamicImage::ImageRgb8(strip))
            .add_to_layer(current_layer, transform);
    }

    let mut buffer = Vec::new();
    {
        let mut writer = BufWriter::new(&mut buffer);
        doc.save(&mut writer).context("failed to write PDF")?;
    }
    Ok(buffer)
}

/// Cuts `image` into page-proportioned strips, padding the last one with white.
fn slice_into_pages(image: &RgbImage, format: PageFormat) -> Vec<RgbImage> {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let strip_height =
        ((width as f32 * format.height_px() / format.width_px()).round() as u32).max(1);

    let mut strips = Vec::new();
    let mut top = 0;
    while top < height {
        let rows = strip_height.min(height - top);
        let mut strip = RgbImage::from_pixel(width, strip_height, Rgb([255, 255, 255]));
        let part = imageops::crop_imm(image, 0, top, width, rows).to_image();
        imageops::replace(&mut strip, &part, 0, 0);
        strips.push(strip);
        top += strip_height;
    }
    strips
}
