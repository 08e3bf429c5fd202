//! Page capture: paints a surface page and rasterizes it to PNG.

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use tracing::{debug, info};
use usvg::fontdb;

use crate::errors::AppError;
use crate::export::surface::{ChromeGuard, PreviewSurface};

/// A captured page, PNG-encoded.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Turns one page of a surface into pixels.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn capture(&self, surface: &PreviewSurface, page: usize) -> Result<RasterImage, AppError>;
}

/// Rasterizes painted SVG pages with resvg on a white background.
pub struct SvgRasterizer {
    fontdb: OnceLock<Arc<fontdb::Database>>,
    scale: f32,
}

impl SvgRasterizer {
    /// System fonts are loaded on the first capture and reused afterwards.
    pub fn new(scale: f32) -> Self {
        Self {
            fontdb: OnceLock::new(),
            scale,
        }
    }

    #[cfg(test)]
    pub fn with_fonts(fontdb: Arc<fontdb::Database>, scale: f32) -> Self {
        Self {
            fontdb: OnceLock::from(fontdb),
            scale,
        }
    }

    fn fonts(&self) -> Arc<fontdb::Database> {
        let db = self.fontdb.get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            debug!(faces = db.len(), "loaded system fonts for rasterization");
            Arc::new(db)
        });
        Arc::clone(db)
    }
}

#[async_trait]
impl Rasterizer for SvgRasterizer {
    async fn capture(&self, surface: &PreviewSurface, page: usize) -> Result<RasterImage, AppError> {
        let painted = surface.paint_page(page)?;
        let fontdb = self.fonts();
        let scale = self.scale;

        tokio::task::spawn_blocking(move || rasterize_svg(&painted.svg, fontdb, scale))
            .await
            .map_err(|e| AppError::Capture {
                page,
                message: format!("render task failed: {e}"),
            })?
            .map_err(|e| AppError::Capture {
                page,
                message: format!("{e:#}"),
            })
    }
}

fn rasterize_svg(
    svg: &str,
    fontdb: Arc<fontdb::Database>,
    scale: f32,
) -> anyhow::Result<RasterImage> {
    let options = usvg::Options {
        fontdb,
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options).context("failed to parse page SVG")?;
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or_else(|| anyhow!("empty page size"))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let image = image::RgbaImage::from_raw(width, height, pixmap.data().to_vec())
        .ok_or_else(|| anyhow!("failed to build image buffer from page"))?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("failed to encode page as PNG")?;

    Ok(RasterImage {
        png,
        width_px: width,
        height_px: height,
    })
}

/// Captures every page of `surface` in order, with editing chrome hidden.
///
/// Each capture completes before the next one starts. The first failure aborts the run;
/// chrome is restored either way.
pub async fn capture_pages(
    surface: &PreviewSurface,
    rasterizer: &dyn Rasterizer,
) -> Result<Vec<RasterImage>, AppError> {
    let _guard = ChromeGuard::hide(surface);

    let total = surface.page_count();
    let mut images = Vec::with_capacity(total);
    for page in 0..total {
        let image = rasterizer.capture(surface, page).await?;
        debug!(
            page = page + 1,
            total,
            width = image.width_px,
            height = image.height_px,
            "captured page"
        );
        images.push(image);
    }
    info!(pages = images.len(), "captured all pages");
    Ok(images)
}
