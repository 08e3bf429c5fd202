//! The paginated preview as a paintable surface.
//!
//! Each page paints to an SVG in CSS px. Editing chrome (drag handles on every block
//! and the page-break marker) is drawn only while the chrome flag is set; exporters
//! clear it for the duration of a capture through [`ChromeGuard`].

use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

use quick_xml::escape::escape;
use tracing::debug;

use crate::errors::AppError;
use crate::layout::font_metrics::get_metrics;
use crate::layout::typeset::{typeset_block, Anchor, PlacedText};
use crate::layout::{paginate, LayoutMeasurer, MeasureContext, Page, PageFormat, Strategy};
use crate::models::{FontFamily, ResumeDocument};
use crate::preview::renderer::render_preview;

const HANDLE_OFFSET: f32 = 22.0;
const CHROME_COLOR: &str = "#9ca3af";

/// One painted page. `height_px` exceeds the page height when content overflows it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedPage {
    pub svg: String,
    pub width_px: f32,
    pub height_px: f32,
}

pub struct PreviewSurface {
    pages: Vec<Page>,
    strategy: Strategy,
    format: PageFormat,
    font_family: FontFamily,
    font_size: f32,
    chrome_visible: AtomicBool,
}

impl PreviewSurface {
    pub fn new(
        pages: Vec<Page>,
        strategy: Strategy,
        format: PageFormat,
        font_family: FontFamily,
        font_size: f32,
    ) -> Self {
        Self {
            pages,
            strategy,
            format,
            font_family,
            font_size,
            chrome_visible: AtomicBool::new(true),
        }
    }

    /// Renders and paginates `doc` onto a fresh surface with chrome visible.
    pub fn from_document(
        doc: &ResumeDocument,
        measurer: &dyn LayoutMeasurer,
        format: PageFormat,
    ) -> Self {
        let rendered = render_preview(doc);
        let ctx = MeasureContext {
            page: format,
            font_family: rendered.font_family,
            font_size: rendered.font_size,
        };
        let pagination = paginate(rendered.blocks, measurer, &ctx);
        debug!(
            pages = pagination.page_count(),
            strategy = ?pagination.strategy,
            "preview surface ready"
        );
        Self::new(
            pagination.pages,
            pagination.strategy,
            format,
            rendered.font_family,
            rendered.font_size,
        )
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn format(&self) -> PageFormat {
        self.format
    }

    pub fn chrome_visible(&self) -> bool {
        self.chrome_visible.load(Ordering::SeqCst)
    }

    pub fn set_chrome_visible(&self, visible: bool) {
        self.chrome_visible.store(visible, Ordering::SeqCst);
    }

    /// Paints page `index` as SVG, honoring the current chrome flag.
    pub fn paint_page(&self, index: usize) -> Result<PaintedPage, AppError> {
        let page = self.pages.get(index).ok_or_else(|| {
            AppError::NotFound(format!(
                "page {} (surface has {})",
                index + 1,
                self.pages.len()
            ))
        })?;

        let chrome = self.chrome_visible();
        let metrics = get_metrics(self.font_family);
        let margin = self.format.margin_px;
        let width = self.format.width_px();
        let content_width = self.format.content_width_px();

        let mut body = String::new();
        let mut y = margin;
        for block in &page.blocks {
            let laid = typeset_block(block, &metrics, self.font_size, content_width);
            if chrome {
                write_drag_handle(&mut body, margin - HANDLE_OFFSET, y + self.font_size);
            }
            for run in &laid.runs {
                write_text(&mut body, run, margin, y, self.font_family);
            }
            y += laid.height;
        }

        let height = self.format.height_px().max((y + margin).ceil());
        if chrome {
            write_page_marker(&mut body, index, self.pages.len(), width, height);
        }

        let mut svg = String::with_capacity(body.len() + 256);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = write!(
            svg,
            r##"<rect x="0" y="0" width="{width}" height="{height}" fill="#ffffff"/>"##
        );
        svg.push_str(&body);
        svg.push_str("</svg>");

        Ok(PaintedPage {
            svg,
            width_px: width,
            height_px: height,
        })
    }
}

/// Hides editing chrome on a surface and restores the previous state when dropped.
///
/// Restoration runs on every exit path, including errors and early returns.
pub struct ChromeGuard<'a> {
    surface: &'a PreviewSurface,
    previous: bool,
}

impl<'a> ChromeGuard<'a> {
    pub fn hide(surface: &'a PreviewSurface) -> Self {
        let previous = surface.chrome_visible.swap(false, Ordering::SeqCst);
        debug!("editing chrome hidden for capture");
        Self { surface, previous }
    }
}

impl Drop for ChromeGuard<'_> {
    fn drop(&mut self) {
        self.surface.set_chrome_visible(self.previous);
        debug!(visible = self.previous, "editing chrome restored");
    }
}

fn write_text(out: &mut String, run: &PlacedText, left: f32, top: f32, family: FontFamily) {
    let anchor = match run.anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    };
    let _ = write!(
        out,
        r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="{anchor}""#,
        left + run.x,
        top + run.baseline,
        family.css_stack(),
        run.size,
    );
    if run.bold {
        out.push_str(r#" font-weight="bold""#);
    }
    if run.italic {
        out.push_str(r#" font-style="italic""#);
    }
    if run.underline {
        out.push_str(r#" text-decoration="underline""#);
    }
    let _ = write!(out, ">{}</text>", escape(run.text.as_str()));
}

/// A 2×3 grip of dots beside a block.
fn write_drag_handle(out: &mut String, x: f32, y: f32) {
    out.push_str(r#"<g class="drag-handle">"#);
    for row in 0..3 {
        for col in 0..2 {
            let _ = write!(
                out,
                r#"<circle cx="{:.1}" cy="{:.1}" r="1.5" fill="{CHROME_COLOR}"/>"#,
                x + col as f32 * 5.0,
                y - 10.0 + row as f32 * 5.0,
            );
        }
    }
    out.push_str("</g>");
}

fn write_page_marker(out: &mut String, index: usize, total: usize, width: f32, height: f32) {
    let line_y = height - 12.0;
    let _ = write!(
        out,
        r#"<g class="page-break"><line x1="0" y1="{line_y}" x2="{width}" y2="{line_y}" stroke="{CHROME_COLOR}" stroke-dasharray="6 4"/><text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle" fill="{CHROME_COLOR}">Page {} of {}</text></g>"#,
        width / 2.0,
        line_y - 4.0,
        index + 1,
        total,
    );
}
