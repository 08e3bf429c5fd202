//! Block height measurement, abstracted so pagination runs without a rendering environment.

use crate::layout::font_metrics::get_metrics;
use crate::layout::page::PageFormat;
use crate::layout::typeset::typeset_block;
use crate::models::FontFamily;
use crate::preview::blocks::RenderedBlock;

/// Per-block height used by the fixed heuristic when no real measurement is wanted.
pub const DEFAULT_BLOCK_ESTIMATE_PX: f32 = 150.0;

/// What a measurer needs to know about the page and fonts.
#[derive(Debug, Clone, Copy)]
pub struct MeasureContext {
    pub page: PageFormat,
    pub font_family: FontFamily,
    pub font_size: f32,
}

/// Measures the height of a rendered block in CSS px.
///
/// `None` means measurement is unavailable; pagination then degrades to a single page.
pub trait LayoutMeasurer: Send + Sync {
    fn measure(&self, block: &RenderedBlock, ctx: &MeasureContext) -> Option<f32>;
}

/// Estimates height from static glyph widths and greedy word wrap.
pub struct MetricMeasurer;

impl LayoutMeasurer for MetricMeasurer {
    fn measure(&self, block: &RenderedBlock, ctx: &MeasureContext) -> Option<f32> {
        let metrics = get_metrics(ctx.font_family);
        let laid = typeset_block(block, &metrics, ctx.font_size, ctx.page.content_width_px());
        Some(laid.height)
    }
}

/// Gives every block the same height, regardless of its content.
pub struct FixedEstimate(pub f32);

impl Default for FixedEstimate {
    fn default() -> Self {
        Self(DEFAULT_BLOCK_ESTIMATE_PX)
    }
}

impl LayoutMeasurer for FixedEstimate {
    fn measure(&self, _block: &RenderedBlock, _ctx: &MeasureContext) -> Option<f32> {
        Some(self.0)
    }
}

/// Stands in for an environment that cannot lay out content.
pub struct Unavailable;

impl LayoutMeasurer for Unavailable {
    fn measure(&self, _block: &RenderedBlock, _ctx: &MeasureContext) -> Option<f32> {
        None
    }
}

/// Which measurer the configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurerKind {
    Metric,
    Fixed,
    None,
}

impl std::str::FromStr for MeasurerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(MeasurerKind::Metric),
            "fixed" => Ok(MeasurerKind::Fixed),
            "none" | "unavailable" => Ok(MeasurerKind::None),
            other => Err(format!("unknown layout measurer '{other}' (metric|fixed|none)")),
        }
    }
}

pub fn build_measurer(kind: MeasurerKind) -> Box<dyn LayoutMeasurer> {
    match kind {
        MeasurerKind::Metric => Box::new(MetricMeasurer),
        MeasurerKind::Fixed => Box::new(FixedEstimate::default()),
        MeasurerKind::None => Box::new(Unavailable),
    }
}
