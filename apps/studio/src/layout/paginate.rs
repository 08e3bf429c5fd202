//! Pagination engine: splits rendered blocks into fixed-size pages.
//!
//! # Strategies
//! - `Greedy`: walk blocks in order, accumulating measured height. A block that would push
//!   the page past its content budget starts a new page, unless the page is still empty.
//!   An oversized block therefore gets a page of its own instead of an empty page.
//! - `SinglePage`: everything on one page. Used whenever any block cannot be measured.
//!
//! Every input block lands on exactly one page, in input order. No page is empty.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::measure::{LayoutMeasurer, MeasureContext};
use crate::preview::blocks::RenderedBlock;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Measurement unavailable; the whole document is one page.
    SinglePage,
    /// Blocks packed by measured height.
    Greedy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub blocks: Vec<RenderedBlock>,
    /// Sum of the measured block heights, `None` under the single-page fallback.
    pub used_height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub pages: Vec<Page>,
    pub strategy: Strategy,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Paginates blocks with the given measurer, falling back to one page when it cannot measure.
///
/// An empty block list yields no pages.
pub fn paginate(
    blocks: Vec<RenderedBlock>,
    measurer: &dyn LayoutMeasurer,
    ctx: &MeasureContext,
) -> Pagination {
    let heights: Option<Vec<f32>> = blocks.iter().map(|b| measurer.measure(b, ctx)).collect();

    match heights {
        Some(heights) => {
            let pages = pack_greedy(blocks, &heights, ctx.page.content_height_px());
            debug!(pages = pages.len(), "paginated with greedy block packing");
            Pagination {
                pages,
                strategy: Strategy::Greedy,
            }
        }
        None => {
            debug!("layout measurement unavailable; using single-page layout");
            Pagination {
                pages: single_page(blocks),
                strategy: Strategy::SinglePage,
            }
        }
    }
}

/// Puts every block on one page.
pub fn single_page(blocks: Vec<RenderedBlock>) -> Vec<Page> {
    if blocks.is_empty() {
        return Vec::new();
    }
    vec![Page {
        blocks,
        used_height: None,
    }]
}

/// Greedy block packing against a fixed content-height budget.
///
/// `heights[i]` is the estimated height of `blocks[i]`.
pub fn pack_greedy(blocks: Vec<RenderedBlock>, heights: &[f32], budget: f32) -> Vec<Page> {
    debug_assert_eq!(blocks.len(), heights.len());

    let mut pages = Vec::new();
    let mut current: Vec<RenderedBlock> = Vec::new();
    let mut used = 0.0_f32;

    for (block, &height) in blocks.into_iter().zip(heights) {
        if used + height > budget && !current.is_empty() {
            pages.push(Page {
                blocks: std::mem::take(&mut current),
                used_height: Some(used),
            });
            used = 0.0;
        }
        current.push(block);
        used += height;
    }

    if !current.is_empty() {
        pages.push(Page {
            blocks: current,
            used_height: Some(used),
        });
    }
    pages
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::measure::{FixedEstimate, MetricMeasurer, Unavailable};
    use crate::layout::page::PageFormat;
    use crate::models::{default_template, FontFamily, SectionKind};
    use crate::preview::renderer::render_preview;
    use proptest::prelude::*;
    use super::Strategy;

    fn make_block(id: usize) -> RenderedBlock {
        RenderedBlock {
            section_id: format!("block-{id}"),
            kind: SectionKind::Summary,
            elements: vec![],
        }
    }

    fn make_ctx() -> MeasureContext {
        MeasureContext {
            page: PageFormat::a4(),
            font_family: FontFamily::Times,
            font_size: 11.0,
        }
    }

    fn ids(page: &Page) -> Vec<&str> {
        page.blocks.iter().map(|b| b.section_id.as_str()).collect()
    }

    // ── pack_greedy ─────────────────────────────────────────────────────────

    #[test]
    fn test_ten_fifth_height_blocks_make_two_pages() {
        let blocks: Vec<RenderedBlock> = (0..10).map(make_block).collect();
        let heights = vec![200.0; 10];
        let pages = pack_greedy(blocks, &heights, 1000.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].blocks.len(), 5);
        assert_eq!(pages[1].blocks.len(), 5);
        assert_eq!(ids(&pages[1])[0], "block-5");
    }

    #[test]
    fn test_oversized_block_gets_own_page() {
        let blocks: Vec<RenderedBlock> = (0..3).map(make_block).collect();
        let pages = pack_greedy(blocks, &[100.0, 5000.0, 100.0], 1000.0);
        assert_eq!(pages.len(), 3);
        assert_eq!(ids(&pages[1]), vec!["block-1"]);
        assert!(pages.iter().all(|p| !p.blocks.is_empty()));
    }

    #[test]
    fn test_oversized_first_block_is_not_preceded_by_empty_page() {
        let blocks: Vec<RenderedBlock> = (0..2).map(make_block).collect();
        let pages = pack_greedy(blocks, &[5000.0, 10.0], 1000.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(ids(&pages[0]), vec!["block-0"]);
    }

    #[test]
    fn test_exact_fit_stays_on_page() {
        let blocks: Vec<RenderedBlock> = (0..2).map(make_block).collect();
        let pages = pack_greedy(blocks, &[500.0, 500.0], 1000.0);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].used_height, Some(1000.0));
    }

    #[test]
    fn test_empty_input_has_no_pages() {
        assert!(pack_greedy(vec![], &[], 1000.0).is_empty());
        let pagination = paginate(vec![], &Unavailable, &make_ctx());
        assert_eq!(pagination.page_count(), 0);
    }

    // ── paginate ────────────────────────────────────────────────────────────

    #[test]
    fn test_unavailable_measurement_falls_back_to_single_page() {
        let blocks: Vec<RenderedBlock> = (0..12).map(make_block).collect();
        let pagination = paginate(blocks, &Unavailable, &make_ctx());
        assert_eq!(pagination.strategy, Strategy::SinglePage);
        assert_eq!(pagination.page_count(), 1);
        assert_eq!(pagination.block_count(), 12);
    }

    #[test]
    fn test_fixed_estimate_packs_six_per_a4_page() {
        // content budget 1027px / 150px per block → 6 blocks per page
        let blocks: Vec<RenderedBlock> = (0..8).map(make_block).collect();
        let pagination = paginate(blocks, &FixedEstimate::default(), &make_ctx());
        assert_eq!(pagination.strategy, Strategy::Greedy);
        let sizes: Vec<usize> = pagination.pages.iter().map(|p| p.blocks.len()).collect();
        assert_eq!(sizes, vec![6, 2]);
    }

    #[test]
    fn test_template_paginates_in_display_order() {
        let rendered = render_preview(&default_template());
        let expected: Vec<String> = rendered.blocks.iter().map(|b| b.section_id.clone()).collect();
        let pagination = paginate(rendered.blocks, &MetricMeasurer, &make_ctx());
        let actual: Vec<String> = pagination
            .pages
            .iter()
            .flat_map(|p| p.blocks.iter().map(|b| b.section_id.clone()))
            .collect();
        assert_eq!(actual, expected);
        assert!(pagination.page_count() >= 1);
    }

    proptest! {
        /// No block is dropped or duplicated and no page is empty.
        #[test]
        fn greedy_packing_conserves_blocks(
            heights in prop::collection::vec(1.0f32..2500.0, 0..40),
            budget in 100.0f32..2000.0,
        ) {
            let blocks: Vec<RenderedBlock> = (0..heights.len()).map(make_block).collect();
            let pages = pack_greedy(blocks, &heights, budget);

            let total: usize = pages.iter().map(|p| p.blocks.len()).sum();
            prop_assert_eq!(total, heights.len());
            prop_assert!(pages.iter().all(|p| !p.blocks.is_empty()));

            let order: Vec<String> = pages
                .iter()
                .flat_map(|p| p.blocks.iter().map(|b| b.section_id.clone()))
                .collect();
            let expected: Vec<String> = (0..heights.len()).map(|i| format!("block-{i}")).collect();
            prop_assert_eq!(order, expected);

            for page in &pages {
                if page.blocks.len() > 1 {
                    prop_assert!(page.used_height.unwrap() <= budget);
                }
            }
        }
    }
}
