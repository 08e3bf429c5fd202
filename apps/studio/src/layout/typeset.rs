//! Places the text of one rendered block into lines, relative to the block's top-left corner.
//!
//! The same placement feeds the metric measurer (block height) and the SVG painter
//! (glyph positions), so what pagination budgets for is what gets drawn.

use crate::layout::font_metrics::FontMetricTable;
use crate::preview::blocks::{Element, RenderedBlock};

pub const LINE_HEIGHT: f32 = 1.4;
const TITLE_SCALE: f32 = 1.8;
const HEADING_SCALE: f32 = 1.15;
const BULLET_INDENT: f32 = 14.0;
const NUMBER_INDENT: f32 = 20.0;
const INLINE_GAP: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// One run of text at a fixed position. `baseline` is measured from the block top.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub baseline: f32,
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypesetBlock {
    pub runs: Vec<PlacedText>,
    /// Total vertical space the block occupies, including the gap after it.
    pub height: f32,
}

struct Cursor<'a> {
    metrics: &'a FontMetricTable,
    width: f32,
    y: f32,
    runs: Vec<PlacedText>,
}

impl Cursor<'_> {
    fn push(&mut self, x: f32, text: String, size: f32, style: (bool, bool), anchor: Anchor) {
        self.runs.push(PlacedText {
            x,
            baseline: self.y + size,
            text,
            size,
            bold: style.0,
            italic: style.1,
            underline: false,
            anchor,
        });
    }

    fn advance(&mut self, size: f32) {
        self.y += size * LINE_HEIGHT;
    }

    /// Writes wrapped text starting at `indent`, one line per wrap.
    fn wrapped(&mut self, indent: f32, text: &str, size: f32, style: (bool, bool)) {
        for line in self.metrics.wrap(text, self.width - indent, size, style.0) {
            self.push(indent, line, size, style, Anchor::Start);
            self.advance(size);
        }
    }

    /// A marker (bullet or number) hanging in front of wrapped text.
    fn marked(&mut self, marker: String, indent: f32, text: &str, size: f32) {
        let top = self.y;
        self.push(0.0, marker, size, (false, false), Anchor::Start);
        self.wrapped(indent, text, size, (false, false));
        if self.y == top {
            self.advance(size);
        }
    }
}

/// Lays out one block at `base_size` px inside a column `width` px wide.
pub fn typeset_block(
    block: &RenderedBlock,
    metrics: &FontMetricTable,
    base_size: f32,
    width: f32,
) -> TypesetBlock {
    let mut cursor = Cursor {
        metrics,
        width,
        y: 0.0,
        runs: Vec::new(),
    };

    for element in &block.elements {
        match element {
            Element::Title { text } => {
                let size = base_size * TITLE_SCALE;
                cursor.push(width / 2.0, text.clone(), size, (true, false), Anchor::Middle);
                if let Some(run) = cursor.runs.last_mut() {
                    run.underline = true;
                }
                cursor.advance(size);
                cursor.y += base_size * 0.6;
            }
            Element::Heading { text } => {
                let size = base_size * HEADING_SCALE;
                cursor.wrapped(0.0, text, size, (true, false));
                cursor.y += base_size * 0.2;
            }
            Element::ContactLine { items } => {
                cursor.wrapped(0.0, &items.join("  |  "), base_size, (false, false));
            }
            Element::Record {
                lead,
                detail,
                trailing,
            } => typeset_record(&mut cursor, lead, detail.as_deref(), trailing.as_deref(), base_size),
            Element::Bullet { text } => {
                cursor.marked("•".to_string(), BULLET_INDENT, text, base_size);
            }
            Element::Numbered { number, text } => {
                cursor.marked(format!("{number}."), NUMBER_INDENT, text, base_size);
            }
            Element::Paragraph { text } => {
                cursor.wrapped(0.0, text, base_size, (false, false));
            }
            Element::Grid { columns, items } => {
                let columns = (*columns).max(1);
                let column_width = width / columns as f32;
                for row in items.chunks(columns) {
                    let row_top = cursor.y;
                    let mut row_bottom = row_top;
                    for (col, item) in row.iter().enumerate() {
                        cursor.y = row_top;
                        let x = col as f32 * column_width;
                        cursor.push(x, "•".to_string(), base_size, (false, false), Anchor::Start);
                        for line in
                            metrics.wrap(item, column_width - BULLET_INDENT, base_size, false)
                        {
                            cursor.push(x + BULLET_INDENT, line, base_size, (false, false), Anchor::Start);
                            cursor.advance(base_size);
                        }
                        row_bottom = row_bottom.max(cursor.y.max(row_top + base_size * LINE_HEIGHT));
                    }
                    cursor.y = row_bottom;
                }
            }
        }
    }

    TypesetBlock {
        height: cursor.y + base_size * 1.2,
        runs: cursor.runs,
    }
}

/// A bold lead with optional italic detail and a right-aligned trailing run (dates).
///
/// The lead wraps in the room left of the trailing run. When even one lead line cannot
/// share the row, the trailing run drops to its own line below the lead.
fn typeset_record(
    cursor: &mut Cursor<'_>,
    lead: &str,
    detail: Option<&str>,
    trailing: Option<&str>,
    size: f32,
) {
    let metrics = cursor.metrics;
    let width = cursor.width;
    let trailing_width = trailing
        .map(|t| metrics.measure_str(t, size, true) + INLINE_GAP)
        .unwrap_or(0.0);

    let beside = width - trailing_width;
    let mut lines = metrics.wrap(lead, beside, size, true);
    let shares_row = trailing.is_some()
        && lines
            .iter()
            .all(|line| metrics.measure_str(line, size, true) <= beside);
    if trailing.is_some() && !shares_row {
        lines = metrics.wrap(lead, width, size, true);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    if shares_row {
        if let Some(t) = trailing {
            cursor.push(width, t.to_string(), size, (true, false), Anchor::End);
        }
    }
    let single_line = lines.len() == 1;
    let mut last_width = 0.0;
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            cursor.advance(size);
        }
        last_width = metrics.measure_str(&line, size, true);
        cursor.push(0.0, line, size, (true, false), Anchor::Start);
    }

    // Room for the detail on the current line, if any.
    let mut room = Some(width - last_width - INLINE_GAP);
    if shares_row && single_line {
        room = room.map(|r| r - trailing_width);
    }
    if !shares_row {
        if let Some(t) = trailing {
            cursor.advance(size);
            cursor.push(width, t.to_string(), size, (true, false), Anchor::End);
            room = None;
        }
    }

    match detail {
        Some(detail)
            if room.is_some_and(|r| metrics.measure_str(detail, size, false) <= r) =>
        {
            cursor.push(
                last_width + INLINE_GAP,
                detail.to_string(),
                size,
                (false, true),
                Anchor::Start,
            );
            cursor.advance(size);
        }
        Some(detail) => {
            cursor.advance(size);
            cursor.wrapped(0.0, detail, size, (false, true));
        }
        None => cursor.advance(size),
    }
}
