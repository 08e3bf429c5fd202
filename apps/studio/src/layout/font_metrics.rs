//! Static glyph-width tables for the five resume font families.
//!
//! Widths are per-mille of the font size (AFM units). Times and Helvetica use their
//! standard core-font metrics; Georgia and Calibri are approximated by scaling the
//! closest core face. This is an estimate, not a shaping engine: it is accurate enough
//! to decide where words wrap and how tall a block is, which is all pagination needs.
//!
//! Tables cover ASCII 0x20..=0x7E. Index = (char as usize) - 32.

use crate::models::FontFamily;

/// Bold text is drawn roughly this much wider than regular text.
const BOLD_WIDTH_FACTOR: f32 = 1.06;

/// Per-family width table plus the scale applied on top of it.
pub struct FontMetricTable {
    pub family: FontFamily,
    widths: &'static [u16; 95],
    scale: f32,
    /// Fallback width for characters outside the table, in per-mille.
    average_width: u16,
}

impl FontMetricTable {
    /// Measures `s` in px at `size_px`.
    pub fn measure_str(&self, s: &str, size_px: f32, bold: bool) -> f32 {
        let units: u32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32] as u32
                } else {
                    self.average_width as u32
                }
            })
            .sum();
        let weight = if bold { BOLD_WIDTH_FACTOR } else { 1.0 };
        units as f32 / 1000.0 * size_px * self.scale * weight
    }

    /// Greedy word wrap at `max_width_px`. Returns the text of each printed line.
    ///
    /// A single word wider than the line gets a line of its own rather than being split.
    /// Whitespace-only input yields no lines.
    pub fn wrap(&self, text: &str, max_width_px: f32, size_px: f32, bold: bool) -> Vec<String> {
        let space = self.measure_str(" ", size_px, bold);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_width = self.measure_str(word, size_px, bold);
            if !current.is_empty() && current_width + space + word_width > max_width_px {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_width += space;
            }
            current.push_str(word);
            current_width += word_width;
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Returns the metric table for a font family.
pub fn get_metrics(family: FontFamily) -> FontMetricTable {
    match family {
        FontFamily::Times => FontMetricTable {
            family,
            widths: &TIMES_WIDTHS,
            scale: 1.0,
            average_width: 480,
        },
        FontFamily::Georgia => FontMetricTable {
            family,
            widths: &TIMES_WIDTHS,
            scale: 1.12,
            average_width: 480,
        },
        FontFamily::Helvetica | FontFamily::Arial => FontMetricTable {
            family,
            widths: &HELVETICA_WIDTHS,
            scale: 1.0,
            average_width: 540,
        },
        FontFamily::Calibri => FontMetricTable {
            family,
            widths: &HELVETICA_WIDTHS,
            scale: 0.9,
            average_width: 540,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Width tables
// ────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
static TIMES_WIDTHS: [u16; 95] = [
    // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    // 0-9
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    // :   ;    <    =    >    ?    @
    278, 278, 564, 564, 564, 444, 921,
    // A-M
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    // N-Z
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    // [   \    ]    ^    _    `
    333, 278, 333, 469, 500, 333,
    // a-m
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    // n-z
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    // {   |    }    ~
    480, 200, 480, 541,
];

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // sp  !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :   ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A-M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N-Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [   \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a-m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n-z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {   |    }    ~
    334, 260, 334, 584,
];
