use serde::{Deserialize, Serialize};

use crate::models::{FontFamily, SectionKind};

/// One visual element inside a section block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Element {
    /// Centered, underlined name header.
    Title { text: String },
    Heading { text: String },
    /// Contact items laid out on one line with separators.
    ContactLine { items: Vec<String> },
    /// A bold lead, an optional inline detail and an optional right-aligned trailer (dates).
    Record {
        lead: String,
        detail: Option<String>,
        trailing: Option<String>,
    },
    Bullet { text: String },
    Numbered { number: usize, text: String },
    Paragraph { text: String },
    Grid { columns: usize, items: Vec<String> },
}

impl Element {
    /// Plain text this element contributes, used for measuring and for the text preview.
    pub fn text_runs(&self) -> Vec<String> {
        match self {
            Element::Title { text } | Element::Heading { text } | Element::Paragraph { text } => {
                vec![text.clone()]
            }
            Element::Bullet { text } => vec![format!("• {text}")],
            Element::Numbered { number, text } => vec![format!("{number}. {text}")],
            Element::ContactLine { items } => vec![items.join("  |  ")],
            Element::Record {
                lead,
                detail,
                trailing,
            } => {
                let mut line = lead.clone();
                if let Some(detail) = detail {
                    line.push_str("  ");
                    line.push_str(detail);
                }
                if let Some(trailing) = trailing {
                    line.push_str("  ");
                    line.push_str(trailing);
                }
                vec![line]
            }
            Element::Grid { items, .. } => items.iter().map(|i| format!("• {i}")).collect(),
        }
    }
}

/// The rendered form of one visible section. Pagination moves whole blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedBlock {
    pub section_id: String,
    pub kind: SectionKind,
    pub elements: Vec<Element>,
}

/// Everything the preview shows, in display order, plus the font settings it uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub blocks: Vec<RenderedBlock>,
    pub font_family: FontFamily,
    pub font_size: f32,
}
