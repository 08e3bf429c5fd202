//! Terminal rendition of the paginated preview.

use crate::layout::Page;
use crate::preview::blocks::Element;

const TEXT_WIDTH: usize = 80;

/// Renders pages as plain text. With `chrome` on, page-break markers sit between pages
/// and a page total follows the last one.
pub fn render_text(pages: &[Page], chrome: bool) -> String {
    let mut out = String::new();
    let total = pages.len();

    for (index, page) in pages.iter().enumerate() {
        for block in &page.blocks {
            for element in &block.elements {
                write_element(&mut out, element);
            }
            out.push('\n');
        }
        if chrome && index + 1 < total {
            let marker = format!(" Page {} of {} ", index + 1, total);
            out.push_str(&format!("{marker:=^width$}\n\n", width = TEXT_WIDTH));
        }
    }
    if chrome && total > 1 {
        out.push_str(&format!("Total Pages: {total}\n"));
    }
    out
}

fn write_element(out: &mut String, element: &Element) {
    match element {
        Element::Title { text } => {
            out.push_str(&format!("{text:^width$}\n", width = TEXT_WIDTH));
            let rule = "‾".repeat(text.chars().count());
            out.push_str(&format!("{rule:^width$}\n", width = TEXT_WIDTH));
        }
        Element::Heading { text } => {
            out.push_str(text);
            out.push('\n');
            out.push_str(&"-".repeat(text.chars().count()));
            out.push('\n');
        }
        Element::Bullet { .. } | Element::Numbered { .. } => {
            for line in element.text_runs() {
                out.push_str("  ");
                out.push_str(&line);
                out.push('\n');
            }
        }
        Element::Grid { columns, items } => {
            let columns = (*columns).max(1);
            let cell = TEXT_WIDTH / columns;
            for row in items.chunks(columns) {
                let line: String = row
                    .iter()
                    .map(|item| format!("{:<cell$}", format!("• {item}")))
                    .collect();
                out.push_str("  ");
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        _ => {
            for line in element.text_runs() {
                out.push_str(&line);
                out.push('\n');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate::pack_greedy;
    use crate::models::default_template;
    use crate::preview::renderer::render_preview;

    #[test]
    fn test_chrome_markers_only_when_enabled() {
        let blocks = render_preview(&default_template()).blocks;
        let heights = vec![600.0; blocks.len()];
        let pages = pack_greedy(blocks, &heights, 1000.0);
        assert!(pages.len() > 1);

        let with_chrome = render_text(&pages, true);
        assert!(with_chrome.contains(&format!("Page 1 of {}", pages.len())));
        assert!(with_chrome.contains("Total Pages"));

        let without = render_text(&pages, false);
        assert!(!without.contains("Page 1 of"));
        assert!(!without.contains("Total Pages"));
    }

    #[test]
    fn test_summary_bullets_appear_in_text() {
        let mut doc = default_template();
        doc.summary = "Built X. Led Y.".to_string();
        let blocks = render_preview(&doc).blocks;
        let pages = pack_greedy(blocks, &vec![1.0; 8], 1000.0);
        let text = render_text(&pages, false);
        assert!(text.contains("  • Built X.\n  • Led Y.\n"));
        assert!(text.contains("JOHN SMITH"));
    }
}
