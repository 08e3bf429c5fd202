use crate::models::SectionDescriptor;

/// Returns the visible descriptors in display order.
///
/// Sorted ascending by `order`, falling back to the descriptor's array index when
/// `order` is missing. The sort is stable, so ties keep their original relative order.
pub fn resolve_visible_sections(sections: &[SectionDescriptor]) -> Vec<&SectionDescriptor> {
    let mut visible: Vec<(i64, &SectionDescriptor)> = sections
        .iter()
        .enumerate()
        .filter(|(_, s)| s.visible)
        .map(|(index, s)| (s.order.unwrap_or(index as i64), s))
        .collect();
    visible.sort_by_key(|(key, _)| *key);
    visible.into_iter().map(|(_, s)| s).collect()
}
