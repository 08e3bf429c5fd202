//! Preview renderer: maps visible sections to self-contained visual blocks.
//!
//! Pure with respect to the document: the same document always renders the same blocks.
//! Empty sections, unresolvable custom references and unknown section kinds render nothing.

use crate::models::{ResumeDocument, SectionDescriptor, SectionKind};
use crate::preview::blocks::{Element, RenderedBlock, RenderedDocument};
use crate::preview::resolve::resolve_visible_sections;

const SKILL_GRID_COLUMNS: usize = 4;

/// Renders every visible section of the document in display order.
pub fn render_preview(doc: &ResumeDocument) -> RenderedDocument {
    let blocks = resolve_visible_sections(&doc.sections)
        .into_iter()
        .filter_map(|section| render_section(doc, section))
        .collect();

    RenderedDocument {
        blocks,
        font_family: doc.font_family,
        font_size: doc.font_size,
    }
}

/// Renders a single section, or `None` when the section has nothing to show.
pub fn render_section(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<RenderedBlock> {
    let elements = match section.kind {
        SectionKind::Personal => render_personal(doc, section),
        SectionKind::Summary => render_summary(doc, section),
        SectionKind::Experience => render_experience(doc, section),
        SectionKind::Education => render_education(doc, section),
        SectionKind::Skills => render_skills(doc, section),
        SectionKind::Projects => render_projects(doc, section),
        SectionKind::Certifications => render_certifications(doc, section),
        SectionKind::Achievements => render_achievements(doc, section),
        SectionKind::Custom => render_custom(doc, section),
        SectionKind::Unknown => None,
    }?;

    Some(RenderedBlock {
        section_id: section.id.clone(),
        kind: section.kind,
        elements,
    })
}

/// Splits prose into statements on `.`, dropping blank fragments and re-appending the period.
pub fn split_statements(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{s}."))
        .collect()
}

fn heading(section: &SectionDescriptor) -> Element {
    Element::Heading {
        text: section.title.clone(),
    }
}

fn render_personal(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<Vec<Element>> {
    let info = &doc.personal_info;
    let items: Vec<String> = [
        Some(info.email.as_str()),
        Some(info.phone.as_str()),
        info.linkedin.as_deref(),
        info.website.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect();

    Some(vec![
        Element::Title {
            text: info.full_name.to_uppercase(),
        },
        heading(section),
        Element::ContactLine { items },
    ])
}

fn render_summary(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<Vec<Element>> {
    let statements = split_statements(&doc.summary);
    if statements.is_empty() {
        return None;
    }
    let mut elements = vec![heading(section)];
    elements.extend(statements.into_iter().map(|text| Element::Bullet { text }));
    Some(elements)
}

fn render_experience(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<Vec<Element>> {
    if doc.experience.is_empty() {
        return None;
    }
    let mut elements = vec![heading(section)];
    for exp in &doc.experience {
        let end = if exp.current { "Present" } else { exp.end_date.as_str() };
        elements.push(Element::Record {
            lead: exp.company.clone(),
            detail: Some(format!("Role: {}", exp.position)),
            trailing: Some(format!("{} - {}", exp.start_date, end)),
        });
        elements.extend(
            exp.description
                .iter()
                .filter(|d| !d.trim().is_empty())
                .map(|d| Element::Bullet { text: d.clone() }),
        );
    }
    Some(elements)
}

fn render_education(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<Vec<Element>> {
    if doc.education.is_empty() {
        return None;
    }
    let mut elements = vec![heading(section)];
    for edu in &doc.education {
        let mut parts = vec![
            edu.institution.clone(),
            format!("{} in {}", edu.degree, edu.field),
        ];
        if let Some(gpa) = edu.gpa.as_deref().filter(|g| !g.trim().is_empty()) {
            parts.push(format!("{gpa} (CGPA)"));
        }
        parts.push(format!("{}-{}", edu.start_date, edu.end_date));
        elements.push(Element::Bullet {
            text: parts.join(" | "),
        });
    }
    Some(elements)
}

fn render_skills(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<Vec<Element>> {
    if doc.skills.is_empty() {
        return None;
    }
    Some(vec![
        heading(section),
        Element::Grid {
            columns: SKILL_GRID_COLUMNS,
            items: doc.skills.iter().map(|s| s.name.clone()).collect(),
        },
    ])
}

fn render_projects(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<Vec<Element>> {
    if doc.projects.is_empty() {
        return None;
    }
    let mut elements = vec![heading(section)];
    for (index, project) in doc.projects.iter().enumerate() {
        let detail = (!project.technologies.is_empty())
            .then(|| format!("– {}", project.technologies.join(", ")));
        elements.push(Element::Record {
            lead: format!("{}. {}", index + 1, project.name),
            detail,
            trailing: None,
        });
        elements.extend(
            split_statements(&project.description)
                .into_iter()
                .map(|text| Element::Bullet { text }),
        );
    }
    Some(elements)
}

fn render_certifications(
    doc: &ResumeDocument,
    section: &SectionDescriptor,
) -> Option<Vec<Element>> {
    if doc.certifications.is_empty() {
        return None;
    }
    let mut elements = vec![heading(section)];
    elements.extend(doc.certifications.iter().map(|c| Element::Bullet {
        text: c.name.clone(),
    }));
    Some(elements)
}

fn render_achievements(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<Vec<Element>> {
    if doc.achievements.is_empty() {
        return None;
    }
    let mut elements = vec![heading(section)];
    elements.extend(
        doc.achievements
            .iter()
            .enumerate()
            .map(|(i, a)| Element::Numbered {
                number: i + 1,
                text: a.title.clone(),
            }),
    );
    Some(elements)
}

fn render_custom(doc: &ResumeDocument, section: &SectionDescriptor) -> Option<Vec<Element>> {
    let custom = doc.custom_section_for(section)?;
    if custom.title.trim().is_empty() || custom.content.trim().is_empty() {
        return None;
    }

    let mut elements = vec![Element::Heading {
        text: custom.title.to_uppercase(),
    }];
    for line in custom.content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let element = match line.strip_prefix('•').or_else(|| line.strip_prefix('-')) {
            Some(rest) => Element::Bullet {
                text: rest.trim_start().to_string(),
            },
            None => Element::Paragraph {
                text: line.to_string(),
            },
        };
        elements.push(element);
    }
    Some(elements)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        default_template, Achievement, Certification, CustomSection, Education, Experience,
        Project, Skill,
    };

    fn bullets(block: &RenderedBlock) -> Vec<&str> {
        block
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Bullet { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn summary_only(summary: &str) -> ResumeDocument {
        ResumeDocument {
            summary: summary.to_string(),
            sections: vec![SectionDescriptor::new("summary", SectionKind::Summary, "Summary", 1)],
            ..ResumeDocument::default()
        }
    }

    #[test]
    fn test_summary_splits_into_two_statements() {
        let rendered = render_preview(&summary_only("Built X. Led Y."));
        assert_eq!(rendered.blocks.len(), 1);
        assert_eq!(bullets(&rendered.blocks[0]), vec!["Built X.", "Led Y."]);
    }

    #[test]
    fn test_summary_drops_blank_fragments() {
        let rendered = render_preview(&summary_only("  Shipped it..  . Kept it running  "));
        assert_eq!(
            bullets(&rendered.blocks[0]),
            vec!["Shipped it.", "Kept it running."]
        );
    }

    #[test]
    fn test_blank_summary_renders_nothing() {
        assert!(render_preview(&summary_only("   ")).blocks.is_empty());
        assert!(render_preview(&summary_only(" . . ")).blocks.is_empty());
    }

    #[test]
    fn test_missing_custom_section_renders_nothing() {
        let doc = ResumeDocument {
            sections: vec![SectionDescriptor::new("custom-7", SectionKind::Custom, "Gone", 1)],
            ..ResumeDocument::default()
        };
        let rendered = render_preview(&doc);
        assert!(rendered.blocks.is_empty());
    }

    #[test]
    fn test_custom_section_resolution_is_idempotent() {
        let mut doc = default_template();
        doc.custom_sections.push(CustomSection {
            id: "9".to_string(),
            title: "Talks".to_string(),
            content: "• RustConf 2024\n- Local meetup\n\nGuest lecture".to_string(),
        });
        let hit = SectionDescriptor::new("custom-9", SectionKind::Custom, "Talks", 9);
        let miss = SectionDescriptor::new("custom-10", SectionKind::Custom, "Other", 10);

        assert_eq!(render_section(&doc, &hit), render_section(&doc, &hit));
        assert!(render_section(&doc, &miss).is_none());
        assert!(render_section(&doc, &miss).is_none());
    }

    #[test]
    fn test_custom_bullet_markers_are_normalized() {
        let doc = ResumeDocument {
            custom_sections: vec![CustomSection {
                id: "1".to_string(),
                title: "Volunteering".to_string(),
                content: "•Food bank\n  -   Mentoring  \n\nEvery weekend".to_string(),
            }],
            ..ResumeDocument::default()
        };
        let section = SectionDescriptor::new("custom-1", SectionKind::Custom, "Volunteering", 1);
        let block = render_section(&doc, &section).unwrap();
        assert_eq!(
            block.elements,
            vec![
                Element::Heading {
                    text: "VOLUNTEERING".to_string()
                },
                Element::Bullet {
                    text: "Food bank".to_string()
                },
                Element::Bullet {
                    text: "Mentoring".to_string()
                },
                Element::Paragraph {
                    text: "Every weekend".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_custom_section_without_title_renders_nothing() {
        let doc = ResumeDocument {
            custom_sections: vec![CustomSection {
                id: "1".to_string(),
                title: " ".to_string(),
                content: "Something".to_string(),
            }],
            ..ResumeDocument::default()
        };
        let section = SectionDescriptor::new("custom-1", SectionKind::Custom, "x", 1);
        assert!(render_section(&doc, &section).is_none());
    }

    #[test]
    fn test_unknown_kind_renders_nothing() {
        let doc = default_template();
        let section = SectionDescriptor::new("timeline", SectionKind::Unknown, "Timeline", 1);
        assert!(render_section(&doc, &section).is_none());
    }

    #[test]
    fn test_empty_arrays_suppress_sections() {
        let mut doc = default_template();
        doc.experience.clear();
        doc.skills.clear();
        let kinds: Vec<SectionKind> = render_preview(&doc).blocks.iter().map(|b| b.kind).collect();
        assert!(!kinds.contains(&SectionKind::Experience));
        assert!(!kinds.contains(&SectionKind::Skills));
        assert!(kinds.contains(&SectionKind::Education));
    }

    #[test]
    fn test_non_empty_visible_sections_always_render() {
        let mut doc = default_template();
        doc.experience = vec![Experience {
            id: "e".to_string(),
            company: "Acme".to_string(),
            ..Experience::default()
        }];
        doc.education = vec![Education::default()];
        doc.skills = vec![Skill::default()];
        doc.projects = vec![Project::default()];
        doc.certifications = vec![Certification::default()];
        doc.achievements = vec![Achievement::default()];

        let rendered = render_preview(&doc);
        let expected: Vec<&str> = doc.sections.iter().map(|s| s.id.as_str()).collect();
        let actual: Vec<&str> = rendered.blocks.iter().map(|b| b.section_id.as_str()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_hidden_section_is_not_rendered_but_stays_in_model() {
        let mut doc = default_template();
        doc.sections[1].visible = false;
        let rendered = render_preview(&doc);
        assert!(rendered.blocks.iter().all(|b| b.section_id != "summary"));
        assert_eq!(doc.sections.len(), 8);
    }

    #[test]
    fn test_blocks_follow_section_order() {
        let mut doc = default_template();
        doc.sections[0].order = Some(99); // personal last
        let rendered = render_preview(&doc);
        assert_eq!(rendered.blocks.last().unwrap().section_id, "personal");
        assert_eq!(rendered.blocks[0].section_id, "summary");
    }

    #[test]
    fn test_personal_block_has_title_and_contacts() {
        let doc = default_template();
        let block = render_section(&doc, &doc.sections[0]).unwrap();
        assert_eq!(
            block.elements[0],
            Element::Title {
                text: "JOHN SMITH".to_string()
            }
        );
        match &block.elements[2] {
            Element::ContactLine { items } => {
                assert_eq!(items[0], "john.smith@email.com");
                assert!(items.iter().any(|i| i.contains("linkedin")));
            }
            other => panic!("expected contact line, got {other:?}"),
        }
    }

    #[test]
    fn test_current_experience_shows_present() {
        let mut doc = default_template();
        doc.experience[0].end_date = "ignored".to_string();
        let section = SectionDescriptor::new("experience", SectionKind::Experience, "Work", 1);
        let block = render_section(&doc, &section).unwrap();
        match &block.elements[1] {
            Element::Record { trailing, .. } => {
                assert_eq!(trailing.as_deref(), Some("January 2023 - Present"))
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_education_line_includes_gpa_when_present() {
        let mut doc = default_template();
        doc.education[1].gpa = None;
        let section = SectionDescriptor::new("education", SectionKind::Education, "Edu", 1);
        let block = render_section(&doc, &section).unwrap();
        assert_eq!(
            bullets(&block),
            vec![
                "University of Technology | Bachelor of Science in Computer Science | 3.8 (CGPA) | 2016-2020",
                "Metro High School | High School Diploma in General Studies | 2012-2016",
            ]
        );
    }
}
