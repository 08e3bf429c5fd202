use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Descriptor ids of custom sections are this prefix followed by the custom section id.
pub const CUSTOM_SECTION_PREFIX: &str = "custom-";

/// Title given to a custom section descriptor whose section has no title yet.
pub const DEFAULT_CUSTOM_TITLE: &str = "Custom Section";

// ────────────────────────────────────────────────────────────────────────────
// Root aggregate
// ────────────────────────────────────────────────────────────────────────────

/// The whole resume: content, section layout and presentation settings.
///
/// Serialized in camelCase so snapshots written by the browser editor load unchanged.
/// Missing top-level fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub achievements: Vec<Achievement>,
    pub custom_sections: Vec<CustomSection>,
    pub sections: Vec<SectionDescriptor>,
    pub font_family: FontFamily,
    pub font_size: f32,
}

impl Default for ResumeDocument {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            summary: String::new(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            achievements: Vec::new(),
            custom_sections: Vec::new(),
            sections: Vec::new(),
            font_family: FontFamily::default(),
            font_size: 11.0,
        }
    }
}

impl ResumeDocument {
    /// Looks up the custom section a `custom-<id>` descriptor points at.
    ///
    /// A descriptor without the prefix, or a prefix with no matching entry, yields `None`.
    pub fn custom_section_for(&self, descriptor: &SectionDescriptor) -> Option<&CustomSection> {
        let custom_id = descriptor.id.strip_prefix(CUSTOM_SECTION_PREFIX)?;
        self.custom_sections.iter().find(|cs| cs.id == custom_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Section descriptors
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of section kinds. Anything else on the wire becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Achievements,
    Custom,
    #[serde(other)]
    Unknown,
}

/// Visibility, order and title of one section, stored apart from its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// `None` when the stored value was absent or not a number.
    #[serde(
        default,
        deserialize_with = "lenient_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<i64>,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<String>, kind: SectionKind, title: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            visible: true,
            order: Some(order),
        }
    }

    /// Descriptor id for the custom section with the given id.
    pub fn custom_id(custom_section_id: &str) -> String {
        format!("{CUSTOM_SECTION_PREFIX}{custom_section_id}")
    }
}

fn default_visible() -> bool {
    true
}

/// Accepts integers, integral-ish floats and anything else (mapped to `None`).
fn lenient_order<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.floor() as i64)
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Presentation settings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Times,
    Arial,
    Calibri,
    Georgia,
    Helvetica,
}

impl FontFamily {
    /// Font-family list used when painting SVG text.
    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::Times => "'Times New Roman', Times, serif",
            FontFamily::Arial => "Arial, Helvetica, sans-serif",
            FontFamily::Calibri => "Calibri, Carlito, sans-serif",
            FontFamily::Georgia => "Georgia, serif",
            FontFamily::Helvetica => "Helvetica, Arial, sans-serif",
        }
    }
}

impl std::str::FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "times" => Ok(FontFamily::Times),
            "arial" => Ok(FontFamily::Arial),
            "calibri" => Ok(FontFamily::Calibri),
            "georgia" => Ok(FontFamily::Georgia),
            "helvetica" => Ok(FontFamily::Helvetica),
            other => Err(format!("unknown font family '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

/// An item of one content category, keyed by an id unique within that category.
pub trait Entry: Clone {
    /// Category name used in log lines and error messages.
    const CATEGORY: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

/// Generates a fresh entry id. Ids are never reused.
pub fn new_entry_id() -> String {
    Uuid::new_v4().simple().to_string()
}

macro_rules! impl_entry {
    ($ty:ty, $category:literal) => {
        impl Entry for $ty {
            const CATEGORY: &'static str = $category;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl std::str::FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "expert" => Ok(SkillLevel::Expert),
            other => Err(format!("unknown skill level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub id: String,
    pub name: String,
    pub issuer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A user-defined block of free-form content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl_entry!(Experience, "experience");
impl_entry!(Education, "education");
impl_entry!(Skill, "skills");
impl_entry!(Project, "projects");
impl_entry!(Certification, "certifications");
impl_entry!(Achievement, "achievements");
impl_entry!(CustomSection, "customSections");

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::default_template;

    #[test]
    fn test_template_round_trips_through_json() {
        let doc = default_template();
        let json = serde_json::to_string(&doc).unwrap();
        let back: ResumeDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_mutated_document_round_trips() {
        let mut doc = default_template();
        doc.summary = "Built X. Led Y.".to_string();
        doc.experience.truncate(1);
        doc.skills.clear();
        doc.custom_sections.push(CustomSection {
            id: "42".to_string(),
            title: "Volunteering".to_string(),
            content: "- Food bank\nMentoring".to_string(),
        });
        doc.sections.push(SectionDescriptor::new(
            SectionDescriptor::custom_id("42"),
            SectionKind::Custom,
            "Volunteering",
            9,
        ));
        doc.sections[1].visible = false;
        doc.sections[2].order = None;
        doc.font_family = FontFamily::Georgia;
        doc.font_size = 12.5;
        doc.personal_info.linkedin = None;

        let json = serde_json::to_string_pretty(&doc).unwrap();
        let back: ResumeDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_browser_snapshot_field_names() {
        let json = r#"{
            "personalInfo": {"fullName": "Ada Lovelace", "email": "ada@example.com", "phone": "1", "address": "London"},
            "summary": "",
            "experience": [{"id": "1", "company": "Analytical", "position": "Engineer",
                            "startDate": "1842", "endDate": "1843", "current": false, "description": ["Notes"]}],
            "sections": [{"id": "personal", "type": "personal", "title": "Contact", "visible": true, "order": 1}],
            "fontFamily": "georgia",
            "fontSize": 12
        }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.personal_info.full_name, "Ada Lovelace");
        assert_eq!(doc.experience[0].start_date, "1842");
        assert!(doc.certifications.is_empty());
        assert_eq!(doc.font_family, FontFamily::Georgia);
        assert_eq!(doc.sections[0].kind, SectionKind::Personal);
    }

    #[test]
    fn test_unknown_section_type_and_malformed_order() {
        let json = r#"[
            {"id": "a", "type": "timeline", "title": "T", "visible": true, "order": "first"},
            {"id": "b", "type": "skills", "title": "S", "visible": true},
            {"id": "c", "type": "summary", "title": "U", "visible": true, "order": 2.0}
        ]"#;
        let sections: Vec<SectionDescriptor> = serde_json::from_str(json).unwrap();
        assert_eq!(sections[0].kind, SectionKind::Unknown);
        assert_eq!(sections[0].order, None);
        assert_eq!(sections[1].order, None);
        assert_eq!(sections[2].order, Some(2));
    }

    #[test]
    fn test_custom_section_lookup_strips_prefix() {
        let mut doc = ResumeDocument::default();
        doc.custom_sections.push(CustomSection {
            id: "7".to_string(),
            title: "Talks".to_string(),
            content: "RustConf".to_string(),
        });
        let hit = SectionDescriptor::new("custom-7", SectionKind::Custom, "Talks", 1);
        let miss = SectionDescriptor::new("custom-8", SectionKind::Custom, "Other", 2);
        let unprefixed = SectionDescriptor::new("7", SectionKind::Custom, "Bare", 3);
        assert_eq!(doc.custom_section_for(&hit).map(|c| c.title.as_str()), Some("Talks"));
        assert!(doc.custom_section_for(&miss).is_none());
        assert!(doc.custom_section_for(&unprefixed).is_none());
    }

    #[test]
    fn test_new_entry_ids_are_distinct() {
        let ids: std::collections::HashSet<String> = (0..64).map(|_| new_entry_id()).collect();
        assert_eq!(ids.len(), 64);
    }
}
