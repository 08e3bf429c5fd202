//! Word export: a fixed-order projection of the document, packed as OOXML.
//!
//! The projection ignores section order and visibility and leaves custom sections out.
//! Font settings apply to the preview only; the package uses its own fixed sizes.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::AppError;
use crate::export::export_filename;
use crate::models::ResumeDocument;
use crate::storage::file::write_atomically;

// Sizes are in half-points, spacing in twentieths of a point.
const TITLE_SIZE: u32 = 32;
const HEADING_SIZE: u32 = 24;
const BODY_SIZE: u32 = 22;
const DATE_SIZE: u32 = 20;
const SECTION_SPACING: u32 = 400;
const ENTRY_SPACING: u32 = 200;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Title,
    Normal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub runs: Vec<TextRun>,
    pub spacing_before: Option<u32>,
}

impl Paragraph {
    fn text(text: impl Into<String>, size: u32) -> Self {
        Self {
            style: ParagraphStyle::Normal,
            runs: vec![TextRun {
                text: text.into(),
                bold: false,
                size,
            }],
            spacing_before: None,
        }
    }

    fn bold(mut self) -> Self {
        for run in &mut self.runs {
            run.bold = true;
        }
        self
    }

    fn spaced(mut self, before: u32) -> Self {
        self.spacing_before = Some(before);
        self
    }

    fn heading(text: &str) -> Self {
        Self::text(text, HEADING_SIZE).bold().spaced(SECTION_SPACING)
    }

    /// Concatenated run text.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordDocument {
    pub paragraphs: Vec<Paragraph>,
}

/// Projects the resume into Word paragraphs, in fixed category order.
pub fn project_document(doc: &ResumeDocument) -> WordDocument {
    let info = &doc.personal_info;
    let mut paragraphs = vec![
        Paragraph {
            style: ParagraphStyle::Title,
            ..Paragraph::text(info.full_name.as_str(), TITLE_SIZE).bold()
        },
        Paragraph::text(format!("{} | {}", info.email, info.phone), BODY_SIZE),
    ];
    if !info.address.trim().is_empty() {
        paragraphs.push(Paragraph::text(info.address.as_str(), BODY_SIZE));
    }

    if !doc.summary.trim().is_empty() {
        paragraphs.push(Paragraph::heading("Professional Summary"));
        paragraphs.push(Paragraph::text(doc.summary.as_str(), BODY_SIZE));
    }

    if !doc.experience.is_empty() {
        paragraphs.push(Paragraph::heading("Work Experience"));
        for exp in &doc.experience {
            paragraphs.push(
                Paragraph::text(format!("{} at {}", exp.position, exp.company), BODY_SIZE)
                    .bold()
                    .spaced(ENTRY_SPACING),
            );
            let end = if exp.current {
                "Present"
            } else {
                exp.end_date.as_str()
            };
            paragraphs.push(Paragraph::text(
                format!("{} - {end}", exp.start_date),
                DATE_SIZE,
            ));
            for line in &exp.description {
                paragraphs.push(Paragraph::text(format!("• {line}"), BODY_SIZE));
            }
        }
    }

    if !doc.education.is_empty() {
        paragraphs.push(Paragraph::heading("Education"));
        for edu in &doc.education {
            paragraphs.push(
                Paragraph::text(
                    format!("{} in {} - {}", edu.degree, edu.field, edu.institution),
                    BODY_SIZE,
                )
                .spaced(ENTRY_SPACING),
            );
        }
    }

    if !doc.skills.is_empty() {
        paragraphs.push(Paragraph::heading("Skills"));
        let names: Vec<&str> = doc.skills.iter().map(|s| s.name.as_str()).collect();
        paragraphs.push(Paragraph::text(names.join(", "), BODY_SIZE));
    }

    if !doc.certifications.is_empty() {
        paragraphs.push(Paragraph::heading("Certifications"));
        for cert in &doc.certifications {
            paragraphs.push(Paragraph::text(
                format!("• {} - {}", cert.name, cert.issuer),
                BODY_SIZE,
            ));
        }
    }

    if !doc.projects.is_empty() {
        paragraphs.push(Paragraph::heading("Projects"));
        for project in &doc.projects {
            paragraphs.push(
                Paragraph::text(
                    format!("{}: {}", project.name, project.description),
                    BODY_SIZE,
                )
                .spaced(ENTRY_SPACING),
            );
        }
    }

    if !doc.achievements.is_empty() {
        paragraphs.push(Paragraph::heading("Achievements"));
        for achievement in &doc.achievements {
            paragraphs.push(Paragraph::text(
                format!("• {}", achievement.title),
                BODY_SIZE,
            ));
        }
    }

    WordDocument { paragraphs }
}

// ────────────────────────────────────────────────────────────────────────────
// Packing
// ────────────────────────────────────────────────────────────────────────────

/// Serializes a projected document into file bytes.
pub trait DocumentPacker: Send + Sync {
    fn pack(&self, doc: &WordDocument) -> Result<Vec<u8>, AppError>;
}

/// Writes a minimal WordprocessingML package.
pub struct DocxPacker;

impl DocumentPacker for DocxPacker {
    fn pack(&self, doc: &WordDocument) -> Result<Vec<u8>, AppError> {
        build_package(doc).map_err(|e| AppError::Encode(format!("{e:#}")))
    }
}

fn build_package(doc: &WordDocument) -> anyhow::Result<Vec<u8>> {
    let title = doc
        .paragraphs
        .iter()
        .find(|p| p.style == ParagraphStyle::Title)
        .map(Paragraph::plain_text)
        .unwrap_or_default();

    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec()),
        ("word/document.xml", document_xml(doc)?),
        ("word/styles.xml", STYLES.as_bytes().to_vec()),
        ("docProps/core.xml", core_properties_xml(&title)?),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("failed to start zip entry {name}"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("failed to write zip entry {name}"))?;
    }
    let bytes = zip
        .finish()
        .context("failed to finalize docx package")?
        .into_inner();
    Ok(bytes)
}

fn document_xml(doc: &WordDocument) -> anyhow::Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", WORD_NS));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for paragraph in &doc.paragraphs {
        write_paragraph(&mut writer, paragraph)?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner().into_inner())
}

fn write_paragraph<W: Write>(writer: &mut Writer<W>, paragraph: &Paragraph) -> anyhow::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;

    let style = match paragraph.style {
        ParagraphStyle::Title => Some("Title"),
        ParagraphStyle::Normal => None,
    };
    if style.is_some() || paragraph.spacing_before.is_some() {
        writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;
        if let Some(style) = style {
            write_val(writer, "w:pStyle", style)?;
        }
        if let Some(before) = paragraph.spacing_before {
            let mut spacing = BytesStart::new("w:spacing");
            spacing.push_attribute(("w:before", before.to_string().as_str()));
            writer.write_event(Event::Empty(spacing))?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;
    }

    for run in &paragraph.runs {
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;
        writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
        if run.bold {
            writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
        }
        write_val(writer, "w:sz", &run.size.to_string())?;
        writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;

        let mut text = BytesStart::new("w:t");
        text.push_attribute(("xml:space", "preserve"));
        writer.write_event(Event::Start(text))?;
        writer.write_event(Event::Text(BytesText::new(&run.text)))?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_val<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> anyhow::Result<()> {
    let mut elem = BytesStart::new(name);
    elem.push_attribute(("w:val", value));
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

fn core_properties_xml(title: &str) -> anyhow::Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("cp:coreProperties");
    root.push_attribute((
        "xmlns:cp",
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
    ));
    root.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
    root.push_attribute(("xmlns:dcterms", "http://purl.org/dc/terms/"));
    root.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("dc:title")))?;
    writer.write_event(Event::Text(BytesText::new(title)))?;
    writer.write_event(Event::End(BytesEnd::new("dc:title")))?;

    let mut created = BytesStart::new("dcterms:created");
    created.push_attribute(("xsi:type", "dcterms:W3CDTF"));
    writer.write_event(Event::Start(created))?;
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    writer.write_event(Event::Text(BytesText::new(&now)))?;
    writer.write_event(Event::End(BytesEnd::new("dcterms:created")))?;

    writer.write_event(Event::End(BytesEnd::new("cp:coreProperties")))?;
    Ok(writer.into_inner().into_inner())
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:rPr><w:sz w:val="22"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:after="120"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style></w:styles>"#;

/// Projects, packs and writes `<Name>_Resume.docx` into `dir`.
pub fn export_docx(
    doc: &ResumeDocument,
    packer: &dyn DocumentPacker,
    dir: &Path,
) -> Result<PathBuf, AppError> {
    let word = project_document(doc);
    let bytes = packer.pack(&word)?;
    let path = dir.join(export_filename(&doc.personal_info.full_name, "docx"));
    write_atomically(&path, &bytes)?;
    info!(
        path = %path.display(),
        paragraphs = word.paragraphs.len(),
        "exported DOCX"
    );
    Ok(path)
}
