//! Editing session: owns the document for one run and persists every change.
//!
//! Each mutation replaces whole fields of the document and queues the new snapshot with
//! the debounced saver. Exports read the current document and pass through the export
//! gate, so only one runs at a time.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::export::{export_docx, export_pdf, PreviewSurface};
use crate::models::resume::{new_entry_id, DEFAULT_CUSTOM_TITLE};
use crate::models::{
    default_template, Achievement, Certification, CustomSection, Education, Entry, Experience,
    FontFamily, PersonalInfo, Project, ResumeDocument, SectionDescriptor, SectionKind, Skill,
};
use crate::state::AppState;
use crate::storage::{load_or_default, DebouncedSaver, DocumentStore};

pub const MIN_FONT_SIZE: f32 = 6.0;
pub const MAX_FONT_SIZE: f32 = 36.0;

pub struct Session {
    doc: ResumeDocument,
    store: Arc<dyn DocumentStore>,
    saver: DebouncedSaver,
    load_advisory: Option<String>,
}

/// Generates add/update/remove for one entry category.
macro_rules! category_ops {
    ($field:ident, $ty:ty, $add:ident, $update:ident, $remove:ident) => {
        /// Appends the entry under a fresh id and returns that id.
        pub fn $add(&mut self, entry: $ty) -> String {
            let id = add_entry(&mut self.doc.$field, entry);
            self.commit();
            id
        }

        pub fn $update(&mut self, id: &str, edit: impl FnOnce(&mut $ty)) -> Result<(), AppError> {
            update_entry(&mut self.doc.$field, id, edit)?;
            self.commit();
            Ok(())
        }

        pub fn $remove(&mut self, id: &str) -> Result<$ty, AppError> {
            let removed = remove_entry(&mut self.doc.$field, id)?;
            self.commit();
            Ok(removed)
        }
    };
}

impl Session {
    /// Loads the stored snapshot, or the default template when there is none or it is unreadable.
    pub fn open(store: Arc<dyn DocumentStore>, saver: DebouncedSaver) -> Self {
        let (doc, load_advisory) = load_or_default(store.as_ref());
        Self {
            doc,
            store,
            saver,
            load_advisory,
        }
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.doc
    }

    /// Messages the user should see: a failed load, then the latest failed save.
    pub fn advisories(&self) -> Vec<String> {
        self.load_advisory
            .iter()
            .cloned()
            .chain(self.saver.advisory())
            .collect()
    }

    fn commit(&self) {
        self.saver.schedule(self.doc.clone());
    }

    /// Replaces the whole document, e.g. with an imported snapshot.
    pub fn replace_document(&mut self, doc: ResumeDocument) {
        self.doc = doc;
        self.commit();
    }

    pub fn update_personal(&mut self, personal_info: PersonalInfo) {
        self.doc.personal_info = personal_info;
        self.commit();
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.doc.summary = summary.into();
        self.commit();
    }

    pub fn set_font(&mut self, family: FontFamily, size: f32) -> Result<(), AppError> {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
            return Err(AppError::Validation(format!(
                "font size must be between {MIN_FONT_SIZE} and {MAX_FONT_SIZE} px, got {size}"
            )));
        }
        self.doc.font_family = family;
        self.doc.font_size = size;
        self.commit();
        Ok(())
    }

    category_ops!(experience, Experience, add_experience, update_experience, remove_experience);
    category_ops!(education, Education, add_education, update_education, remove_education);
    category_ops!(skills, Skill, add_skill, update_skill, remove_skill);
    category_ops!(projects, Project, add_project, update_project, remove_project);
    category_ops!(
        certifications,
        Certification,
        add_certification,
        update_certification,
        remove_certification
    );
    category_ops!(
        achievements,
        Achievement,
        add_achievement,
        update_achievement,
        remove_achievement
    );

    // ── Custom sections ──────────────────────────────────────────────────────

    /// Adds a custom section and its descriptor, placed after every existing section.
    pub fn add_custom_section(&mut self, title: &str, content: &str) -> String {
        let id = new_entry_id();
        self.doc.custom_sections.push(CustomSection {
            id: id.clone(),
            title: title.to_string(),
            content: content.to_string(),
        });
        let order = self.doc.sections.len() as i64 + 1;
        self.doc.sections.push(SectionDescriptor::new(
            SectionDescriptor::custom_id(&id),
            SectionKind::Custom,
            descriptor_title(title),
            order,
        ));
        info!(id = %id, "added custom section");
        self.commit();
        id
    }

    /// Edits a custom section; the descriptor title follows the section title.
    pub fn update_custom_section(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut CustomSection),
    ) -> Result<(), AppError> {
        update_entry(&mut self.doc.custom_sections, id, edit)?;
        let title = self
            .doc
            .custom_sections
            .iter()
            .find(|cs| cs.id == id)
            .map(|cs| descriptor_title(&cs.title))
            .unwrap_or_else(|| DEFAULT_CUSTOM_TITLE.to_string());
        let descriptor_id = SectionDescriptor::custom_id(id);
        if let Some(descriptor) = self.doc.sections.iter_mut().find(|s| s.id == descriptor_id) {
            descriptor.title = title;
        }
        self.commit();
        Ok(())
    }

    /// Removes a custom section together with its descriptor.
    pub fn remove_custom_section(&mut self, id: &str) -> Result<CustomSection, AppError> {
        let removed = remove_entry(&mut self.doc.custom_sections, id)?;
        let descriptor_id = SectionDescriptor::custom_id(id);
        self.doc.sections.retain(|s| s.id != descriptor_id);
        self.commit();
        Ok(removed)
    }

    // ── Section layout ───────────────────────────────────────────────────────

    /// Flips a section's visibility and returns the new state.
    pub fn toggle_section(&mut self, id: &str) -> Result<bool, AppError> {
        let section = self
            .doc
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::NotFound(format!("section '{id}'")))?;
        section.visible = !section.visible;
        let visible = section.visible;
        self.commit();
        Ok(visible)
    }

    /// Moves the section at display position `from` to position `to` and renumbers
    /// every `order` as 1..n. Positions count hidden sections too.
    pub fn move_section(&mut self, from: usize, to: usize) -> Result<(), AppError> {
        let len = self.doc.sections.len();
        if from >= len || to >= len {
            return Err(AppError::Validation(format!(
                "section positions must be below {len}, got {from} -> {to}"
            )));
        }

        let mut ordered: Vec<(usize, SectionDescriptor)> =
            self.doc.sections.drain(..).enumerate().collect();
        ordered.sort_by_key(|(index, s)| s.order.unwrap_or(*index as i64));
        let mut ordered: Vec<SectionDescriptor> = ordered.into_iter().map(|(_, s)| s).collect();

        let moved = ordered.remove(from);
        debug!(section = %moved.id, from, to, "moving section");
        ordered.insert(to, moved);
        for (i, section) in ordered.iter_mut().enumerate() {
            section.order = Some(i as i64 + 1);
        }
        self.doc.sections = ordered;
        self.commit();
        Ok(())
    }

    /// Restores the default template and forgets the stored snapshot.
    ///
    /// The store is cleared first; if that fails the current document stays in place.
    pub fn reset(&mut self) -> Result<(), AppError> {
        self.store.clear()?;
        self.doc = default_template();
        info!("resume reset to the default template");
        self.commit();
        Ok(())
    }

    // ── Exports ──────────────────────────────────────────────────────────────

    pub fn preview_surface(&self, state: &AppState) -> PreviewSurface {
        PreviewSurface::from_document(&self.doc, state.measurer.as_ref(), state.page_format)
    }

    pub async fn export_pdf(&self, state: &AppState) -> Result<PathBuf, AppError> {
        let _permit = state.export_gate.try_acquire()?;
        let surface = self.preview_surface(state);
        export_pdf(
            &surface,
            state.rasterizer.as_ref(),
            &state.config.output_dir,
            &self.doc.personal_info.full_name,
        )
        .await
    }

    pub fn export_docx(&self, state: &AppState) -> Result<PathBuf, AppError> {
        let _permit = state.export_gate.try_acquire()?;
        export_docx(&self.doc, state.packer.as_ref(), &state.config.output_dir)
    }

    /// Writes any pending snapshot and ends the session. Returns the last save advisory.
    pub async fn close(self) -> Option<String> {
        let advisory = self.saver.flush().await;
        if let Some(message) = &advisory {
            warn!("Session closed with unsaved changes: {message}");
        }
        advisory
    }
}

fn descriptor_title(title: &str) -> String {
    if title.trim().is_empty() {
        DEFAULT_CUSTOM_TITLE.to_string()
    } else {
        title.to_string()
    }
}

fn add_entry<E: Entry>(list: &mut Vec<E>, mut entry: E) -> String {
    let mut id = new_entry_id();
    while list.iter().any(|e| e.id() == id) {
        id = new_entry_id();
    }
    entry.set_id(id.clone());
    list.push(entry);
    debug!(category = E::CATEGORY, id = %id, "added entry");
    id
}

fn update_entry<E: Entry>(
    list: &mut [E],
    id: &str,
    edit: impl FnOnce(&mut E),
) -> Result<(), AppError> {
    let entry = list
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or_else(|| AppError::NotFound(format!("{} entry '{id}'", E::CATEGORY)))?;
    edit(entry);
    entry.set_id(id.to_string());
    Ok(())
}

fn remove_entry<E: Entry>(list: &mut Vec<E>, id: &str) -> Result<E, AppError> {
    let index = list
        .iter()
        .position(|e| e.id() == id)
        .ok_or_else(|| AppError::NotFound(format!("{} entry '{id}'", E::CATEGORY)))?;
    Ok(list.remove(index))
}
