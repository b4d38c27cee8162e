//! Single-writer editing session over one resume document.
//!
//! The session is the only thing that mutates the document. Rendering and
//! export get read-only borrows of whatever the document looks like at that
//! moment. The HTTP layer drives it for draft previews; the rest of the
//! surface is the in-process editing API.
#![allow(dead_code)]

use thiserror::Error;

use crate::document::model::{
    EducationEntry, EntryId, PersonalInfo, ResumeDocument, TemplateVariant, WorkEntry,
};
use crate::render::{render, VisualTree};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("no entry with id {0}")]
    UnknownEntry(EntryId),

    #[error("an export is already running")]
    ExportInFlight,
}

/// Proof that this session started an export; hand it back to finish.
#[derive(Debug)]
#[must_use]
pub struct ExportTicket(());

#[derive(Debug)]
pub struct EditorSession {
    document: ResumeDocument,
    exporting: bool,
}

impl EditorSession {
    pub fn new_draft() -> Self {
        Self {
            document: ResumeDocument::default(),
            exporting: false,
        }
    }

    pub fn from_document(mut document: ResumeDocument) -> Self {
        document.content.ensure_unique_entry_ids();
        Self {
            document,
            exporting: false,
        }
    }

    /// Read-only snapshot used for save and preview.
    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.document.title = title.into();
    }

    pub fn set_template(&mut self, template: TemplateVariant) {
        self.document.template = template;
    }

    pub fn personal_info_mut(&mut self) -> &mut PersonalInfo {
        &mut self.document.content.personal_info
    }

    pub fn add_work_entry(&mut self) -> EntryId {
        let entry = WorkEntry::default();
        let id = entry.id.clone();
        self.document.content.work_experience.push(entry);
        id
    }

    pub fn remove_work_entry(&mut self, id: &EntryId) -> bool {
        let entries = &mut self.document.content.work_experience;
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        entries.len() != before
    }

    pub fn update_work_entry(
        &mut self,
        id: &EntryId,
        edit: impl FnOnce(&mut WorkEntry),
    ) -> Result<(), EditorError> {
        let entry = self
            .document
            .content
            .work_experience
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| EditorError::UnknownEntry(id.clone()))?;
        edit(entry);
        // The id is the address; edits may not move it.
        entry.id = id.clone();
        Ok(())
    }

    pub fn add_education_entry(&mut self) -> EntryId {
        let entry = EducationEntry::default();
        let id = entry.id.clone();
        self.document.content.education.push(entry);
        id
    }

    pub fn remove_education_entry(&mut self, id: &EntryId) -> bool {
        let entries = &mut self.document.content.education;
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        entries.len() != before
    }

    pub fn update_education_entry(
        &mut self,
        id: &EntryId,
        edit: impl FnOnce(&mut EducationEntry),
    ) -> Result<(), EditorError> {
        let entry = self
            .document
            .content
            .education
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| EditorError::UnknownEntry(id.clone()))?;
        edit(entry);
        entry.id = id.clone();
        Ok(())
    }

    /// Comma-separated skills input, as typed in the skills field.
    pub fn set_skills_text(&mut self, input: &str) {
        self.document.content.skills = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    pub fn skills_text(&self) -> String {
        self.document.content.skills.join(", ")
    }

    pub fn preview(&self) -> VisualTree {
        render(&self.document.content, self.document.template)
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    pub fn begin_export(&mut self) -> Result<ExportTicket, EditorError> {
        if self.exporting {
            return Err(EditorError::ExportInFlight);
        }
        self.exporting = true;
        Ok(ExportTicket(()))
    }

    pub fn finish_export(&mut self, _ticket: ExportTicket) {
        self.exporting = false;
    }
}
