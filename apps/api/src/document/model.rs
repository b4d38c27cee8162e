//! Structured resume content as authored in the editor and stored per record.
//!
//! Every text field is blank-tolerant: absent keys and JSON `null` both
//! deserialize to an empty string, so downstream code only ever has to ask
//! "is this blank?".

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Template selector
// ────────────────────────────────────────────────────────────────────────────

/// Visual template a resume is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    #[default]
    Modern,
    Classic,
    Minimal,
}

impl TemplateVariant {
    #[cfg(test)]
    pub const ALL: [TemplateVariant; 3] = [
        TemplateVariant::Modern,
        TemplateVariant::Classic,
        TemplateVariant::Minimal,
    ];

    /// Lenient parse: anything unrecognized falls back to `Modern`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "classic" => TemplateVariant::Classic,
            "minimal" => TemplateVariant::Minimal,
            _ => TemplateVariant::Modern,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateVariant::Modern => "modern",
            TemplateVariant::Classic => "classic",
            TemplateVariant::Minimal => "minimal",
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TemplateVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(TemplateVariant::parse).unwrap_or_default())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry identifiers
// ────────────────────────────────────────────────────────────────────────────

/// Opaque per-entry key used to address list items while editing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        EntryId(Uuid::new_v4().to_string())
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        EntryId::generate()
    }
}

impl From<&str> for EntryId {
    fn from(raw: &str) -> Self {
        EntryId(raw.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn entry_id_or_generate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EntryId, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(s) if !s.trim().is_empty() => EntryId(s),
        _ => EntryId::generate(),
    })
}

/// `null` → blank.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// True when the string has no visible characters.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "text")]
    pub full_name: String,
    #[serde(default, deserialize_with = "text")]
    pub email: String,
    #[serde(default, deserialize_with = "text")]
    pub phone: String,
    #[serde(default, deserialize_with = "text")]
    pub location: String,
    #[serde(default, deserialize_with = "text")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "text")]
    pub website: String,
    #[serde(default, deserialize_with = "text")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEntry {
    #[serde(default, deserialize_with = "entry_id_or_generate")]
    pub id: EntryId,
    #[serde(default, deserialize_with = "text")]
    pub company: String,
    #[serde(default, deserialize_with = "text")]
    pub position: String,
    #[serde(default, deserialize_with = "text")]
    pub location: String,
    #[serde(default, deserialize_with = "text")]
    pub start_date: String,
    #[serde(default, deserialize_with = "text")]
    pub end_date: String,
    #[serde(default, deserialize_with = "flag")]
    pub current: bool,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "entry_id_or_generate")]
    pub id: EntryId,
    #[serde(default, deserialize_with = "text")]
    pub institution: String,
    #[serde(default, deserialize_with = "text")]
    pub degree: String,
    #[serde(default, deserialize_with = "text")]
    pub field: String,
    #[serde(default, deserialize_with = "text")]
    pub location: String,
    #[serde(default, deserialize_with = "text")]
    pub start_date: String,
    #[serde(default, deserialize_with = "text")]
    pub end_date: String,
    #[serde(default, deserialize_with = "text")]
    pub gpa: String,
}

/// The authored body of a resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default, deserialize_with = "personal_info")]
    pub personal_info: PersonalInfo,
    #[serde(default, deserialize_with = "list")]
    pub work_experience: Vec<WorkEntry>,
    #[serde(default, deserialize_with = "list")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "string_list")]
    pub skills: Vec<String>,
    /// Stored and round-tripped; no template renders it.
    #[serde(default, deserialize_with = "string_list")]
    pub certifications: Vec<String>,
}

fn personal_info<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PersonalInfo, D::Error> {
    Ok(Option::<PersonalInfo>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResumeData {
    /// Skills with blank entries dropped, trimmed for display.
    pub fn visible_skills(&self) -> Vec<&str> {
        self.skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Re-keys entries whose id repeats an earlier one in the same sequence.
    /// Returns how many ids were replaced.
    pub fn ensure_unique_entry_ids(&mut self) -> usize {
        let mut replaced = 0;

        let mut seen = HashSet::new();
        for entry in &mut self.work_experience {
            while !seen.insert(entry.id.clone()) {
                entry.id = EntryId::generate();
                replaced += 1;
            }
        }

        let mut seen = HashSet::new();
        for entry in &mut self.education {
            while !seen.insert(entry.id.clone()) {
                entry.id = EntryId::generate();
                replaced += 1;
            }
        }

        replaced
    }
}

/// Title + template + content, the unit the editor works on and the store saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(default, deserialize_with = "text")]
    pub title: String,
    #[serde(default)]
    pub template: TemplateVariant,
    #[serde(rename = "data", alias = "content", default)]
    pub content: ResumeData,
}

pub const DEFAULT_TITLE: &str = "My Resume";

impl Default for ResumeDocument {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            template: TemplateVariant::Modern,
            content: ResumeData::default(),
        }
    }
}
