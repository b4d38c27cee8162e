use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::document::model::{ResumeData, ResumeDocument, TemplateVariant};

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub data: Json<ResumeData>,
    pub uploaded_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A saved resume as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: TemplateVariant,
    pub data: ResumeData,
    pub uploaded_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            template: TemplateVariant::parse(&row.template),
            data: row.data.0,
            uploaded_file: row.uploaded_file,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ResumeRecord {
    pub fn new(user_id: Uuid, document: ResumeDocument) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: document.title,
            template: document.template,
            data: document.content,
            uploaded_file: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> ResumeSummary {
        ResumeSummary {
            id: self.id,
            title: self.title.clone(),
            template: self.template,
            updated_at: self.updated_at,
        }
    }
}

/// List-view projection of a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub template: TemplateVariant,
    pub updated_at: DateTime<Utc>,
}
