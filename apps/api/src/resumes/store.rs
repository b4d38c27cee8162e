use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeRow};

/// Persistence for resume records. Every lookup is scoped to the owning user,
/// so another user's id behaves exactly like a missing one.
///
/// Carried in `AppState` as `Arc<dyn ResumeStore>`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, record: &ResumeRecord) -> Result<(), AppError>;

    /// Most recently updated first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRecord>, AppError>;

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeRecord>, AppError>;

    /// Overwrites title, template, data and updated_at. Returns false if absent.
    async fn replace(&self, record: &ResumeRecord) -> Result<bool, AppError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;

    async fn set_uploaded_file(
        &self,
        user_id: Uuid,
        id: Uuid,
        storage_key: &str,
    ) -> Result<bool, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(&self, record: &ResumeRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, title, template, data, uploaded_file, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.title)
        .bind(record.template.as_str())
        .bind(Json(&record.data))
        .bind(&record.uploaded_file)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRecord>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ResumeRecord::from).collect())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeRecord>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ResumeRecord::from))
    }

    async fn replace(&self, record: &ResumeRecord) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET title = $1, template = $2, data = $3, updated_at = $4
            WHERE id = $5 AND user_id = $6
            "#,
        )
        .bind(&record.title)
        .bind(record.template.as_str())
        .bind(Json(&record.data))
        .bind(record.updated_at)
        .bind(record.id)
        .bind(record.user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_uploaded_file(
        &self,
        user_id: Uuid,
        id: Uuid,
        storage_key: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE resumes SET uploaded_file = $1 WHERE id = $2 AND user_id = $3",
        )
        .bind(storage_key)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────
