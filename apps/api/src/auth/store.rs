use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;

pub const EMAIL_TAKEN: &str = "Email already registered";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: &UserRow) -> Result<(), AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &UserRow) -> Result<(), AppError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, full_name, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Conflict(EMAIL_TAKEN.into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
