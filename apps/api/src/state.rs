use std::sync::Arc;

use crate::auth::{TokenIssuer, UserStore};
use crate::config::Config;
use crate::export::ExportGate;
use crate::resumes::ResumeStore;
use crate::storage::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<dyn ResumeStore>,
    pub users: Arc<dyn UserStore>,
    /// Uploaded attachments. S3 / MinIO in production.
    pub files: Arc<dyn FileStore>,
    pub tokens: TokenIssuer,
    pub exports: Arc<ExportGate>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        resumes: Arc<dyn ResumeStore>,
        users: Arc<dyn UserStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl_minutes),
            exports: Arc::new(ExportGate::default()),
            resumes,
            users,
            files,
            config,
        }
    }
}
