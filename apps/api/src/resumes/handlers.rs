use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::document::editor::EditorSession;
use crate::document::model::{is_blank, DEFAULT_TITLE};
use crate::document::{ResumeData, ResumeDocument, TemplateVariant};
use crate::errors::AppError;
use crate::export::raster::SnapshotRasterizer;
use crate::export::{content_disposition, export_pdf, PdfExport};
use crate::models::resume::{ResumeRecord, ResumeSummary};
use crate::render::page::preview_page;
use crate::render::render;
use crate::state::AppState;
use crate::storage::upload_key;

const RESUME_NOT_FOUND: &str = "Resume not found";

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub template: Option<TemplateVariant>,
    pub data: Option<ResumeData>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub template: TemplateVariant,
    #[serde(default)]
    pub data: ResumeData,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub filename: String,
}

/// Entry ids are addresses for edits, so duplicates are re-keyed before storing.
fn normalized(mut document: ResumeDocument) -> ResumeDocument {
    let rekeyed = document.content.ensure_unique_entry_ids();
    if rekeyed > 0 {
        debug!(rekeyed, "Re-keyed duplicate entry ids");
    }
    document
}

async fn owned_resume(state: &AppState, user_id: Uuid, id: Uuid) -> Result<ResumeRecord, AppError> {
    state
        .resumes
        .find(user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(RESUME_NOT_FOUND.into()))
}

// ────────────────────────────────────────────────────────────────────────────
// CRUD
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(mut document): Json<ResumeDocument>,
) -> Result<Json<ResumeRecord>, AppError> {
    if is_blank(&document.title) {
        document.title = DEFAULT_TITLE.to_string();
    }
    let record = ResumeRecord::new(user.id, normalized(document));
    state.resumes.insert(&record).await?;
    info!(resume_id = %record.id, user_id = %user.id, "Created resume");
    Ok(Json(record))
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let records = state.resumes.list_for_user(user.id).await?;
    Ok(Json(records.iter().map(ResumeRecord::summary).collect()))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRecord>, AppError> {
    Ok(Json(owned_resume(&state, user.id, id).await?))
}

/// PUT /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    let mut record = owned_resume(&state, user.id, id).await?;

    let document = normalized(ResumeDocument {
        title: req.title.unwrap_or(record.title),
        template: req.template.unwrap_or(record.template),
        content: req.data.unwrap_or(record.data),
    });
    record.title = document.title;
    record.template = document.template;
    record.data = document.content;
    record.updated_at = Utc::now();

    if !state.resumes.replace(&record).await? {
        return Err(AppError::NotFound(RESUME_NOT_FOUND.into()));
    }
    info!(resume_id = %id, "Updated resume");
    Ok(Json(record))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.resumes.delete(user.id, id).await? {
        return Err(AppError::NotFound(RESUME_NOT_FOUND.into()));
    }
    info!(resume_id = %id, "Deleted resume");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/resumes/:id/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    owned_resume(&state, user.id, id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let key = upload_key(id, field.file_name());
        let content_type = field.content_type().map(str::to_string);
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        state.files.put(&key, body, content_type.as_deref()).await?;
        if !state.resumes.set_uploaded_file(user.id, id, &key).await? {
            return Err(AppError::NotFound(RESUME_NOT_FOUND.into()));
        }
        return Ok(Json(UploadResponse {
            message: "File uploaded successfully",
            filename: key,
        }));
    }

    Err(AppError::Validation("Missing multipart field 'file'".into()))
}

// ────────────────────────────────────────────────────────────────────────────
// Preview & export
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/resumes/:id/preview
pub async fn handle_preview_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let record = owned_resume(&state, user.id, id).await?;
    let tree = render(&record.data, record.template);
    debug!(resume_id = %id, sections = ?tree.sections(), "Rendered preview");
    Ok(Html(preview_page(&tree, &record.title)))
}

/// POST /api/preview
pub async fn handle_preview_draft(
    AuthUser(_user): AuthUser,
    Json(req): Json<PreviewRequest>,
) -> Html<String> {
    let session = EditorSession::from_document(ResumeDocument {
        title: req.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        template: req.template,
        content: req.data,
    });
    let tree = session.preview();
    debug!(sections = ?tree.sections(), "Rendered draft preview");
    Html(preview_page(&tree, &session.document().title))
}

/// POST /api/resumes/:id/export
pub async fn handle_export_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    snapshot: Bytes,
) -> Result<Response, AppError> {
    let record = owned_resume(&state, user.id, id).await?;
    let export = run_export(&state, user.id, snapshot, record.title).await?;
    pdf_response(export)
}

/// POST /api/export
pub async fn handle_export_draft(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ExportQuery>,
    snapshot: Bytes,
) -> Result<Response, AppError> {
    let title = query.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let export = run_export(&state, user.id, snapshot, title).await?;
    pdf_response(export)
}

/// Assembles the PDF off the async runtime. The permit is held until the
/// blocking task finishes, so a second export from the same user is refused.
async fn run_export(
    state: &AppState,
    user_id: Uuid,
    snapshot: Bytes,
    title: String,
) -> Result<PdfExport, AppError> {
    let permit = state
        .exports
        .try_begin(user_id)
        .ok_or_else(|| AppError::Conflict("An export is already running".into()))?;

    let export = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        export_pdf(&SnapshotRasterizer, &snapshot, &title, Utc::now())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("export task failed: {e}")))??;
    Ok(export)
}

fn pdf_response(export: PdfExport) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&content_disposition(&export.filename))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("bad Content-Disposition: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response())
}
