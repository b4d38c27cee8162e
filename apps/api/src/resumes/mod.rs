// Saved resumes: per-user CRUD, file attachments, server-rendered preview,
// and PDF export of captured snapshots.

pub mod handlers;
pub mod store;

pub use store::{PgResumeStore, ResumeStore};
