// Resume document model and the single-writer editor session over it.

pub mod editor;
pub mod model;

pub use model::{ResumeData, ResumeDocument, TemplateVariant};
