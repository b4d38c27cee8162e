//! Template renderer: resume content + template variant → styled visual tree.
//!
//! `render` is pure. Which sections appear is decided once, in `ResumeView`;
//! the three `ResumeTemplate` strategies only decide how those sections look.
//! The tree serializes to HTML for the browser preview, which is also what
//! the browser snapshots for PDF export.

pub mod page;
pub mod templates;
pub mod tree;

pub use tree::{Element, Node, Role, SectionKind, Tag, VisualTree};

use crate::document::model::{
    is_blank, EducationEntry, ResumeData, TemplateVariant, WorkEntry,
};

/// Shown in place of a blank `full_name`.
pub const PLACEHOLDER_NAME: &str = "Your Name";

/// The parts of a resume that are actually displayed, after blank filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeView<'a> {
    pub name: &'a str,
    /// Non-blank email / phone / location, in that order.
    pub contact: Vec<&'a str>,
    pub summary: Option<&'a str>,
    pub experience: &'a [WorkEntry],
    pub education: &'a [EducationEntry],
    pub skills: Vec<&'a str>,
}

impl<'a> ResumeView<'a> {
    pub fn of(data: &'a ResumeData) -> Self {
        let info = &data.personal_info;
        let name = if is_blank(&info.full_name) {
            PLACEHOLDER_NAME
        } else {
            info.full_name.trim()
        };

        let contact = [&info.email, &info.phone, &info.location]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let summary = Some(info.summary.trim()).filter(|s| !s.is_empty());

        Self {
            name,
            contact,
            summary,
            experience: &data.work_experience,
            education: &data.education,
            skills: data.visible_skills(),
        }
    }

    /// Sections that will be rendered, in display order.
    pub fn sections(&self) -> Vec<SectionKind> {
        let mut out = Vec::with_capacity(4);
        if self.summary.is_some() {
            out.push(SectionKind::Summary);
        }
        if !self.experience.is_empty() {
            out.push(SectionKind::Experience);
        }
        if !self.education.is_empty() {
            out.push(SectionKind::Education);
        }
        if !self.skills.is_empty() {
            out.push(SectionKind::Skills);
        }
        out
    }
}

/// One visual style for a resume. Implementations build markup only; they
/// are never asked to render a section that `ResumeView` left out.
pub trait ResumeTemplate: Send + Sync {
    /// Outer page container.
    fn frame(&self) -> Element;

    fn header(&self, name: &str, contact: &[&str]) -> Element;

    /// Wraps a section body, adding the variant's heading (if it shows one).
    fn section(&self, kind: SectionKind, body: Vec<Node>) -> Element;

    fn summary(&self, text: &str) -> Vec<Node>;

    fn work_entry(&self, entry: &WorkEntry) -> Element;

    fn education_entry(&self, entry: &EducationEntry) -> Element;

    /// `skills` is already filtered and non-empty.
    fn skills(&self, skills: &[&str]) -> Vec<Node>;
}

/// Renders `content` with the template `variant` selects.
pub fn render(content: &ResumeData, variant: TemplateVariant) -> VisualTree {
    render_with(templates::for_variant(variant), content)
}

pub fn render_with(template: &dyn ResumeTemplate, content: &ResumeData) -> VisualTree {
    let view = ResumeView::of(content);
    let mut root = template
        .frame()
        .child(template.header(view.name, &view.contact));

    for kind in view.sections() {
        let body = match kind {
            SectionKind::Summary => template.summary(view.summary.unwrap_or_default()),
            SectionKind::Experience => view
                .experience
                .iter()
                .map(|e| Node::from(template.work_entry(e)))
                .collect(),
            SectionKind::Education => view
                .education
                .iter()
                .map(|e| Node::from(template.education_entry(e)))
                .collect(),
            SectionKind::Skills => template.skills(&view.skills),
        };
        root = root.child(template.section(kind, body).section(kind));
    }

    VisualTree { root }
}

// ────────────────────────────────────────────────────────────────────────────
// Text helpers shared by the templates
// ────────────────────────────────────────────────────────────────────────────

/// Non-blank parts joined by `sep`; `None` when every part is blank.
pub fn join_present(parts: &[&str], sep: &str) -> Option<String> {
    let kept: Vec<&str> = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(sep))
    }
}

/// Items interleaved with separator spans, so every item stays addressable.
pub fn separated(
    items: &[&str],
    item_role: Role,
    sep: &'static str,
) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(
                Element::new(Tag::Span)
                    .role(Role::Separator)
                    .text(sep)
                    .into(),
            );
        }
        out.push(Element::new(Tag::Span).role(item_role).text(*item).into());
    }
    out
}

/// "degree in field"; either part may be blank.
pub fn degree_title(degree: &str, field: &str) -> Option<String> {
    let field = field.trim();
    let field_part = if field.is_empty() {
        String::new()
    } else {
        format!("in {field}")
    };
    join_present(&[degree, field_part.as_str()], " ")
}
