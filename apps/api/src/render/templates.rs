//! The three concrete resume styles.

use crate::document::model::{EducationEntry, TemplateVariant, WorkEntry};

use super::tree::{Element, Node, Role, SectionKind, Tag};
use super::{degree_title, join_present, separated, ResumeTemplate};

static MODERN: Modern = Modern;
static CLASSIC: Classic = Classic;
static MINIMAL: Minimal = Minimal;

pub fn for_variant(variant: TemplateVariant) -> &'static dyn ResumeTemplate {
    match variant {
        TemplateVariant::Modern => &MODERN,
        TemplateVariant::Classic => &CLASSIC,
        TemplateVariant::Minimal => &MINIMAL,
    }
}

const INK: &str = "#1E293B";
const MUTED: &str = "#64748B";
const BODY: &str = "#475569";
const ACCENT: &str = "#4F46E5";

const PAGE: &[(&str, &str)] = &[
    ("font-family", "DM Sans, sans-serif"),
    ("padding", "40px"),
    ("background-color", "white"),
    ("color", INK),
];

fn opt_text(tag: Tag, role: Role, style: &[(&'static str, &'static str)], text: &str) -> Option<Node> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(Element::new(tag).role(role).style(style).text(text).into())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Modern: accent-coloured headings, skill badges
// ────────────────────────────────────────────────────────────────────────────

pub struct Modern;

impl Modern {
    const SUBTITLE: &'static [(&'static str, &'static str)] =
        &[("font-size", "14px"), ("color", MUTED), ("margin-bottom", "8px")];
    const PARAGRAPH: &'static [(&'static str, &'static str)] =
        &[("font-size", "14px"), ("line-height", "1.6"), ("color", BODY)];

    /// Bold company (or institution) followed by " • location".
    fn org_line(org: &str, location: &str) -> Option<Node> {
        let org = org.trim();
        let location = location.trim();
        if org.is_empty() && location.is_empty() {
            return None;
        }
        let mut line = Element::new(Tag::Div)
            .role(Role::EntrySubtitle)
            .style(Self::SUBTITLE);
        if !org.is_empty() {
            line = line.child(Element::new(Tag::Strong).text(org));
        }
        match (org.is_empty(), location.is_empty()) {
            (false, false) => line = line.text(format!(" • {location}")),
            (true, false) => line = line.text(location),
            _ => {}
        }
        Some(line.into())
    }
}

impl ResumeTemplate for Modern {
    fn frame(&self) -> Element {
        Element::new(Tag::Div).style(PAGE)
    }

    fn header(&self, name: &str, contact: &[&str]) -> Element {
        let mut header = Element::new(Tag::Div)
            .style(&[
                ("border-bottom", "3px solid #4F46E5"),
                ("padding-bottom", "20px"),
                ("margin-bottom", "30px"),
            ])
            .child(
                Element::new(Tag::H1)
                    .role(Role::Name)
                    .style(&[
                        ("font-family", "Outfit"),
                        ("font-size", "36px"),
                        ("font-weight", "800"),
                        ("margin-bottom", "8px"),
                        ("color", INK),
                    ])
                    .text(name),
            );
        if !contact.is_empty() {
            header = header.child(
                Element::new(Tag::Div)
                    .role(Role::Contact)
                    .style(&[
                        ("display", "flex"),
                        ("flex-wrap", "wrap"),
                        ("font-size", "14px"),
                        ("color", MUTED),
                    ])
                    .children(separated(contact, Role::EntryDetail, " • ")),
            );
        }
        header
    }

    fn section(&self, kind: SectionKind, body: Vec<Node>) -> Element {
        let title = match kind {
            SectionKind::Summary => "PROFESSIONAL SUMMARY",
            SectionKind::Experience => "WORK EXPERIENCE",
            SectionKind::Education => "EDUCATION",
            SectionKind::Skills => "SKILLS",
        };
        let mut section = Element::new(Tag::Div);
        if kind != SectionKind::Skills {
            section = section.style(&[("margin-bottom", "30px")]);
        }
        section
            .child(
                Element::new(Tag::H2)
                    .role(Role::SectionHeading)
                    .style(&[
                        ("font-family", "Outfit"),
                        ("font-size", "20px"),
                        ("font-weight", "600"),
                        ("color", ACCENT),
                        ("margin-bottom", "16px"),
                    ])
                    .text(title),
            )
            .children(body)
    }

    fn summary(&self, text: &str) -> Vec<Node> {
        vec![Element::new(Tag::P)
            .role(Role::Description)
            .style(Self::PARAGRAPH)
            .text(text)
            .into()]
    }

    fn work_entry(&self, entry: &WorkEntry) -> Element {
        let title = opt_text(
            Tag::H3,
            Role::EntryTitle,
            &[("font-size", "16px"), ("font-weight", "600"), ("color", INK)],
            &entry.position,
        );
        let description = opt_text(Tag::P, Role::Description, Self::PARAGRAPH, &entry.description);

        Element::new(Tag::Div)
            .style(&[("margin-bottom", "20px")])
            .children(title)
            .children(Self::org_line(&entry.company, &entry.location))
            .children(description)
    }

    fn education_entry(&self, entry: &EducationEntry) -> Element {
        let title = degree_title(&entry.degree, &entry.field).and_then(|t| {
            opt_text(
                Tag::H3,
                Role::EntryTitle,
                &[("font-size", "16px"), ("font-weight", "600"), ("color", INK)],
                &t,
            )
        });

        Element::new(Tag::Div)
            .style(&[("margin-bottom", "16px")])
            .children(title)
            .children(Self::org_line(&entry.institution, &entry.location))
    }

    fn skills(&self, skills: &[&str]) -> Vec<Node> {
        let badges = skills.iter().map(|skill| {
            Node::from(
                Element::new(Tag::Span)
                    .role(Role::Skill)
                    .style(&[
                        ("background-color", "#EEF2FF"),
                        ("color", ACCENT),
                        ("padding", "6px 12px"),
                        ("border-radius", "6px"),
                        ("font-size", "13px"),
                    ])
                    .text(*skill),
            )
        });
        vec![Element::new(Tag::Div)
            .style(&[("display", "flex"), ("flex-wrap", "wrap"), ("gap", "8px")])
            .children(badges)
            .into()]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classic: centred header, ruled uppercase headings, inline skills
// ────────────────────────────────────────────────────────────────────────────

pub struct Classic;

impl Classic {
    const PARAGRAPH: &'static [(&'static str, &'static str)] =
        &[("font-size", "14px"), ("line-height", "1.7"), ("color", BODY)];
    const SUBTITLE: &'static [(&'static str, &'static str)] = &[
        ("font-size", "14px"),
        ("color", MUTED),
        ("margin-bottom", "8px"),
        ("font-style", "italic"),
    ];
    const TITLE: &'static [(&'static str, &'static str)] = &[
        ("font-size", "16px"),
        ("font-weight", "600"),
        ("color", INK),
        ("margin-bottom", "4px"),
    ];
}

impl ResumeTemplate for Classic {
    fn frame(&self) -> Element {
        Element::new(Tag::Div).style(PAGE)
    }

    fn header(&self, name: &str, contact: &[&str]) -> Element {
        let mut header = Element::new(Tag::Div)
            .style(&[
                ("text-align", "center"),
                ("margin-bottom", "30px"),
                ("border-bottom", "2px solid #64748B"),
                ("padding-bottom", "20px"),
            ])
            .child(
                Element::new(Tag::H1)
                    .role(Role::Name)
                    .style(&[
                        ("font-family", "Outfit"),
                        ("font-size", "32px"),
                        ("font-weight", "700"),
                        ("margin-bottom", "12px"),
                        ("color", INK),
                    ])
                    .text(name),
            );
        if !contact.is_empty() {
            header = header.child(
                Element::new(Tag::Div)
                    .role(Role::Contact)
                    .style(&[("font-size", "14px"), ("color", MUTED)])
                    .children(separated(contact, Role::EntryDetail, " | ")),
            );
        }
        header
    }

    fn section(&self, kind: SectionKind, body: Vec<Node>) -> Element {
        let title = match kind {
            SectionKind::Summary => "Summary",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
        };
        let mut section = Element::new(Tag::Div);
        if kind != SectionKind::Skills {
            section = section.style(&[("margin-bottom", "30px")]);
        }
        section
            .child(
                Element::new(Tag::H2)
                    .role(Role::SectionHeading)
                    .style(&[
                        ("font-family", "Outfit"),
                        ("font-size", "18px"),
                        ("font-weight", "600"),
                        ("color", INK),
                        ("margin-bottom", "12px"),
                        ("text-transform", "uppercase"),
                        ("border-bottom", "1px solid #CBD5E1"),
                        ("padding-bottom", "6px"),
                    ])
                    .text(title),
            )
            .children(body)
    }

    fn summary(&self, text: &str) -> Vec<Node> {
        vec![Element::new(Tag::P)
            .role(Role::Description)
            .style(Self::PARAGRAPH)
            .text(text)
            .into()]
    }

    fn work_entry(&self, entry: &WorkEntry) -> Element {
        let title = opt_text(Tag::H3, Role::EntryTitle, Self::TITLE, &entry.position);
        let subtitle = join_present(&[entry.company.as_str(), entry.location.as_str()], ", ")
            .and_then(|s| opt_text(Tag::Div, Role::EntrySubtitle, Self::SUBTITLE, &s));
        let description = opt_text(Tag::P, Role::Description, Self::PARAGRAPH, &entry.description);

        Element::new(Tag::Div)
            .style(&[("margin-bottom", "20px")])
            .children(title)
            .children(subtitle)
            .children(description)
    }

    fn education_entry(&self, entry: &EducationEntry) -> Element {
        let title = degree_title(&entry.degree, &entry.field)
            .and_then(|t| opt_text(Tag::H3, Role::EntryTitle, Self::TITLE, &t));
        let subtitle = join_present(&[entry.institution.as_str(), entry.location.as_str()], ", ")
            .and_then(|s| opt_text(Tag::Div, Role::EntrySubtitle, Self::SUBTITLE, &s));

        Element::new(Tag::Div)
            .style(&[("margin-bottom", "16px")])
            .children(title)
            .children(subtitle)
    }

    fn skills(&self, skills: &[&str]) -> Vec<Node> {
        vec![Element::new(Tag::P)
            .style(&[("font-size", "14px"), ("line-height", "1.8"), ("color", BODY)])
            .children(separated(skills, Role::Skill, " • "))
            .into()]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal: large name, left-ruled entries, no summary heading
// ────────────────────────────────────────────────────────────────────────────

pub struct Minimal;

impl Minimal {
    const RULED: &'static [(&'static str, &'static str)] = &[
        ("padding-left", "16px"),
        ("border-left", "2px solid #E2E8F0"),
    ];
    const PARAGRAPH: &'static [(&'static str, &'static str)] =
        &[("font-size", "14px"), ("line-height", "1.7"), ("color", BODY)];
}

impl ResumeTemplate for Minimal {
    fn frame(&self) -> Element {
        Element::new(Tag::Div)
            .style(PAGE)
            .style(&[("max-width", "800px")])
    }

    fn header(&self, name: &str, contact: &[&str]) -> Element {
        let mut header = Element::new(Tag::Div)
            .style(&[("margin-bottom", "40px")])
            .child(
                Element::new(Tag::H1)
                    .role(Role::Name)
                    .style(&[
                        ("font-family", "Outfit"),
                        ("font-size", "40px"),
                        ("font-weight", "800"),
                        ("margin-bottom", "4px"),
                        ("color", INK),
                        ("letter-spacing", "-0.5px"),
                    ])
                    .text(name),
            );
        if !contact.is_empty() {
            header = header.child(
                Element::new(Tag::Div)
                    .role(Role::Contact)
                    .style(&[
                        ("font-size", "13px"),
                        ("color", MUTED),
                        ("letter-spacing", "0.3px"),
                    ])
                    .children(separated(contact, Role::EntryDetail, " • ")),
            );
        }
        header
    }

    fn section(&self, kind: SectionKind, body: Vec<Node>) -> Element {
        let mut section = Element::new(Tag::Div);
        if kind != SectionKind::Skills {
            section = section.style(&[("margin-bottom", "32px")]);
        }
        let title = match kind {
            SectionKind::Summary => return section.children(body),
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
        };
        section
            .child(
                Element::new(Tag::H2)
                    .role(Role::SectionHeading)
                    .style(&[
                        ("font-family", "Outfit"),
                        ("font-size", "14px"),
                        ("font-weight", "700"),
                        ("color", INK),
                        ("margin-bottom", "16px"),
                        ("letter-spacing", "1px"),
                        ("text-transform", "uppercase"),
                    ])
                    .text(title),
            )
            .children(body)
    }

    fn summary(&self, text: &str) -> Vec<Node> {
        vec![Element::new(Tag::P)
            .role(Role::Description)
            .style(&[("font-size", "14px"), ("line-height", "1.8"), ("color", BODY)])
            .text(text)
            .into()]
    }

    fn work_entry(&self, entry: &WorkEntry) -> Element {
        let company = entry.company.trim();
        let at_company = if company.is_empty() {
            String::new()
        } else {
            format!("at {company}")
        };

        let mut title_line = Element::new(Tag::Div).style(&[("margin-bottom", "4px")]);
        title_line = title_line.children(opt_text(
            Tag::Span,
            Role::EntryTitle,
            &[("font-size", "15px"), ("font-weight", "600"), ("color", INK)],
            &entry.position,
        ));
        title_line = title_line.children(
            join_present(&[at_company.as_str(), entry.location.as_str()], ", ").and_then(|s| {
                opt_text(
                    Tag::Span,
                    Role::EntrySubtitle,
                    &[("font-size", "14px"), ("color", MUTED), ("margin-left", "8px")],
                    &s,
                )
            }),
        );

        let description = opt_text(
            Tag::P,
            Role::Description,
            &[
                ("font-size", "14px"),
                ("line-height", "1.7"),
                ("color", BODY),
                ("margin-top", "8px"),
            ],
            &entry.description,
        );

        Element::new(Tag::Div)
            .style(&[("margin-bottom", "24px")])
            .style(Self::RULED)
            .child(title_line)
            .children(description)
    }

    fn education_entry(&self, entry: &EducationEntry) -> Element {
        let title = degree_title(&entry.degree, &entry.field).and_then(|t| {
            opt_text(
                Tag::Div,
                Role::EntryTitle,
                &[("font-size", "15px"), ("font-weight", "600"), ("color", INK)],
                &t,
            )
        });
        let subtitle = join_present(&[entry.institution.as_str(), entry.location.as_str()], ", ").and_then(|s| {
            opt_text(
                Tag::Div,
                Role::EntrySubtitle,
                &[("font-size", "14px"), ("color", MUTED)],
                &s,
            )
        });

        Element::new(Tag::Div)
            .style(&[("margin-bottom", "16px")])
            .style(Self::RULED)
            .children(title)
            .children(subtitle)
    }

    fn skills(&self, skills: &[&str]) -> Vec<Node> {
        vec![Element::new(Tag::Div)
            .style(Self::RULED)
            .child(
                Element::new(Tag::P)
                    .style(Self::PARAGRAPH)
                    .children(separated(skills, Role::Skill, " • ")),
            )
            .into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, SectionKind};
    use crate::document::model::{PersonalInfo, ResumeData};

    fn with_summary() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                summary: "Builds things.".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_summary_has_no_heading() {
        let tree = render(&with_summary(), TemplateVariant::Minimal);
        assert!(tree.has_section(SectionKind::Summary));
        assert!(tree.texts_with_role(Role::SectionHeading).is_empty());
    }

    #[test]
    fn test_modern_and_classic_summary_headings() {
        let modern = render(&with_summary(), TemplateVariant::Modern);
        assert_eq!(
            modern.texts_with_role(Role::SectionHeading),
            vec!["PROFESSIONAL SUMMARY"]
        );
        let classic = render(&with_summary(), TemplateVariant::Classic);
        assert_eq!(classic.texts_with_role(Role::SectionHeading), vec!["Summary"]);
    }

    #[test]
    fn test_modern_skills_are_badges() {
        let data = ResumeData {
            skills: vec!["Go".into(), "Rust".into()],
            ..Default::default()
        };
        let html = render(&data, TemplateVariant::Modern).to_html();
        assert_eq!(html.matches("border-radius: 6px;").count(), 2);
        assert!(!html.contains("data-role=\"separator\""));
    }

    #[test]
    fn test_classic_skills_are_inline() {
        let data = ResumeData {
            skills: vec!["Go".into(), "Rust".into(), "SQL".into()],
            ..Default::default()
        };
        let tree = render(&data, TemplateVariant::Classic);
        assert_eq!(tree.texts_with_role(Role::Separator).len(), 2);
        assert!(tree.text_content().contains("Go • Rust • SQL"));
    }

    #[test]
    fn test_company_and_location_joiners() {
        let entry = WorkEntry {
            position: "Engineer".into(),
            company: "Acme".into(),
            location: "Berlin".into(),
            ..Default::default()
        };
        let subtitle = |t: &dyn ResumeTemplate| t.work_entry(&entry);

        let modern = subtitle(for_variant(TemplateVariant::Modern));
        assert!(modern.text_content().contains("Acme • Berlin"));
        let classic = subtitle(for_variant(TemplateVariant::Classic));
        assert!(classic.text_content().contains("Acme, Berlin"));
        let minimal = subtitle(for_variant(TemplateVariant::Minimal));
        assert!(minimal.text_content().contains("at Acme, Berlin"));
    }

    #[test]
    fn test_location_without_company_has_no_joiner() {
        let entry = WorkEntry {
            position: "Engineer".into(),
            location: "Berlin".into(),
            ..Default::default()
        };
        for variant in TemplateVariant::ALL {
            let text = for_variant(variant).work_entry(&entry).text_content();
            assert!(text.ends_with("Berlin"), "{variant}: {text}");
            assert!(!text.contains("• Berlin") && !text.contains(", Berlin"));
        }
    }
}
