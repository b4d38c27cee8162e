//! The visual tree a template produces, and its HTML serialization.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Div,
    H1,
    H2,
    H3,
    P,
    Span,
    Strong,
}

impl Tag {
    fn name(&self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::P => "p",
            Tag::Span => "span",
            Tag::Strong => "strong",
        }
    }
}

/// Top-level optional blocks of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
        }
    }
}

/// What an element means, independent of how a template styles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Name,
    Contact,
    SectionHeading,
    EntryTitle,
    EntrySubtitle,
    EntryDetail,
    Description,
    Skill,
    Separator,
}

impl Role {
    fn as_str(&self) -> &'static str {
        match self {
            Role::Name => "name",
            Role::Contact => "contact",
            Role::SectionHeading => "section-heading",
            Role::EntryTitle => "entry-title",
            Role::EntrySubtitle => "entry-subtitle",
            Role::EntryDetail => "entry-detail",
            Role::Description => "description",
            Role::Skill => "skill",
            Role::Separator => "separator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text { text: s.into() }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// A styled element. Styles are inline CSS declarations in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: Tag,
    pub style: Vec<(&'static str, &'static str)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionKind>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            style: Vec::new(),
            role: None,
            section: None,
            children: Vec::new(),
        }
    }

    pub fn style(mut self, declarations: &[(&'static str, &'static str)]) -> Self {
        self.style.extend_from_slice(declarations);
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn section(mut self, kind: SectionKind) -> Self {
        self.section = Some(kind);
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, s: impl Into<String>) -> Self {
        self.child(Node::text(s))
    }

    /// Concatenated text of this element and its descendants.
    #[cfg(test)]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            if let Node::Element(el) = child {
                el.walk(visit);
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        let tag = self.tag.name();
        out.push('<');
        out.push_str(tag);
        if let Some(kind) = self.section {
            out.push_str(" data-section=\"");
            out.push_str(kind.as_str());
            out.push('"');
        }
        if let Some(role) = self.role {
            out.push_str(" data-role=\"");
            out.push_str(role.as_str());
            out.push('"');
        }
        if !self.style.is_empty() {
            out.push_str(" style=\"");
            for (i, (prop, value)) in self.style.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(prop);
                out.push_str(": ");
                push_escaped(out, value);
                out.push(';');
            }
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_html(out),
                Node::Text { text } => push_escaped(out, text),
            }
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

#[cfg(test)]
fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { text } => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

pub(crate) fn push_escaped(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualTree {
    pub root: Element,
}

impl VisualTree {
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(4096);
        self.root.write_html(&mut out);
        out
    }

    /// Sections present, in document order.
    pub fn sections(&self) -> Vec<SectionKind> {
        let mut found = Vec::new();
        self.root.walk(&mut |el| {
            if let Some(kind) = el.section {
                found.push(kind);
            }
        });
        found
    }

    #[cfg(test)]
    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections().contains(&kind)
    }

    /// Text of every element carrying `role`, in document order.
    #[cfg(test)]
    pub fn texts_with_role(&self, role: Role) -> Vec<String> {
        let mut found = Vec::new();
        self.root.walk(&mut |el| {
            if el.role == Some(role) {
                found.push(el.text_content());
            }
        });
        found
    }

    #[cfg(test)]
    pub fn text_content(&self) -> String {
        self.root.text_content()
    }
}
