//! Preview renderer: read-only projection of the field store into one
//! composed document view.
//!
//! Field content is treated as markdown. Raw HTML embedded in content —
//! typed, transcribed, or saved from the editor — is escaped rather than
//! passed through, so markup renders but `<script>` text displays as text.

use crate::form::store::Field;
use pulldown_cmark::{html, Event, Options, Parser};

/// One rendered section: the field name and its content as HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSection {
    pub name: String,
    pub html: String,
}

/// The composed document: title plus sections in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub title: String,
    pub sections: Vec<PreviewSection>,
}

impl PreviewDocument {
    /// Compose the whole document as one HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
        for section in &self.sections {
            out.push_str(&format!(
                "<section>\n<h2>{}</h2>\n{}</section>\n",
                escape_html(&section.name),
                section.html
            ));
        }
        out
    }
}

/// Project the field collection into a preview document.
///
/// Pure function of its inputs: no mutation capability, and the caller
/// decides when to take the snapshot.
pub fn render_preview(title: &str, fields: &[Field]) -> PreviewDocument {
    PreviewDocument {
        title: title.to_string(),
        sections: fields
            .iter()
            .map(|field| PreviewSection {
                name: field.name.clone(),
                html: render_markup(&field.content),
            })
            .collect(),
    }
}

/// Render one field's content as HTML.
///
/// Markdown structure is honored; raw HTML and inline HTML events are
/// demoted to text so the serializer escapes them.
pub fn render_markup(content: &str) -> String {
    let parser = Parser::new_ext(content, Options::empty()).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Minimal HTML escaping for text placed into element bodies.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
