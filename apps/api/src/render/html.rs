//! Printable HTML export. The artifact is self-contained (inline styles) so the
//! download can be printed to PDF by any browser.

use bytes::Bytes;

use crate::render::{render_for_display, RenderedResume};
use crate::resume::document::{Layout, ResumeDocument, Styling};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// A complete export, ready to hand to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Bytes,
}

/// Renders the document with its current template into an HTML file.
pub fn export_artifact(document: &ResumeDocument) -> ExportArtifact {
    let rendered = render_for_display(document, &document.template_id);
    let html = to_html(&rendered);
    ExportArtifact {
        file_name: file_name_for(&rendered),
        content_type: HTML_CONTENT_TYPE,
        body: Bytes::from(html.into_bytes()),
    }
}

fn file_name_for(rendered: &RenderedResume) -> String {
    let slug: String = rendered
        .header
        .name
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "resume.html".to_string()
    } else {
        format!("{slug}-resume.html")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_html(r: &RenderedResume) -> String {
    let colors = &r.color_scheme;
    // Documents saved before font validation may still carry unsafe values.
    let fallback = Styling::default();
    let fonts = if r.styling.validate().is_ok() {
        &r.styling
    } else {
        &fallback
    };
    let columns = match r.styling.layout {
        Layout::SingleColumn => "1",
        Layout::TwoColumn => "2",
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(&r.header.name)));
    html.push_str(&format!(
        "<style>\
body {{ font-family: {font}, sans-serif; font-size: {size}; color: {text}; background: {bg}; margin: 0.75in; }}\n\
h1 {{ color: {primary}; margin-bottom: 4px; }}\n\
h2 {{ color: {primary}; border-bottom: 2px solid {primary}; text-transform: uppercase; font-size: 1.1em; }}\n\
h3 {{ margin: 8px 0 0; }}\n\
.sub {{ color: {secondary}; }}\n\
.meta {{ float: right; color: {secondary}; }}\n\
.sections {{ column-count: {columns}; }}\n\
</style>\n",
        font = fonts.font_family,
        size = fonts.font_size,
        text = colors.text,
        bg = colors.background,
        primary = colors.primary,
        secondary = colors.secondary,
    ));
    html.push_str("</head>\n<body>\n<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(&r.header.name)));
    if !r.header.contact.is_empty() {
        let contact: Vec<String> = r.header.contact.iter().map(|c| escape(c)).collect();
        html.push_str(&format!("<p class=\"sub\">{}</p>\n", contact.join(" | ")));
    }
    html.push_str("</header>\n");

    if let Some(summary) = &r.summary {
        html.push_str(&format!(
            "<section>\n<h2>Summary</h2>\n<p>{}</p>\n</section>\n",
            escape(summary)
        ));
    }

    html.push_str("<div class=\"sections\">\n");
    for section in &r.sections {
        html.push_str(&format!("<section>\n<h2>{}</h2>\n", escape(section.title)));
        for item in &section.items {
            html.push_str("<div class=\"item\">\n");
            if let Some(meta) = &item.meta {
                html.push_str(&format!("<span class=\"meta\">{}</span>\n", escape(meta)));
            }
            html.push_str(&format!("<h3>{}</h3>\n", escape(&item.heading)));
            if let Some(sub) = &item.subheading {
                html.push_str(&format!("<div class=\"sub\">{}</div>\n", escape(sub)));
            }
            if !item.lines.is_empty() {
                html.push_str("<ul>\n");
                for line in &item.lines {
                    html.push_str(&format!("<li>{}</li>\n", escape(line)));
                }
                html.push_str("</ul>\n");
            }
            html.push_str("</div>\n");
        }
        html.push_str("</section>\n");
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::document::{PersonalInfo, ProjectEntry, SectionRecord};
    use crate::resume::editor;
    use uuid::Uuid;

    fn sample_document() -> ResumeDocument {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        doc.sections.personal_info = PersonalInfo {
            full_name: "Asha  Rao".to_string(),
            email: "asha@example.com".to_string(),
            ..PersonalInfo::default()
        };
        editor::append(
            &mut doc,
            SectionRecord::Project(ProjectEntry {
                name: "Compiler <toy>".to_string(),
                description: "A & B".to_string(),
                technologies: vec!["Rust".to_string()],
            }),
        );
        doc
    }

    #[test]
    fn test_export_uses_template_colors() {
        let mut doc = sample_document();
        editor::set_template(&mut doc, "template-3");

        let artifact = export_artifact(&doc);
        let html = String::from_utf8(artifact.body.to_vec()).unwrap();
        assert!(html.contains("#7c3aed"));
        assert_eq!(artifact.content_type, HTML_CONTENT_TYPE);
    }

    #[test]
    fn test_export_escapes_user_text() {
        let html = String::from_utf8(export_artifact(&sample_document()).body.to_vec()).unwrap();
        assert!(html.contains("Compiler &lt;toy&gt;"));
        assert!(html.contains("A &amp; B"));
        assert!(!html.contains("<toy>"));
    }

    #[test]
    fn test_file_name_is_slugged_from_name() {
        assert_eq!(export_artifact(&sample_document()).file_name, "asha-rao-resume.html");

        let anonymous = ResumeDocument::new(Uuid::new_v4());
        assert_eq!(export_artifact(&anonymous).file_name, "resume.html");
    }

    #[test]
    fn test_unsafe_stored_fonts_fall_back_to_defaults() {
        let mut doc = sample_document();
        doc.styling.font_family = "x; } body { display:none".to_string();

        let html = String::from_utf8(export_artifact(&doc).body.to_vec()).unwrap();
        assert!(!html.contains("display:none"));
        assert!(html.contains("font-family: Inter, sans-serif"));
    }

    #[test]
    fn test_export_is_stable_for_same_document() {
        let doc = sample_document();
        assert_eq!(export_artifact(&doc), export_artifact(&doc));
    }
}
