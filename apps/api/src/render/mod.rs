// Resume rendering: a display tree for preview, a printable HTML artifact for
// export, and the storage boundary the artifact is handed to.

pub mod artifact_store;
pub mod handlers;
pub mod html;

use serde::Serialize;

use crate::resume::document::{ListSection, ResumeDocument, Sections, Styling};
use crate::resume::template::{self, ColorScheme};

pub use artifact_store::{ArtifactStore, S3ArtifactStore};
#[cfg(test)]
pub use artifact_store::InMemoryArtifactStore;

/// Display tree for a resume. A pure function of the document and template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResume {
    pub template_id: String,
    pub color_scheme: ColorScheme,
    pub styling: Styling,
    pub header: RenderHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub sections: Vec<RenderSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderHeader {
    pub name: String,
    pub contact: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSection {
    pub key: ListSection,
    pub title: &'static str,
    pub items: Vec<RenderItem>,
}

/// One record. Empty fields never produce a line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderItem {
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    pub lines: Vec<String>,
}

/// Builds the display tree. Sections appear in their default order and
/// records in their stored order; empty sections are left out.
pub fn render_for_display(document: &ResumeDocument, template_id: &str) -> RenderedResume {
    let s = &document.sections;
    RenderedResume {
        template_id: template_id.to_string(),
        color_scheme: template::resolve(template_id),
        styling: document.styling.clone(),
        header: render_header(s),
        summary: non_empty(&s.summary),
        sections: ListSection::ALL
            .into_iter()
            .filter_map(|key| {
                let items = render_items(s, key);
                (!items.is_empty()).then(|| RenderSection {
                    key,
                    title: key.title(),
                    items,
                })
            })
            .collect(),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn non_empty_opt(value: Option<&String>) -> Option<String> {
    value.and_then(|v| non_empty(v))
}

fn join_non_empty(parts: &[&str], sep: &str) -> Option<String> {
    let kept: Vec<&str> = parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    (!kept.is_empty()).then(|| kept.join(sep))
}

fn bullet_lines(items: &[String]) -> Vec<String> {
    items.iter().filter_map(|i| non_empty(i)).collect()
}

fn render_header(s: &Sections) -> RenderHeader {
    let info = &s.personal_info;
    let contact = [
        Some(info.email.as_str()),
        Some(info.phone.as_str()),
        Some(info.address.as_str()),
        info.linkedin.as_deref(),
        info.github.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter_map(non_empty)
    .collect();

    RenderHeader {
        name: info.full_name.trim().to_string(),
        contact,
    }
}

fn render_items(s: &Sections, key: ListSection) -> Vec<RenderItem> {
    match key {
        ListSection::Education => s
            .education
            .iter()
            .map(|e| {
                let mut lines = Vec::new();
                if let Some(gpa) = non_empty_opt(e.gpa.as_ref()) {
                    lines.push(format!("GPA: {gpa}"));
                }
                lines.extend(bullet_lines(&e.achievements));
                RenderItem {
                    heading: e.degree.trim().to_string(),
                    subheading: non_empty(&e.institution),
                    meta: non_empty(&e.year),
                    lines,
                }
            })
            .collect(),
        ListSection::Experience => s
            .experience
            .iter()
            .map(|e| {
                let mut lines: Vec<String> = non_empty(&e.description).into_iter().collect();
                lines.extend(bullet_lines(&e.achievements));
                RenderItem {
                    heading: e.title.trim().to_string(),
                    subheading: non_empty(&e.company),
                    meta: non_empty(&e.duration),
                    lines,
                }
            })
            .collect(),
        ListSection::Skills => s
            .skills
            .iter()
            .map(|g| RenderItem {
                heading: g.category.trim().to_string(),
                lines: join_non_empty(
                    &g.items.iter().map(String::as_str).collect::<Vec<_>>(),
                    ", ",
                )
                .into_iter()
                .collect(),
                ..RenderItem::default()
            })
            .collect(),
        ListSection::Projects => s
            .projects
            .iter()
            .map(|p| {
                let mut lines: Vec<String> = non_empty(&p.description).into_iter().collect();
                if let Some(tech) = join_non_empty(
                    &p.technologies.iter().map(String::as_str).collect::<Vec<_>>(),
                    ", ",
                ) {
                    lines.push(format!("Technologies: {tech}"));
                }
                RenderItem {
                    heading: p.name.trim().to_string(),
                    lines,
                    ..RenderItem::default()
                }
            })
            .collect(),
        ListSection::Certifications => s
            .certifications
            .iter()
            .map(|c| RenderItem {
                heading: c.name.trim().to_string(),
                subheading: non_empty_opt(c.issuer.as_ref()),
                meta: non_empty_opt(c.date.as_ref()),
                ..RenderItem::default()
            })
            .collect(),
        ListSection::Achievements => s
            .achievements
            .iter()
            .map(|a| RenderItem {
                heading: a.title.trim().to_string(),
                lines: non_empty_opt(a.description.as_ref()).into_iter().collect(),
                ..RenderItem::default()
            })
            .collect(),
        ListSection::Languages => s
            .languages
            .iter()
            .map(|l| RenderItem {
                heading: l.language.trim().to_string(),
                meta: non_empty_opt(l.proficiency.as_ref()),
                ..RenderItem::default()
            })
            .collect(),
    }
}
