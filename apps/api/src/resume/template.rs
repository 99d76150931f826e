//! Template styling resolver. Maps a template id to its color scheme.
//!
//! The scheme is never stored on the document. Every consumer (editor views,
//! preview, export) calls `resolve` on the current `template_id`, so the two can
//! not drift apart.

use serde::Serialize;

/// Template used for freshly initialized documents.
pub const DEFAULT_TEMPLATE_ID: &str = "template-1";

/// Named colors applied to rendered and exported output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

/// The known visual templates offered by the template selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Template {
    #[default]
    ModernBlue,
    ClassicBlack,
    CreativePurple,
    ProfessionalGreen,
}

impl Template {
    pub const ALL: [Template; 4] = [
        Template::ModernBlue,
        Template::ClassicBlack,
        Template::CreativePurple,
        Template::ProfessionalGreen,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn id(self) -> &'static str {
        match self {
            Template::ModernBlue => "template-1",
            Template::ClassicBlack => "template-2",
            Template::CreativePurple => "template-3",
            Template::ProfessionalGreen => "template-4",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Template::ModernBlue => "Modern",
            Template::ClassicBlack => "Classic",
            Template::CreativePurple => "Creative",
            Template::ProfessionalGreen => "Professional",
        }
    }

    pub fn color_scheme(self) -> ColorScheme {
        match self {
            Template::ModernBlue => ColorScheme {
                primary: "#2563eb",
                secondary: "#1e40af",
                text: "#1f2937",
                background: "#ffffff",
            },
            Template::ClassicBlack => ColorScheme {
                primary: "#000000",
                secondary: "#4b5563",
                text: "#111827",
                background: "#ffffff",
            },
            Template::CreativePurple => ColorScheme {
                primary: "#7c3aed",
                secondary: "#5b21b6",
                text: "#1f2937",
                background: "#ffffff",
            },
            Template::ProfessionalGreen => ColorScheme {
                primary: "#059669",
                secondary: "#047857",
                text: "#1f2937",
                background: "#ffffff",
            },
        }
    }
}

/// Resolves any template id, known or not, to a color scheme.
/// Unrecognized ids fall back to the default template's scheme.
pub fn resolve(template_id: &str) -> ColorScheme {
    Template::from_id(template_id)
        .unwrap_or_default()
        .color_scheme()
}

/// Catalogue entry served to the template selector.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub color_scheme: ColorScheme,
}

pub fn catalogue() -> Vec<TemplateInfo> {
    Template::ALL
        .into_iter()
        .map(|t| TemplateInfo {
            id: t.id(),
            name: t.display_name(),
            color_scheme: t.color_scheme(),
        })
        .collect()
}
