use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resume::template::{self, ColorScheme, DEFAULT_TEMPLATE_ID};

/// One resume per owner. Mutated only through `resume::editor`.
///
/// There is no stored color scheme: it is a function of `template_id` and is
/// attached to outbound views by `ResumeView`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub owner: Uuid,
    pub template_id: String,
    #[serde(default)]
    pub styling: Styling,
    #[serde(default)]
    pub sections: Sections,
    pub updated_at: DateTime<Utc>,
}

impl ResumeDocument {
    /// A fresh document: empty sections, default template and styling.
    pub fn new(owner: Uuid) -> Self {
        Self {
            owner,
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            styling: Styling::default(),
            sections: Sections::default(),
            updated_at: Utc::now(),
        }
    }

    pub fn color_scheme(&self) -> ColorScheme {
        template::resolve(&self.template_id)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// True when both documents hold the same content, ignoring `updated_at`.
    pub fn same_content(&self, other: &ResumeDocument) -> bool {
        self.owner == other.owner
            && self.template_id == other.template_id
            && self.styling == other.styling
            && self.sections == other.sections
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    SingleColumn,
    TwoColumn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Styling {
    pub font_family: String,
    pub font_size: String,
    pub layout: Layout,
}

const FONT_SIZE_UNITS: &[&str] = &["pt", "px", "em", "rem", "%"];

impl Styling {
    /// Font values are written into CSS, so only plain font names and
    /// `<number><unit>` sizes are accepted.
    pub fn validate(&self) -> Result<(), String> {
        let family = self.font_family.trim();
        let family_ok = !family.is_empty()
            && family
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | ','));
        if !family_ok {
            return Err(format!("fontFamily `{}` is not a plain font name", self.font_family));
        }

        let size = self.font_size.trim();
        let number_len = size
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(size.len());
        let (number, unit) = size.split_at(number_len);
        if number.parse::<f32>().is_err() || !FONT_SIZE_UNITS.contains(&unit) {
            return Err(format!("fontSize `{}` must look like `11pt`", self.font_size));
        }
        Ok(())
    }
}

impl Default for Styling {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: "11pt".to_string(),
            layout: Layout::SingleColumn,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub gpa: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementEntry {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageEntry {
    pub language: String,
    pub proficiency: Option<String>,
}

/// The fixed set of section slots. Every list defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sections {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub achievements: Vec<AchievementEntry>,
    pub languages: Vec<LanguageEntry>,
}

impl Sections {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len_of(&self, section: ListSection) -> usize {
        match section {
            ListSection::Education => self.education.len(),
            ListSection::Experience => self.experience.len(),
            ListSection::Skills => self.skills.len(),
            ListSection::Projects => self.projects.len(),
            ListSection::Certifications => self.certifications.len(),
            ListSection::Achievements => self.achievements.len(),
            ListSection::Languages => self.languages.len(),
        }
    }
}

/// Names of the ordered-sequence sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListSection {
    Education,
    Experience,
    Skills,
    Projects,
    Certifications,
    Achievements,
    Languages,
}

impl ListSection {
    /// Default display order of the list sections.
    pub const ALL: [ListSection; 7] = [
        ListSection::Education,
        ListSection::Experience,
        ListSection::Skills,
        ListSection::Projects,
        ListSection::Certifications,
        ListSection::Achievements,
        ListSection::Languages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListSection::Education => "education",
            ListSection::Experience => "experience",
            ListSection::Skills => "skills",
            ListSection::Projects => "projects",
            ListSection::Certifications => "certifications",
            ListSection::Achievements => "achievements",
            ListSection::Languages => "languages",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ListSection::Education => "Education",
            ListSection::Experience => "Experience",
            ListSection::Skills => "Skills",
            ListSection::Projects => "Projects",
            ListSection::Certifications => "Certifications",
            ListSection::Achievements => "Achievements",
            ListSection::Languages => "Languages",
        }
    }
}

impl fmt::Display for ListSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed record for one of the list sections. The variant decides which
/// list the record lands in, so a record can never reach the wrong section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionRecord {
    Education(EducationEntry),
    Experience(ExperienceEntry),
    Skill(SkillGroup),
    Project(ProjectEntry),
    Certification(CertificationEntry),
    Achievement(AchievementEntry),
    Language(LanguageEntry),
}

impl SectionRecord {
    pub fn section(&self) -> ListSection {
        match self {
            SectionRecord::Education(_) => ListSection::Education,
            SectionRecord::Experience(_) => ListSection::Experience,
            SectionRecord::Skill(_) => ListSection::Skills,
            SectionRecord::Project(_) => ListSection::Projects,
            SectionRecord::Certification(_) => ListSection::Certifications,
            SectionRecord::Achievement(_) => ListSection::Achievements,
            SectionRecord::Language(_) => ListSection::Languages,
        }
    }

    /// Decodes an untyped JSON record into the shape `section` expects.
    pub fn from_value(
        section: ListSection,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match section {
            ListSection::Education => SectionRecord::Education(serde_json::from_value(value)?),
            ListSection::Experience => SectionRecord::Experience(serde_json::from_value(value)?),
            ListSection::Skills => SectionRecord::Skill(serde_json::from_value(value)?),
            ListSection::Projects => SectionRecord::Project(serde_json::from_value(value)?),
            ListSection::Certifications => {
                SectionRecord::Certification(serde_json::from_value(value)?)
            }
            ListSection::Achievements => {
                SectionRecord::Achievement(serde_json::from_value(value)?)
            }
            ListSection::Languages => SectionRecord::Language(serde_json::from_value(value)?),
        })
    }
}

/// Outbound representation of a document with its resolved color scheme.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeView {
    pub owner: Uuid,
    pub template_id: String,
    pub styling: StylingView,
    pub sections: Sections,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StylingView {
    #[serde(flatten)]
    pub styling: Styling,
    pub color_scheme: ColorScheme,
}

impl From<ResumeDocument> for ResumeView {
    fn from(doc: ResumeDocument) -> Self {
        let color_scheme = doc.color_scheme();
        Self {
            owner: doc.owner,
            template_id: doc.template_id,
            styling: StylingView {
                styling: doc.styling,
                color_scheme,
            },
            sections: doc.sections,
            updated_at: doc.updated_at,
        }
    }
}
