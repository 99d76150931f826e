//! Section editor. The only code path that mutates a `ResumeDocument`.
//!
//! Every operation either applies fully and bumps `updated_at`, or returns an
//! `EditError` and leaves the document exactly as it was.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::resume::document::{ListSection, ResumeDocument, SectionRecord, Styling};

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("index {index} is out of range for {section} (length {len})")]
    IndexOutOfRange {
        section: ListSection,
        index: usize,
        len: usize,
    },

    #[error("malformed patch: {0}")]
    MalformedPatch(String),
}

/// Runs `$body` with `$list` bound to the `Vec` behind `$section`.
macro_rules! with_list {
    ($doc:expr, $section:expr, |$list:ident| $body:expr) => {
        match $section {
            ListSection::Education => {
                let $list = &mut $doc.sections.education;
                $body
            }
            ListSection::Experience => {
                let $list = &mut $doc.sections.experience;
                $body
            }
            ListSection::Skills => {
                let $list = &mut $doc.sections.skills;
                $body
            }
            ListSection::Projects => {
                let $list = &mut $doc.sections.projects;
                $body
            }
            ListSection::Certifications => {
                let $list = &mut $doc.sections.certifications;
                $body
            }
            ListSection::Achievements => {
                let $list = &mut $doc.sections.achievements;
                $body
            }
            ListSection::Languages => {
                let $list = &mut $doc.sections.languages;
                $body
            }
        }
    };
}

/// Update to one of the singleton sections.
#[derive(Debug, Clone)]
pub enum SingletonUpdate {
    /// Shallow-merged into the existing personal info.
    PersonalInfo(Value),
    /// Replaces the summary text.
    Summary(String),
}

pub fn update_singleton(doc: &mut ResumeDocument, update: SingletonUpdate) -> Result<(), EditError> {
    match update {
        SingletonUpdate::PersonalInfo(patch) => {
            let merged = merge_patch(&doc.sections.personal_info, &patch)?;
            doc.sections.personal_info = merged;
        }
        SingletonUpdate::Summary(summary) => doc.sections.summary = summary,
    }
    doc.touch();
    Ok(())
}

/// Appends `record` to the end of its section and returns its index.
pub fn append(doc: &mut ResumeDocument, record: SectionRecord) -> usize {
    let sections = &mut doc.sections;
    let index = match record {
        SectionRecord::Education(r) => push(&mut sections.education, r),
        SectionRecord::Experience(r) => push(&mut sections.experience, r),
        SectionRecord::Skill(r) => push(&mut sections.skills, r),
        SectionRecord::Project(r) => push(&mut sections.projects, r),
        SectionRecord::Certification(r) => push(&mut sections.certifications, r),
        SectionRecord::Achievement(r) => push(&mut sections.achievements, r),
        SectionRecord::Language(r) => push(&mut sections.languages, r),
    };
    doc.touch();
    index
}

/// Shallow-merges `patch` into `section[index]`.
pub fn update_at(
    doc: &mut ResumeDocument,
    section: ListSection,
    index: usize,
    patch: &Value,
) -> Result<(), EditError> {
    with_list!(doc, section, |list| {
        let len = list.len();
        let current = list.get(index).ok_or(EditError::IndexOutOfRange {
            section,
            index,
            len,
        })?;
        let merged = merge_patch(current, patch)?;
        list[index] = merged;
    });
    doc.touch();
    Ok(())
}

/// Removes `section[index]`, shifting later records left by one.
pub fn remove_at(doc: &mut ResumeDocument, section: ListSection, index: usize) -> Result<(), EditError> {
    with_list!(doc, section, |list| {
        let len = list.len();
        if index >= len {
            return Err(EditError::IndexOutOfRange {
                section,
                index,
                len,
            });
        }
        list.remove(index);
    });
    doc.touch();
    Ok(())
}

/// Moves `section[from]` to position `to` (splice semantics).
pub fn move_item(
    doc: &mut ResumeDocument,
    section: ListSection,
    from: usize,
    to: usize,
) -> Result<(), EditError> {
    with_list!(doc, section, |list| {
        move_within(list, from, to).map_err(|index| EditError::IndexOutOfRange {
            section,
            index,
            len: list.len(),
        })?;
    });
    doc.touch();
    Ok(())
}

/// Switches the template. The color scheme follows automatically.
pub fn set_template(doc: &mut ResumeDocument, template_id: &str) {
    doc.template_id = template_id.to_string();
    doc.touch();
}

/// Shallow-merges `fontFamily`, `fontSize` and `layout` into the styling.
pub fn update_styling(doc: &mut ResumeDocument, patch: &Value) -> Result<(), EditError> {
    let merged: Styling = merge_patch(&doc.styling, patch)?;
    merged.validate().map_err(EditError::MalformedPatch)?;
    doc.styling = merged;
    doc.touch();
    Ok(())
}

/// Takes the element at `from` out of `items` and reinserts it at `to`.
///
/// Both indices must lie in `[0, len)`. On failure the offending index is
/// returned and `items` is untouched.
pub fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), usize> {
    let len = items.len();
    if from >= len {
        return Err(from);
    }
    if to >= len {
        return Err(to);
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

fn push<T>(list: &mut Vec<T>, record: T) -> usize {
    list.push(record);
    list.len() - 1
}

/// Overlays the keys of `patch` onto `current` and re-validates the result
/// against `T`. Keys that `T` does not have are rejected.
fn merge_patch<T>(current: &T, patch: &Value) -> Result<T, EditError>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(fields) = patch else {
        return Err(EditError::MalformedPatch(
            "patch must be a JSON object".to_string(),
        ));
    };

    let mut value =
        serde_json::to_value(current).map_err(|e| EditError::MalformedPatch(e.to_string()))?;
    let Value::Object(target) = &mut value else {
        return Err(EditError::MalformedPatch(
            "record is not an object".to_string(),
        ));
    };

    for (key, field) in fields {
        if !target.contains_key(key) {
            return Err(EditError::MalformedPatch(format!("unknown field `{key}`")));
        }
        target.insert(key.clone(), field.clone());
    }

    serde_json::from_value(value).map_err(|e| EditError::MalformedPatch(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Wire-level operations
// ────────────────────────────────────────────────────────────────────────────

/// A single edit as sent by the editor UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EditOp {
    UpdatePersonalInfo { patch: Value },
    UpdateSummary { summary: String },
    Append { section: ListSection, record: Value },
    UpdateAt { section: ListSection, index: usize, patch: Value },
    RemoveAt { section: ListSection, index: usize },
    MoveItem { section: ListSection, from: usize, to: usize },
    SetTemplate { template_id: String },
    UpdateStyling { patch: Value },
}

impl EditOp {
    /// Applies the operation. Returns the new index for `append`.
    pub fn apply(self, doc: &mut ResumeDocument) -> Result<Option<usize>, EditError> {
        match self {
            EditOp::UpdatePersonalInfo { patch } => {
                update_singleton(doc, SingletonUpdate::PersonalInfo(patch))?
            }
            EditOp::UpdateSummary { summary } => {
                update_singleton(doc, SingletonUpdate::Summary(summary))?
            }
            EditOp::Append { section, record } => {
                let record = SectionRecord::from_value(section, record)
                    .map_err(|e| EditError::MalformedPatch(format!("{section} record: {e}")))?;
                return Ok(Some(append(doc, record)));
            }
            EditOp::UpdateAt {
                section,
                index,
                patch,
            } => update_at(doc, section, index, &patch)?,
            EditOp::RemoveAt { section, index } => remove_at(doc, section, index)?,
            EditOp::MoveItem { section, from, to } => move_item(doc, section, from, to)?,
            EditOp::SetTemplate { template_id } => set_template(doc, &template_id),
            EditOp::UpdateStyling { patch } => update_styling(doc, &patch)?,
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::document::{EducationEntry, Layout, SkillGroup};
    use crate::resume::template;
    use proptest::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    fn education(degree: &str) -> SectionRecord {
        SectionRecord::Education(EducationEntry {
            degree: degree.to_string(),
            institution: "X".to_string(),
            year: "2024".to_string(),
            gpa: Some("8.5".to_string()),
            achievements: vec![],
        })
    }

    fn skill(category: &str) -> SectionRecord {
        SectionRecord::Skill(SkillGroup {
            category: category.to_string(),
            items: vec![],
        })
    }

    fn doc_with_skills(n: usize) -> ResumeDocument {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        for i in 0..n {
            append(&mut doc, skill(&format!("group-{i}")));
        }
        doc
    }

    fn skill_categories(doc: &ResumeDocument) -> Vec<String> {
        doc.sections.skills.iter().map(|s| s.category.clone()).collect()
    }

    #[test]
    fn test_append_then_move_reorders_education() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());

        assert_eq!(append(&mut doc, education("B.Tech")), 0);
        assert_eq!(append(&mut doc, education("M.Tech")), 1);

        move_item(&mut doc, ListSection::Education, 1, 0).unwrap();
        assert_eq!(doc.sections.education[0].degree, "M.Tech");
        assert_eq!(doc.sections.education[1].degree, "B.Tech");
    }

    #[test]
    fn test_remove_out_of_range_leaves_document_untouched() {
        let mut doc = doc_with_skills(3);
        let before = doc.clone();

        let err = remove_at(&mut doc, ListSection::Skills, 5).unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                section: ListSection::Skills,
                index: 5,
                len: 3
            }
        );
        assert_eq!(doc, before);
        assert_eq!(doc.updated_at, before.updated_at);
    }

    #[test]
    fn test_out_of_range_indices_are_rejected_everywhere() {
        let mut doc = doc_with_skills(2);
        let before = doc.clone();

        assert!(update_at(&mut doc, ListSection::Skills, 2, &json!({ "category": "x" })).is_err());
        assert!(move_item(&mut doc, ListSection::Skills, 0, 2).is_err());
        assert!(move_item(&mut doc, ListSection::Skills, 2, 0).is_err());
        assert!(remove_at(&mut doc, ListSection::Projects, 0).is_err());
        assert_eq!(doc, before);
    }

    #[test]
    fn test_move_matches_splice_semantics() {
        // Replays the same operations on a plain Vec and compares.
        let mut doc = doc_with_skills(5);
        let mut reference: Vec<String> = skill_categories(&doc);

        let moves = [(0, 4), (4, 0), (1, 3), (3, 1), (2, 2), (4, 1)];
        for (from, to) in moves {
            move_item(&mut doc, ListSection::Skills, from, to).unwrap();
            let item = reference.remove(from);
            reference.insert(to, item);
            assert_eq!(skill_categories(&doc), reference);
        }

        remove_at(&mut doc, ListSection::Skills, 2).unwrap();
        reference.remove(2);
        append(&mut doc, skill("late"));
        reference.push("late".to_string());
        assert_eq!(skill_categories(&doc), reference);
    }

    #[test]
    fn test_move_within_keeps_every_element_once() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        move_within(&mut items, 0, 3).unwrap();
        assert_eq!(items, vec!['b', 'c', 'd', 'a']);

        move_within(&mut items, 3, 1).unwrap();
        assert_eq!(items, vec!['b', 'a', 'c', 'd']);

        assert_eq!(move_within(&mut items, 4, 0), Err(4));
        assert_eq!(move_within(&mut Vec::<char>::new(), 0, 0), Err(0));
        assert_eq!(items, vec!['b', 'a', 'c', 'd']);
    }

    #[test]
    fn test_update_at_merges_patch_fields() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        append(&mut doc, education("B.Tech"));

        update_at(&mut doc, ListSection::Education, 0, &json!({ "gpa": "9.1" })).unwrap();

        let entry = &doc.sections.education[0];
        assert_eq!(entry.gpa.as_deref(), Some("9.1"));
        assert_eq!(entry.degree, "B.Tech");
        assert_eq!(entry.institution, "X");
    }

    #[test]
    fn test_malformed_patches_are_rejected() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        append(&mut doc, education("B.Tech"));
        let before = doc.clone();

        let not_object = update_at(&mut doc, ListSection::Education, 0, &json!("gpa"));
        assert!(matches!(not_object, Err(EditError::MalformedPatch(_))));

        let unknown = update_at(&mut doc, ListSection::Education, 0, &json!({ "grade": "A" }));
        assert!(matches!(unknown, Err(EditError::MalformedPatch(_))));

        let wrong_type = update_at(&mut doc, ListSection::Education, 0, &json!({ "achievements": 3 }));
        assert!(matches!(wrong_type, Err(EditError::MalformedPatch(_))));

        assert_eq!(doc, before);
    }

    #[test]
    fn test_personal_info_is_shallow_merged_and_summary_replaced() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        update_singleton(
            &mut doc,
            SingletonUpdate::PersonalInfo(json!({ "fullName": "Asha Rao", "email": "asha@example.com" })),
        )
        .unwrap();
        update_singleton(
            &mut doc,
            SingletonUpdate::PersonalInfo(json!({ "github": "asharao" })),
        )
        .unwrap();
        update_singleton(&mut doc, SingletonUpdate::Summary("First".to_string())).unwrap();
        update_singleton(&mut doc, SingletonUpdate::Summary("Second".to_string())).unwrap();

        let info = &doc.sections.personal_info;
        assert_eq!(info.full_name, "Asha Rao");
        assert_eq!(info.email, "asha@example.com");
        assert_eq!(info.github.as_deref(), Some("asharao"));
        assert_eq!(doc.sections.summary, "Second");
    }

    #[test]
    fn test_mutations_bump_updated_at() {
        type Mutation = fn(&mut ResumeDocument) -> Result<(), EditError>;
        let mutations: [(&str, Mutation); 8] = [
            ("append", |d| {
                append(d, skill("Languages"));
                Ok(())
            }),
            ("update_singleton personal info", |d| {
                update_singleton(d, SingletonUpdate::PersonalInfo(json!({ "fullName": "Asha" })))
            }),
            ("update_singleton summary", |d| {
                update_singleton(d, SingletonUpdate::Summary("Engineer".to_string()))
            }),
            ("update_at", |d| {
                update_at(d, ListSection::Skills, 0, &json!({ "category": "Tools" }))
            }),
            ("remove_at", |d| remove_at(d, ListSection::Skills, 1)),
            ("move_item", |d| move_item(d, ListSection::Skills, 0, 1)),
            ("set_template", |d| {
                set_template(d, "template-4");
                Ok(())
            }),
            ("update_styling", |d| {
                update_styling(d, &json!({ "fontSize": "12pt" }))
            }),
        ];

        for (name, mutate) in mutations {
            let mut doc = doc_with_skills(3);
            let stale = doc.updated_at - chrono::Duration::minutes(5);
            doc.updated_at = stale;

            mutate(&mut doc).unwrap();
            assert!(doc.updated_at > stale, "{name} did not bump updated_at");
        }
    }

    #[test]
    fn test_styling_rejects_values_that_escape_css() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        let before = doc.clone();

        for patch in [
            json!({ "fontFamily": "x; } body { display:none" }),
            json!({ "fontFamily": "Inter</style>" }),
            json!({ "fontSize": "11pt; color: red" }),
            json!({ "fontSize": "huge" }),
        ] {
            let err = update_styling(&mut doc, &patch);
            assert!(matches!(err, Err(EditError::MalformedPatch(_))), "{patch} was accepted");
        }
        assert_eq!(doc, before);

        update_styling(&mut doc, &json!({ "fontFamily": "Open Sans, Arial", "fontSize": "10.5pt" }))
            .unwrap();
        assert_eq!(doc.styling.font_family, "Open Sans, Arial");
    }

    /// One list edit, as generated for the order-preservation property.
    #[derive(Debug, Clone)]
    enum ListEdit {
        Append,
        Remove(usize),
        Move(usize, usize),
    }

    fn list_edit() -> impl Strategy<Value = ListEdit> {
        // Indices reach past the list so out-of-range edits are exercised too.
        prop_oneof![
            Just(ListEdit::Append),
            (0usize..12).prop_map(ListEdit::Remove),
            (0usize..12, 0usize..12).prop_map(|(from, to)| ListEdit::Move(from, to)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]
        #[test]
        fn prop_list_edits_match_vec_splice(
            initial in 0usize..6,
            edits in proptest::collection::vec(list_edit(), 0..40),
        ) {
            let mut doc = doc_with_skills(initial);
            let mut model = skill_categories(&doc);
            let mut next = initial;

            for edit in edits {
                let before = doc.clone();
                let len = model.len();
                let result = match edit {
                    ListEdit::Append => {
                        let name = format!("group-{next}");
                        next += 1;
                        let index = append(&mut doc, skill(&name));
                        prop_assert_eq!(index, len);
                        model.push(name);
                        Ok(())
                    }
                    ListEdit::Remove(index) => {
                        let result = remove_at(&mut doc, ListSection::Skills, index);
                        if index < len {
                            model.remove(index);
                        }
                        result
                    }
                    ListEdit::Move(from, to) => {
                        let result = move_item(&mut doc, ListSection::Skills, from, to);
                        if from < len && to < len {
                            let item = model.remove(from);
                            model.insert(to, item);
                        }
                        result
                    }
                };

                match result {
                    Ok(_) => {}
                    Err(EditError::IndexOutOfRange { section, len: reported, .. }) => {
                        prop_assert_eq!(section, ListSection::Skills);
                        prop_assert_eq!(reported, len);
                        prop_assert_eq!(&doc, &before);
                        prop_assert_eq!(doc.updated_at, before.updated_at);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
                prop_assert_eq!(skill_categories(&doc), model.clone());
            }
        }
    }

    #[test]
    fn test_template_change_updates_color_scheme() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());

        set_template(&mut doc, "template-2");
        assert_eq!(doc.color_scheme(), template::resolve("template-2"));
        assert_eq!(doc.color_scheme().primary, "#000000");

        set_template(&mut doc, "template-3");
        assert_eq!(doc.color_scheme().primary, "#7c3aed");
    }

    #[test]
    fn test_styling_patch_cannot_set_color_scheme() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());

        update_styling(&mut doc, &json!({ "layout": "two-column" })).unwrap();
        assert_eq!(doc.styling.layout, Layout::TwoColumn);

        let err = update_styling(&mut doc, &json!({ "colorScheme": { "primary": "#fff" } }));
        assert!(matches!(err, Err(EditError::MalformedPatch(_))));
    }

    #[test]
    fn test_edit_ops_decode_from_wire_format() {
        let ops: Vec<EditOp> = serde_json::from_value(json!([
            { "op": "append", "section": "education", "record": { "degree": "B.Tech", "institution": "X", "year": "2024" } },
            { "op": "append", "section": "education", "record": { "degree": "M.Tech" } },
            { "op": "move_item", "section": "education", "from": 1, "to": 0 },
            { "op": "set_template", "templateId": "template-3" },
            { "op": "update_summary", "summary": "Systems engineer" }
        ]))
        .unwrap();

        let mut doc = ResumeDocument::new(Uuid::new_v4());
        let results: Vec<_> = ops
            .into_iter()
            .map(|op| op.apply(&mut doc).unwrap())
            .collect();

        assert_eq!(results, vec![Some(0), Some(1), None, None, None]);
        assert_eq!(doc.sections.education[0].degree, "M.Tech");
        assert_eq!(doc.template_id, "template-3");
        assert_eq!(doc.sections.summary, "Systems engineer");
    }

    #[test]
    fn test_append_op_rejects_record_of_wrong_shape() {
        let mut doc = ResumeDocument::new(Uuid::new_v4());
        let op = EditOp::Append {
            section: ListSection::Skills,
            record: json!({ "category": "Tools", "items": "git" }),
        };

        assert!(matches!(op.apply(&mut doc), Err(EditError::MalformedPatch(_))));
        assert!(doc.sections.skills.is_empty());
    }
}
