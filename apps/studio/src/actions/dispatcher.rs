//! Applies one assistant turn's action sequence to the aggregate.
//!
//! Actions apply in order and each one is independent: a malformed, unknown,
//! duplicate or dangling action is recorded in the [`DispatchReport`] and the rest
//! of the sequence still runs. Nothing here returns an error to the caller.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::actions::models::{ActionError, ResumeAction};
use crate::highlight::{HighlightTarget, Highlights};
use crate::store::{Mutation, Resume};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ActionStatus {
    Applied,
    /// Same fact already present.
    Duplicate,
    /// Referenced entry or section does not exist.
    DanglingReference,
    Malformed(String),
    Unknown(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub index: usize,
    pub kind: Option<String>,
    pub status: ActionStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub applied: usize,
    pub skipped: usize,
    pub outcomes: Vec<ActionOutcome>,
}

impl DispatchReport {
    fn record(&mut self, index: usize, kind: Option<String>, status: ActionStatus) {
        if status == ActionStatus::Applied {
            self.applied += 1;
        } else {
            self.skipped += 1;
        }
        self.outcomes.push(ActionOutcome {
            index,
            kind,
            status,
        });
    }
}

/// Parses and applies every record in `actions`, in order.
pub fn apply_actions(
    resume: &mut Resume,
    highlights: &mut Highlights,
    actions: &[Value],
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for (index, value) in actions.iter().enumerate() {
        let declared = value.get("type").and_then(Value::as_str).map(String::from);
        let status = match ResumeAction::from_value(value) {
            Ok(action) => apply_action(resume, highlights, action),
            Err(ActionError::UnknownKind(kind)) => {
                warn!("Ignoring action {index}: unknown type '{kind}'");
                ActionStatus::Unknown(kind)
            }
            Err(e) => {
                warn!("Skipping action {index}: {e}");
                ActionStatus::Malformed(e.to_string())
            }
        };
        report.record(index, declared, status);
    }

    debug!(
        "Dispatched {} actions: {} applied, {} skipped",
        actions.len(),
        report.applied,
        report.skipped
    );
    report
}

/// Applies a single typed action and emits its highlight.
pub fn apply_action(
    resume: &mut Resume,
    highlights: &mut Highlights,
    action: ResumeAction,
) -> ActionStatus {
    let kind = action.kind();
    let stale = stale_highlights(resume, &action);
    let (mutation, target) = match action {
        ResumeAction::UpdatePersonalInfo(patch) => {
            resume.update_personal_info(patch);
            (Mutation::Applied, Some(HighlightTarget::Header))
        }
        ResumeAction::AddExperience(new) => {
            let mutation = resume.add_experience(new.into_experience());
            let target = resume.experience.last().map(|exp| HighlightTarget::Experience {
                id: Some(exp.id.clone()),
            });
            (mutation, target)
        }
        ResumeAction::UpdateExperience(update) => {
            let target = HighlightTarget::Experience {
                id: Some(update.id.clone()),
            };
            (resume.update_experience(&update.id, update.changes), Some(target))
        }
        ResumeAction::RemoveExperience(entry) => (resume.remove_experience(&entry.id), None),
        ResumeAction::AddEducation(new) => {
            let mutation = resume.add_education(new.into_education());
            let target = resume.education.last().map(|edu| HighlightTarget::Education {
                id: Some(edu.id.clone()),
            });
            (mutation, target)
        }
        ResumeAction::UpdateEducation(update) => {
            let target = HighlightTarget::Education {
                id: Some(update.id.clone()),
            };
            (resume.update_education(&update.id, update.changes), Some(target))
        }
        ResumeAction::RemoveEducation(entry) => (resume.remove_education(&entry.id), None),
        ResumeAction::UpdateSkills(skills) => {
            resume.update_skills(skills);
            (Mutation::Applied, Some(HighlightTarget::Skills))
        }
        ResumeAction::AddSkill(skill) => {
            resume.add_skill(skill);
            (Mutation::Applied, Some(HighlightTarget::Skills))
        }
        ResumeAction::RemoveSkill(skill) => (resume.remove_skill(&skill), None),
        ResumeAction::UpdateStyle(patch) => {
            resume.update_styling(patch);
            (Mutation::Applied, Some(HighlightTarget::Styling))
        }
        ResumeAction::SetProfileImage(image) => {
            resume.set_profile_image(image);
            (Mutation::Applied, Some(HighlightTarget::ProfileImage))
        }
        ResumeAction::AddCustomSection(new) => {
            let section = new.into_section();
            let target = HighlightTarget::Custom {
                section_id: section.id.clone(),
                item_id: None,
            };
            (resume.add_custom_section(section), Some(target))
        }
        ResumeAction::UpdateCustomSection(rename) => {
            let target = HighlightTarget::Custom {
                section_id: rename.id.clone(),
                item_id: None,
            };
            (resume.rename_custom_section(&rename.id, rename.title), Some(target))
        }
        ResumeAction::RemoveCustomSection(entry) => (resume.remove_custom_section(&entry.id), None),
        ResumeAction::AddCustomSectionItem(new) => {
            let mutation = resume.add_custom_section_item(&new.section_id, new.item.into_item());
            let target = resume
                .custom_sections
                .iter()
                .find(|s| s.id == new.section_id)
                .and_then(|s| s.items.last())
                .map(|item| HighlightTarget::Custom {
                    section_id: new.section_id.clone(),
                    item_id: Some(item.id.clone()),
                });
            (mutation, target)
        }
        // Structural changes are animated by the renderer, not highlighted.
        ResumeAction::UpdateSectionConfig(update) => {
            (resume.update_section_config(&update.id, update.config), None)
        }
        ResumeAction::UpdateLayoutConfig(patch) => {
            resume.update_layout_config(patch);
            (Mutation::Applied, None)
        }
        ResumeAction::ReorderSections(ids) => {
            resume.reorder_sections(&ids);
            (Mutation::Applied, None)
        }
        ResumeAction::SetCustomHtml(markup) => {
            resume.set_custom_html(markup);
            (Mutation::Applied, None)
        }
    };

    match mutation {
        Mutation::Applied => {
            for key in &stale {
                highlights.remove(key);
            }
            if let Some(target) = target {
                highlights.add(&target);
            }
            debug!("Applied {kind}");
            ActionStatus::Applied
        }
        Mutation::Duplicate => {
            debug!("Skipped {kind}: duplicate entry");
            ActionStatus::Duplicate
        }
        Mutation::Missing => {
            debug!("Skipped {kind}: target does not exist");
            ActionStatus::DanglingReference
        }
    }
}

/// Keys that would outlive their entry if a removal succeeds.
fn stale_highlights(resume: &Resume, action: &ResumeAction) -> Vec<String> {
    match action {
        ResumeAction::RemoveExperience(entry) => vec![HighlightTarget::Experience {
            id: Some(entry.id.clone()),
        }
        .key()],
        ResumeAction::RemoveEducation(entry) => vec![HighlightTarget::Education {
            id: Some(entry.id.clone()),
        }
        .key()],
        ResumeAction::RemoveCustomSection(entry) => {
            let items = resume
                .custom_sections
                .iter()
                .filter(|s| s.id == entry.id)
                .flat_map(|s| s.items.iter().map(|item| Some(item.id.clone())));
            std::iter::once(None)
                .chain(items)
                .map(|item_id| {
                    HighlightTarget::Custom {
                        section_id: entry.id.clone(),
                        item_id,
                    }
                    .key()
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::style::Spacing;
    use crate::store::RenderMode;

    fn dispatch(resume: &mut Resume, actions: Value) -> DispatchReport {
        let mut highlights = Highlights::default();
        let list = actions.as_array().cloned().unwrap_or_default();
        apply_actions(resume, &mut highlights, &list)
    }

    fn google() -> Value {
        json!({
            "type": "add_experience",
            "payload": {"company": "Google", "role": "Engineer", "startDate": "2020", "endDate": "2023", "current": false}
        })
    }

    #[test]
    fn test_identical_experience_twice_yields_one_entry() {
        let mut resume = Resume::default();
        dispatch(&mut resume, json!([google()]));
        assert_eq!(resume.experience.len(), 1);
        let report = dispatch(&mut resume, json!([google()]));
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(report.outcomes[0].status, ActionStatus::Duplicate);
    }

    #[test]
    fn test_personal_info_updates_merge() {
        let mut resume = Resume::default();
        dispatch(
            &mut resume,
            json!([
                {"type": "update_personal_info", "payload": {"name": "A"}},
                {"type": "update_personal_info", "payload": {"email": "b@x.com"}}
            ]),
        );
        assert_eq!(resume.personal_info.name, "A");
        assert_eq!(resume.personal_info.email, "b@x.com");
        assert_eq!(resume.personal_info.phone, "");
    }

    #[test]
    fn test_bad_action_does_not_abort_sequence() {
        let mut resume = Resume::default();
        let report = dispatch(
            &mut resume,
            json!([
                {"type": "update_skills", "payload": "not a list"},
                {"type": "launch_rocket", "payload": {}},
                42,
                {"type": "update_skills", "payload": ["Rust", "SQL"]}
            ]),
        );
        assert_eq!(resume.skills, vec!["Rust", "SQL"]);
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped, 3);
        assert!(matches!(report.outcomes[0].status, ActionStatus::Malformed(_)));
        assert_eq!(
            report.outcomes[1].status,
            ActionStatus::Unknown("launch_rocket".to_string())
        );
        assert_eq!(report.outcomes[2].kind, None);
    }

    #[test]
    fn test_empty_sequence_changes_nothing() {
        let mut resume = Resume::default();
        let report = dispatch(&mut resume, json!([]));
        assert_eq!(resume, Resume::default());
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_highlights_follow_table() {
        let mut resume = Resume::default();
        let mut highlights = Highlights::default();
        let actions = vec![
            json!({"type": "update_personal_info", "payload": {"name": "A"}}),
            json!({"type": "add_experience", "payload": {"id": "e1", "company": "X", "role": "Y", "startDate": "", "endDate": ""}}),
            json!({"type": "add_custom_section", "payload": {"id": "projects", "title": "Projects"}}),
            json!({"type": "add_custom_section_item", "payload": {"sectionId": "projects", "item": {"id": "i1", "title": "Site"}}}),
            json!({"type": "update_style", "payload": {"spacing": "compact"}}),
            json!({"type": "reorder_sections", "payload": ["header", "experience", "projects"]}),
            json!({"type": "update_layout_config", "payload": {"columns": 2}}),
        ];
        apply_actions(&mut resume, &mut highlights, &actions);

        let keys: Vec<_> = highlights.active().into_iter().map(|h| h.key).collect();
        assert_eq!(
            keys,
            vec![
                "custom-projects",
                "custom-projects-i1",
                "experience-e1",
                "header",
                "styling"
            ]
        );
        assert_eq!(resume.styling.spacing, Spacing::Compact);
    }

    #[test]
    fn test_duplicate_does_not_highlight() {
        let mut resume = Resume::default();
        let mut highlights = Highlights::default();
        let first = json!({"type": "add_experience", "payload": {"id": "e1", "company": "X", "role": "Y", "startDate": "1", "endDate": "2"}});
        let second = json!({"type": "add_experience", "payload": {"id": "e2", "company": "X", "role": "Y", "startDate": "1", "endDate": "2"}});
        apply_actions(&mut resume, &mut highlights, &[first, second]);
        assert!(highlights.is_highlighted("experience-e1"));
        assert!(!highlights.is_highlighted("experience-e2"));
    }

    #[test]
    fn test_item_for_unknown_section_is_dangling() {
        let mut resume = Resume::default();
        let report = dispatch(
            &mut resume,
            json!([{"type": "add_custom_section_item", "payload": {"sectionId": "ghost", "item": {"title": "x"}}}]),
        );
        assert_eq!(report.outcomes[0].status, ActionStatus::DanglingReference);
    }

    #[test]
    fn test_structured_actions_still_apply_in_freeform_mode() {
        let mut resume = Resume::default();
        dispatch(
            &mut resume,
            json!([
                {"type": "set_custom_html", "payload": "<main>custom</main>"},
                {"type": "update_skills", "payload": ["Go"]}
            ]),
        );
        assert_eq!(resume.render_mode(), RenderMode::Freeform("<main>custom</main>"));
        assert_eq!(resume.skills, vec!["Go"]);
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        let actions = json!([
            {"type": "update_personal_info", "payload": {"name": "Ada"}},
            {"type": "add_education", "payload": {"id": "ed1", "school": "MIT", "degree": "BSc", "field": "CS", "startDate": "2010", "endDate": "2014"}},
            {"type": "update_section_config", "payload": {"id": "education", "config": {"visible": false}}},
            {"type": "reorder_sections", "payload": ["education", "header"]}
        ]);
        let mut a = Resume::default();
        let mut b = Resume::default();
        dispatch(&mut a, actions.clone());
        dispatch(&mut b, actions);
        assert_eq!(a, b);
    }

    #[test]
    fn test_add_and_remove_single_skill() {
        let mut resume = Resume::default();
        let mut highlights = Highlights::default();
        apply_actions(
            &mut resume,
            &mut highlights,
            &[
                json!({"type": "add_skill", "payload": "Rust"}),
                json!({"type": "add_skill", "payload": "Go"}),
                json!({"type": "remove_skill", "payload": "Rust"}),
            ],
        );
        assert_eq!(resume.skills, vec!["Go"]);
        assert!(highlights.is_highlighted("skills"));
    }

    #[test]
    fn test_same_supplied_id_for_different_jobs_stays_unique() {
        let mut resume = Resume::default();
        let mut highlights = Highlights::default();
        apply_actions(
            &mut resume,
            &mut highlights,
            &[
                json!({"type": "add_experience", "payload": {"id": "exp-1", "company": "Google", "role": "Engineer", "startDate": "2020", "endDate": "2022"}}),
                json!({"type": "add_experience", "payload": {"id": "exp-1", "company": "Meta", "role": "Engineer", "startDate": "2022", "endDate": "2024"}}),
            ],
        );
        let ids: Vec<_> = resume.experience.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(highlights.is_highlighted(&format!("experience-{}", ids[1])));

        let report = dispatch(
            &mut resume,
            json!([{"type": "remove_experience", "payload": {"id": "exp-1"}}]),
        );
        assert_eq!(report.applied, 1);
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].company, "Meta");
    }

    #[test]
    fn test_removal_clears_pending_highlights() {
        let mut resume = Resume::default();
        let mut highlights = Highlights::default();
        apply_actions(
            &mut resume,
            &mut highlights,
            &[
                json!({"type": "add_experience", "payload": {"id": "e1", "company": "X", "role": "Y", "startDate": "1", "endDate": "2"}}),
                json!({"type": "add_custom_section", "payload": {"id": "projects", "title": "Projects"}}),
                json!({"type": "add_custom_section_item", "payload": {"sectionId": "projects", "item": {"id": "i1", "title": "Site"}}}),
                json!({"type": "update_skills", "payload": ["Rust"]}),
                json!({"type": "remove_experience", "payload": {"id": "e1"}}),
                json!({"type": "remove_custom_section", "payload": {"id": "projects"}}),
            ],
        );
        let keys: Vec<_> = highlights.active().into_iter().map(|h| h.key).collect();
        assert_eq!(keys, vec!["skills"]);
    }

    #[test]
    fn test_failed_removal_keeps_highlights() {
        let mut resume = Resume::default();
        let mut highlights = Highlights::default();
        apply_actions(
            &mut resume,
            &mut highlights,
            &[
                json!({"type": "add_education", "payload": {"id": "ed1", "school": "MIT", "degree": "BSc", "field": "CS", "startDate": "2010", "endDate": "2014"}}),
                json!({"type": "remove_education", "payload": {"id": "other"}}),
            ],
        );
        assert!(highlights.is_highlighted("education-ed1"));
    }
}
