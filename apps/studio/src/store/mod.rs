//! The Resume aggregate: the single owned, mutable document state of a session.
//!
//! Every mutation is synchronous and total. Operations that target something which
//! does not exist, or that would duplicate an existing fact, report it through
//! [`Mutation`] instead of failing, so callers can log and carry on.

pub mod dedup;
pub mod templates;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::resume::{
    CustomSection, CustomSectionItem, Education, EducationPatch, Experience, ExperiencePatch,
    LayoutConfig, LayoutConfigPatch, PersonalInfo, PersonalInfoPatch, SectionConfig,
    SectionConfigPatch, SectionKind,
};
use crate::models::style::{StylingConfig, StylingPatch};
use crate::models::template::ResumeTemplate;

use self::dedup::{is_duplicate_education, is_duplicate_experience};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// Same fact already present; nothing changed.
    Duplicate,
    /// The referenced entry or section does not exist; nothing changed.
    Missing,
}

/// Which of the two rendering strategies is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode<'a> {
    Structured,
    Freeform(&'a str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub profile_image: Option<String>,
    pub styling: StylingConfig,
    pub custom_sections: Vec<CustomSection>,
    pub section_configs: Vec<SectionConfig>,
    pub layout_config: LayoutConfig,
    pub custom_html_mode: bool,
    pub custom_html: Option<String>,
}

impl Default for Resume {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo {
                summary: Some(String::new()),
                ..PersonalInfo::default()
            },
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            profile_image: None,
            styling: StylingConfig::default(),
            custom_sections: Vec::new(),
            section_configs: SectionKind::BUILT_IN
                .iter()
                .zip(0u32..)
                .map(|(kind, order)| SectionConfig::built_in(*kind, order))
                .collect(),
            layout_config: LayoutConfig::default(),
            custom_html_mode: false,
            custom_html: None,
        }
    }
}

impl Resume {
    pub fn render_mode(&self) -> RenderMode<'_> {
        match (&self.custom_html, self.custom_html_mode) {
            (Some(markup), true) => RenderMode::Freeform(markup),
            _ => RenderMode::Structured,
        }
    }

    /// Whether the preview has anything worth showing yet.
    pub fn has_content(&self) -> bool {
        !self.personal_info.name.is_empty()
            || !self.experience.is_empty()
            || !self.education.is_empty()
            || !self.skills.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Resume::default();
    }

    pub fn update_personal_info(&mut self, patch: PersonalInfoPatch) {
        patch.apply_to(&mut self.personal_info);
    }

    // ── experience ─────────────────────────────────────────────────────────

    /// Appends a new fact. A supplied id already owned by a different entry is
    /// replaced so ids stay unique.
    pub fn add_experience(&mut self, mut exp: Experience) -> Mutation {
        if is_duplicate_experience(&self.experience, &exp) {
            return Mutation::Duplicate;
        }
        if self.experience.iter().any(|e| e.id == exp.id) {
            exp.id = generate_id();
        }
        self.experience.push(exp);
        Mutation::Applied
    }

    pub fn update_experience(&mut self, id: &str, patch: ExperiencePatch) -> Mutation {
        match self.experience.iter_mut().find(|e| e.id == id) {
            Some(exp) => {
                patch.apply_to(exp);
                Mutation::Applied
            }
            None => Mutation::Missing,
        }
    }

    pub fn remove_experience(&mut self, id: &str) -> Mutation {
        retain_reporting(&mut self.experience, |e| e.id != id)
    }

    // ── education ──────────────────────────────────────────────────────────

    pub fn add_education(&mut self, mut edu: Education) -> Mutation {
        if is_duplicate_education(&self.education, &edu) {
            return Mutation::Duplicate;
        }
        if self.education.iter().any(|e| e.id == edu.id) {
            edu.id = generate_id();
        }
        self.education.push(edu);
        Mutation::Applied
    }

    pub fn update_education(&mut self, id: &str, patch: EducationPatch) -> Mutation {
        match self.education.iter_mut().find(|e| e.id == id) {
            Some(edu) => {
                patch.apply_to(edu);
                Mutation::Applied
            }
            None => Mutation::Missing,
        }
    }

    pub fn remove_education(&mut self, id: &str) -> Mutation {
        retain_reporting(&mut self.education, |e| e.id != id)
    }

    // ── skills ─────────────────────────────────────────────────────────────

    pub fn update_skills(&mut self, skills: Vec<String>) {
        self.skills = skills;
    }

    pub fn add_skill(&mut self, skill: String) {
        self.skills.push(skill);
    }

    pub fn remove_skill(&mut self, skill: &str) -> Mutation {
        retain_reporting(&mut self.skills, |s| s != skill)
    }

    pub fn set_profile_image(&mut self, image: Option<String>) {
        self.profile_image = image;
    }

    pub fn update_styling(&mut self, patch: StylingPatch) {
        patch.apply_to(&mut self.styling);
    }

    // ── custom sections ────────────────────────────────────────────────────

    /// Appends the section together with its config, placed after every existing one.
    pub fn add_custom_section(&mut self, section: CustomSection) -> Mutation {
        let taken = SectionKind::is_built_in_id(&section.id)
            || self.custom_sections.iter().any(|s| s.id == section.id)
            || self.section_configs.iter().any(|c| c.id == section.id);
        if taken {
            return Mutation::Duplicate;
        }
        let order = self.section_configs.len() as u32;
        self.section_configs
            .push(SectionConfig::custom(&section.id, order));
        self.custom_sections.push(section);
        Mutation::Applied
    }

    pub fn rename_custom_section(&mut self, id: &str, title: String) -> Mutation {
        match self.custom_sections.iter_mut().find(|s| s.id == id) {
            Some(section) => {
                section.title = title;
                Mutation::Applied
            }
            None => Mutation::Missing,
        }
    }

    pub fn remove_custom_section(&mut self, id: &str) -> Mutation {
        let removed = retain_reporting(&mut self.custom_sections, |s| s.id != id);
        if removed == Mutation::Applied {
            self.section_configs
                .retain(|c| c.custom_section_id.as_deref() != Some(id));
        }
        removed
    }

    pub fn add_custom_section_item(
        &mut self,
        section_id: &str,
        mut item: CustomSectionItem,
    ) -> Mutation {
        match self.custom_sections.iter_mut().find(|s| s.id == section_id) {
            Some(section) => {
                if section.items.iter().any(|i| i.id == item.id) {
                    item.id = generate_id();
                }
                section.items.push(item);
                Mutation::Applied
            }
            None => Mutation::Missing,
        }
    }

    // ── placement ──────────────────────────────────────────────────────────

    pub fn update_section_config(&mut self, id: &str, patch: SectionConfigPatch) -> Mutation {
        match self.section_configs.iter_mut().find(|c| c.id == id) {
            Some(config) => {
                patch.apply_to(config);
                Mutation::Applied
            }
            None => Mutation::Missing,
        }
    }

    pub fn update_layout_config(&mut self, patch: LayoutConfigPatch) {
        patch.apply_to(&mut self.layout_config);
    }

    /// Re-sequences sections by their position in `ids`.
    ///
    /// Sections not named lose their place in the ordered set and stop rendering;
    /// their configs and data stay. Unknown ids are ignored. For a repeated id the
    /// first position wins.
    pub fn reorder_sections(&mut self, ids: &[String]) {
        for config in &mut self.section_configs {
            config.order = ids
                .iter()
                .position(|id| *id == config.id)
                .map(|pos| pos as u32);
        }
    }

    /// Replaces styling and layout wholesale and re-sequences sections to the
    /// template's order. Custom sections the template does not name are appended
    /// after the named ones in their current relative order; unnamed built-ins are
    /// left out of the ordered set.
    pub fn apply_template(&mut self, template: &ResumeTemplate) {
        self.styling = template.styling.clone();
        self.layout_config = template.layout_config.clone();

        let mut next = 0u32;
        let mut placements: Vec<(usize, u32)> = Vec::new();
        for section_id in &template.section_order {
            if let Some(idx) = self.section_configs.iter().position(|c| c.id == *section_id) {
                if placements.iter().all(|(i, _)| *i != idx) {
                    placements.push((idx, next));
                    next += 1;
                }
            }
        }
        for (idx, config) in self.section_configs.iter().enumerate() {
            let named = template.section_order.iter().any(|id| *id == config.id);
            if config.kind == SectionKind::Custom && !named {
                placements.push((idx, next));
                next += 1;
            }
        }

        for (idx, config) in self.section_configs.iter_mut().enumerate() {
            config.order = placements
                .iter()
                .find(|(i, _)| *i == idx)
                .map(|(_, order)| *order);
        }
    }

    // ── freeform override ──────────────────────────────────────────────────

    /// Freeform markup takes over rendering and switches freeform mode on.
    pub fn set_custom_html(&mut self, markup: String) {
        self.custom_html_mode = true;
        self.custom_html = Some(markup);
    }

    /// Toggles freeform mode. The stored markup is kept so it can be re-entered.
    pub fn set_freeform_mode(&mut self, enabled: bool) {
        self.custom_html_mode = enabled;
    }

    pub fn clear_custom_html(&mut self) {
        self.custom_html = None;
    }
}

pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn retain_reporting<T>(items: &mut Vec<T>, keep: impl FnMut(&T) -> bool) -> Mutation {
    let before = items.len();
    items.retain(keep);
    if items.len() < before {
        Mutation::Applied
    } else {
        Mutation::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::resolve;
    use crate::models::template::TemplateCategory;
    use crate::store::templates::template_by_id;

    fn experience(id: &str, company: &str) -> Experience {
        Experience {
            id: id.to_string(),
            company: company.to_string(),
            role: "Engineer".to_string(),
            location: None,
            start_date: "2020".to_string(),
            end_date: "2023".to_string(),
            current: false,
            achievements: vec![],
        }
    }

    fn education(id: &str, school: &str) -> Education {
        Education {
            id: id.to_string(),
            school: school.to_string(),
            degree: "BSc".to_string(),
            field: "CS".to_string(),
            location: None,
            start_date: "2010".to_string(),
            end_date: "2014".to_string(),
            gpa: None,
        }
    }

    fn custom(id: &str) -> CustomSection {
        CustomSection {
            id: id.to_string(),
            title: "Projects".to_string(),
            items: vec![],
        }
    }

    fn order_of(resume: &Resume, id: &str) -> Option<u32> {
        resume
            .section_configs
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.order)
    }

    #[test]
    fn test_defaults_seed_built_in_sections() {
        let resume = Resume::default();
        let ids: Vec<_> = resume.section_configs.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["header", "experience", "education", "skills"]);
        assert_eq!(resume.render_mode(), RenderMode::Structured);
        assert!(!resume.has_content());
    }

    #[test]
    fn test_add_experience_is_idempotent_for_same_fact() {
        let mut resume = Resume::default();
        assert_eq!(resume.add_experience(experience("a", "Google")), Mutation::Applied);
        assert_eq!(resume.add_experience(experience("b", "Google")), Mutation::Duplicate);
        assert_eq!(resume.experience.len(), 1);
    }

    #[test]
    fn test_update_and_remove_unknown_experience_are_missing() {
        let mut resume = Resume::default();
        assert_eq!(
            resume.update_experience("nope", ExperiencePatch::default()),
            Mutation::Missing
        );
        assert_eq!(resume.remove_experience("nope"), Mutation::Missing);
    }

    #[test]
    fn test_custom_section_creates_config_atomically() {
        let mut resume = Resume::default();
        assert_eq!(resume.add_custom_section(custom("projects")), Mutation::Applied);
        let config = resume.section_configs.last().unwrap();
        assert_eq!(config.kind, SectionKind::Custom);
        assert_eq!(config.order, Some(4));
        assert_eq!(config.custom_section_id.as_deref(), Some("projects"));

        assert_eq!(resume.add_custom_section(custom("projects")), Mutation::Duplicate);
        assert_eq!(resume.add_custom_section(custom("skills")), Mutation::Duplicate);
        assert_eq!(resume.section_configs.len(), 5);

        assert_eq!(resume.remove_custom_section("projects"), Mutation::Applied);
        assert!(resume.custom_sections.is_empty());
        assert_eq!(resume.section_configs.len(), 4);
    }

    #[test]
    fn test_item_for_unknown_section_is_missing() {
        let mut resume = Resume::default();
        let item = CustomSectionItem {
            id: "i1".to_string(),
            title: Some("Site".to_string()),
            subtitle: None,
            description: None,
            details: None,
            date: None,
        };
        assert_eq!(resume.add_custom_section_item("ghost", item), Mutation::Missing);
    }

    #[test]
    fn test_reorder_drops_unnamed_sections_but_keeps_configs() {
        let mut resume = Resume::default();
        resume.reorder_sections(&["skills".into(), "header".into(), "experience".into()]);
        assert_eq!(order_of(&resume, "skills"), Some(0));
        assert_eq!(order_of(&resume, "header"), Some(1));
        assert_eq!(order_of(&resume, "experience"), Some(2));
        assert_eq!(order_of(&resume, "education"), None);
        assert_eq!(resume.section_configs.len(), 4);
    }

    #[test]
    fn test_section_config_order_restores_dropped_section() {
        let mut resume = Resume::default();
        resume.reorder_sections(&["header".into()]);
        let patch = SectionConfigPatch {
            visible: None,
            order: Some(7),
        };
        assert_eq!(resume.update_section_config("skills", patch), Mutation::Applied);
        assert_eq!(order_of(&resume, "skills"), Some(7));
    }

    #[test]
    fn test_apply_template_appends_unnamed_custom_sections() {
        let mut resume = Resume::default();
        resume.add_custom_section(custom("projects"));
        resume.add_custom_section(custom("awards"));
        let template = template_by_id("modern-two-column").unwrap();

        resume.apply_template(template);

        assert_eq!(resume.styling, template.styling);
        assert_eq!(resume.layout_config, template.layout_config);
        assert_eq!(order_of(&resume, "header"), Some(0));
        assert_eq!(order_of(&resume, "skills"), Some(1));
        assert_eq!(order_of(&resume, "experience"), Some(2));
        assert_eq!(order_of(&resume, "education"), Some(3));
        assert_eq!(order_of(&resume, "projects"), Some(4));
        assert_eq!(order_of(&resume, "awards"), Some(5));
    }

    #[test]
    fn test_leaving_freeform_keeps_markup() {
        let mut resume = Resume::default();
        resume.set_custom_html("<p>mine</p>".to_string());
        assert_eq!(resume.render_mode(), RenderMode::Freeform("<p>mine</p>"));

        resume.set_freeform_mode(false);
        assert_eq!(resume.render_mode(), RenderMode::Structured);
        assert_eq!(resume.custom_html.as_deref(), Some("<p>mine</p>"));

        resume.set_freeform_mode(true);
        assert_eq!(resume.render_mode(), RenderMode::Freeform("<p>mine</p>"));

        resume.clear_custom_html();
        assert_eq!(resume.render_mode(), RenderMode::Structured);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut resume = Resume::default();
        resume.add_experience(experience("a", "Google"));
        resume.set_custom_html("<p/>".to_string());
        resume.reset();
        assert_eq!(resume, Resume::default());
    }

    #[test]
    fn test_clashing_experience_id_is_replaced() {
        let mut resume = Resume::default();
        assert_eq!(resume.add_experience(experience("exp-1", "Google")), Mutation::Applied);
        assert_eq!(resume.add_experience(experience("exp-1", "Meta")), Mutation::Applied);
        assert_eq!(resume.experience[0].id, "exp-1");
        assert_ne!(resume.experience[1].id, "exp-1");
        assert!(!resume.experience[1].id.is_empty());

        assert_eq!(resume.remove_experience("exp-1"), Mutation::Applied);
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].company, "Meta");
    }

    #[test]
    fn test_clashing_education_id_is_replaced() {
        let mut resume = Resume::default();
        assert_eq!(resume.add_education(education("edu-1", "MIT")), Mutation::Applied);
        assert_eq!(resume.add_education(education("edu-1", "Stanford")), Mutation::Applied);
        assert_ne!(resume.education[0].id, resume.education[1].id);

        let patch = EducationPatch {
            gpa: Some("3.9".to_string()),
            ..EducationPatch::default()
        };
        assert_eq!(resume.update_education("edu-1", patch), Mutation::Applied);
        assert_eq!(resume.education[0].gpa.as_deref(), Some("3.9"));
        assert_eq!(resume.education[1].gpa, None);
    }

    #[test]
    fn test_template_without_built_in_drops_it_from_order() {
        let mut resume = Resume::default();
        resume.personal_info.name = "Ada".to_string();
        resume.add_experience(experience("e1", "Google"));
        resume.add_education(education("ed1", "MIT"));
        let template = ResumeTemplate {
            id: "no-education".to_string(),
            name: "No education".to_string(),
            description: "Work history only".to_string(),
            category: TemplateCategory::Minimal,
            styling: StylingConfig::default(),
            layout_config: LayoutConfig::default(),
            section_order: vec!["header".to_string(), "experience".to_string()],
        };

        resume.apply_template(&template);

        assert_eq!(order_of(&resume, "header"), Some(0));
        assert_eq!(order_of(&resume, "experience"), Some(1));
        assert_eq!(order_of(&resume, "education"), None);
        assert_eq!(order_of(&resume, "skills"), None);
        assert!(resume.section_configs.iter().any(|c| c.id == "education"));
        assert_eq!(resume.education.len(), 1);

        let ids: Vec<&str> = resolve(&resume)
            .columns()
            .into_iter()
            .flat_map(|(_, sections)| sections.iter().map(|s| s.id))
            .collect();
        assert_eq!(ids, vec!["header", "experience"]);
    }
}
