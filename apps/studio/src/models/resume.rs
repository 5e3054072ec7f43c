use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    /// When set the entry renders with "Present" as its end, whatever `end_date` holds.
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<CustomSectionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSectionItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Experience,
    Education,
    Skills,
    Custom,
}

impl SectionKind {
    /// Kinds seeded at initialization, in their default order.
    pub const BUILT_IN: [SectionKind; 4] = [
        SectionKind::Header,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Custom => "custom",
        }
    }

    pub fn is_built_in_id(id: &str) -> bool {
        Self::BUILT_IN.iter().any(|k| k.as_str() == id)
    }
}

/// Placement of one renderable section.
///
/// `order` is `None` once a reorder left the section out of the ordered set: the
/// config (and its data) survive, but the resolver no longer renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub visible: bool,
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_section_id: Option<String>,
}

impl SectionConfig {
    pub fn built_in(kind: SectionKind, order: u32) -> Self {
        Self {
            id: kind.as_str().to_string(),
            kind,
            visible: true,
            order: Some(order),
            custom_section_id: None,
        }
    }

    pub fn custom(section_id: &str, order: u32) -> Self {
        Self {
            id: section_id.to_string(),
            kind: SectionKind::Custom,
            visible: true,
            order: Some(order),
            custom_section_id: Some(section_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ColumnCount {
    One,
    Two,
}

impl TryFrom<u8> for ColumnCount {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ColumnCount::One),
            2 => Ok(ColumnCount::Two),
            other => Err(format!("columns must be 1 or 2, got {other}")),
        }
    }
}

impl From<ColumnCount> for u8 {
    fn from(value: ColumnCount) -> Self {
        match value {
            ColumnCount::One => 1,
            ColumnCount::Two => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub columns: ColumnCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_sections: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_sections: Option<Vec<String>>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: ColumnCount::One,
            left_sections: None,
            right_sections: None,
        }
    }
}

/// Partial personal info; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
}

impl PersonalInfoPatch {
    pub fn apply_to(self, info: &mut PersonalInfo) {
        if let Some(name) = self.name {
            info.name = name;
        }
        if let Some(email) = self.email {
            info.email = email;
        }
        if let Some(phone) = self.phone {
            info.phone = phone;
        }
        if let Some(location) = self.location {
            info.location = location;
        }
        if let Some(summary) = self.summary {
            info.summary = Some(summary);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub achievements: Option<Vec<String>>,
}

impl ExperiencePatch {
    pub fn apply_to(self, exp: &mut Experience) {
        if let Some(company) = self.company {
            exp.company = company;
        }
        if let Some(role) = self.role {
            exp.role = role;
        }
        if let Some(location) = self.location {
            exp.location = Some(location);
        }
        if let Some(start) = self.start_date {
            exp.start_date = start;
        }
        if let Some(end) = self.end_date {
            exp.end_date = end;
        }
        if let Some(current) = self.current {
            exp.current = current;
        }
        if let Some(achievements) = self.achievements {
            exp.achievements = achievements;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gpa: Option<String>,
}

impl EducationPatch {
    pub fn apply_to(self, edu: &mut Education) {
        if let Some(school) = self.school {
            edu.school = school;
        }
        if let Some(degree) = self.degree {
            edu.degree = degree;
        }
        if let Some(field) = self.field {
            edu.field = field;
        }
        if let Some(location) = self.location {
            edu.location = Some(location);
        }
        if let Some(start) = self.start_date {
            edu.start_date = start;
        }
        if let Some(end) = self.end_date {
            edu.end_date = end;
        }
        if let Some(gpa) = self.gpa {
            edu.gpa = Some(gpa);
        }
    }
}

/// Only placement can change; a section's id and kind are fixed for its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfigPatch {
    pub visible: Option<bool>,
    pub order: Option<u32>,
}

impl SectionConfigPatch {
    pub fn apply_to(self, config: &mut SectionConfig) {
        if let Some(visible) = self.visible {
            config.visible = visible;
        }
        if let Some(order) = self.order {
            config.order = Some(order);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfigPatch {
    pub columns: Option<ColumnCount>,
    pub left_sections: Option<Vec<String>>,
    pub right_sections: Option<Vec<String>>,
}

impl LayoutConfigPatch {
    pub fn apply_to(self, layout: &mut LayoutConfig) {
        if let Some(columns) = self.columns {
            layout.columns = columns;
        }
        if let Some(left) = self.left_sections {
            layout.left_sections = Some(left);
        }
        if let Some(right) = self.right_sections {
            layout.right_sections = Some(right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_reject_three() {
        let parsed: Result<LayoutConfig, _> = serde_json::from_str(r#"{"columns": 3}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_columns_accept_two_with_lists() {
        let parsed: LayoutConfig = serde_json::from_str(
            r#"{"columns": 2, "leftSections": ["header"], "rightSections": ["skills"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.columns, ColumnCount::Two);
        assert_eq!(parsed.left_sections.unwrap(), vec!["header"]);
    }

    #[test]
    fn test_experience_defaults_current_and_achievements() {
        let exp: Experience = serde_json::from_str(
            r#"{"id":"e1","company":"Acme","role":"Dev","startDate":"2020","endDate":"2021"}"#,
        )
        .unwrap();
        assert!(!exp.current);
        assert!(exp.achievements.is_empty());
    }

    #[test]
    fn test_personal_info_patch_keeps_untouched_fields() {
        let mut info = PersonalInfo {
            name: "A".to_string(),
            ..PersonalInfo::default()
        };
        let patch: PersonalInfoPatch = serde_json::from_str(r#"{"email":"b@x.com"}"#).unwrap();
        patch.apply_to(&mut info);
        assert_eq!(info.name, "A");
        assert_eq!(info.email, "b@x.com");
    }

    #[test]
    fn test_section_config_serializes_kind_as_type() {
        let value = serde_json::to_value(SectionConfig::built_in(SectionKind::Skills, 3)).unwrap();
        assert_eq!(value["type"], "skills");
        assert_eq!(value["order"], 3);
    }
}
