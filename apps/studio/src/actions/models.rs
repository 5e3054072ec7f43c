//! The closed action taxonomy and its parsing from untrusted assistant output.
//!
//! Input arrives as loosely-shaped `{type, payload}` JSON. Each record is turned into
//! a strongly-typed [`ResumeAction`] or an [`ActionError`]; nothing here touches the
//! aggregate.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::resume::{
    CustomSection, CustomSectionItem, Education, EducationPatch, Experience, ExperiencePatch,
    LayoutConfigPatch, PersonalInfoPatch, SectionConfigPatch,
};
use crate::models::style::StylingPatch;
use crate::store::generate_id;

const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action has no string `type` field")]
    MissingType,

    #[error("unknown action type '{0}'")]
    UnknownKind(String),

    #[error("malformed payload for {kind}: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid profile image: {0}")]
    InvalidImage(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperience {
    pub id: Option<String>,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub current: bool,
    pub achievements: Option<Vec<String>>,
}

impl NewExperience {
    pub fn into_experience(self) -> Experience {
        Experience {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(generate_id),
            company: self.company,
            role: self.role,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            current: self.current,
            achievements: self.achievements.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    pub id: Option<String>,
    pub school: String,
    pub degree: String,
    pub field: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub gpa: Option<String>,
}

impl NewEducation {
    pub fn into_education(self) -> Education {
        Education {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(generate_id),
            school: self.school,
            degree: self.degree,
            field: self.field,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            gpa: self.gpa,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCustomSection {
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub items: Vec<NewCustomSectionItem>,
}

impl NewCustomSection {
    pub fn into_section(self) -> CustomSection {
        CustomSection {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(generate_id),
            title: self.title,
            items: self.items.into_iter().map(NewCustomSectionItem::into_item).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCustomSectionItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub details: Option<Vec<String>>,
    pub date: Option<String>,
}

impl NewCustomSectionItem {
    pub fn into_item(self) -> CustomSectionItem {
        CustomSectionItem {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(generate_id),
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            details: self.details,
            date: self.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryUpdate<P> {
    pub id: String,
    #[serde(flatten)]
    pub changes: P,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionRename {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSectionItem {
    pub section_id: String,
    pub item: NewCustomSectionItem,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionConfigUpdate {
    pub id: String,
    pub config: SectionConfigPatch,
}

/// One edit operation against the resume aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeAction {
    UpdatePersonalInfo(PersonalInfoPatch),
    AddExperience(NewExperience),
    UpdateExperience(EntryUpdate<ExperiencePatch>),
    RemoveExperience(EntryRef),
    AddEducation(NewEducation),
    UpdateEducation(EntryUpdate<EducationPatch>),
    RemoveEducation(EntryRef),
    UpdateSkills(Vec<String>),
    AddSkill(String),
    RemoveSkill(String),
    UpdateStyle(StylingPatch),
    SetProfileImage(Option<String>),
    AddCustomSection(NewCustomSection),
    UpdateCustomSection(SectionRename),
    RemoveCustomSection(EntryRef),
    AddCustomSectionItem(NewSectionItem),
    UpdateSectionConfig(SectionConfigUpdate),
    UpdateLayoutConfig(LayoutConfigPatch),
    ReorderSections(Vec<String>),
    SetCustomHtml(String),
}

impl ResumeAction {
    pub fn kind(&self) -> &'static str {
        match self {
            ResumeAction::UpdatePersonalInfo(_) => "update_personal_info",
            ResumeAction::AddExperience(_) => "add_experience",
            ResumeAction::UpdateExperience(_) => "update_experience",
            ResumeAction::RemoveExperience(_) => "remove_experience",
            ResumeAction::AddEducation(_) => "add_education",
            ResumeAction::UpdateEducation(_) => "update_education",
            ResumeAction::RemoveEducation(_) => "remove_education",
            ResumeAction::UpdateSkills(_) => "update_skills",
            ResumeAction::AddSkill(_) => "add_skill",
            ResumeAction::RemoveSkill(_) => "remove_skill",
            ResumeAction::UpdateStyle(_) => "update_style",
            ResumeAction::SetProfileImage(_) => "set_profile_image",
            ResumeAction::AddCustomSection(_) => "add_custom_section",
            ResumeAction::UpdateCustomSection(_) => "update_custom_section",
            ResumeAction::RemoveCustomSection(_) => "remove_custom_section",
            ResumeAction::AddCustomSectionItem(_) => "add_custom_section_item",
            ResumeAction::UpdateSectionConfig(_) => "update_section_config",
            ResumeAction::UpdateLayoutConfig(_) => "update_layout_config",
            ResumeAction::ReorderSections(_) => "reorder_sections",
            ResumeAction::SetCustomHtml(_) => "set_custom_html",
        }
    }

    /// Parses one untrusted `{type, payload}` record.
    pub fn from_value(value: &Value) -> Result<Self, ActionError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ActionError::MissingType)?;
        let payload = value.get("payload").cloned().unwrap_or(Value::Null);
        Self::from_parts(kind, payload)
    }

    fn from_parts(kind: &str, payload: Value) -> Result<Self, ActionError> {
        let action = match kind {
            "update_personal_info" => {
                ResumeAction::UpdatePersonalInfo(payload_as("update_personal_info", payload)?)
            }
            "add_experience" => ResumeAction::AddExperience(payload_as("add_experience", payload)?),
            "update_experience" => {
                ResumeAction::UpdateExperience(payload_as("update_experience", payload)?)
            }
            "remove_experience" => {
                ResumeAction::RemoveExperience(payload_as("remove_experience", payload)?)
            }
            "add_education" => ResumeAction::AddEducation(payload_as("add_education", payload)?),
            "update_education" => {
                ResumeAction::UpdateEducation(payload_as("update_education", payload)?)
            }
            "remove_education" => {
                ResumeAction::RemoveEducation(payload_as("remove_education", payload)?)
            }
            "update_skills" => ResumeAction::UpdateSkills(payload_as("update_skills", payload)?),
            "add_skill" => ResumeAction::AddSkill(payload_as("add_skill", payload)?),
            "remove_skill" => ResumeAction::RemoveSkill(payload_as("remove_skill", payload)?),
            "update_style" => ResumeAction::UpdateStyle(payload_as("update_style", payload)?),
            "set_profile_image" => {
                let image: Option<String> = payload_as("set_profile_image", payload)?;
                if let Some(url) = &image {
                    validate_profile_image(url)?;
                }
                ResumeAction::SetProfileImage(image)
            }
            "add_custom_section" => {
                ResumeAction::AddCustomSection(payload_as("add_custom_section", payload)?)
            }
            "update_custom_section" => {
                ResumeAction::UpdateCustomSection(payload_as("update_custom_section", payload)?)
            }
            "remove_custom_section" => {
                ResumeAction::RemoveCustomSection(payload_as("remove_custom_section", payload)?)
            }
            "add_custom_section_item" => {
                ResumeAction::AddCustomSectionItem(payload_as("add_custom_section_item", payload)?)
            }
            "update_section_config" => {
                ResumeAction::UpdateSectionConfig(payload_as("update_section_config", payload)?)
            }
            "update_layout_config" => {
                ResumeAction::UpdateLayoutConfig(payload_as("update_layout_config", payload)?)
            }
            "reorder_sections" => {
                ResumeAction::ReorderSections(payload_as("reorder_sections", payload)?)
            }
            "set_custom_html" => ResumeAction::SetCustomHtml(payload_as("set_custom_html", payload)?),
            other => return Err(ActionError::UnknownKind(other.to_string())),
        };
        Ok(action)
    }
}

fn payload_as<T: DeserializeOwned>(kind: &'static str, payload: Value) -> Result<T, ActionError> {
    serde_json::from_value(payload).map_err(|source| ActionError::Malformed { kind, source })
}

/// Accepts `data:` URLs for JPEG, PNG or WebP images of at most 5 MiB.
fn validate_profile_image(url: &str) -> Result<(), ActionError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ActionError::InvalidImage("expected a data: URL".to_string()))?;
    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| ActionError::InvalidImage("data URL has no payload".to_string()))?;
    let mime = header.split(';').next().unwrap_or_default().to_ascii_lowercase();
    if !ACCEPTED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(ActionError::InvalidImage(format!(
            "unsupported image type '{mime}', expected JPEG, PNG, or WebP"
        )));
    }
    let decoded = if header.ends_with(";base64") {
        let padding = data.bytes().rev().take_while(|b| *b == b'=').count();
        (data.len() / 4 * 3).saturating_sub(padding)
    } else {
        data.len()
    };
    if decoded > MAX_IMAGE_BYTES {
        return Err(ActionError::InvalidImage(format!(
            "image is {decoded} bytes, limit is {MAX_IMAGE_BYTES}"
        )));
    }
    Ok(())
}
