use serde::{Deserialize, Serialize};

use crate::models::resume::LayoutConfig;
use crate::models::style::StylingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Modern,
    Traditional,
    Creative,
    Minimal,
}

/// A gallery bundle: styling and layout are applied wholesale, `section_order`
/// re-sequences the existing section configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub styling: StylingConfig,
    pub layout_config: LayoutConfig,
    pub section_order: Vec<String>,
}
