//! Section resolver: turns section configs plus the layout config into the ordered,
//! content-bearing sections that actually render.
//!
//! Resolution is pure and synchronous. Sections are suppressed rather than failed:
//! hidden configs, configs dropped from the ordered set, empty built-in collections
//! and dangling custom references simply do not appear.

use serde::Serialize;
use tracing::debug;

use crate::models::resume::{
    ColumnCount, CustomSection, Education, Experience, PersonalInfo, SectionConfig, SectionKind,
};
use crate::models::style::Alignment;
use crate::store::Resume;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum SectionContent<'a> {
    #[serde(rename_all = "camelCase")]
    Header {
        personal_info: &'a PersonalInfo,
        profile_image: Option<&'a str>,
        header_alignment: Alignment,
        summary_alignment: Alignment,
    },
    Experience(&'a [Experience]),
    Education(&'a [Education]),
    Skills(&'a [String]),
    Custom(&'a CustomSection),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSection<'a> {
    pub id: &'a str,
    pub content: SectionContent<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Main,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "columns", rename_all = "lowercase")]
pub enum ResolvedLayout<'a> {
    Single {
        sections: Vec<ResolvedSection<'a>>,
    },
    Two {
        left: Vec<ResolvedSection<'a>>,
        right: Vec<ResolvedSection<'a>>,
    },
}

impl<'a> ResolvedLayout<'a> {
    /// Every column with its sections, in render order.
    pub fn columns(&self) -> Vec<(Column, &[ResolvedSection<'a>])> {
        match self {
            ResolvedLayout::Single { sections } => vec![(Column::Main, sections.as_slice())],
            ResolvedLayout::Two { left, right } => vec![
                (Column::Left, left.as_slice()),
                (Column::Right, right.as_slice()),
            ],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolution
// ────────────────────────────────────────────────────────────────────────────

/// Visible configs that hold a place in the ordered set, ascending by `order`.
/// The sort is stable, so ties keep their sequence position.
pub fn ordered_visible(configs: &[SectionConfig]) -> Vec<&SectionConfig> {
    let mut visible: Vec<&SectionConfig> = configs
        .iter()
        .filter(|c| c.visible && c.order.is_some())
        .collect();
    visible.sort_by_key(|c| c.order);
    visible
}

/// Content for one config, or `None` when the section has nothing to show.
pub fn resolve_content<'a>(
    resume: &'a Resume,
    config: &'a SectionConfig,
) -> Option<SectionContent<'a>> {
    match config.kind {
        SectionKind::Header => Some(SectionContent::Header {
            personal_info: &resume.personal_info,
            profile_image: resume.profile_image.as_deref(),
            header_alignment: resume.styling.header_alignment,
            summary_alignment: resume.styling.effective_summary_alignment(),
        }),
        SectionKind::Experience => (!resume.experience.is_empty())
            .then_some(SectionContent::Experience(&resume.experience)),
        SectionKind::Education => (!resume.education.is_empty())
            .then_some(SectionContent::Education(&resume.education)),
        SectionKind::Skills => {
            (!resume.skills.is_empty()).then_some(SectionContent::Skills(&resume.skills))
        }
        SectionKind::Custom => {
            let target = config.custom_section_id.as_deref().unwrap_or(&config.id);
            let found = resume.custom_sections.iter().find(|s| s.id == target);
            if found.is_none() {
                debug!(section = %config.id, custom_section = target, "Custom section reference is dangling");
            }
            found.map(SectionContent::Custom)
        }
    }
}

fn resolve_sequence<'a>(
    resume: &'a Resume,
    configs: impl IntoIterator<Item = &'a SectionConfig>,
) -> Vec<ResolvedSection<'a>> {
    configs
        .into_iter()
        .filter_map(|config| {
            resolve_content(resume, config).map(|content| ResolvedSection {
                id: &config.id,
                content,
            })
        })
        .collect()
}

/// Picks the sections a column declares, in the column's own order. Only sections
/// in the visible ordered set qualify; repeats within one list are collapsed.
fn column_members<'a>(
    visible: &[&'a SectionConfig],
    declared: Option<&[String]>,
) -> Vec<&'a SectionConfig> {
    let mut members: Vec<&'a SectionConfig> = Vec::new();
    for id in declared.unwrap_or_default() {
        if members.iter().any(|m| m.id == *id) {
            continue;
        }
        if let Some(config) = visible.iter().find(|c| c.id == *id) {
            members.push(*config);
        }
    }
    members
}

pub fn resolve(resume: &Resume) -> ResolvedLayout<'_> {
    let visible = ordered_visible(&resume.section_configs);
    let layout = &resume.layout_config;

    match layout.columns {
        ColumnCount::One => ResolvedLayout::Single {
            sections: resolve_sequence(resume, visible),
        },
        ColumnCount::Two => {
            let left = column_members(&visible, layout.left_sections.as_deref());
            let right = column_members(&visible, layout.right_sections.as_deref());
            ResolvedLayout::Two {
                left: resolve_sequence(resume, left),
                right: resolve_sequence(resume, right),
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
