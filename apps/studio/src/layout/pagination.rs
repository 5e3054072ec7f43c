//! Page geometry estimation.
//!
//! The service has no browser to measure with, so section boxes are estimated from
//! the density tables and the static glyph-width tables. The estimate feeds two
//! consumers: the page-count badge and page-break indicators, and the motion overlay,
//! which needs each section's before/after position to compute inverse offsets.

use std::collections::HashMap;

use serde::Serialize;

use crate::layout::density::{container_box, spacing_scale, SpacingScale, PX_PER_REM};
use crate::layout::font_metrics::{get_metrics, FontMetricTable};
use crate::layout::resolver::{Column, ResolvedLayout, ResolvedSection, SectionContent};
use crate::models::resume::{CustomSection, Education, Experience, PersonalInfo};
use crate::models::style::{Spacing, StylingConfig};

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
const PX_PER_MM: f32 = 96.0 / 25.4;

pub const COLUMN_GAP_REM: f32 = 1.5;
/// Left column share of a two-column row; the right column takes the rest.
pub const LEFT_COLUMN_FRACTION: f32 = 0.4;

const HEADING_LINE_HEIGHT: f32 = 1.2;
const CHIP_PADDING_REM: f32 = 1.5;
const CHIP_GAP_REM: f32 = 0.5;
const BULLET_INDENT_REM: f32 = 1.25;

pub fn page_height_px() -> f32 {
    A4_HEIGHT_MM * PX_PER_MM
}

fn page_width_px() -> f32 {
    A4_WIDTH_MM * PX_PER_MM
}

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Estimated on-page boxes for one resolved layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    positions: HashMap<String, Rect>,
    document_height: f32,
}

impl LayoutSnapshot {
    /// Box of a section. A section placed in both columns reports its first placement.
    pub fn position(&self, section_id: &str) -> Option<Rect> {
        self.positions.get(section_id).copied()
    }

    /// Pages the document spans; an empty document still occupies one page.
    pub fn page_count(&self) -> u32 {
        ((self.document_height / page_height_px()).ceil() as u32).max(1)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Estimation
// ────────────────────────────────────────────────────────────────────────────

struct Measure<'s> {
    scale: &'s SpacingScale,
    heading: &'static FontMetricTable,
    body: &'static FontMetricTable,
    compact: bool,
}

impl Measure<'_> {
    fn rem(&self, rem: f32) -> f32 {
        rem * PX_PER_REM
    }

    fn body_line(&self) -> f32 {
        self.rem(self.scale.body_size) * self.scale.line_height
    }

    fn lines(&self, table: &FontMetricTable, text: &str, size_rem: f32, width_px: f32) -> u32 {
        table.estimated_lines(text, width_px / self.rem(size_rem))
    }

    fn body_text(&self, text: &str, width_px: f32) -> f32 {
        self.lines(self.body, text, self.scale.body_size, width_px) as f32 * self.body_line()
    }

    fn title(&self) -> f32 {
        self.rem(self.scale.title_size) * HEADING_LINE_HEIGHT
            + self.rem(self.scale.title_padding + self.scale.title_margin)
            + self.scale.title_border_px
    }

    fn header(&self, info: &PersonalInfo, has_image: bool, width: f32) -> f32 {
        let image = if has_image {
            self.rem(if self.compact { 4.0 } else { 6.0 })
        } else {
            0.0
        };
        let text_width = if has_image {
            width - image - self.rem(self.scale.base)
        } else {
            width
        };

        let name_size = if self.compact { 1.5 } else { 2.0 };
        let name = if info.name.is_empty() {
            "Your Name"
        } else {
            info.name.as_str()
        };
        let mut text = self.lines(self.heading, name, name_size, text_width) as f32
            * self.rem(name_size)
            * HEADING_LINE_HEIGHT;

        let contact = [&info.email, &info.phone, &info.location]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" | ");
        text += self.body_text(&contact, text_width);

        if let Some(summary) = info.summary.as_deref().filter(|s| !s.is_empty()) {
            text += self.rem(self.scale.item_gap) + self.body_text(summary, text_width);
        }
        text.max(image)
    }

    fn entries_gap(&self, count: usize) -> f32 {
        count.saturating_sub(1) as f32 * self.rem(self.scale.item_gap)
    }

    fn bullets<'t>(&self, items: impl IntoIterator<Item = &'t String>, width: f32) -> f32 {
        let indented = width - self.rem(BULLET_INDENT_REM);
        items
            .into_iter()
            .map(|item| self.body_text(item, indented))
            .sum()
    }

    fn experience(&self, entries: &[Experience], width: f32) -> f32 {
        let per_entry: f32 = entries
            .iter()
            .map(|exp| 2.0 * self.body_line() + self.bullets(&exp.achievements, width))
            .sum();
        per_entry + self.entries_gap(entries.len())
    }

    fn education(&self, entries: &[Education], width: f32) -> f32 {
        let per_entry: f32 = entries
            .iter()
            .map(|edu| {
                let degree = format!("{} in {}", edu.degree, edu.field);
                let gpa = if edu.gpa.is_some() { self.body_line() } else { 0.0 };
                self.body_text(&degree, width) + self.body_line() + gpa
            })
            .sum();
        per_entry + self.entries_gap(entries.len())
    }

    fn skills(&self, skills: &[String], width: f32) -> f32 {
        if self.scale.inline_skills {
            return self.body_text(&skills.join(" • "), width);
        }

        let size = self.rem(self.scale.body_size);
        let chip_line = size * 1.8;
        let gap = self.rem(CHIP_GAP_REM);
        let mut rows = 1u32;
        let mut row_width = 0.0f32;
        for skill in skills {
            let chip = self.body.measure_str(skill) * size + self.rem(CHIP_PADDING_REM);
            if row_width > 0.0 && row_width + gap + chip > width {
                rows += 1;
                row_width = chip;
            } else if row_width > 0.0 {
                row_width += gap + chip;
            } else {
                row_width = chip;
            }
        }
        rows as f32 * chip_line + (rows - 1) as f32 * gap
    }

    fn custom(&self, section: &CustomSection, width: f32) -> f32 {
        let per_item: f32 = section
            .items
            .iter()
            .map(|item| {
                let mut h = 0.0;
                if let Some(title) = &item.title {
                    h += self.body_text(title, width);
                }
                if item.subtitle.is_some() || item.date.is_some() {
                    h += self.body_line();
                }
                if let Some(description) = &item.description {
                    h += self.body_text(description, width);
                }
                if let Some(details) = &item.details {
                    h += self.bullets(details, width);
                }
                h
            })
            .sum();
        per_item + self.entries_gap(section.items.len())
    }

    fn section(&self, section: &ResolvedSection<'_>, width: f32) -> f32 {
        let body = match &section.content {
            SectionContent::Header {
                personal_info,
                profile_image,
                ..
            } => self.header(personal_info, profile_image.is_some(), width),
            SectionContent::Experience(entries) => self.title() + self.experience(entries, width),
            SectionContent::Education(entries) => self.title() + self.education(entries, width),
            SectionContent::Skills(skills) => self.title() + self.skills(skills, width),
            SectionContent::Custom(custom) => self.title() + self.custom(custom, width),
        };
        body + self.rem(self.scale.section_margin)
    }
}

/// Width in px of the content box, before any column split.
pub fn content_width_px(styling: &StylingConfig) -> f32 {
    let container = container_box(styling.layout, styling.spacing);
    (container.max_width * PX_PER_REM).min(page_width_px()) - 2.0 * container.padding_x * PX_PER_REM
}

fn column_frame(column: Column, content_width: f32, padding_x: f32) -> (f32, f32) {
    let gap = COLUMN_GAP_REM * PX_PER_REM;
    let left_width = (content_width - gap) * LEFT_COLUMN_FRACTION;
    match column {
        Column::Main => (padding_x, content_width),
        Column::Left => (padding_x, left_width),
        Column::Right => (
            padding_x + left_width + gap,
            content_width - gap - left_width,
        ),
    }
}

pub fn estimate(layout: &ResolvedLayout<'_>, styling: &StylingConfig) -> LayoutSnapshot {
    let container = container_box(styling.layout, styling.spacing);
    let measure = Measure {
        scale: spacing_scale(styling.spacing),
        heading: get_metrics(styling.fonts.heading),
        body: get_metrics(styling.fonts.body),
        compact: styling.spacing == Spacing::Compact,
    };
    let padding_x = container.padding_x * PX_PER_REM;
    let padding_y = container.padding_y * PX_PER_REM;
    let content_width = content_width_px(styling);

    let mut snapshot = LayoutSnapshot::default();
    let mut tallest = 0.0f32;
    for (column, sections) in layout.columns() {
        let (x, width) = column_frame(column, content_width, padding_x);
        let mut y = padding_y;
        for section in sections {
            let height = measure.section(section, width);
            snapshot
                .positions
                .entry(section.id.to_string())
                .or_insert(Rect {
                    x,
                    y,
                    width,
                    height,
                });
            y += height;
        }
        tallest = tallest.max(y);
    }
    snapshot.document_height = tallest + padding_y;
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::resolver::resolve;
    use crate::models::resume::{ColumnCount, LayoutConfigPatch};
    use crate::store::Resume;

    fn with_experience(count: usize, bullets: usize) -> Resume {
        let mut resume = Resume::default();
        resume.personal_info.name = "Grace Hopper".to_string();
        for i in 0..count {
            resume.experience.push(Experience {
                id: format!("e{i}"),
                company: format!("Company {i}"),
                role: "Engineer".to_string(),
                location: None,
                start_date: "2020-01".to_string(),
                end_date: "2021-01".to_string(),
                current: false,
                achievements: vec![
                    "Reduced deployment latency across forty services by rebuilding the release pipeline"
                        .to_string();
                    bullets
                ],
            });
        }
        resume
    }

    #[test]
    fn test_page_height_is_a4() {
        assert!((page_height_px() - 1122.52).abs() < 0.1);
    }

    #[test]
    fn test_short_resume_fits_one_page() {
        let resume = with_experience(1, 2);
        let snapshot = estimate(&resolve(&resume), &resume.styling);
        assert_eq!(snapshot.page_count(), 1);
    }

    #[test]
    fn test_long_resume_spills_onto_more_pages() {
        let resume = with_experience(12, 6);
        let snapshot = estimate(&resolve(&resume), &resume.styling);
        assert!(snapshot.page_count() >= 2, "height {}", snapshot.document_height);
    }

    #[test]
    fn test_sections_stack_downwards() {
        let resume = with_experience(2, 2);
        let snapshot = estimate(&resolve(&resume), &resume.styling);
        let header = snapshot.position("header").expect("header placed");
        let experience = snapshot.position("experience").expect("experience placed");
        assert!(experience.y >= header.y + header.height - 0.01);
        assert!(snapshot.position("education").is_none());
    }

    #[test]
    fn test_compact_is_shorter_than_relaxed() {
        let mut resume = with_experience(4, 3);
        resume.styling.spacing = Spacing::Compact;
        let compact = estimate(&resolve(&resume), &resume.styling).document_height;
        resume.styling.spacing = Spacing::Relaxed;
        let relaxed = estimate(&resolve(&resume), &resume.styling).document_height;
        assert!(compact < relaxed);
    }

    #[test]
    fn test_two_columns_sit_side_by_side() {
        let mut resume = with_experience(1, 1);
        resume.skills = vec!["Rust".to_string()];
        resume.update_layout_config(LayoutConfigPatch {
            columns: Some(ColumnCount::Two),
            left_sections: Some(vec!["skills".to_string()]),
            right_sections: Some(vec!["experience".to_string()]),
        });
        let snapshot = estimate(&resolve(&resume), &resume.styling);
        let skills = snapshot.position("skills").expect("skills placed");
        let experience = snapshot.position("experience").expect("experience placed");
        assert!(experience.x > skills.x);
        assert!((experience.y - skills.y).abs() < 0.01);
        assert!(experience.width > skills.width);
    }
}
