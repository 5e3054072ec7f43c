//! Built-in template gallery.

use std::sync::OnceLock;

use crate::models::resume::{ColumnCount, LayoutConfig};
use crate::models::style::{
    Alignment, ColorConfig, FontConfig, FontFamily, LayoutArchetype, Spacing, StylingConfig,
};
use crate::models::template::{ResumeTemplate, TemplateCategory};

struct Palette {
    primary: &'static str,
    secondary: &'static str,
    text: &'static str,
}

fn styling(
    palette: Palette,
    font: FontFamily,
    layout: LayoutArchetype,
    spacing: Spacing,
    header_alignment: Alignment,
) -> StylingConfig {
    StylingConfig {
        colors: ColorConfig {
            primary: palette.primary.to_string(),
            secondary: palette.secondary.to_string(),
            text: palette.text.to_string(),
            background: "#ffffff".to_string(),
        },
        fonts: FontConfig {
            heading: font,
            body: font,
        },
        layout,
        spacing,
        header_alignment,
        summary_alignment: None,
    }
}

fn single_column() -> LayoutConfig {
    LayoutConfig::default()
}

/// Header and skills on the left, the long-form sections on the right.
fn sidebar_columns() -> LayoutConfig {
    LayoutConfig {
        columns: ColumnCount::Two,
        left_sections: Some(ids(&["header", "skills"])),
        right_sections: Some(ids(&["experience", "education"])),
    }
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn template(
    id: &str,
    name: &str,
    description: &str,
    category: TemplateCategory,
    styling: StylingConfig,
    layout_config: LayoutConfig,
    order: &[&str],
) -> ResumeTemplate {
    ResumeTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        styling,
        layout_config,
        section_order: ids(order),
    }
}

fn build_gallery() -> Vec<ResumeTemplate> {
    use Alignment::{Center, Left};
    use FontFamily::{SansSerif, Serif};
    use LayoutArchetype::{Minimal, Modern, Traditional};
    use Spacing::{Compact, Normal, Relaxed};

    vec![
        template(
            "classic-single",
            "Classic",
            "Traditional single-column layout with clean typography",
            TemplateCategory::Traditional,
            styling(
                Palette { primary: "#2c3e50", secondary: "#7f8c8d", text: "#2c3e50" },
                Serif,
                Traditional,
                Normal,
                Left,
            ),
            single_column(),
            &["header", "experience", "education", "skills"],
        ),
        template(
            "modern-two-column",
            "Modern Professional",
            "Two-column layout with bold colors and sans-serif fonts",
            TemplateCategory::Modern,
            styling(
                Palette { primary: "#3b82f6", secondary: "#64748b", text: "#1e293b" },
                SansSerif,
                Modern,
                Compact,
                Left,
            ),
            sidebar_columns(),
            &["header", "skills", "experience", "education"],
        ),
        template(
            "minimal-centered",
            "Minimal",
            "Minimalist design with centered header and generous spacing",
            TemplateCategory::Minimal,
            styling(
                Palette { primary: "#000000", secondary: "#666666", text: "#333333" },
                SansSerif,
                Minimal,
                Relaxed,
                Center,
            ),
            single_column(),
            &["header", "experience", "skills", "education"],
        ),
        template(
            "creative-accent",
            "Creative",
            "Eye-catching design with vibrant accent colors",
            TemplateCategory::Creative,
            styling(
                Palette { primary: "#8b5cf6", secondary: "#6b7280", text: "#111827" },
                SansSerif,
                Modern,
                Normal,
                Left,
            ),
            single_column(),
            &["header", "skills", "experience", "education"],
        ),
        template(
            "tech-sidebar",
            "Tech Sidebar",
            "Developer-focused with skills sidebar and monospace accents",
            TemplateCategory::Modern,
            styling(
                Palette { primary: "#0ea5e9", secondary: "#64748b", text: "#0f172a" },
                SansSerif,
                Modern,
                Compact,
                Left,
            ),
            sidebar_columns(),
            &["header", "skills", "experience", "education"],
        ),
        template(
            "executive",
            "Executive",
            "Professional serif design for senior positions",
            TemplateCategory::Traditional,
            styling(
                Palette { primary: "#1e40af", secondary: "#64748b", text: "#1e293b" },
                Serif,
                Traditional,
                Relaxed,
                Center,
            ),
            single_column(),
            &["header", "experience", "education", "skills"],
        ),
    ]
}

pub fn gallery() -> &'static [ResumeTemplate] {
    static GALLERY: OnceLock<Vec<ResumeTemplate>> = OnceLock::new();
    GALLERY.get_or_init(build_gallery)
}

pub fn template_by_id(id: &str) -> Option<&'static ResumeTemplate> {
    gallery().iter().find(|t| t.id == id)
}

pub fn templates_by_category(category: TemplateCategory) -> Vec<&'static ResumeTemplate> {
    gallery().iter().filter(|t| t.category == category).collect()
}
