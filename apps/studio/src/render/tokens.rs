//! Style tokens: the named CSS variables and per-density values every leaf
//! renderer reads. Leaves refer to `var(--resume-*)` instead of re-specifying
//! colours and fonts themselves.

use crate::layout::density::{container_box, spacing_scale, SpacingScale};
use crate::models::style::{Alignment, FontFamily, LayoutArchetype, StylingConfig};

pub const VAR_PRIMARY: &str = "var(--resume-color-primary)";
pub const VAR_SECONDARY: &str = "var(--resume-color-secondary)";
pub const VAR_TEXT: &str = "var(--resume-color-text)";
pub const VAR_BACKGROUND: &str = "var(--resume-color-background)";
pub const VAR_FONT_HEADING: &str = "var(--resume-font-heading)";
pub const VAR_FONT_BODY: &str = "var(--resume-font-body)";

/// Faint rule drawn every A4 page height behind the document.
pub const PAGE_BREAK_BACKGROUND: &str = "repeating-linear-gradient(transparent, transparent 297mm, #e5e7eb 297mm, #e5e7eb calc(297mm + 2px))";

const MODERN_BACKGROUND: &str = "linear-gradient(to bottom right, #ffffff, #f9fafb)";

pub fn font_stack(font: FontFamily) -> &'static str {
    match font {
        FontFamily::SansSerif => "'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif",
        FontFamily::Serif => "'Georgia', 'Times New Roman', serif",
        FontFamily::Monospace => "'Courier New', 'Monaco', monospace",
    }
}

pub fn rem(value: f32) -> String {
    format!("{value}rem")
}

pub fn text_align(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    }
}

pub fn justify(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "flex-start",
        Alignment::Center => "center",
        Alignment::Right => "flex-end",
    }
}

/// Resolved tokens for one render.
pub struct Tokens<'a> {
    pub styling: &'a StylingConfig,
    pub scale: &'static SpacingScale,
}

impl<'a> Tokens<'a> {
    pub fn new(styling: &'a StylingConfig) -> Self {
        Self {
            styling,
            scale: spacing_scale(styling.spacing),
        }
    }

    /// Custom properties set on the document container.
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        let colors = &self.styling.colors;
        vec![
            ("--resume-color-primary", colors.primary.clone()),
            ("--resume-color-secondary", colors.secondary.clone()),
            ("--resume-color-text", colors.text.clone()),
            ("--resume-color-background", colors.background.clone()),
            (
                "--resume-font-heading",
                font_stack(self.styling.fonts.heading).to_string(),
            ),
            (
                "--resume-font-body",
                font_stack(self.styling.fonts.body).to_string(),
            ),
            ("--resume-spacing", rem(self.scale.base)),
        ]
    }

    pub fn container(&self) -> Vec<(&'static str, String)> {
        let frame = container_box(self.styling.layout, self.styling.spacing);
        let mut styles = vec![
            ("max-width", rem(frame.max_width)),
            ("margin", "0 auto".to_string()),
            (
                "padding",
                format!("{} {}", rem(frame.padding_y), rem(frame.padding_x)),
            ),
            ("min-height", "297mm".to_string()),
            ("position", "relative".to_string()),
            ("background-color", self.styling.colors.background.clone()),
            ("color", VAR_TEXT.to_string()),
            ("font-family", VAR_FONT_BODY.to_string()),
        ];
        if self.styling.layout == LayoutArchetype::Modern {
            styles.push(("background-image", MODERN_BACKGROUND.to_string()));
        }
        styles
    }

    pub fn section(&self) -> Vec<(&'static str, String)> {
        vec![("margin-bottom", rem(self.scale.section_margin))]
    }

    /// Vertical gap between stacked children (sections, entries).
    pub fn stack(&self, gap: f32) -> Vec<(&'static str, String)> {
        vec![
            ("display", "flex".to_string()),
            ("flex-direction", "column".to_string()),
            ("gap", rem(gap)),
        ]
    }

    pub fn section_title(&self) -> Vec<(&'static str, String)> {
        vec![
            ("font-size", rem(self.scale.title_size)),
            ("font-weight", "700".to_string()),
            ("margin-bottom", rem(self.scale.title_margin)),
            ("padding-bottom", rem(self.scale.title_padding)),
            (
                "border-bottom",
                format!("{}px solid {VAR_PRIMARY}", self.scale.title_border_px),
            ),
            ("font-family", VAR_FONT_HEADING.to_string()),
            ("color", VAR_PRIMARY.to_string()),
        ]
    }

    pub fn body_text(&self) -> Vec<(&'static str, String)> {
        vec![
            ("font-size", rem(self.scale.body_size)),
            ("line-height", self.scale.line_height.to_string()),
            ("font-family", VAR_FONT_BODY.to_string()),
            ("color", VAR_TEXT.to_string()),
        ]
    }
}
