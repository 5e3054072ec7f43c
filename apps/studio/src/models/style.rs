use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutArchetype {
    Traditional,
    Modern,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    Normal,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    SansSerif,
    Serif,
    Monospace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Colour tokens. Fields missing from a payload fall back to the defaults, so a
/// partial `colors` object replaces the whole set rather than merging into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub text: String,
    pub background: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#55aba3".to_string(),
            secondary: "#64748b".to_string(),
            text: "#1e293b".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub heading: FontFamily,
    pub body: FontFamily,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            heading: FontFamily::SansSerif,
            body: FontFamily::SansSerif,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylingConfig {
    pub colors: ColorConfig,
    pub fonts: FontConfig,
    pub layout: LayoutArchetype,
    pub spacing: Spacing,
    pub header_alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_alignment: Option<Alignment>,
}

impl StylingConfig {
    pub fn effective_summary_alignment(&self) -> Alignment {
        self.summary_alignment.unwrap_or(self.header_alignment)
    }
}

impl Default for StylingConfig {
    fn default() -> Self {
        Self {
            colors: ColorConfig::default(),
            fonts: FontConfig::default(),
            layout: LayoutArchetype::Traditional,
            spacing: Spacing::Normal,
            header_alignment: Alignment::Left,
            summary_alignment: None,
        }
    }
}

/// Top-level partial styling. Nested objects are taken whole.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylingPatch {
    pub colors: Option<ColorConfig>,
    pub fonts: Option<FontConfig>,
    pub layout: Option<LayoutArchetype>,
    pub spacing: Option<Spacing>,
    pub header_alignment: Option<Alignment>,
    pub summary_alignment: Option<Alignment>,
}

impl StylingPatch {
    pub fn apply_to(self, styling: &mut StylingConfig) {
        if let Some(colors) = self.colors {
            styling.colors = colors;
        }
        if let Some(fonts) = self.fonts {
            styling.fonts = fonts;
        }
        if let Some(layout) = self.layout {
            styling.layout = layout;
        }
        if let Some(spacing) = self.spacing {
            styling.spacing = spacing;
        }
        if let Some(alignment) = self.header_alignment {
            styling.header_alignment = alignment;
        }
        if let Some(alignment) = self.summary_alignment {
            styling.summary_alignment = Some(alignment);
        }
    }
}
