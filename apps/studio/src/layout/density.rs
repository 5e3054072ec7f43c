//! Geometry tables shared by the page estimator and the style tokens.
//!
//! All lengths are in rem unless the field name says otherwise. The renderer turns
//! these into CSS values; the estimator turns them into pixels.

use crate::models::style::{LayoutArchetype, Spacing};

pub const PX_PER_REM: f32 = 16.0;

/// One spacing density. Applied uniformly to every section type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingScale {
    /// Base unit exposed as `--resume-spacing`.
    pub base: f32,
    pub section_margin: f32,
    pub section_gap: f32,
    pub title_size: f32,
    pub title_margin: f32,
    pub title_padding: f32,
    pub title_border_px: f32,
    pub item_gap: f32,
    pub body_size: f32,
    pub line_height: f32,
    /// Compact density renders skills as one delimited line instead of chips.
    pub inline_skills: bool,
}

const COMPACT: SpacingScale = SpacingScale {
    base: 0.5,
    section_margin: 0.25,
    section_gap: 0.125,
    title_size: 1.0,
    title_margin: 0.125,
    title_padding: 0.125,
    title_border_px: 1.0,
    item_gap: 0.125,
    body_size: 0.8125,
    line_height: 1.3,
    inline_skills: true,
};

const NORMAL: SpacingScale = SpacingScale {
    base: 1.0,
    section_margin: 1.5,
    section_gap: 1.0,
    title_size: 1.5,
    title_margin: 0.75,
    title_padding: 0.5,
    title_border_px: 2.0,
    item_gap: 1.0,
    body_size: 0.875,
    line_height: 1.5,
    inline_skills: false,
};

const RELAXED: SpacingScale = SpacingScale {
    base: 1.5,
    section_margin: 2.0,
    section_gap: 1.5,
    title_size: 1.5,
    title_margin: 1.0,
    title_padding: 0.5,
    title_border_px: 2.0,
    item_gap: 1.5,
    body_size: 0.875,
    line_height: 1.6,
    inline_skills: false,
};

pub fn spacing_scale(spacing: Spacing) -> &'static SpacingScale {
    match spacing {
        Spacing::Compact => &COMPACT,
        Spacing::Normal => &NORMAL,
        Spacing::Relaxed => &RELAXED,
    }
}

/// Document container dimensions for an archetype at a given density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBox {
    pub max_width: f32,
    pub padding_x: f32,
    pub padding_y: f32,
}

pub fn container_box(layout: LayoutArchetype, spacing: Spacing) -> ContainerBox {
    let compact = spacing == Spacing::Compact;
    match layout {
        LayoutArchetype::Traditional if compact => ContainerBox {
            max_width: 64.0,
            padding_x: 3.0,
            padding_y: 1.0,
        },
        LayoutArchetype::Traditional => ContainerBox {
            max_width: 48.0,
            padding_x: 2.0,
            padding_y: 2.0,
        },
        LayoutArchetype::Modern if compact => ContainerBox {
            max_width: 72.0,
            padding_x: 3.0,
            padding_y: 1.0,
        },
        LayoutArchetype::Modern => ContainerBox {
            max_width: 56.0,
            padding_x: 2.5,
            padding_y: 2.5,
        },
        LayoutArchetype::Minimal if compact => ContainerBox {
            max_width: 64.0,
            padding_x: 3.0,
            padding_y: 1.0,
        },
        LayoutArchetype::Minimal => ContainerBox {
            max_width: 42.0,
            padding_x: 1.0,
            padding_y: 1.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_compact_inlines_skills() {
        assert!(spacing_scale(Spacing::Compact).inline_skills);
        assert!(!spacing_scale(Spacing::Normal).inline_skills);
        assert!(!spacing_scale(Spacing::Relaxed).inline_skills);
    }

    #[test]
    fn test_density_grows_monotonically() {
        let c = spacing_scale(Spacing::Compact);
        let n = spacing_scale(Spacing::Normal);
        let r = spacing_scale(Spacing::Relaxed);
        assert!(c.section_margin < n.section_margin && n.section_margin < r.section_margin);
        assert!(c.base < n.base && n.base < r.base);
    }

    #[test]
    fn test_compact_widens_container() {
        for layout in [
            LayoutArchetype::Traditional,
            LayoutArchetype::Modern,
            LayoutArchetype::Minimal,
        ] {
            assert!(
                container_box(layout, Spacing::Compact).max_width
                    > container_box(layout, Spacing::Normal).max_width
            );
        }
    }
}
