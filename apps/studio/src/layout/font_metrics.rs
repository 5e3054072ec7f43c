//! Static glyph-width tables for the three resume font families.
//!
//! Widths are in em units, so a measurement scales with whatever font size the
//! caller renders at. The tables are approximations: good enough to estimate line
//! wraps and section heights for page counting and motion offsets, never used to
//! decide what content is shown. Tables cover ASCII 0x20..=0x7E; index is
//! `(char as usize) - 32`.

use crate::models::style::FontFamily;

pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Rendered width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Lines `text` occupies when greedily word-wrapped at `line_width_em`.
    /// Empty text occupies no lines.
    pub fn estimated_lines(&self, text: &str, line_width_em: f32) -> u32 {
        let mut words = text.split_whitespace();
        let Some(first) = words.next() else {
            return 0;
        };
        let mut lines = 1u32;
        let mut current = self.measure_str(first);

        for word in words {
            let word_w = self.measure_str(word);
            if current + self.space_width + word_w > line_width_em {
                lines += 1;
                current = word_w;
            } else {
                current += self.space_width + word_w;
            }
        }
        lines
    }
}

/// Humanist sans-serif (Inter and the system UI stack).
static SANS_SERIF_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// Book serif (Georgia, Times). Roughly 90% of the sans-serif widths.
static SERIF_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.23, 0.27, 0.34, 0.50, 0.50, 0.80, 0.60, 0.20, 0.30, 0.30, 0.35, 0.53, 0.25, 0.30, 0.25, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50,
        // :     ;     <     =     >     ?     @
        0.25, 0.25, 0.53, 0.53, 0.53, 0.45, 0.92,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.60, 0.55, 0.55, 0.60, 0.50, 0.45, 0.60, 0.60, 0.23, 0.35, 0.55, 0.48, 0.70,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.60, 0.65, 0.50, 0.65, 0.55, 0.45, 0.50, 0.60, 0.60, 0.80, 0.55, 0.55, 0.50,
        // [     \     ]     ^     _     `
        0.25, 0.28, 0.25, 0.42, 0.50, 0.31,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.50, 0.50, 0.45, 0.50, 0.50, 0.28, 0.50, 0.50, 0.20, 0.20, 0.48, 0.20, 0.75,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.50, 0.50, 0.50, 0.50, 0.30, 0.40, 0.35, 0.50, 0.45, 0.65, 0.45, 0.45, 0.40,
        // {     |     }     ~
        0.30, 0.23, 0.30, 0.53,
    ],
    average_char_width: 0.47,
    space_width: 0.23,
};

static MONOSPACE_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.60; 95],
    average_char_width: 0.60,
    space_width: 0.60,
};

pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::SansSerif => &SANS_SERIF_TABLE,
        FontFamily::Serif => &SERIF_TABLE,
        FontFamily::Monospace => &MONOSPACE_TABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(FontFamily::SansSerif).measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFamily::SansSerif);
        // R(0.61) + u(0.56) + s(0.44) + t(0.39)
        let width = metrics.measure_str("Rust");
        assert!((width - 2.00).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = get_metrics(FontFamily::Serif);
        assert!((metrics.measure_str("é") - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_monospace_is_uniform() {
        let metrics = get_metrics(FontFamily::Monospace);
        assert!((metrics.measure_str("iiii") - metrics.measure_str("WWWW")).abs() < 1e-4);
    }

    #[test]
    fn test_estimated_lines_wraps_long_text() {
        let metrics = get_metrics(FontFamily::SansSerif);
        assert_eq!(metrics.estimated_lines("", 40.0), 0);
        assert_eq!(metrics.estimated_lines("Rust", 40.0), 1);
        let long = "word ".repeat(40);
        assert!(metrics.estimated_lines(&long, 40.0) >= 3);
    }

    #[test]
    fn test_serif_narrower_than_sans() {
        let text = "Architected distributed caching layer";
        assert!(
            get_metrics(FontFamily::Serif).measure_str(text)
                < get_metrics(FontFamily::SansSerif).measure_str(text)
        );
    }
}
