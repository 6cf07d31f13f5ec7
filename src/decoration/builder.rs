//! Decoration pass: scan visible ranges, filter by context, style survivors

use std::cmp::Reverse;
use std::ops::Range;

use super::{Decoration, DecorationId, DecorationSet, DecorationStyle, PlacedWidget, SwatchWidget};
use crate::color::{contrast_class, contrast_ratio, effective_color, ColorFamily, Rgb};
use crate::config::{HighlightStyle, Settings, SquarePosition};
use crate::context::{ContextClassifier, ScopePolicy};
use crate::pattern::{self, ColorMatch};
use crate::syntax::SyntaxOracle;
use crate::text::{snap_range, TextSource};

/// Below this contrast ratio against the background a highlight gets a
/// visible border (when the user enabled contrasting borders)
pub const MIN_LEGIBLE_RATIO: f64 = 1.25;

/// Scan `visible` ranges of `text` and keep the matches `policy` admits
///
/// Ranges may overlap or arrive unordered; the result is sorted by start
/// offset with duplicates removed. Each range is scanned over its whole
/// lines, so a literal cut by a range edge is still matched in full. Only
/// literals overlapping the range are kept.
pub fn collect_matches<T, O>(
    text: &T,
    oracle: &O,
    visible: impl IntoIterator<Item = Range<usize>>,
    policy: &ScopePolicy,
) -> Vec<ColorMatch>
where
    T: TextSource + ?Sized,
    O: SyntaxOracle,
{
    let classifier = ContextClassifier::new(text, oracle);
    let mut survivors = Vec::new();

    for range in visible {
        let range = snap_range(text, range);
        if range.is_empty() {
            continue;
        }
        // Literals never span lines
        let line_start = text.line_start(range.start);
        let line_end = text.line_end(range.end).max(range.end);
        let slice = text.slice(line_start..line_end);
        for m in pattern::matches(&slice, line_start) {
            if m.end <= range.start || m.start >= range.end {
                continue;
            }
            let ctx = classifier.classify(m.start);
            if policy.admits(&ctx) {
                survivors.push(m);
            } else {
                tracing::trace!(literal = %m.literal, start = m.start, ?ctx, "Match filtered");
            }
        }
    }

    // Longest match first so the dedup keeps it
    survivors.sort_by_key(|m| (m.start, Reverse(m.end)));
    survivors.dedup_by(|a, b| a.start == b.start);
    survivors
}

/// Style one surviving match against the resolved background
pub fn decorate(m: &ColorMatch, background: Rgb, settings: &Settings) -> Decoration {
    let id = DecorationId {
        start: m.start,
        end: m.end,
    };
    let effective = effective_color(&m.literal, background);
    let contrast = contrast_class(effective);
    let ratio = contrast_ratio(effective, background);
    let contrast_border = settings.use_contrasting_border && ratio < MIN_LEGIBLE_RATIO;

    let (style, widget) = match settings.highlight_style {
        HighlightStyle::Background => (
            DecorationStyle::Background {
                highlight: effective,
                contrast,
                caret: contrast,
                contrast_border,
            },
            None,
        ),
        HighlightStyle::Border => (DecorationStyle::Border { highlight: effective }, None),
        HighlightStyle::Underline => (DecorationStyle::Underline { highlight: effective }, None),
        HighlightStyle::Square => {
            let position = match settings.square_position {
                SquarePosition::Before => m.start,
                SquarePosition::After => m.end,
            };
            let widget = SwatchWidget {
                decoration_id: id,
                literal: m.literal.clone(),
                color: effective,
                background,
                side: settings.square_position,
                contrast_border,
                scale_with_text: settings.scale_square_with_text,
                picker_enabled: settings.enable_color_picker,
            };
            (DecorationStyle::Square, Some(PlacedWidget { position, widget }))
        }
    };

    let is_hex = ColorFamily::of(&m.literal).is_some_and(|f| f.is_hex());
    let start = if is_hex { m.start + 1 } else { m.start };

    Decoration {
        id,
        match_range: m.start..m.end,
        literal: m.literal.clone(),
        start,
        end: m.end,
        background,
        effective,
        contrast,
        contrast_ratio: ratio,
        style,
        widget,
    }
}

/// Owns the current decoration set of one view
///
/// Every `build` replaces the set wholesale.
#[derive(Debug, Clone, Default)]
pub struct DecorationBuilder {
    settings: Settings,
    current: DecorationSet,
}

impl DecorationBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            current: DecorationSet::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn current(&self) -> &DecorationSet {
        &self.current
    }

    pub fn clear(&mut self) {
        self.current = DecorationSet::default();
    }

    /// Rebuild decorations for the visible ranges of `text`
    pub fn build<T, O>(
        &mut self,
        text: &T,
        oracle: &O,
        visible: impl IntoIterator<Item = Range<usize>>,
        file_path: Option<&str>,
        background: Rgb,
    ) -> &DecorationSet
    where
        T: TextSource + ?Sized,
        O: SyntaxOracle,
    {
        if let Some(path) = file_path.filter(|p| self.settings.is_excluded(p)) {
            tracing::debug!(path, "File excluded from highlighting");
            self.clear();
            return &self.current;
        }

        let policy = ScopePolicy::from_settings(&self.settings);
        let matches = collect_matches(text, oracle, visible, &policy);
        let decorations = matches
            .iter()
            .map(|m| decorate(m, background, &self.settings))
            .collect();
        self.current = DecorationSet::new(decorations);

        tracing::debug!(
            matches = matches.len(),
            decorations = self.current.len(),
            background = %background.to_hex(),
            "Decoration pass complete"
        );
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::PlainText;

    fn settings_with(style: HighlightStyle) -> Settings {
        Settings {
            highlight_style: style,
            ..Settings::default()
        }
    }

    #[test]
    fn test_hex_styled_span_skips_hash() {
        let m = ColorMatch {
            start: 4,
            end: 11,
            literal: "#ff0000".to_string(),
        };
        let d = decorate(&m, Rgb::WHITE, &Settings::default());
        assert_eq!(d.start, 5);
        assert_eq!(d.match_range, 4..11);
        assert_eq!(d.effective, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_rgb_styled_span_is_whole_match() {
        let m = ColorMatch {
            start: 0,
            end: 15,
            literal: "rgb(10, 20, 30)".to_string(),
        };
        let d = decorate(&m, Rgb::WHITE, &Settings::default());
        assert_eq!(d.start, 0);
    }

    #[test]
    fn test_contrast_border_flag_needs_setting() {
        let m = ColorMatch {
            start: 0,
            end: 7,
            literal: "#fefefe".to_string(),
        };
        let plain = decorate(&m, Rgb::WHITE, &Settings::default());
        assert!(matches!(
            plain.style,
            DecorationStyle::Background {
                contrast_border: false,
                ..
            }
        ));

        let settings = Settings {
            use_contrasting_border: true,
            ..Settings::default()
        };
        let flagged = decorate(&m, Rgb::WHITE, &settings);
        assert!(matches!(
            flagged.style,
            DecorationStyle::Background {
                contrast_border: true,
                ..
            }
        ));
    }

    #[test]
    fn test_square_widget_position() {
        let m = ColorMatch {
            start: 3,
            end: 7,
            literal: "#abc".to_string(),
        };
        let mut settings = settings_with(HighlightStyle::Square);
        let after = decorate(&m, Rgb::WHITE, &settings);
        assert_eq!(after.widget.as_ref().map(|w| w.position), Some(7));

        settings.square_position = SquarePosition::Before;
        let before = decorate(&m, Rgb::WHITE, &settings);
        assert_eq!(before.widget.as_ref().map(|w| w.position), Some(3));
        assert!(!before.style.has_mark());
    }

    #[test]
    fn test_build_respects_exclusions() {
        let settings = Settings {
            excluded_files: vec!["palette.md".to_string()],
            ..Settings::default()
        };
        let mut builder = DecorationBuilder::new(settings);
        let text = "#fff";
        let set = builder.build(text, &PlainText, [0..4], Some("notes/palette.md"), Rgb::WHITE);
        assert!(set.is_empty());
        let set = builder.build(text, &PlainText, [0..4], Some("other.md"), Rgb::WHITE);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_overlapping_ranges_dedup() {
        let text = "a #fff b #000";
        let matches = collect_matches(
            text,
            &PlainText,
            [0..text.len(), 2..text.len()],
            &ScopePolicy {
                everywhere: true,
                ..ScopePolicy::default()
            },
        );
        let starts: Vec<usize> = matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![2, 9]);
    }

    #[test]
    fn test_range_edge_inside_literal_keeps_full_literal() {
        let text = "a #ff000080 z";
        let policy = ScopePolicy {
            everywhere: true,
            ..ScopePolicy::default()
        };
        for visible in [vec![0..7, 0..13], vec![0..9], vec![5..6]] {
            let matches = collect_matches(text, &PlainText, visible, &policy);
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].literal, "#ff000080");
            assert_eq!((matches[0].start, matches[0].end), (2, 11));
        }
    }
}
