//! Decoration pass tests
//!
//! Covers scoping against real and hand-built trees, styling per highlight
//! style, visible-range handling and emission into sinks.

mod common;

use colorlens::color::{ContrastClass, Rgb};
use colorlens::config::{HighlightStyle, Settings, SquarePosition};
use colorlens::decoration::{
    Annotation, AnnotationList, DecorationBuilder, DecorationSink, DecorationStyle,
    SwatchWidget, MIN_LEGIBLE_RATIO,
};
use colorlens::error::SinkError;
use colorlens::syntax::{PlainText, SyntaxTree};
use common::*;
use ropey::Rope;

const NOTE: &str = "\
Palette `#ff0000` and rgb(0, 128, 0).

```css
.a { color: #0000ff; }
```

Tail hsl(0, 100%, 50%)
";

// ========================================================================
// Scoping
// ========================================================================

#[test]
fn test_everywhere_highlights_all() {
    let set = decorate_markdown(NOTE, everywhere(), WHITE);
    assert_eq!(
        literals(&set),
        vec!["#ff0000", "rgb(0, 128, 0)", "#0000ff", "hsl(0, 100%, 50%)"]
    );
}

#[test]
fn test_backticks_only_skips_fenced_block() {
    let set = decorate_markdown(NOTE, backticks_only(), WHITE);
    assert_eq!(literals(&set), vec!["#ff0000"]);
}

#[test]
fn test_codeblocks_only() {
    let set = decorate_markdown(NOTE, codeblocks_only(), WHITE);
    assert_eq!(literals(&set), vec!["#0000ff"]);
}

#[test]
fn test_both_scoped_modes() {
    let mut settings = backticks_only();
    settings.set_highlight_in_codeblocks(true);
    let set = decorate_markdown(NOTE, settings, WHITE);
    assert_eq!(literals(&set), vec!["#ff0000", "#0000ff"]);
}

#[test]
fn test_frontmatter_tag_veto() {
    let text = "---\ntags: [\"#abc\"]\n---\n#abc";
    let tag = span_of(text, "#abc");
    let tree = tree_with(text, &[("frontmatter_tag", tag)]);
    let set = decorate_with_tree(text, &tree, everywhere(), WHITE);

    // Only the body literal survives
    assert_eq!(set.len(), 1);
    let d = set.iter().next().unwrap();
    assert_eq!(d.match_range.start, text.rfind("#abc").unwrap());
}

#[test]
fn test_frontmatter_block_veto() {
    let text = "---\ncolor: '#123456'\n---\nbody #654321\n";
    let block = 0..span_of(text, "\n---\n").end;
    let tree = tree_with(text, &[("minus_metadata", block)]);
    let set = decorate_with_tree(text, &tree, everywhere(), WHITE);
    assert_eq!(literals(&set), vec!["#654321"]);
}

#[test]
fn test_body_hashtag_veto_from_real_parse() {
    let text = "note #abc tagged\n\nsee `#abc` and rgb(1, 2, 3)\n";
    let set = decorate_markdown(text, everywhere(), WHITE);
    assert_eq!(literals(&set), vec!["#abc", "rgb(1, 2, 3)"]);
    assert!(set.decoration_at(span_of(text, "#abc").start).is_none());
}

#[test]
fn test_excluded_file_gets_nothing() {
    let settings = Settings {
        excluded_files: vec!["notes/palette.md".to_string()],
        ..Settings::default()
    };
    let mut builder = DecorationBuilder::new(settings);
    let text = "#fff";
    assert!(builder
        .build(text, &PlainText, [0..4], Some("vault/notes/palette.md"), WHITE)
        .is_empty());
    assert_eq!(
        builder
            .build(text, &PlainText, [0..4], Some("vault/other.md"), WHITE)
            .len(),
        1
    );
}

// ========================================================================
// Visible ranges
// ========================================================================

#[test]
fn test_overlapping_ranges_are_deduplicated() {
    let text = "#111 #222 #333 #444";
    let mut builder = DecorationBuilder::new(everywhere());
    let set = builder.build(text, &PlainText, [10..19, 0..12, 3..11], None, WHITE);
    let starts: Vec<usize> = set.iter().map(|d| d.match_range.start).collect();
    assert_eq!(starts, vec![0, 5, 10, 15]);
}

#[test]
fn test_range_keeps_only_overlapping_literals() {
    let text = "#111 #222";
    let mut builder = DecorationBuilder::new(everywhere());
    // Only "#2" is visible, the whole literal is still decorated
    assert_eq!(literals(builder.build(text, &PlainText, [5..7], None, WHITE)), vec!["#222"]);
    // Out-of-bounds ranges are snapped to the buffer
    assert_eq!(builder.build(text, &PlainText, [5..500], None, WHITE).len(), 1);
}

#[test]
fn test_range_ending_inside_literal_keeps_longest_match() {
    let text = "a #ff000080 z";
    let mut builder = DecorationBuilder::new(everywhere());
    for visible in [vec![0..7, 0..13], vec![0..9]] {
        let set = builder.build(text, &PlainText, visible, None, WHITE);
        assert_eq!(set.len(), 1);
        let d = set.iter().next().unwrap();
        assert_eq!(d.literal, "#ff000080");
        assert_eq!(d.match_range, 2..11);
        assert_eq!(d.effective, Rgb::new(255, 127, 127));
    }
}

#[test]
fn test_range_does_not_reach_other_lines() {
    let text = "#111\n#222\n#333";
    let mut builder = DecorationBuilder::new(everywhere());
    let set = builder.build(text, &PlainText, [6..8], None, WHITE);
    assert_eq!(literals(set), vec!["#222"]);
}

#[test]
fn test_rebuild_replaces_set() {
    let mut builder = DecorationBuilder::new(everywhere());
    builder.build("#111 #222", &PlainText, [0..9], None, WHITE);
    assert_eq!(builder.current().len(), 2);
    builder.build("plain", &PlainText, [0..5], None, WHITE);
    assert!(builder.current().is_empty());
}

#[test]
fn test_rope_buffer() {
    let text = "line one\nnaïve #123456\nrgba(1, 2, 3, 0.5)\n";
    let rope = Rope::from_str(text);
    let tree = SyntaxTree::parse_markdown(text);
    let mut builder = DecorationBuilder::new(everywhere());
    let set = builder.build(&rope, &tree, [0..rope.len_bytes()], None, WHITE);

    let hex = span_of(text, "#123456");
    let rgba = span_of(text, "rgba(1, 2, 3, 0.5)");
    let ranges: Vec<_> = set.iter().map(|d| d.match_range.clone()).collect();
    assert_eq!(ranges, vec![hex, rgba]);
}

// ========================================================================
// Styling
// ========================================================================

#[test]
fn test_hex_mark_starts_after_hash() {
    let text = "x #abcdef rgb(1, 2, 3)";
    let set = decorate_with_tree(text, &SyntaxTree::default(), everywhere(), WHITE);
    let hex = set.decoration_at(2).unwrap();
    assert_eq!(hex.match_range, 2..9);
    assert_eq!((hex.start, hex.end), (3, 9));

    let rgb = set.decoration_at(10).unwrap();
    assert_eq!(rgb.start, rgb.match_range.start);
}

#[test]
fn test_background_style_uses_effective_color() {
    let text = "#ff000080";
    let set = decorate_with_tree(text, &SyntaxTree::default(), everywhere(), WHITE);
    let d = set.iter().next().unwrap();
    assert_eq!(d.effective, Rgb::new(255, 127, 127));
    assert_eq!(d.contrast, ContrastClass::Black);
    match d.style {
        DecorationStyle::Background {
            highlight,
            contrast,
            caret,
            contrast_border,
        } => {
            assert_eq!(highlight, d.effective);
            assert_eq!(contrast, ContrastClass::Black);
            assert_eq!(caret, contrast);
            assert!(!contrast_border);
        }
        other => panic!("Expected background style, got {:?}", other),
    }
}

#[test]
fn test_contrasting_border_near_background() {
    let text = "#fefefe #000000";
    let settings = Settings {
        use_contrasting_border: true,
        ..Settings::default()
    };
    let set = decorate_with_tree(text, &SyntaxTree::default(), settings, WHITE);
    let near = set.decoration_at(0).unwrap();
    let far = set.decoration_at(8).unwrap();
    assert!(near.contrast_ratio < MIN_LEGIBLE_RATIO);
    assert!(near.style.class_names().contains(&"contrast-border"));
    assert!(!far.style.class_names().contains(&"contrast-border"));
}

#[test]
fn test_border_and_underline_styles() {
    let text = "#336699";
    for (style, class) in [
        (HighlightStyle::Border, "color-highlight-border"),
        (HighlightStyle::Underline, "color-highlight-underline"),
    ] {
        let set = decorate_with_tree(text, &SyntaxTree::default(), with_style(style), DARK);
        let d = set.iter().next().unwrap();
        assert!(d.widget.is_none());
        assert!(d.style.class_names().contains(&class));
        assert_eq!(
            d.style.style_attribute(),
            "--highlight-color: rgb(51, 102, 153)"
        );
    }
}

#[test]
fn test_square_widget_positions() {
    let text = "a rgb(1, 2, 3) b";
    let literal = span_of(text, "rgb(1, 2, 3)");

    let mut after = with_style(HighlightStyle::Square);
    after.square_position = SquarePosition::After;
    let set = decorate_with_tree(text, &SyntaxTree::default(), after, WHITE);
    let d = set.iter().next().unwrap();
    let placed = d.widget.as_ref().unwrap();
    assert_eq!(placed.position, literal.end);
    assert_eq!(placed.widget.decoration_id, d.id);
    assert_eq!(set.owner_of_widget(&placed.widget), Some(d));

    let mut before = with_style(HighlightStyle::Square);
    before.square_position = SquarePosition::Before;
    let set = decorate_with_tree(text, &SyntaxTree::default(), before, WHITE);
    let placed = set.iter().next().unwrap().widget.clone().unwrap();
    assert_eq!(placed.position, literal.start);
}

#[test]
fn test_square_style_has_no_mark() {
    let set = decorate_with_tree(
        "#abc",
        &SyntaxTree::default(),
        with_style(HighlightStyle::Square),
        WHITE,
    );
    let annotations = set.annotations();
    assert_eq!(annotations.len(), 1);
    assert!(matches!(annotations[0], Annotation::Widget { position: 4, .. }));
}

// ========================================================================
// Emission
// ========================================================================

#[test]
fn test_emit_into_annotation_list() {
    let text = "#111 and #222";
    let set = decorate_with_tree(text, &SyntaxTree::default(), everywhere(), WHITE);
    let mut sink = AnnotationList::with_doc_len(text.len());
    let report = set.emit(&mut sink);
    assert_eq!((report.emitted, report.skipped), (2, 0));

    let positions: Vec<usize> = sink.annotations().iter().map(|a| a.position()).collect();
    assert_eq!(positions, vec![1, 10]);
}

#[test]
fn test_emit_out_of_bounds_is_skipped() {
    let text = "#111 and #222";
    let set = decorate_with_tree(text, &SyntaxTree::default(), everywhere(), WHITE);
    // A sink for a shorter document rejects the second literal only
    let mut sink = AnnotationList::with_doc_len(6);
    let report = set.emit(&mut sink);
    assert_eq!((report.emitted, report.skipped), (1, 1));
    assert_eq!(sink.len(), 1);
}

/// Sink that refuses every mark over a given offset
struct Refusing {
    refuse_at: usize,
    accepted: Vec<usize>,
}

impl DecorationSink for Refusing {
    fn add_mark(
        &mut self,
        start: usize,
        end: usize,
        _attributes: &[(String, String)],
    ) -> Result<(), SinkError> {
        if start <= self.refuse_at && self.refuse_at < end {
            return Err(SinkError::EmptyRange { start, end });
        }
        self.accepted.push(start);
        Ok(())
    }

    fn add_widget(&mut self, position: usize, _widget: &SwatchWidget) -> Result<(), SinkError> {
        self.accepted.push(position);
        Ok(())
    }
}

#[test]
fn test_rejected_decoration_does_not_abort_pass() {
    let text = "#111 #222 #333";
    let set = decorate_with_tree(text, &SyntaxTree::default(), everywhere(), WHITE);
    let mut sink = Refusing {
        refuse_at: 7,
        accepted: Vec::new(),
    };
    let report = set.emit(&mut sink);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.emitted, 2);
    assert_eq!(sink.accepted, vec![1, 11]);
}
