//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::ops::Range;

use colorlens::color::Rgb;
use colorlens::config::{HighlightStyle, Settings};
use colorlens::decoration::{DecorationBuilder, DecorationSet};
use colorlens::syntax::{SyntaxTree, SyntaxTreeBuilder};

pub const WHITE: Rgb = Rgb::WHITE;
pub const DARK: Rgb = Rgb::new(30, 30, 30);

pub fn everywhere() -> Settings {
    Settings::default()
}

pub fn backticks_only() -> Settings {
    let mut s = Settings::default();
    s.set_highlight_in_backticks(true);
    s
}

pub fn codeblocks_only() -> Settings {
    let mut s = Settings::default();
    s.set_highlight_in_codeblocks(true);
    s
}

pub fn with_style(style: HighlightStyle) -> Settings {
    Settings {
        highlight_style: style,
        ..Settings::default()
    }
}

/// Decorate the whole of `text` with a real markdown parse
pub fn decorate_markdown(text: &str, settings: Settings, background: Rgb) -> DecorationSet {
    let tree = SyntaxTree::parse_markdown(text);
    decorate_with_tree(text, &tree, settings, background)
}

/// Decorate `text` against a hand-built tree
pub fn decorate_with_tree(
    text: &str,
    tree: &SyntaxTree,
    settings: Settings,
    background: Rgb,
) -> DecorationSet {
    let mut builder = DecorationBuilder::new(settings);
    builder
        .build(text, tree, [0..text.len()], None, background)
        .clone()
}

pub fn literals(set: &DecorationSet) -> Vec<String> {
    set.iter().map(|d| d.literal.clone()).collect()
}

/// Byte range of the first occurrence of `needle`
pub fn span_of(text: &str, needle: &str) -> Range<usize> {
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not in text", needle));
    start..start + needle.len()
}

/// A document node covering `text` with the given children (kind, span)
pub fn tree_with(text: &str, children: &[(&str, Range<usize>)]) -> SyntaxTree {
    let mut b = SyntaxTreeBuilder::new();
    let root = b.push("document", 0..text.len(), None);
    for (kind, span) in children {
        b.push(kind, span.clone(), Some(root));
    }
    b.finish()
}
