//! Lexical context of a candidate literal
//!
//! Answers "is this position in inline code / a code block / a tag /
//! frontmatter" and composes the answers with the user's scope settings.

use std::ops::RangeInclusive;

use crate::config::Settings;
use crate::syntax::{NodeCategory, SyntaxOracle};
use crate::text::TextSource;

/// Everything the scope policy needs to know about one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    pub inline_code: bool,
    pub code_block: bool,
    pub tag: bool,
    pub frontmatter: bool,
}

impl Context {
    /// Tags and frontmatter are never highlighted, whatever the scope
    pub fn is_vetoed(&self) -> bool {
        self.tag || self.frontmatter
    }
}

/// Snapshot of the three scope flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopePolicy {
    pub everywhere: bool,
    pub in_backticks: bool,
    pub in_codeblocks: bool,
}

impl ScopePolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            everywhere: settings.highlight_everywhere,
            in_backticks: settings.highlight_in_backticks,
            in_codeblocks: settings.highlight_in_codeblocks,
        }
    }

    /// Scope check alone, without the tag/frontmatter vetoes
    pub fn should_highlight(&self, ctx: &Context) -> bool {
        if self.everywhere {
            return true;
        }
        (self.in_backticks && ctx.inline_code) || (self.in_codeblocks && ctx.code_block)
    }

    /// Scope check with vetoes applied on top
    pub fn admits(&self, ctx: &Context) -> bool {
        !ctx.is_vetoed() && self.should_highlight(ctx)
    }
}

/// Classifier for one build pass over one buffer
///
/// The frontmatter span is located once at construction.
pub struct ContextClassifier<'a, T: TextSource + ?Sized, O: SyntaxOracle> {
    text: &'a T,
    oracle: &'a O,
    frontmatter: Option<RangeInclusive<usize>>,
}

impl<'a, T: TextSource + ?Sized, O: SyntaxOracle> ContextClassifier<'a, T, O> {
    pub fn new(text: &'a T, oracle: &'a O) -> Self {
        Self {
            text,
            oracle,
            frontmatter: frontmatter_range(oracle),
        }
    }

    pub fn frontmatter(&self) -> Option<&RangeInclusive<usize>> {
        self.frontmatter.as_ref()
    }

    /// An odd number of backticks earlier on the same line means `pos` is
    /// inside an inline code span. Backtick runs are not paired and each line
    /// is counted on its own.
    pub fn in_inline_code(&self, pos: usize) -> bool {
        let line_start = self.text.line_start(pos);
        let before = self.text.slice(line_start..pos);
        before.bytes().filter(|&b| b == b'`').count() % 2 == 1
    }

    pub fn in_code_block(&self, pos: usize) -> bool {
        self.oracle
            .any_ancestor(pos, &|c| c == NodeCategory::CodeBlock)
    }

    pub fn in_tag(&self, pos: usize) -> bool {
        self.oracle.any_ancestor(pos, &|c| c.is_tag())
    }

    pub fn in_frontmatter(&self, pos: usize) -> bool {
        self.frontmatter
            .as_ref()
            .is_some_and(|range| range.contains(&pos))
    }

    pub fn classify(&self, pos: usize) -> Context {
        Context {
            inline_code: self.in_inline_code(pos),
            code_block: self.in_code_block(pos),
            tag: self.in_tag(pos),
            frontmatter: self.in_frontmatter(pos),
        }
    }
}

/// Locate the document's frontmatter
///
/// The span runs from the first to the second delimiter node. Parsers that
/// produce one node for the whole block instead (tree-sitter's
/// `minus_metadata`) are used when no delimiter pair exists.
pub fn frontmatter_range<O: SyntaxOracle>(oracle: &O) -> Option<RangeInclusive<usize>> {
    let mut markers: Vec<usize> = Vec::with_capacity(2);
    let mut marker_end = 0;
    let mut block = None;

    oracle.iterate(&mut |node| {
        match oracle.category(node) {
            NodeCategory::FrontmatterMarker => {
                let span = oracle.span(node);
                markers.push(span.start);
                marker_end = span.end;
                if markers.len() == 2 {
                    return false;
                }
            }
            NodeCategory::Frontmatter if block.is_none() => {
                block = Some(oracle.span(node));
            }
            _ => {}
        }
        true
    });

    if markers.len() == 2 {
        return Some(markers[0]..=marker_end);
    }
    block.map(|span| span.start..=span.end)
}
