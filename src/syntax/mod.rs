//! Syntax classification for highlight scoping
//!
//! The decoration builder asks a `SyntaxOracle` which nodes enclose a
//! position. Node kind names differ between parsers (tree-sitter-md,
//! HyperMD-style editor tokens, ...), so they are reduced to a closed
//! `NodeCategory` by one function and nothing else matches on raw names.
//!
//! ## Architecture
//!
//! ```text
//! buffer text → MarkdownParser (tree-sitter-md, incremental)
//!             → SyntaxTree (arena, implements SyntaxOracle)
//!             → ContextClassifier → DecorationBuilder
//! ```

mod parser;
mod tree;

use std::ops::Range;

pub use parser::MarkdownParser;
pub use tree::{NodeId, SyntaxTree, SyntaxTreeBuilder};

/// What a syntax node means for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Fenced or indented code block, or a line of one
    CodeBlock,
    /// Hashtag token in the body
    Tag,
    /// Tag string inside the frontmatter
    FrontmatterTag,
    /// A whole frontmatter block, or a content line of it
    Frontmatter,
    /// A frontmatter delimiter line (`---`)
    FrontmatterMarker,
    Other,
}

impl NodeCategory {
    /// Classify a node kind name
    pub fn classify(kind: &str) -> Self {
        let kind = kind.to_ascii_lowercase();

        if kind.contains("frontmatter") || kind.contains("metadata") {
            return if kind.contains("tag") {
                NodeCategory::FrontmatterTag
            } else if kind.starts_with("def") || kind.contains("marker") {
                NodeCategory::FrontmatterMarker
            } else {
                NodeCategory::Frontmatter
            };
        }

        if kind == "tag" || kind.contains("hashtag") {
            return NodeCategory::Tag;
        }

        if kind.contains("codeblock")
            || kind.contains("code_block")
            || kind.contains("code-block")
            || kind.contains("code_fence")
        {
            return NodeCategory::CodeBlock;
        }

        NodeCategory::Other
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, NodeCategory::Tag | NodeCategory::FrontmatterTag)
    }
}

/// Lazily queryable view of a syntax tree covering the buffer
///
/// Positions are byte offsets. Implementations may return `None` from
/// `resolve_node_at` when they have no tree yet; callers treat that as "no
/// special context".
pub trait SyntaxOracle {
    type Node: Copy;

    /// Innermost node containing `pos`
    fn resolve_node_at(&self, pos: usize) -> Option<Self::Node>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn kind(&self, node: Self::Node) -> &str;

    fn span(&self, node: Self::Node) -> Range<usize>;

    /// Visit every node in document order until `visit` returns `false`
    fn iterate(&self, visit: &mut dyn FnMut(Self::Node) -> bool);

    fn category(&self, node: Self::Node) -> NodeCategory {
        NodeCategory::classify(self.kind(node))
    }

    /// Whether any node from the innermost at `pos` up to the root satisfies `pred`
    fn any_ancestor(&self, pos: usize, pred: &dyn Fn(NodeCategory) -> bool) -> bool {
        let mut current = self.resolve_node_at(pos);
        while let Some(node) = current {
            if pred(self.category(node)) {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
}

/// Oracle for buffers without a syntax tree: nothing is ever special
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl SyntaxOracle for PlainText {
    type Node = ();

    fn resolve_node_at(&self, _pos: usize) -> Option<()> {
        None
    }

    fn parent(&self, _node: ()) -> Option<()> {
        None
    }

    fn kind(&self, _node: ()) -> &str {
        ""
    }

    fn span(&self, _node: ()) -> Range<usize> {
        0..0
    }

    fn iterate(&self, _visit: &mut dyn FnMut(()) -> bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tree_sitter_kinds() {
        assert_eq!(
            NodeCategory::classify("fenced_code_block"),
            NodeCategory::CodeBlock
        );
        assert_eq!(
            NodeCategory::classify("indented_code_block"),
            NodeCategory::CodeBlock
        );
        assert_eq!(
            NodeCategory::classify("code_fence_content"),
            NodeCategory::CodeBlock
        );
        assert_eq!(
            NodeCategory::classify("minus_metadata"),
            NodeCategory::Frontmatter
        );
        assert_eq!(NodeCategory::classify("paragraph"), NodeCategory::Other);
    }

    #[test]
    fn test_classify_editor_token_kinds() {
        assert_eq!(
            NodeCategory::classify("HyperMD-codeblock_HyperMD-codeblock-bg"),
            NodeCategory::CodeBlock
        );
        assert_eq!(
            NodeCategory::classify("formatting_formatting-hashtag_hashtag_hashtag-begin"),
            NodeCategory::Tag
        );
        assert_eq!(
            NodeCategory::classify("def_hmd-frontmatter"),
            NodeCategory::FrontmatterMarker
        );
        assert_eq!(
            NodeCategory::classify("hmd-frontmatter_string_tag"),
            NodeCategory::FrontmatterTag
        );
        assert_eq!(
            NodeCategory::classify("hmd-frontmatter"),
            NodeCategory::Frontmatter
        );
    }

    #[test]
    fn test_plain_text_has_no_context() {
        assert!(!PlainText.any_ancestor(3, &|_| true));
    }
}
