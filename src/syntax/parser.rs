//! Tree-sitter Markdown parsing
//!
//! Keeps the previous tree and source so each re-parse after an edit is
//! incremental, then copies the result into a `SyntaxTree`.

use tree_sitter::{InputEdit, Parser, Point, Tree};

use super::SyntaxTree;

/// Convert a byte offset to a tree-sitter Point (row, column in bytes)
fn byte_to_point(text: &str, byte_offset: usize) -> Point {
    let mut row = 0usize;
    let mut col = 0usize;

    for &byte in text.as_bytes().iter().take(byte_offset) {
        if byte == b'\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    Point { row, column: col }
}

/// Compute an InputEdit by diffing old and new source text.
/// Returns None if the sources are identical.
fn compute_incremental_edit(old_src: &str, new_src: &str) -> Option<InputEdit> {
    if old_src == new_src {
        return None;
    }

    let old_bytes = old_src.as_bytes();
    let new_bytes = new_src.as_bytes();

    let mut start = 0;
    let max_start = old_bytes.len().min(new_bytes.len());
    while start < max_start && old_bytes[start] == new_bytes[start] {
        start += 1;
    }

    // Common suffix, not overlapping the prefix
    let mut old_end = old_bytes.len();
    let mut new_end = new_bytes.len();
    while old_end > start && new_end > start && old_bytes[old_end - 1] == new_bytes[new_end - 1] {
        old_end -= 1;
        new_end -= 1;
    }

    Some(InputEdit {
        start_byte: start,
        old_end_byte: old_end,
        new_end_byte: new_end,
        start_position: byte_to_point(old_src, start),
        old_end_position: byte_to_point(old_src, old_end),
        new_end_position: byte_to_point(new_src, new_end),
    })
}

/// Arena copy of `tree` with hashtag nodes from `source` added
fn to_syntax_tree(tree: &Tree, source: &str) -> SyntaxTree {
    let mut syntax = SyntaxTree::from_tree_sitter(tree);
    syntax.mark_hashtags(source);
    syntax
}

/// Previous parse kept for incremental re-parsing
struct CachedParse {
    tree: Tree,
    source: String,
}

/// Markdown parser with incremental re-parse between calls
pub struct MarkdownParser {
    parser: Option<Parser>,
    cache: Option<CachedParse>,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        let parser = match parser.set_language(&tree_sitter_md::LANGUAGE.into()) {
            Ok(()) => Some(parser),
            Err(e) => {
                tracing::error!("Failed to set Markdown language: {}", e);
                None
            }
        };
        Self {
            parser,
            cache: None,
        }
    }

    /// Parse `source`, reusing the previous tree when possible
    ///
    /// Returns an empty tree if parsing is unavailable; the classifier then
    /// sees no code blocks or frontmatter rather than failing the pass.
    pub fn parse(&mut self, source: &str) -> SyntaxTree {
        let Some(parser) = self.parser.as_mut() else {
            return SyntaxTree::default();
        };

        let old_tree = match self.cache.as_mut() {
            Some(cached) => match compute_incremental_edit(&cached.source, source) {
                Some(edit) => {
                    tracing::trace!(
                        "Incremental parse: edit at byte {}..{} -> {}..{}",
                        edit.start_byte,
                        edit.old_end_byte,
                        edit.start_byte,
                        edit.new_end_byte
                    );
                    cached.tree.edit(&edit);
                    Some(&cached.tree)
                }
                None => {
                    tracing::trace!("Source unchanged, reusing cached tree");
                    return to_syntax_tree(&cached.tree, source);
                }
            },
            None => None,
        };

        let tree = match parser.parse(source, old_tree) {
            Some(tree) => tree,
            None => {
                tracing::warn!("Incremental parse failed, falling back to full parse");
                match parser.parse(source, None) {
                    Some(tree) => tree,
                    None => {
                        tracing::error!("Markdown parse failed");
                        self.cache = None;
                        return SyntaxTree::default();
                    }
                }
            }
        };

        let syntax = to_syntax_tree(&tree, source);
        self.cache = Some(CachedParse {
            tree,
            source: source.to_owned(),
        });
        syntax
    }

    /// Drop the cached tree (e.g. when the view switches files)
    pub fn reset(&mut self) {
        self.cache = None;
    }
}

impl SyntaxTree {
    /// One-shot Markdown parse
    pub fn parse_markdown(source: &str) -> Self {
        MarkdownParser::new().parse(source)
    }
}
