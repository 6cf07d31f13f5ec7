//! Arena syntax tree
//!
//! A parser-independent copy of the nodes the classifier cares about: kind
//! name, byte span and parent link. Built from tree-sitter output or by hand.
//! tree-sitter-md has no hashtag token, so `mark_hashtags` adds those nodes
//! from the text afterwards.

use std::ops::Range;

use super::SyntaxOracle;
use crate::context::ContextClassifier;
use crate::pattern;

/// Index of a node in its `SyntaxTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    kind: String,
    span: Range<usize>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Parsed nodes stored in document (pre-)order, index 0 is the root.
/// Hashtag nodes follow them.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId(0))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Copy a tree-sitter tree into the arena
    pub fn from_tree_sitter(tree: &tree_sitter::Tree) -> Self {
        let mut builder = SyntaxTreeBuilder::default();
        let mut cursor = tree.walk();
        let mut parents: Vec<NodeId> = Vec::new();

        loop {
            let node = cursor.node();
            let id = builder.push(
                node.kind(),
                node.start_byte()..node.end_byte(),
                parents.last().copied(),
            );

            if cursor.goto_first_child() {
                parents.push(id);
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return builder.finish();
                }
                parents.pop();
            }
        }
    }

    /// Add a `hashtag` node under the innermost node of each body hashtag
    ///
    /// Hashtags in code blocks, inline code or frontmatter are skipped.
    pub fn mark_hashtags(&mut self, text: &str) {
        let tags: Vec<(Range<usize>, NodeId)> = {
            let classifier = ContextClassifier::new(text, &*self);
            pattern::hashtags(text)
                .filter(|tag| {
                    let ctx = classifier.classify(tag.start);
                    !(ctx.code_block || ctx.inline_code || ctx.frontmatter)
                })
                .filter_map(|tag| {
                    let parent = self.resolve_node_at(tag.start)?;
                    Some((tag, parent))
                })
                .collect()
        };

        if !tags.is_empty() {
            tracing::trace!(count = tags.len(), "Hashtag nodes added");
        }
        for (span, parent) in tags {
            self.insert_child("hashtag", span, parent);
        }
    }

    /// Attach a node to `parent`, keeping its children ordered by start
    fn insert_child(&mut self, kind: &str, span: Range<usize>, parent: NodeId) {
        let id = NodeId(self.nodes.len());
        let Some(siblings) = self.nodes.get(parent.0).map(|n| &n.children) else {
            return;
        };
        let at = siblings.partition_point(|c| self.nodes[c.0].span.start <= span.start);
        self.nodes.push(NodeData {
            kind: kind.to_string(),
            span,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.insert(at, id);
    }

    fn contains(span: &Range<usize>, pos: usize) -> bool {
        span.start <= pos && pos < span.end
    }
}

impl SyntaxOracle for SyntaxTree {
    type Node = NodeId;

    fn resolve_node_at(&self, pos: usize) -> Option<NodeId> {
        let root = self.root()?;
        let root_span = &self.nodes[root.0].span;
        // The end of the document still belongs to the root
        if !Self::contains(root_span, pos) && pos != root_span.end {
            return None;
        }

        let mut current = root;
        'descend: loop {
            for &child in &self.nodes[current.0].children {
                if Self::contains(&self.nodes[child.0].span, pos) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn kind(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map_or("", |n| n.kind.as_str())
    }

    fn span(&self, node: NodeId) -> Range<usize> {
        self.nodes.get(node.0).map_or(0..0, |n| n.span.clone())
    }

    fn iterate(&self, visit: &mut dyn FnMut(NodeId) -> bool) {
        for i in 0..self.nodes.len() {
            if !visit(NodeId(i)) {
                break;
            }
        }
    }
}

/// Incremental construction of a `SyntaxTree`
///
/// Nodes must be pushed in document order, parents before children.
#[derive(Debug, Default)]
pub struct SyntaxTreeBuilder {
    nodes: Vec<NodeData>,
}

impl SyntaxTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; `parent` is `None` only for the root
    pub fn push(&mut self, kind: &str, span: Range<usize>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: kind.to_string(),
            span,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            if let Some(data) = self.nodes.get_mut(parent.0) {
                data.children.push(id);
            }
        }
        id
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}
