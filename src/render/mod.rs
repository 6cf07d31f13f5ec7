//! Static rendering: highlight literals in an already rendered tree
//!
//! ```text
//! markdown ──► markdown_to_dom ──► Vec<Node> ──► StaticRenderer::render ──┐
//!                                                                         │
//!                 page_html ◄── DeferredCodeBlockPass::run (pre/code) ◄───┘
//! ```
//!
//! The first pass walks everything except `<pre>` subtrees. Code blocks are
//! rescanned by a second pass scheduled `CODE_BLOCK_PASS_DELAY` later, after
//! the host's own code highlighting has replaced their contents. Processed
//! literals are wrapped in `span.color-literal`, which both passes skip, so
//! running either pass again never wraps a literal twice.

pub mod dom;
mod markdown;
mod page;

use std::time::{Duration, Instant};

pub use dom::{to_html, Element, Node};
pub use markdown::{markdown_to_dom, MarkdownOptions};
pub use page::{page_html, PageTheme};

use crate::color::{blend, parse_css_color, Rgb};
use crate::config::Settings;
use crate::context::{Context, ScopePolicy};
use crate::decoration::{decorate, Annotation, SwatchWidget};
use crate::pattern;
use crate::theme::ThemeKind;

/// Delay between the first pass and the code-block pass
pub const CODE_BLOCK_PASS_DELAY: Duration = Duration::from_millis(100);

/// Wrapper class of every processed literal
pub const LITERAL_CLASS: &str = "color-literal";

const SKIPPED_CLASSES: &[&str] = &[LITERAL_CLASS, "color-highlight", "color-square"];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "ul", "ol", "li", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6", "table",
    "thead", "tbody", "tr", "td", "th", "pre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub highlighted: usize,
    pub flattened: usize,
}

impl RenderReport {
    fn absorb(&mut self, other: RenderReport) {
        self.highlighted += other.highlighted;
        self.flattened += other.flattened;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Everything outside `<pre>`
    Prose,
    /// Only `<pre>` subtrees
    CodeBlocks,
}

/// Lexical context and background inherited down the tree
#[derive(Debug, Clone, Copy)]
struct DomContext {
    context: Context,
    in_pre: bool,
    background: Rgb,
}

/// Inline query results are rendered as blocks by their plugin but must read
/// as part of the surrounding line
pub fn is_inline_query(element: &Element) -> bool {
    element.has_class("dataview-inline-query")
        || (element.has_class("dataview") && element.has_class("inline"))
}

/// Collapse an element to a single inline line
///
/// Block descendants become spans, line breaks become spaces and runs of
/// whitespace collapse to one space.
pub fn flatten_inline(element: &mut Element) {
    if BLOCK_TAGS.iter().any(|t| element.is(t)) {
        element.tag = "span".to_string();
    }
    for child in &mut element.children {
        match child {
            Node::Element(e) if e.is("br") => *child = Node::text(" "),
            Node::Element(e) => flatten_inline(e),
            Node::Text(t) => *t = collapse_whitespace(t),
            Node::Raw(_) => {}
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

/// Non-interactive highlighter over a rendered tree
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    settings: Settings,
    theme: ThemeKind,
}

impl StaticRenderer {
    pub fn new(settings: Settings, theme: ThemeKind) -> Self {
        Self { settings, theme }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// First pass: everything except code blocks
    pub fn render(&self, nodes: &mut Vec<Node>, file_path: Option<&str>) -> RenderReport {
        if self.is_excluded(file_path) {
            return RenderReport::default();
        }
        let report = self.walk(nodes, self.root_context(), Pass::Prose);
        tracing::debug!(
            highlighted = report.highlighted,
            flattened = report.flattened,
            "Static render pass complete"
        );
        report
    }

    /// Schedule the code-block pass, `None` for excluded files
    pub fn defer_code_blocks(
        &self,
        now: Instant,
        file_path: Option<&str>,
    ) -> Option<DeferredCodeBlockPass> {
        if self.is_excluded(file_path) {
            return None;
        }
        Some(DeferredCodeBlockPass {
            due: now + CODE_BLOCK_PASS_DELAY,
            renderer: self.clone(),
        })
    }

    /// Both passes back to back, for exports with no host highlighter
    pub fn render_document(&self, nodes: &mut Vec<Node>, file_path: Option<&str>) -> RenderReport {
        let mut report = self.render(nodes, file_path);
        if let Some(deferred) = self.defer_code_blocks(Instant::now(), file_path) {
            report.absorb(deferred.run(nodes));
        }
        report
    }

    fn is_excluded(&self, file_path: Option<&str>) -> bool {
        match file_path {
            Some(path) if self.settings.is_excluded(path) => {
                tracing::debug!(path, "File excluded from static highlighting");
                true
            }
            _ => false,
        }
    }

    fn root_context(&self) -> DomContext {
        DomContext {
            context: Context::default(),
            in_pre: false,
            background: self.theme.fallback_background(),
        }
    }

    fn child_context(&self, element: &Element, parent: &DomContext) -> DomContext {
        let mut ctx = *parent;
        if element.is("pre") {
            ctx.in_pre = true;
            ctx.context.code_block = true;
        }
        if element.is("code") && !ctx.in_pre {
            ctx.context.inline_code = true;
        }
        if element.has_class("tag") {
            ctx.context.tag = true;
        }
        if element.has_class("frontmatter") {
            ctx.context.frontmatter = true;
        }
        if let Some(color) = element.background_css().and_then(parse_css_color) {
            if !color.is_transparent() {
                ctx.background = blend(color, parent.background);
            }
        }
        ctx
    }

    fn walk(&self, nodes: &mut Vec<Node>, ctx: DomContext, pass: Pass) -> RenderReport {
        let mut report = RenderReport::default();
        let policy = ScopePolicy::from_settings(&self.settings);
        let scan_here = match pass {
            Pass::Prose => !ctx.in_pre,
            Pass::CodeBlocks => ctx.in_pre,
        } && policy.admits(&ctx.context);

        let mut i = 0;
        while i < nodes.len() {
            match &mut nodes[i] {
                Node::Element(element) => {
                    if element.is("svg") || SKIPPED_CLASSES.iter().any(|c| element.has_class(c)) {
                        i += 1;
                        continue;
                    }
                    if pass == Pass::Prose && element.is("pre") {
                        i += 1;
                        continue;
                    }
                    if pass == Pass::Prose && is_inline_query(element) {
                        flatten_inline(element);
                        report.flattened += 1;
                    }
                    let child_ctx = self.child_context(element, &ctx);
                    report.absorb(self.walk(&mut element.children, child_ctx, pass));
                    i += 1;
                }
                Node::Text(text) if scan_here => {
                    let (fragment, count) = self.highlight_text(text, ctx.background);
                    if count == 0 {
                        i += 1;
                        continue;
                    }
                    report.highlighted += count;
                    let len = fragment.len();
                    nodes.splice(i..i + 1, fragment);
                    i += len;
                }
                _ => i += 1,
            }
        }
        report
    }

    /// Split a text node around its literals
    fn highlight_text(&self, text: &str, background: Rgb) -> (Vec<Node>, usize) {
        let mut out = Vec::new();
        let mut last = 0;
        let mut count = 0;

        for m in pattern::matches(text, 0) {
            let decoration = decorate(&m, background, &self.settings);
            if m.start > last {
                out.push(Node::text(&text[last..m.start]));
            }

            let mut wrapper = Element::new("span")
                .with_attr("class", LITERAL_CLASS)
                .with_attr("data-color", m.literal.as_str());
            let mut cursor = m.start;
            for annotation in decoration.annotations() {
                match annotation {
                    Annotation::Widget { widget, .. } => wrapper.children.push(swatch(&widget)),
                    Annotation::Mark {
                        start,
                        end,
                        attributes,
                    } => {
                        if start > cursor {
                            wrapper.children.push(Node::text(&text[cursor..start]));
                        }
                        let mut mark = Element::new("span").with_text(&text[start..end]);
                        for (name, value) in attributes {
                            mark.set_attr(name, value);
                        }
                        wrapper.children.push(mark.into());
                        cursor = end;
                    }
                }
            }
            if !decoration.style.has_mark() {
                let insert_at = usize::from(
                    decoration
                        .widget
                        .as_ref()
                        .is_some_and(|w| w.position == m.start),
                );
                wrapper
                    .children
                    .insert(insert_at, Node::text(&text[m.start..m.end]));
            }

            out.push(wrapper.into());
            last = m.end;
            count += 1;
        }

        if count > 0 && last < text.len() {
            out.push(Node::text(&text[last..]));
        }
        (out, count)
    }
}

fn swatch(widget: &SwatchWidget) -> Node {
    Element::new("span")
        .with_attr("class", widget.class_names().join(" "))
        .with_attr("style", widget.style_attribute())
        .with_attr("data-color-id", widget.decoration_id.to_string())
        .with_attr("title", widget.literal.as_str())
        .into()
}

/// The code-block pass, due `CODE_BLOCK_PASS_DELAY` after scheduling
#[derive(Debug, Clone)]
pub struct DeferredCodeBlockPass {
    due: Instant,
    renderer: StaticRenderer,
}

impl DeferredCodeBlockPass {
    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    pub fn run(&self, nodes: &mut Vec<Node>) -> RenderReport {
        let report = self
            .renderer
            .walk(nodes, self.renderer.root_context(), Pass::CodeBlocks);
        tracing::debug!(
            highlighted = report.highlighted,
            "Code block pass complete"
        );
        report
    }
}
