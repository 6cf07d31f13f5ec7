//! Markdown to DOM using pulldown-cmark

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::dom::{Element, Node};
use crate::pattern;

/// Knobs for the markdown front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkdownOptions {
    /// Render `#word` in prose as `<a class="tag">`
    pub hashtags: bool,
}

/// Build an open-element stack from pulldown-cmark events
struct DomBuilder {
    roots: Vec<Node>,
    stack: Vec<Element>,
    /// Elements pushed per open markdown tag
    pushed: Vec<usize>,
    in_table_head: bool,
    verbatim_depth: usize,
    options: MarkdownOptions,
}

impl DomBuilder {
    fn new(options: MarkdownOptions) -> Self {
        Self {
            roots: Vec::new(),
            stack: Vec::new(),
            pushed: Vec::new(),
            in_table_head: false,
            verbatim_depth: 0,
            options,
        }
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn open(&mut self, elements: Vec<Element>, verbatim: bool) {
        self.pushed.push(elements.len());
        if verbatim {
            self.verbatim_depth += 1;
        }
        self.stack.extend(elements);
    }

    fn close(&mut self) {
        let count = self.pushed.pop().unwrap_or(0);
        for _ in 0..count {
            let Some(mut element) = self.stack.pop() else {
                break;
            };
            if element.is("pre") || element.has_class("frontmatter") || element.is("a") {
                self.verbatim_depth = self.verbatim_depth.saturating_sub(1);
            }
            if element.is("img") {
                let alt: String = element.children.iter().map(Node::text_content).collect();
                element.children.clear();
                element.set_attr("alt", alt);
            }
            if element.tag.is_empty() {
                for child in element.children {
                    self.append(child);
                }
            } else {
                self.append(Node::Element(element));
            }
        }
    }

    fn text(&mut self, text: &str) {
        if !self.options.hashtags || self.verbatim_depth > 0 {
            self.append(Node::text(text));
            return;
        }

        let mut last = 0;
        for tag in pattern::hashtags(text) {
            if tag.start > last {
                self.append(Node::text(&text[last..tag.start]));
            }
            let label = &text[tag.clone()];
            self.append(
                Element::new("a")
                    .with_attr("class", "tag")
                    .with_attr("href", format!("#{}", &label[1..]))
                    .with_text(label)
                    .into(),
            );
            last = tag.end;
        }
        if last < text.len() {
            self.append(Node::text(&text[last..]));
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let one = |e: Element| vec![e];
        match tag {
            Tag::Paragraph => self.open(one(Element::new("p")), false),
            Tag::Heading { level, .. } => {
                self.open(one(Element::new(format!("h{}", level as usize))), false)
            }
            Tag::BlockQuote(_) => self.open(one(Element::new("blockquote")), false),
            Tag::CodeBlock(kind) => {
                let mut code = Element::new("code");
                if let CodeBlockKind::Fenced(lang) = kind {
                    if let Some(lang) = lang.split_whitespace().next() {
                        code.set_attr("class", format!("language-{}", lang));
                    }
                }
                self.open(vec![Element::new("pre"), code], true)
            }
            Tag::List(Some(start)) if start != 1 => self.open(
                one(Element::new("ol").with_attr("start", start.to_string())),
                false,
            ),
            Tag::List(Some(_)) => self.open(one(Element::new("ol")), false),
            Tag::List(None) => self.open(one(Element::new("ul")), false),
            Tag::Item => self.open(one(Element::new("li")), false),
            Tag::Table(_) => self.open(one(Element::new("table")), false),
            Tag::TableHead => {
                self.in_table_head = true;
                self.open(vec![Element::new("thead"), Element::new("tr")], false)
            }
            Tag::TableRow => self.open(one(Element::new("tr")), false),
            Tag::TableCell => {
                let cell = if self.in_table_head { "th" } else { "td" };
                self.open(one(Element::new(cell)), false)
            }
            Tag::Emphasis => self.open(one(Element::new("em")), false),
            Tag::Strong => self.open(one(Element::new("strong")), false),
            Tag::Strikethrough => self.open(one(Element::new("del")), false),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut a = Element::new("a").with_attr("href", dest_url.to_string());
                if !title.is_empty() {
                    a.set_attr("title", title.to_string());
                }
                self.open(one(a), true)
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut img = Element::new("img").with_attr("src", dest_url.to_string());
                if !title.is_empty() {
                    img.set_attr("title", title.to_string());
                }
                self.open(one(img), false)
            }
            Tag::MetadataBlock(_) => self.open(
                one(Element::new("div").with_attr("class", "frontmatter")),
                true,
            ),
            Tag::FootnoteDefinition(label) => self.open(
                one(Element::new("div")
                    .with_attr("class", "footnote-definition")
                    .with_attr("id", label.to_string())),
                false,
            ),
            _ => self.open(one(Element::fragment()), false),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(pulldown_cmark::TagEnd::TableHead) => {
                self.in_table_head = false;
                self.close();
            }
            Event::End(_) => self.close(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.append(Element::new("code").with_text(code.to_string()).into()),
            Event::Html(html) | Event::InlineHtml(html) => self.append(Node::Raw(html.to_string())),
            Event::SoftBreak => self.append(Node::text("\n")),
            Event::HardBreak => self.append(Element::new("br").into()),
            Event::Rule => self.append(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    input.set_attr("checked", "");
                }
                self.append(input.into())
            }
            Event::FootnoteReference(label) => self.append(
                Element::new("sup")
                    .with_attr("class", "footnote-reference")
                    .with_child(
                        Element::new("a")
                            .with_attr("href", format!("#{}", label))
                            .with_text(label.to_string()),
                    )
                    .into(),
            ),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.pushed.is_empty() {
            self.close();
        }
        self.roots
    }
}

/// Parse markdown into an owned DOM
///
/// YAML frontmatter becomes `<div class="frontmatter">`, fenced code
/// `<pre><code>` and, with `hashtags`, `#word` becomes `<a class="tag">`.
pub fn markdown_to_dom(markdown: &str, options: &MarkdownOptions) -> Vec<Node> {
    let parser_options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;

    let mut builder = DomBuilder::new(*options);
    for event in Parser::new_ext(markdown, parser_options) {
        builder.event(event);
    }
    builder.finish()
}
