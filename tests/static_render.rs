//! Static renderer tests over markdown rendered by `markdown_to_dom`

mod common;

use std::time::{Duration, Instant};

use colorlens::config::{HighlightStyle, Settings};
use colorlens::render::{
    markdown_to_dom, page_html, to_html, Element, MarkdownOptions, Node, PageTheme,
    StaticRenderer, CODE_BLOCK_PASS_DELAY, LITERAL_CLASS,
};
use colorlens::theme::ThemeKind;
use common::{backticks_only, codeblocks_only, everywhere, with_style};

const DOC: &str = "\
---
accent: \"#123456\"
---

# Palette

Primary #ff0000 and `rgb(0, 0, 255)`.

```css
a { color: hsl(120, 100%, 25%); }
```
";

fn dom(markdown: &str) -> Vec<Node> {
    markdown_to_dom(markdown, &MarkdownOptions::default())
}

fn literal_count(html: &str) -> usize {
    html.matches(&format!("class=\"{}\"", LITERAL_CLASS)).count()
}

#[test]
fn test_first_pass_leaves_code_blocks() {
    let mut nodes = dom(DOC);
    let renderer = StaticRenderer::new(everywhere(), ThemeKind::Dark);
    let report = renderer.render(&mut nodes, None);
    assert_eq!(report.highlighted, 2);

    let html = to_html(&nodes);
    assert!(html.contains("data-color=\"#ff0000\""));
    assert!(html.contains("data-color=\"rgb(0, 0, 255)\""));
    assert!(!html.contains("data-color=\"hsl(120, 100%, 25%)\""));
}

#[test]
fn test_deferred_pass_handles_code_blocks() {
    let mut nodes = dom(DOC);
    let renderer = StaticRenderer::new(everywhere(), ThemeKind::Dark);
    renderer.render(&mut nodes, None);

    let now = Instant::now();
    let deferred = renderer.defer_code_blocks(now, None).unwrap();
    assert_eq!(deferred.due(), now + CODE_BLOCK_PASS_DELAY);
    assert!(!deferred.is_due(now));
    assert!(deferred.is_due(now + Duration::from_millis(100)));

    let report = deferred.run(&mut nodes);
    assert_eq!(report.highlighted, 1);
    assert!(to_html(&nodes).contains("data-color=\"hsl(120, 100%, 25%)\""));
}

#[test]
fn test_frontmatter_is_never_highlighted() {
    let mut nodes = dom(DOC);
    let renderer = StaticRenderer::new(everywhere(), ThemeKind::Dark);
    renderer.render_document(&mut nodes, None);
    let html = to_html(&nodes);
    assert!(html.contains("#123456"));
    assert!(!html.contains("data-color=\"#123456\""));
}

#[test]
fn test_render_document_is_idempotent() {
    let mut nodes = dom(DOC);
    let renderer = StaticRenderer::new(everywhere(), ThemeKind::Light);
    let first = renderer.render_document(&mut nodes, None);
    assert_eq!(first.highlighted, 3);
    let once = to_html(&nodes);

    let second = renderer.render_document(&mut nodes, None);
    assert_eq!(second.highlighted, 0);
    assert_eq!(to_html(&nodes), once);
    assert_eq!(literal_count(&once), 3);
}

#[test]
fn test_scope_flags_apply_to_dom() {
    let renderer = StaticRenderer::new(backticks_only(), ThemeKind::Dark);
    let mut nodes = dom(DOC);
    renderer.render_document(&mut nodes, None);
    let html = to_html(&nodes);
    assert_eq!(literal_count(&html), 1);
    assert!(html.contains("data-color=\"rgb(0, 0, 255)\""));

    let renderer = StaticRenderer::new(codeblocks_only(), ThemeKind::Dark);
    let mut nodes = dom(DOC);
    renderer.render_document(&mut nodes, None);
    let html = to_html(&nodes);
    assert_eq!(literal_count(&html), 1);
    assert!(html.contains("data-color=\"hsl(120, 100%, 25%)\""));
}

#[test]
fn test_hashtags_veto_literals() {
    let options = MarkdownOptions { hashtags: true };
    let mut nodes = markdown_to_dom("tagged #abc and plain rgb(1, 2, 3)", &options);
    let renderer = StaticRenderer::new(everywhere(), ThemeKind::Dark);
    let report = renderer.render_document(&mut nodes, None);
    assert_eq!(report.highlighted, 1);
    let html = to_html(&nodes);
    assert!(html.contains("<a class=\"tag\" href=\"#abc\">#abc</a>"));
}

#[test]
fn test_excluded_file_untouched() {
    let settings = Settings {
        excluded_files: vec!["palette.md".to_string()],
        ..Settings::default()
    };
    let renderer = StaticRenderer::new(settings, ThemeKind::Dark);
    let mut nodes = dom(DOC);
    let before = to_html(&nodes);
    let report = renderer.render_document(&mut nodes, Some("notes/palette.md"));
    assert_eq!(report.highlighted, 0);
    assert_eq!(to_html(&nodes), before);
    assert!(renderer
        .defer_code_blocks(Instant::now(), Some("palette.md"))
        .is_none());
}

#[test]
fn test_theme_fallback_background() {
    // Half-transparent white reads as mid gray on dark, white on light
    let renderer = StaticRenderer::new(everywhere(), ThemeKind::Light);
    let mut nodes = dom("x #ffffff80");
    renderer.render(&mut nodes, None);
    assert!(to_html(&nodes).contains("--highlight-color: rgb(255, 255, 255)"));
}

#[test]
fn test_square_style_swatch() {
    let renderer = StaticRenderer::new(with_style(HighlightStyle::Square), ThemeKind::Dark);
    let mut nodes = vec![Element::new("p").with_text("pick #336699 now").into()];
    renderer.render(&mut nodes, None);
    let html = to_html(&nodes);
    assert!(html.contains(
        "<span class=\"color-literal\" data-color=\"#336699\">#336699<span class=\"color-square\""
    ));
    assert!(html.contains("data-color-id=\"color-5-12\""));
}

#[test]
fn test_inline_query_flattened_then_highlighted() {
    let mut nodes = vec![Element::new("p")
        .with_text("value: ")
        .with_child(
            Element::new("span")
                .with_attr("class", "dataview inline")
                .with_child(Element::new("p").with_text("#00ff00")),
        )
        .into()];
    let renderer = StaticRenderer::new(everywhere(), ThemeKind::Dark);
    let report = renderer.render(&mut nodes, None);
    assert_eq!(report.flattened, 1);
    assert_eq!(report.highlighted, 1);
    let html = to_html(&nodes);
    assert!(html.contains("<span class=\"dataview inline\"><span><span class=\"color-literal\""));
}

#[test]
fn test_page_wraps_rendered_body() {
    let mut nodes = dom("Accent #ff8800");
    let renderer = StaticRenderer::new(everywhere(), ThemeKind::Dark);
    renderer.render_document(&mut nodes, None);
    let page = page_html(&nodes, &PageTheme::for_kind(ThemeKind::Dark));
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains(".color-highlight"));
    assert!(page.contains("data-color=\"#ff8800\""));
}
