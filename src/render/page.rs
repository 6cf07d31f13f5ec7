//! Standalone HTML page around rendered markdown

use crate::theme::ThemeKind;

use super::dom::{to_html, Node};

/// Theme colors for the exported page (CSS-formatted)
#[derive(Debug, Clone)]
pub struct PageTheme {
    pub background: String,
    pub text: String,
    pub heading: String,
    pub link: String,
    pub code_background: String,
    pub border: String,
    pub accent: String,
    pub muted: String,
}

impl PageTheme {
    pub fn for_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Self::default(),
            ThemeKind::Light => Self {
                background: "#ffffff".to_string(),
                text: "#1f2328".to_string(),
                heading: "#0550ae".to_string(),
                link: "#0969da".to_string(),
                code_background: "#f6f8fa".to_string(),
                border: "#d0d7de".to_string(),
                accent: "#8250df".to_string(),
                muted: "#656d76".to_string(),
            },
        }
    }
}

impl Default for PageTheme {
    fn default() -> Self {
        Self {
            background: "#1e1e1e".to_string(),
            text: "#d4d4d4".to_string(),
            heading: "#569cd6".to_string(),
            link: "#ce9178".to_string(),
            code_background: "#252526".to_string(),
            border: "#3c3c3c".to_string(),
            accent: "#dcdcaa".to_string(),
            muted: "#858585".to_string(),
        }
    }
}

/// Complete HTML document with styling
pub fn page_html(body: &[Node], theme: &PageTheme) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>{}{}</style>
</head>
<body>
    <div id="content">{}</div>
</body>
</html>"#,
        generate_css(theme),
        HIGHLIGHT_CSS,
        to_html(body)
    )
}

fn generate_css(theme: &PageTheme) -> String {
    format!(
        r#"
* {{
    box-sizing: border-box;
}}

body {{
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    font-size: 14px;
    line-height: 1.6;
    color: {text};
    background: {background};
    padding: 20px;
    max-width: 800px;
    margin: 0 auto;
}}

h1, h2, h3, h4, h5, h6 {{
    color: {heading};
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}}

h1, h2 {{
    border-bottom: 1px solid {border};
    padding-bottom: 0.3em;
}}

code {{
    background: {code_background};
    padding: 0.2em 0.4em;
    border-radius: 3px;
    font-family: "SF Mono", "Fira Code", Consolas, "Liberation Mono", Menlo, Courier, monospace;
    font-size: 0.9em;
}}

pre {{
    background: {code_background};
    padding: 16px;
    border-radius: 6px;
    overflow-x: auto;
}}

pre code {{
    background: none;
    padding: 0;
}}

blockquote {{
    border-left: 4px solid {accent};
    margin: 0 0 16px 0;
    padding: 0 16px;
    color: {muted};
}}

a {{
    color: {link};
    text-decoration: none;
}}

a.tag {{
    background: {code_background};
    border-radius: 1em;
    padding: 0 0.5em;
}}

.frontmatter {{
    white-space: pre;
    font-family: monospace;
    color: {muted};
    border: 1px solid {border};
    border-radius: 6px;
    padding: 8px 16px;
    margin-bottom: 16px;
}}

th, td {{
    padding: 6px 13px;
    border: 1px solid {border};
}}

table {{
    border-collapse: collapse;
    margin-bottom: 16px;
}}
"#,
        text = theme.text,
        background = theme.background,
        heading = theme.heading,
        link = theme.link,
        code_background = theme.code_background,
        border = theme.border,
        accent = theme.accent,
        muted = theme.muted,
    )
}

/// Rules for the classes decorations carry
const HIGHLIGHT_CSS: &str = r#"
.color-highlight-background {
    background-color: var(--highlight-color);
    color: var(--contrast-color);
    caret-color: var(--caret-color);
    border-radius: 3px;
    padding: 0.1em 0.2em;
}

.color-highlight-border {
    border: 2px solid var(--highlight-color);
    border-radius: 3px;
    padding: 0 0.2em;
}

.color-highlight-underline {
    border-bottom: 3px solid var(--highlight-color);
}

.color-highlight.contrast-border,
.color-square.contrast-border {
    outline: 1px solid currentColor;
}

.color-square {
    display: inline-block;
    width: 0.8em;
    height: 0.8em;
    margin: 0 0.25em;
    vertical-align: middle;
    border-radius: 2px;
    background-color: var(--highlight-color);
}

.color-square.scale-with-text {
    width: 1em;
    height: 1em;
}
"#;
