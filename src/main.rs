//! colorlens command-line front end

use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use ropey::Rope;

use colorlens::cli::{theme_kind, CliArgs, Command};
use colorlens::color::{
    contrast_class, contrast_ratio, effective_color, format_literal, try_parse, ColorFamily, Rgb,
};
use colorlens::decoration::{AnnotationList, DecorationBuilder};
use colorlens::picker::ColorPicker;
use colorlens::render::{markdown_to_dom, page_html, MarkdownOptions, PageTheme, StaticRenderer};
use colorlens::syntax::SyntaxTree;
use colorlens::theme::{resolve_background, FixedBackground};
use colorlens::Settings;

fn main() -> Result<()> {
    colorlens::tracing::init();

    let args = CliArgs::parse();
    let settings = load_settings(args.config.as_deref())?;

    match args.command {
        Command::Scan {
            file,
            ranges,
            background,
            light,
            json,
        } => scan(&file, ranges, background, light, json, settings),
        Command::Render {
            file,
            output,
            light,
            tags,
        } => render(&file, output, light, tags, settings),
        Command::Pick {
            file,
            offset,
            color,
            write,
        } => pick(&file, offset, color, write, &settings),
        Command::Inspect {
            literal,
            background,
            light,
        } => inspect(&literal, background, light),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(Settings::load()),
    }
}

fn background_for(css: Option<String>, light: bool) -> Rgb {
    let reader = FixedBackground {
        css,
        theme: theme_kind(light),
    };
    resolve_background(&reader)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn scan(
    file: &Path,
    ranges: Vec<Range<usize>>,
    background: Option<String>,
    light: bool,
    json: bool,
    settings: Settings,
) -> Result<()> {
    let source = read_file(file)?;
    let rope = Rope::from_str(&source);
    let tree = SyntaxTree::parse_markdown(&source);
    let background = background_for(background, light);

    let visible = if ranges.is_empty() {
        vec![0..rope.len_bytes()]
    } else {
        ranges
    };

    let mut builder = DecorationBuilder::new(settings);
    let path = file.to_string_lossy();
    let set = builder.build(&rope, &tree, visible, Some(path.as_ref()), background);

    let mut sink = AnnotationList::with_doc_len(rope.len_bytes());
    let report = set.emit(&mut sink);
    if report.skipped > 0 {
        eprintln!("{} decoration(s) rejected", report.skipped);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, set).context("Failed to write JSON")?;
        writeln!(out)?;
        return Ok(());
    }

    for d in set {
        writeln!(
            out,
            "{}..{}\t{}\t{}\teffective {}\tcontrast {}\tratio {:.2}",
            d.match_range.start,
            d.match_range.end,
            d.literal,
            d.family().map_or("?", |f| f.name()),
            d.effective.to_hex(),
            d.contrast.css(),
            d.contrast_ratio
        )?;
    }
    Ok(())
}

fn render(
    file: &Path,
    output: Option<PathBuf>,
    light: bool,
    tags: bool,
    settings: Settings,
) -> Result<()> {
    let source = read_file(file)?;
    let theme = theme_kind(light);

    let mut nodes = markdown_to_dom(&source, &MarkdownOptions { hashtags: tags });
    let renderer = StaticRenderer::new(settings, theme);
    let path = file.to_string_lossy();
    let report = renderer.render_document(&mut nodes, Some(path.as_ref()));
    let html = page_html(&nodes, &PageTheme::for_kind(theme));

    match output {
        Some(path) => {
            fs::write(&path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} literal(s) highlighted → {}",
                report.highlighted,
                path.display()
            );
        }
        None => print!("{}", html),
    }
    Ok(())
}

fn pick(file: &Path, offset: usize, color: Rgb, write: bool, settings: &Settings) -> Result<()> {
    let mut source = read_file(file)?;

    let mut picker = ColorPicker::new(settings.enable_color_picker);
    let session = picker
        .open_at(source.as_str(), offset)
        .with_context(|| format!("Cannot pick a color in {}", file.display()))?;
    let old = session.literal.clone();

    let replacement = picker.change(color)?;
    source.replace_range(replacement.range.clone(), &replacement.text);

    if write {
        fs::write(file, &source).with_context(|| format!("Failed to write {}", file.display()))?;
    }
    println!("{} -> {}", old, replacement.text);
    Ok(())
}

fn inspect(literal: &str, background: Option<String>, light: bool) -> Result<()> {
    let literal = literal.trim();
    let Some(family) = ColorFamily::of(literal) else {
        bail!("{:?} is not a supported color literal", literal);
    };
    let rgba = try_parse(literal).with_context(|| format!("Failed to parse {}", literal))?;

    let background = background_for(background, light);
    let effective = effective_color(literal, background);

    println!("family      {}", family.name());
    println!("rgba        {}", rgba.to_css());
    println!("hex         {}", rgba.rgb().to_hex());
    println!("hsl         {}", format_literal(rgba.rgb(), ColorFamily::Hsl, None));
    println!("background  {}", background.to_hex());
    println!("effective   {}", effective.to_hex());
    println!("contrast    {}", contrast_class(effective).css());
    println!("ratio       {:.2}", contrast_ratio(effective, background));
    Ok(())
}
