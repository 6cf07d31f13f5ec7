//! Command-line argument parsing
//!
//! Supports:
//! - Listing the decorations of a markdown file
//! - Exporting a highlighted HTML page
//! - Replacing a literal with a new color in its own syntax
//! - Inspecting a single literal

use std::ops::Range;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::color::{try_parse, Rgb};
use crate::theme::ThemeKind;

/// Color literal highlighter for markdown
#[derive(Parser, Debug)]
#[command(name = "colorlens", version, about = "Highlight color literals in markdown")]
pub struct CliArgs {
    /// Settings file (defaults to ~/.config/colorlens/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the decorations a file would get
    Scan {
        file: PathBuf,

        /// Visible byte range, e.g. `0..200` (repeatable; default whole file)
        #[arg(long = "range", value_name = "A..B", value_parser = parse_range)]
        ranges: Vec<Range<usize>>,

        /// Background CSS color the literals are drawn on
        #[arg(long, value_name = "CSS")]
        background: Option<String>,

        /// Light theme fallback background
        #[arg(long)]
        light: bool,

        /// Print JSON instead of one line per decoration
        #[arg(long)]
        json: bool,
    },

    /// Render markdown to a standalone HTML page with highlights
    Render {
        file: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        #[arg(long)]
        light: bool,

        /// Render `#word` as tags (literals inside them are not highlighted)
        #[arg(long)]
        tags: bool,
    },

    /// Replace the literal at an offset with a new color, keeping its syntax
    Pick {
        file: PathBuf,

        /// Byte offset touching the literal
        #[arg(long, value_name = "N")]
        offset: usize,

        /// New color as any supported literal, e.g. `#3366ff`
        #[arg(long, value_name = "COLOR", value_parser = parse_color)]
        color: Rgb,

        /// Write the file in place instead of printing the replacement
        #[arg(long)]
        write: bool,
    },

    /// Show parsed, blended and contrast values for one literal
    Inspect {
        literal: String,

        #[arg(long, value_name = "CSS")]
        background: Option<String>,

        #[arg(long)]
        light: bool,
    },
}

/// Parse `A..B` into a byte range
pub fn parse_range(s: &str) -> Result<Range<usize>, String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("expected A..B, got {:?}", s))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("bad range start {:?}: {}", start, e))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("bad range end {:?}: {}", end, e))?;
    if end < start {
        return Err(format!("range {}..{} is inverted", start, end));
    }
    Ok(start..end)
}

/// Parse a color literal, alpha dropped
pub fn parse_color(s: &str) -> Result<Rgb, String> {
    try_parse(s.trim())
        .map(|rgba| rgba.rgb())
        .map_err(|e| e.to_string())
}

pub fn theme_kind(light: bool) -> ThemeKind {
    if light {
        ThemeKind::Light
    } else {
        ThemeKind::Dark
    }
}
