//! Literal parsing
//!
//! `try_parse` reports why a literal was rejected; `parse_to_rgba` is the
//! total form used by the highlighting pipeline.

use std::sync::LazyLock;

use regex::Regex;

use super::{hsl_to_rgb, ColorFamily, Rgb, Rgba};
use crate::error::ColorError;

/// Numeric tokens inside a functional literal ("12", "0.5", ".5")
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+").expect("number pattern is valid"));

/// Parse any supported literal, falling back to opaque black
pub fn parse_to_rgba(literal: &str) -> Rgba {
    match try_parse(literal) {
        Ok(color) => color,
        Err(e) => {
            tracing::warn!(literal, error = %e, "Color literal failed to parse, using black");
            Rgb::BLACK.with_alpha(1.0)
        }
    }
}

/// Parse a literal into RGBA, reporting the failure reason
pub fn try_parse(literal: &str) -> Result<Rgba, ColorError> {
    let family = ColorFamily::of(literal)
        .ok_or_else(|| ColorError::UnknownFamily(literal.to_string()))?;
    let literal = literal.trim();

    match family {
        ColorFamily::Hex3 | ColorFamily::Hex4 | ColorFamily::Hex6 | ColorFamily::Hex8 => {
            parse_hex(literal)
        }
        ColorFamily::Rgb | ColorFamily::Rgba => parse_rgb(literal),
        ColorFamily::Hsl | ColorFamily::Hsla => parse_hsl(literal),
    }
}

fn parse_hex(literal: &str) -> Result<Rgba, ColorError> {
    let digits = literal.trim_start_matches('#');
    let malformed = || ColorError::Malformed {
        literal: literal.to_string(),
    };
    let nibble = |i: usize| -> Result<u8, ColorError> {
        u8::from_str_radix(&digits[i..i + 1], 16)
            .map(|n| n * 17)
            .map_err(|_| malformed())
    };
    let byte = |i: usize| -> Result<u8, ColorError> {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| malformed())
    };

    match digits.len() {
        3 => Ok(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, 1.0)),
        // Short alpha uses the same byte scale as the 8-digit form
        4 => Ok(Rgba::new(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            f64::from(nibble(3)?) / 255.0,
        )),
        6 => Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Ok(Rgba::new(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            f64::from(byte(6)?) / 255.0,
        )),
        _ => Err(malformed()),
    }
}

/// Extract up to four numeric tokens from the argument list
fn numeric_tokens(literal: &str) -> Result<Vec<f64>, ColorError> {
    let open = literal.find('(');
    let close = literal.rfind(')');
    let args = match (open, close) {
        (Some(open), Some(close)) if close > open => &literal[open + 1..close],
        _ => {
            return Err(ColorError::Malformed {
                literal: literal.to_string(),
            })
        }
    };

    NUMBER
        .find_iter(args)
        .take(4)
        .map(|m| {
            m.as_str().parse::<f64>().map_err(|_| ColorError::Malformed {
                literal: literal.to_string(),
            })
        })
        .collect()
}

fn require_channels(literal: &str, tokens: &[f64]) -> Result<(), ColorError> {
    if tokens.len() < 3 {
        return Err(ColorError::MissingChannel {
            literal: literal.to_string(),
            expected: 3,
            found: tokens.len(),
        });
    }
    Ok(())
}

fn parse_rgb(literal: &str) -> Result<Rgba, ColorError> {
    let tokens = numeric_tokens(literal)?;
    require_channels(literal, &tokens)?;

    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    let a = tokens.get(3).copied().unwrap_or(1.0).clamp(0.0, 1.0);

    Ok(Rgba::new(
        channel(tokens[0]),
        channel(tokens[1]),
        channel(tokens[2]),
        a,
    ))
}

fn parse_hsl(literal: &str) -> Result<Rgba, ColorError> {
    let tokens = numeric_tokens(literal)?;
    require_channels(literal, &tokens)?;

    let h = tokens[0];
    let s = tokens[1] / 100.0;
    let l = tokens[2] / 100.0;
    let a = tokens.get(3).copied().unwrap_or(1.0);

    let check = |component: &'static str, value: f64, max: f64| {
        if (0.0..=max).contains(&value) {
            Ok(())
        } else {
            Err(ColorError::OutOfRange {
                literal: literal.to_string(),
                component,
                value,
            })
        }
    };
    check("hue", h, 360.0)?;
    check("saturation", s, 1.0)?;
    check("lightness", l, 1.0)?;
    check("alpha", a, 1.0)?;

    Ok(hsl_to_rgb(h, s, l).with_alpha(a))
}

/// Parse a CSS background value as reported by the host
///
/// Accepts every literal family plus `transparent`, `black` and `white`.
/// Returns `None` for anything else so callers can fall back to the theme.
pub fn parse_css_color(css: &str) -> Option<Rgba> {
    let css = css.trim();
    match css.to_ascii_lowercase().as_str() {
        "" => None,
        "transparent" => Some(Rgba::new(0, 0, 0, 0.0)),
        "black" => Some(Rgb::BLACK.with_alpha(1.0)),
        "white" => Some(Rgb::WHITE.with_alpha(1.0)),
        _ => try_parse(css).ok(),
    }
}
