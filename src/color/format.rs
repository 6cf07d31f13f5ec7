//! Rendering a color back into a literal of a given family
//!
//! Used by the picker to write an edited color over the original literal
//! without changing its syntax. Hex short forms keep their digit count, which
//! quantizes each channel to a nibble: that loss is expected.

use super::{rgb_to_hsl, ColorFamily, Rgb};

/// Alpha part of a literal exactly as written, if the family has one
///
/// `#f008` → `"8"`, `#ff000080` → `"80"`, `rgba(1, 2, 3, .5)` → `".5"`.
pub fn alpha_text(literal: &str) -> Option<String> {
    let literal = literal.trim();
    match ColorFamily::of(literal)? {
        ColorFamily::Hex4 => literal.get(4..5).map(str::to_string),
        ColorFamily::Hex8 => literal.get(7..9).map(str::to_string),
        ColorFamily::Rgba | ColorFamily::Hsla => {
            let open = literal.find('(')?;
            let close = literal.rfind(')')?;
            let args = literal.get(open + 1..close)?;
            let last = args.rsplit(',').next()?.trim();
            if args.split(',').count() < 4 || last.is_empty() {
                None
            } else {
                Some(last.to_string())
            }
        }
        _ => None,
    }
}

fn nibble(channel: u8) -> u8 {
    ((f64::from(channel) / 17.0).round() as u8).min(15)
}

/// Format `rgb` as a literal of `family`
///
/// `alpha_text` is reused verbatim for alpha-bearing families; when absent
/// the alpha is written as fully opaque.
pub fn format_literal(rgb: Rgb, family: ColorFamily, alpha_text: Option<&str>) -> String {
    match family {
        ColorFamily::Hex3 => format!(
            "#{:x}{:x}{:x}",
            nibble(rgb.r),
            nibble(rgb.g),
            nibble(rgb.b)
        ),
        ColorFamily::Hex4 => format!(
            "#{:x}{:x}{:x}{}",
            nibble(rgb.r),
            nibble(rgb.g),
            nibble(rgb.b),
            alpha_text.unwrap_or("f")
        ),
        ColorFamily::Hex6 => rgb.to_hex(),
        ColorFamily::Hex8 => format!("{}{}", rgb.to_hex(), alpha_text.unwrap_or("ff")),
        ColorFamily::Rgb => format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
        ColorFamily::Rgba => format!(
            "rgba({}, {}, {}, {})",
            rgb.r,
            rgb.g,
            rgb.b,
            alpha_text.unwrap_or("1")
        ),
        ColorFamily::Hsl => {
            let (h, s, l) = hsl_parts(rgb);
            format!("hsl({}, {}%, {}%)", h, s, l)
        }
        ColorFamily::Hsla => {
            let (h, s, l) = hsl_parts(rgb);
            format!("hsla({}, {}%, {}%, {})", h, s, l, alpha_text.unwrap_or("1"))
        }
    }
}

fn hsl_parts(rgb: Rgb) -> (u32, u32, u32) {
    let hsl = rgb_to_hsl(rgb);
    let h = (hsl.h.round() as u32) % 360;
    (h, (hsl.s * 100.0).round() as u32, (hsl.l * 100.0).round() as u32)
}

/// Format `rgb` in the same family as `original`, keeping its alpha text
///
/// An unrecognized original falls back to 6-digit hex.
pub fn format_like(rgb: Rgb, original: &str) -> String {
    match ColorFamily::of(original) {
        Some(family) => format_literal(rgb, family, alpha_text(original).as_deref()),
        None => rgb.to_hex(),
    }
}

/// Opaque 6-digit hex preview of a literal for the picker
///
/// Alpha is dropped and short forms expanded; hsl goes through `hsl_to_rgb`
/// while parsing. Unparseable literals preview as black.
pub fn preview_hex(literal: &str) -> String {
    super::parse_to_rgba(literal).rgb().to_hex()
}
