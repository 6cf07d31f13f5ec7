//! Color math for highlighted literals
//!
//! Parsing, conversion, alpha compositing and contrast. Everything here is
//! pure and total: a literal that matched the scanner but fails to parse
//! yields a fallback color and a `tracing` warning, never a panic.

mod contrast;
mod convert;
mod format;
mod parse;

pub use contrast::{contrast_class, contrast_ratio, relative_luminance, yiq, ContrastClass};
pub use convert::{blend, effective_color, hsl_to_rgb, rgb_to_hsl};
pub use format::{alpha_text, format_like, format_literal, preview_hex};
pub use parse::{parse_css_color, parse_to_rgba, try_parse};

/// Opaque RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha value
    pub const fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Lowercase "#rrggbb"
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// "rgb(r, g, b)"
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// RGB color with alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Drop the alpha channel
    pub const fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// "rgba(r, g, b, a)"
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Hue in degrees [0, 360), saturation and lightness as fractions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }
}

/// HSL plus alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    pub const fn hsl(&self) -> Hsl {
        Hsl::new(self.h, self.s, self.l)
    }
}

/// Syntactic family of a color literal
///
/// Derived from the literal text alone: the prefix plus, for hex, the digit
/// count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFamily {
    Hex3,
    Hex4,
    Hex6,
    Hex8,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
}

impl ColorFamily {
    /// Detect the family of a literal
    pub fn of(literal: &str) -> Option<Self> {
        let literal = literal.trim();
        if let Some(digits) = literal.strip_prefix('#') {
            if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            return match digits.len() {
                3 => Some(ColorFamily::Hex3),
                4 => Some(ColorFamily::Hex4),
                6 => Some(ColorFamily::Hex6),
                8 => Some(ColorFamily::Hex8),
                _ => None,
            };
        }

        let lower = literal.to_ascii_lowercase();
        if lower.starts_with("rgba(") {
            Some(ColorFamily::Rgba)
        } else if lower.starts_with("rgb(") {
            Some(ColorFamily::Rgb)
        } else if lower.starts_with("hsla(") {
            Some(ColorFamily::Hsla)
        } else if lower.starts_with("hsl(") {
            Some(ColorFamily::Hsl)
        } else {
            None
        }
    }

    /// Whether literals of this family carry an alpha channel
    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            ColorFamily::Hex4 | ColorFamily::Hex8 | ColorFamily::Rgba | ColorFamily::Hsla
        )
    }

    pub fn is_hex(&self) -> bool {
        matches!(
            self,
            ColorFamily::Hex3 | ColorFamily::Hex4 | ColorFamily::Hex6 | ColorFamily::Hex8
        )
    }

    /// Short name used in CLI output
    pub fn name(&self) -> &'static str {
        match self {
            ColorFamily::Hex3 => "hex3",
            ColorFamily::Hex4 => "hex4",
            ColorFamily::Hex6 => "hex6",
            ColorFamily::Hex8 => "hex8",
            ColorFamily::Rgb => "rgb",
            ColorFamily::Rgba => "rgba",
            ColorFamily::Hsl => "hsl",
            ColorFamily::Hsla => "hsla",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_of_hex_lengths() {
        assert_eq!(ColorFamily::of("#abc"), Some(ColorFamily::Hex3));
        assert_eq!(ColorFamily::of("#abcd"), Some(ColorFamily::Hex4));
        assert_eq!(ColorFamily::of("#aabbcc"), Some(ColorFamily::Hex6));
        assert_eq!(ColorFamily::of("#aabbccdd"), Some(ColorFamily::Hex8));
        assert_eq!(ColorFamily::of("#abcde"), None);
        assert_eq!(ColorFamily::of("#ggg"), None);
    }

    #[test]
    fn test_family_of_functions() {
        assert_eq!(ColorFamily::of("rgb(1, 2, 3)"), Some(ColorFamily::Rgb));
        assert_eq!(ColorFamily::of("rgba(1,2,3,0.5)"), Some(ColorFamily::Rgba));
        assert_eq!(ColorFamily::of("hsl(0,0%,0%)"), Some(ColorFamily::Hsl));
        assert_eq!(ColorFamily::of("hsla(0,0%,0%,1)"), Some(ColorFamily::Hsla));
        assert_eq!(ColorFamily::of("lab(1 2 3)"), None);
    }

    #[test]
    fn test_has_alpha() {
        assert!(ColorFamily::Hex4.has_alpha());
        assert!(ColorFamily::Hex8.has_alpha());
        assert!(ColorFamily::Rgba.has_alpha());
        assert!(ColorFamily::Hsla.has_alpha());
        assert!(!ColorFamily::Hex6.has_alpha());
        assert!(!ColorFamily::Hsl.has_alpha());
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(Rgb::new(255, 0, 128).to_hex(), "#ff0080");
        assert_eq!(Rgb::new(30, 30, 30).to_css(), "rgb(30, 30, 30)");
    }
}
