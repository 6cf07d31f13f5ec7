//! Legibility helpers: YIQ text color choice and WCAG contrast ratio

use super::Rgb;

/// Text color chosen for legibility on top of a highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastClass {
    Black,
    White,
}

impl ContrastClass {
    pub fn rgb(&self) -> Rgb {
        match self {
            ContrastClass::Black => Rgb::BLACK,
            ContrastClass::White => Rgb::WHITE,
        }
    }

    /// CSS value used in custom properties
    pub fn css(&self) -> &'static str {
        match self {
            ContrastClass::Black => "#000000",
            ContrastClass::White => "#ffffff",
        }
    }
}

/// YIQ luminance in [0, 255]
pub fn yiq(color: Rgb) -> f64 {
    (299.0 * f64::from(color.r) + 587.0 * f64::from(color.g) + 114.0 * f64::from(color.b))
        / 1000.0
}

/// Black text on light colors, white text on dark ones (threshold Y = 128)
pub fn contrast_class(color: Rgb) -> ContrastClass {
    if yiq(color) >= 128.0 {
        ContrastClass::Black
    } else {
        ContrastClass::White
    }
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance in [0, 1]
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// WCAG contrast ratio in [1, 21], symmetric in its arguments
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}
