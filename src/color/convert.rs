//! Color space conversion and alpha compositing

use super::{parse::try_parse, ColorFamily, Hsl, Rgb, Rgba};

/// Convert HSL to RGB using the chroma/sector algorithm
///
/// `h` in degrees (360 wraps to 0), `s` and `l` as fractions.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// Convert RGB to HSL from the max/min channel spread
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;

    if delta == 0.0 {
        return Hsl::new(0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl::new((h * 60.0).rem_euclid(360.0), s, l)
}

/// Composite `foreground` over an opaque `background`
pub fn blend(foreground: Rgba, background: Rgb) -> Rgb {
    let a = foreground.a.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| {
        ((1.0 - a) * f64::from(bg) + a * f64::from(fg))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgb::new(
        mix(foreground.r, background.r),
        mix(foreground.g, background.g),
        mix(foreground.b, background.b),
    )
}

/// The color a literal actually shows on `background`
///
/// Opaque families are background independent and skip blending. A literal
/// that fails to parse resolves to the background itself.
pub fn effective_color(literal: &str, background: Rgb) -> Rgb {
    let color = match try_parse(literal) {
        Ok(color) => color,
        Err(e) => {
            tracing::warn!(literal, error = %e, "Color literal failed to parse, using background");
            return background;
        }
    };

    match ColorFamily::of(literal) {
        Some(family) if family.has_alpha() => blend(color, background),
        _ => color.rgb(),
    }
}
