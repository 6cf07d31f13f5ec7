//! Theme awareness: resolving the background a literal is drawn on
//!
//! The host reports the background of the rendering context as a CSS color
//! string. It is read once per decoration pass and never cached beyond it,
//! since theme switches and scrolling change it.

use serde::{Deserialize, Serialize};

use crate::color::{blend, parse_css_color, Rgb};

/// Light or dark base theme of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    /// Background assumed when the host cannot report one
    pub const fn fallback_background(&self) -> Rgb {
        match self {
            ThemeKind::Dark => Rgb::new(30, 30, 30),
            ThemeKind::Light => Rgb::new(255, 255, 255),
        }
    }
}

/// Host hook reading the current background
pub trait BackgroundReader {
    /// CSS color of the rendering context, e.g. `"rgb(30, 30, 30)"`
    fn background_css(&self) -> Option<String>;

    fn theme(&self) -> ThemeKind;
}

/// A background known up front (CLI, tests, static exports)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixedBackground {
    pub css: Option<String>,
    pub theme: ThemeKind,
}

impl FixedBackground {
    pub fn new(css: impl Into<String>, theme: ThemeKind) -> Self {
        Self {
            css: Some(css.into()),
            theme,
        }
    }

    /// No explicit color: always the theme fallback
    pub fn themed(theme: ThemeKind) -> Self {
        Self { css: None, theme }
    }
}

impl BackgroundReader for FixedBackground {
    fn background_css(&self) -> Option<String> {
        self.css.clone()
    }

    fn theme(&self) -> ThemeKind {
        self.theme
    }
}

/// Resolve the background for one pass
///
/// Unparseable or fully transparent values fall back to the theme default.
/// A translucent value is blended over that default.
pub fn resolve_background<B: BackgroundReader + ?Sized>(reader: &B) -> Rgb {
    let fallback = reader.theme().fallback_background();
    match reader.background_css() {
        Some(css) => match parse_css_color(&css) {
            Some(color) if !color.is_transparent() => blend(color, fallback),
            Some(_) => fallback,
            None => {
                tracing::debug!(css, "Unreadable background color, using theme fallback");
                fallback
            }
        },
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks() {
        assert_eq!(
            resolve_background(&FixedBackground::themed(ThemeKind::Dark)),
            Rgb::new(30, 30, 30)
        );
        assert_eq!(
            resolve_background(&FixedBackground::themed(ThemeKind::Light)),
            Rgb::WHITE
        );
    }

    #[test]
    fn test_reads_host_value() {
        let bg = FixedBackground::new("rgb(40, 44, 52)", ThemeKind::Dark);
        assert_eq!(resolve_background(&bg), Rgb::new(40, 44, 52));
    }

    #[test]
    fn test_transparent_uses_fallback() {
        let bg = FixedBackground::new("rgba(0, 0, 0, 0)", ThemeKind::Light);
        assert_eq!(resolve_background(&bg), Rgb::WHITE);
        let bg = FixedBackground::new("inherit", ThemeKind::Light);
        assert_eq!(resolve_background(&bg), Rgb::WHITE);
    }

    #[test]
    fn test_translucent_blends_over_fallback() {
        let bg = FixedBackground::new("rgba(0, 0, 0, 0.5)", ThemeKind::Light);
        assert_eq!(resolve_background(&bg), Rgb::new(128, 128, 128));
        let bg = FixedBackground::new("rgba(40, 44, 52, 1)", ThemeKind::Dark);
        assert_eq!(resolve_background(&bg), Rgb::new(40, 44, 52));
    }
}
