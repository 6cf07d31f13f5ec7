//! Decorations: positioned visual annotations over color literals
//!
//! A `DecorationSet` is rebuilt wholesale on every qualifying change and
//! handed to the host through a `DecorationSink`. Decorations are plain
//! values; nothing is mutated after a pass finishes.

mod builder;
mod sink;

use std::fmt;
use std::ops::Range;

use serde::{Serialize, Serializer};

pub use builder::{collect_matches, decorate, DecorationBuilder, MIN_LEGIBLE_RATIO};
pub use sink::{Annotation, AnnotationList, DecorationSink, EmitReport};

use crate::color::{ColorFamily, ContrastClass, Rgb};
use crate::config::SquarePosition;

/// Stable identity of a decoration, derived from its match offsets
///
/// Carried by marks and swatch widgets so pointer events on either can be
/// traced back to the owning decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationId {
    pub start: usize,
    pub end: usize,
}

impl DecorationId {
    const PREFIX: &'static str = "color-";

    pub fn from_range(range: &Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    /// Parse the form produced by `Display` ("color-12-19")
    pub fn parse(s: &str) -> Option<Self> {
        let (start, end) = s.strip_prefix(Self::PREFIX)?.split_once('-')?;
        Some(Self {
            start: start.parse().ok()?,
            end: end.parse().ok()?,
        })
    }
}

impl fmt::Display for DecorationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", Self::PREFIX, self.start, self.end)
    }
}

impl Serialize for DecorationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inline styling of the literal's text
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecorationStyle {
    Background {
        highlight: Rgb,
        contrast: ContrastClass,
        caret: ContrastClass,
        /// Highlight too close to the background: renderer adds a border
        contrast_border: bool,
    },
    Border {
        highlight: Rgb,
    },
    Underline {
        highlight: Rgb,
    },
    /// No text styling; a swatch widget is placed next to the literal
    Square,
}

impl DecorationStyle {
    /// Whether the literal's text gets a mark annotation
    pub fn has_mark(&self) -> bool {
        !matches!(self, DecorationStyle::Square)
    }

    pub fn class_names(&self) -> Vec<&'static str> {
        match self {
            DecorationStyle::Background {
                contrast_border, ..
            } => {
                let mut classes = vec!["color-highlight", "color-highlight-background"];
                if *contrast_border {
                    classes.push("contrast-border");
                }
                classes
            }
            DecorationStyle::Border { .. } => vec!["color-highlight", "color-highlight-border"],
            DecorationStyle::Underline { .. } => {
                vec!["color-highlight", "color-highlight-underline"]
            }
            DecorationStyle::Square => Vec::new(),
        }
    }

    /// CSS custom properties for the mark
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        match self {
            DecorationStyle::Background {
                highlight,
                contrast,
                caret,
                ..
            } => vec![
                ("--highlight-color", highlight.to_css()),
                ("--contrast-color", contrast.css().to_string()),
                ("--caret-color", caret.css().to_string()),
            ],
            DecorationStyle::Border { highlight } | DecorationStyle::Underline { highlight } => {
                vec![("--highlight-color", highlight.to_css())]
            }
            DecorationStyle::Square => Vec::new(),
        }
    }

    /// Inline `style` attribute value
    pub fn style_attribute(&self) -> String {
        self.css_properties()
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Zero-width swatch shown next to a literal in `Square` style
///
/// An immutable snapshot: everything it renders is captured at construction
/// and two widgets are equal when their payloads are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwatchWidget {
    pub decoration_id: DecorationId,
    pub literal: String,
    /// Effective (background-blended) color
    pub color: Rgb,
    pub background: Rgb,
    pub side: SquarePosition,
    pub contrast_border: bool,
    pub scale_with_text: bool,
    pub picker_enabled: bool,
}

impl SwatchWidget {
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut classes = vec!["color-square"];
        if self.contrast_border {
            classes.push("contrast-border");
        }
        if self.scale_with_text {
            classes.push("scale-with-text");
        }
        classes
    }

    pub fn style_attribute(&self) -> String {
        format!("--highlight-color: {}", self.color.to_css())
    }
}

/// A swatch and the buffer offset it is inserted at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedWidget {
    pub position: usize,
    pub widget: SwatchWidget,
}

/// One highlighted literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoration {
    pub id: DecorationId,
    /// Full literal span, `#` included; the range the picker replaces
    pub match_range: Range<usize>,
    pub literal: String,
    /// Styled span start (one past `#` for hex literals)
    pub start: usize,
    pub end: usize,
    pub background: Rgb,
    pub effective: Rgb,
    pub contrast: ContrastClass,
    pub contrast_ratio: f64,
    pub style: DecorationStyle,
    pub widget: Option<PlacedWidget>,
}

impl Decoration {
    pub fn family(&self) -> Option<ColorFamily> {
        ColorFamily::of(&self.literal)
    }

    /// Attributes of the mark annotation
    pub fn mark_attributes(&self) -> Vec<(String, String)> {
        vec![
            ("class".to_string(), self.style.class_names().join(" ")),
            ("style".to_string(), self.style.style_attribute()),
            ("data-color-id".to_string(), self.id.to_string()),
        ]
    }

    /// Annotations in position order: leading swatch, mark, trailing swatch
    pub fn annotations(&self) -> Vec<Annotation> {
        let mut out = Vec::with_capacity(2);
        let widget = |placed: &PlacedWidget| Annotation::Widget {
            position: placed.position,
            widget: placed.widget.clone(),
        };

        if let Some(placed) = self.widget.as_ref().filter(|w| w.position <= self.start) {
            out.push(widget(placed));
        }
        if self.style.has_mark() {
            out.push(Annotation::Mark {
                start: self.start,
                end: self.end,
                attributes: self.mark_attributes(),
            });
        }
        if let Some(placed) = self.widget.as_ref().filter(|w| w.position > self.start) {
            out.push(widget(placed));
        }
        out
    }
}

/// The decorations of one view, sorted and non-overlapping
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    /// Sort by match start and drop anything overlapping an earlier entry
    pub fn new(mut decorations: Vec<Decoration>) -> Self {
        decorations.sort_by_key(|d| d.match_range.start);
        let mut kept: Vec<Decoration> = Vec::with_capacity(decorations.len());
        for decoration in decorations {
            let overlaps = kept
                .last()
                .is_some_and(|prev| decoration.match_range.start < prev.match_range.end);
            if !overlaps {
                kept.push(decoration);
            }
        }
        Self { decorations: kept }
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.decorations.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn by_id(&self, id: DecorationId) -> Option<&Decoration> {
        self.decorations
            .binary_search_by_key(&id.start, |d| d.match_range.start)
            .ok()
            .map(|i| &self.decorations[i])
            .filter(|d| d.id == id)
    }

    /// The decoration whose literal touches `pos` (end inclusive)
    pub fn decoration_at(&self, pos: usize) -> Option<&Decoration> {
        let idx = self
            .decorations
            .partition_point(|d| d.match_range.start <= pos);
        idx.checked_sub(1)
            .map(|i| &self.decorations[i])
            .filter(|d| pos <= d.match_range.end)
    }

    /// The decoration a detached swatch belongs to
    pub fn owner_of_widget(&self, widget: &SwatchWidget) -> Option<&Decoration> {
        self.by_id(widget.decoration_id)
    }

    /// All annotations, sorted by position
    pub fn annotations(&self) -> Vec<Annotation> {
        self.decorations.iter().flat_map(|d| d.annotations()).collect()
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}
