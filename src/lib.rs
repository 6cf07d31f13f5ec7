//! colorlens - color literal highlighting for markdown buffers
//!
//! This crate finds hex, rgb/rgba and hsl/hsla literals in text, works out
//! how each one looks against the background it is drawn on, and produces a
//! sorted, non-overlapping set of decorations for a host editor (or a static
//! HTML export) to render.

pub mod cli;
pub mod color;
pub mod config;
pub mod config_paths;
pub mod context;
pub mod decoration;
pub mod error;
pub mod pattern;
pub mod picker;
pub mod render;
pub mod syntax;
pub mod text;
pub mod theme;
pub mod tracing;
pub mod view;

// Re-export commonly used types
pub use color::{ColorFamily, Rgb, Rgba};
pub use config::{HighlightStyle, Settings, SquarePosition};
pub use decoration::{Decoration, DecorationBuilder, DecorationSet};
pub use picker::ColorPicker;
pub use render::StaticRenderer;
pub use view::{ColorView, ViewEvent};
