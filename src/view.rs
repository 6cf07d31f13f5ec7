//! Per-view controller
//!
//! One `ColorView` per editor view. It owns the view's decoration set, its
//! picker session and the incremental markdown parse, and decides which host
//! events trigger a rebuild. Everything runs on the caller's thread; a
//! rebuild finishes inside the `handle` call that asked for it.

use std::ops::Range;
use std::time::Instant;

use crate::color::Rgb;
use crate::config::Settings;
use crate::decoration::{Decoration, DecorationBuilder, DecorationId, DecorationSet, SwatchWidget};
use crate::error::PickerError;
use crate::picker::{ColorPicker, PickerSession, Replacement};
use crate::syntax::{MarkdownParser, SyntaxTree};
use crate::text::TextSource;
use crate::theme::{resolve_background, BackgroundReader};

/// Host events the view reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Document text changed
    BufferEdited,
    /// New visible ranges (byte offsets)
    ViewportChanged(Vec<Range<usize>>),
    SettingsChanged(Settings),
    /// Explicit refresh (command, theme switch)
    Refresh,
}

pub struct ColorView<B: BackgroundReader> {
    builder: DecorationBuilder,
    picker: ColorPicker,
    parser: MarkdownParser,
    tree: SyntaxTree,
    /// `None` until the host reports a viewport: the whole buffer is visible
    visible: Option<Vec<Range<usize>>>,
    file_path: Option<String>,
    background: B,
}

impl<B: BackgroundReader> ColorView<B> {
    pub fn new(mut settings: Settings, background: B) -> Self {
        settings.normalize();
        let picker = ColorPicker::new(settings.enable_color_picker);
        Self {
            builder: DecorationBuilder::new(settings),
            picker,
            parser: MarkdownParser::new(),
            tree: SyntaxTree::default(),
            visible: None,
            file_path: None,
            background,
        }
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Switch the view to another file; the parse cache and picker go with it
    pub fn set_file_path(&mut self, path: Option<String>) {
        self.file_path = path;
        self.parser.reset();
        self.picker.close();
    }

    pub fn settings(&self) -> &Settings {
        self.builder.settings()
    }

    pub fn decorations(&self) -> &DecorationSet {
        self.builder.current()
    }

    pub fn decoration_at(&self, pos: usize) -> Option<&Decoration> {
        self.builder.current().decoration_at(pos)
    }

    pub fn picker(&self) -> &ColorPicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut ColorPicker {
        &mut self.picker
    }

    /// React to `event`; returns whether decorations were rebuilt
    pub fn handle<T: TextSource + ?Sized>(&mut self, event: ViewEvent, text: &T) -> bool {
        match event {
            ViewEvent::BufferEdited => {
                self.reparse(text);
                if let Err(e) = self.picker.verify(text) {
                    if !matches!(e, PickerError::NoSession) {
                        tracing::debug!("Closing picker: {}", e);
                        self.picker.close();
                    }
                }
            }
            ViewEvent::ViewportChanged(ranges) => {
                if self.visible.as_ref() == Some(&ranges) {
                    return false;
                }
                self.visible = Some(ranges);
            }
            ViewEvent::SettingsChanged(mut settings) => {
                settings.normalize();
                self.picker.set_enabled(settings.enable_color_picker);
                self.builder.set_settings(settings);
            }
            ViewEvent::Refresh => {
                if self.tree.is_empty() {
                    self.reparse(text);
                }
            }
        }
        self.rebuild(text);
        true
    }

    fn reparse<T: TextSource + ?Sized>(&mut self, text: &T) {
        let source = text.slice(0..text.len_bytes());
        self.tree = self.parser.parse(&source);
    }

    fn rebuild<T: TextSource + ?Sized>(&mut self, text: &T) {
        let background = resolve_background(&self.background);
        let visible = match &self.visible {
            Some(ranges) => ranges.clone(),
            None => vec![0..text.len_bytes()],
        };
        self.builder.build(
            text,
            &self.tree,
            visible,
            self.file_path.as_deref(),
            background,
        );
    }

    /// Pointer entered the mark of decoration `id`
    pub fn hover(&mut self, id: DecorationId, now: Instant) {
        if let Some(decoration) = self.builder.current().by_id(id) {
            self.picker
                .request_show(id, decoration.match_range.clone(), &decoration.literal, now);
        }
    }

    /// Pointer entered a swatch; resolved to the decoration owning it
    pub fn hover_widget(&mut self, widget: &SwatchWidget, now: Instant) {
        if widget.picker_enabled {
            self.hover(widget.decoration_id, now);
        }
    }

    pub fn leave(&mut self, id: DecorationId) {
        self.picker.request_hide(id);
    }

    /// Advance timers; returns the session if the picker just opened
    pub fn tick(&mut self, now: Instant) -> Option<&PickerSession> {
        self.picker.poll(now)
    }

    /// Manual "pick color at cursor" command
    pub fn open_picker_at<T: TextSource + ?Sized>(
        &mut self,
        text: &T,
        pos: usize,
    ) -> Result<&PickerSession, PickerError> {
        self.picker.open_at(text, pos)
    }

    /// Apply a color chosen in the picker
    pub fn pick(&mut self, color: Rgb) -> Result<Replacement, PickerError> {
        self.picker.change(color)
    }
}
