//! Color picker bridge
//!
//! The picker widget itself belongs to the host. This side owns the single
//! edit session: it normalizes the literal under edit to a `#rrggbb`
//! preview, turns the widget's color changes into replacement text in the
//! literal's own syntax, and debounces hover-triggered opening.

use std::ops::Range;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::color::{format_like, preview_hex, ColorFamily, Rgb};
use crate::decoration::DecorationId;
use crate::error::PickerError;
use crate::pattern;
use crate::text::TextSource;

/// Delay before a hover opens the picker
pub const HOVER_DEBOUNCE: Duration = Duration::from_millis(250);

/// The literal currently under edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerSession {
    /// Buffer range of the full literal, `#` included
    pub range: Range<usize>,
    pub literal: String,
    /// `#rrggbb` shown in the widget, alpha dropped
    pub preview: String,
    pub target: Option<DecorationId>,
}

impl PickerSession {
    fn new(range: Range<usize>, literal: &str, target: Option<DecorationId>) -> Self {
        Self {
            range,
            literal: literal.to_string(),
            preview: preview_hex(literal),
            target,
        }
    }

    pub fn family(&self) -> Option<ColorFamily> {
        ColorFamily::of(&self.literal)
    }
}

/// Text edit produced by a color change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub range: Range<usize>,
    pub text: String,
}

#[derive(Debug, Clone)]
struct PendingShow {
    target: DecorationId,
    range: Range<usize>,
    literal: String,
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct ColorPicker {
    enabled: bool,
    debounce: Duration,
    session: Option<PickerSession>,
    pending: Option<PendingShow>,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ColorPicker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            debounce: HOVER_DEBOUNCE,
            session: None,
            pending: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops the session and any pending hover
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.pending = None;
            self.close();
        }
    }

    pub fn session(&self) -> Option<&PickerSession> {
        self.session.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start editing `literal` at `range`, replacing any earlier session
    ///
    /// A pending hover show is dropped so it cannot replace this session.
    pub fn open(&mut self, range: Range<usize>, literal: &str) -> Result<&PickerSession, PickerError> {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(literal = %pending.literal, "Pending hover cancelled by manual open");
        }
        self.open_session(PickerSession::new(range, literal, None))
    }

    fn open_session(&mut self, session: PickerSession) -> Result<&PickerSession, PickerError> {
        if !self.enabled {
            return Err(PickerError::Disabled);
        }
        if let Some(previous) = self.session.take() {
            tracing::debug!(literal = %previous.literal, "Replacing picker session");
        }
        tracing::debug!(literal = %session.literal, preview = %session.preview, "Picker opened");
        Ok(self.session.insert(session))
    }

    pub fn close(&mut self) -> Option<PickerSession> {
        self.session.take()
    }

    /// Manual command: open on the literal touching `pos`
    pub fn open_at<T: TextSource + ?Sized>(
        &mut self,
        text: &T,
        pos: usize,
    ) -> Result<&PickerSession, PickerError> {
        if !self.enabled {
            return Err(PickerError::Disabled);
        }
        let line_start = text.line_start(pos);
        let line = text.slice(line_start..text.line_end(pos));
        let Some(found) = pattern::literal_at(&line, pos.saturating_sub(line_start)) else {
            tracing::debug!(pos, "No color literal under cursor");
            return Err(PickerError::NoColorAtPosition(pos));
        };
        let range = line_start + found.start..line_start + found.end;
        self.open(range, &found.literal)
    }

    /// Replacement for the session's literal, in its original syntax
    ///
    /// The session follows the edit, so successive changes keep replacing
    /// the right span.
    pub fn change(&mut self, color: Rgb) -> Result<Replacement, PickerError> {
        let session = self.session.as_mut().ok_or(PickerError::NoSession)?;
        let text = format_like(color, &session.literal);
        let replacement = Replacement {
            range: session.range.clone(),
            text: text.clone(),
        };
        session.range = session.range.start..session.range.start + text.len();
        session.preview = color.to_hex();
        session.literal = text;
        Ok(replacement)
    }

    /// Check the session still points at its literal in `text`
    pub fn verify<T: TextSource + ?Sized>(&self, text: &T) -> Result<(), PickerError> {
        let session = self.session.as_ref().ok_or(PickerError::NoSession)?;
        if text.slice(session.range.clone()) == session.literal.as_str() {
            Ok(())
        } else {
            Err(PickerError::StaleRange {
                range: session.range.clone(),
            })
        }
    }

    /// Pointer entered a decoration; opens after the debounce unless hidden
    pub fn request_show(
        &mut self,
        target: DecorationId,
        range: Range<usize>,
        literal: &str,
        now: Instant,
    ) {
        if !self.enabled {
            return;
        }
        if self.session.as_ref().and_then(|s| s.target) == Some(target) {
            return;
        }
        self.pending = Some(PendingShow {
            target,
            range,
            literal: literal.to_string(),
            due: now + self.debounce,
        });
    }

    /// Pointer left `target`; cancels its pending show
    pub fn request_hide(&mut self, target: DecorationId) -> bool {
        match &self.pending {
            Some(pending) if pending.target == target => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// When the pending show is due, open it
    pub fn poll(&mut self, now: Instant) -> Option<&PickerSession> {
        if !self.pending.as_ref().is_some_and(|p| now >= p.due) {
            return None;
        }
        let pending = self.pending.take()?;
        let session = PickerSession::new(pending.range, &pending.literal, Some(pending.target));
        self.open_session(session).ok()
    }
}
