//! Read access to the buffer being decorated
//!
//! The builder only needs byte slices and line starts, so it works the same
//! over a plain `str` and over the editor's `Rope`.

use std::borrow::Cow;
use std::ops::Range;

use ropey::Rope;

/// A text buffer addressed by UTF-8 byte offsets
pub trait TextSource {
    /// Total length in bytes
    fn len_bytes(&self) -> usize;

    /// Text in `range`, with both ends snapped down to char boundaries
    fn slice(&self, range: Range<usize>) -> Cow<'_, str>;

    /// Byte offset of the start of the line containing `pos`
    fn line_start(&self, pos: usize) -> usize;

    /// Byte offset of the end of the line containing `pos`, newline excluded
    fn line_end(&self, pos: usize) -> usize;

    /// Largest char boundary at or below `pos`, clamped to the length
    fn floor_boundary(&self, pos: usize) -> usize;
}

/// Largest char boundary at or below `pos`
fn floor_char_boundary(s: &str, pos: usize) -> usize {
    let mut pos = pos.min(s.len());
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

impl TextSource for str {
    fn len_bytes(&self) -> usize {
        self.len()
    }

    fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        let start = floor_char_boundary(self, range.start);
        let end = floor_char_boundary(self, range.end).max(start);
        Cow::Borrowed(&self[start..end])
    }

    fn line_start(&self, pos: usize) -> usize {
        let pos = floor_char_boundary(self, pos);
        self[..pos].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self, pos: usize) -> usize {
        let pos = floor_char_boundary(self, pos);
        let end = self[pos..].find('\n').map_or(self.len(), |i| pos + i);
        if end > pos && self.as_bytes()[end - 1] == b'\r' {
            end - 1
        } else {
            end
        }
    }

    fn floor_boundary(&self, pos: usize) -> usize {
        floor_char_boundary(self, pos)
    }
}

impl TextSource for String {
    fn len_bytes(&self) -> usize {
        self.as_str().len_bytes()
    }

    fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        self.as_str().slice(range)
    }

    fn line_start(&self, pos: usize) -> usize {
        self.as_str().line_start(pos)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.as_str().line_end(pos)
    }

    fn floor_boundary(&self, pos: usize) -> usize {
        self.as_str().floor_boundary(pos)
    }
}

impl TextSource for Rope {
    fn len_bytes(&self) -> usize {
        Rope::len_bytes(self)
    }

    fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = Rope::len_bytes(self);
        let start = self.byte_to_char(range.start.min(len));
        let end = self.byte_to_char(range.end.min(len)).max(start);
        let slice = Rope::slice(self, start..end);
        match slice.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(slice.to_string()),
        }
    }

    fn line_start(&self, pos: usize) -> usize {
        let line = self.byte_to_line(pos.min(Rope::len_bytes(self)));
        self.line_to_byte(line)
    }

    fn line_end(&self, pos: usize) -> usize {
        let line = self.byte_to_line(pos.min(Rope::len_bytes(self)));
        let content = self.line(line).to_string();
        self.line_to_byte(line) + content.trim_end_matches(['\n', '\r']).len()
    }

    fn floor_boundary(&self, pos: usize) -> usize {
        // byte_to_char maps a byte inside a char to that char
        self.char_to_byte(self.byte_to_char(pos.min(Rope::len_bytes(self))))
    }
}

/// Snap a byte range onto char boundaries of `text`, clamped to its length
pub fn snap_range<T: TextSource + ?Sized>(text: &T, range: Range<usize>) -> Range<usize> {
    let start = text.floor_boundary(range.start);
    let end = text.floor_boundary(range.end).max(start);
    start..end
}
