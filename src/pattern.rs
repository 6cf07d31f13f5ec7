//! Color literal scanner
//!
//! A single compiled alternation recognizes every supported literal syntax.
//! The regex itself holds no scan position: callers pass an explicit cursor
//! (`find_next`) or take the full ordered list (`find_all`), so one scan can
//! never leak into another.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const ALPHA: &str = r"(?:\d+(?:\.\d+)?|\.\d+)";

static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        concat!(
            r"#[0-9a-fA-F]+",
            r"|rgba\(\s*\d{{1,3}}\s*,\s*\d{{1,3}}\s*,\s*\d{{1,3}}\s*,\s*{alpha}\s*\)",
            r"|rgb\(\s*\d{{1,3}}\s*,\s*\d{{1,3}}\s*,\s*\d{{1,3}}\s*\)",
            r"|hsla\(\s*\d{{1,3}}\s*,\s*\d{{1,3}}%\s*,\s*\d{{1,3}}%\s*,\s*{alpha}\s*\)",
            r"|hsl\(\s*\d{{1,3}}\s*,\s*\d{{1,3}}%\s*,\s*\d{{1,3}}%\s*\)",
        ),
        alpha = ALPHA
    );
    Regex::new(&pattern).expect("color pattern is valid")
});

/// `#word` where the word has at least one non-digit
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(#[\w/-]*[\p{L}_/-][\w/-]*)").expect("hashtag pattern is valid")
});

/// A literal found in a buffer, as half-open byte offsets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColorMatch {
    pub start: usize,
    pub end: usize,
    pub literal: String,
}

impl ColorMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` touches the literal (end inclusive, so a caret placed
    /// right after the literal still counts)
    pub fn touches(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// `regex` has no lookahead, so a hex run is matched greedily and accepted
/// only when its full length is a valid digit count. This is the same as
/// refusing a match followed by a further hex digit.
fn is_accepted(candidate: &str) -> bool {
    match candidate.strip_prefix('#') {
        Some(digits) => matches!(digits.len(), 3 | 4 | 6 | 8),
        None => true,
    }
}

/// Find the first literal at or after byte `cursor` in `text`
///
/// Offsets in the result are shifted by `base`, the position of `text` in the
/// whole buffer. Resume with `cursor = match.end - base`.
pub fn find_next(text: &str, cursor: usize, base: usize) -> Option<ColorMatch> {
    let mut at = cursor;
    while at <= text.len() {
        let m = COLOR_PATTERN.find_at(text, at)?;
        if is_accepted(m.as_str()) {
            return Some(ColorMatch {
                start: base + m.start(),
                end: base + m.end(),
                literal: m.as_str().to_string(),
            });
        }
        at = m.end();
    }
    None
}

/// Iterator over successive non-overlapping matches
pub struct Matches<'t> {
    text: &'t str,
    cursor: usize,
    base: usize,
}

impl Iterator for Matches<'_> {
    type Item = ColorMatch;

    fn next(&mut self) -> Option<ColorMatch> {
        let found = find_next(self.text, self.cursor, self.base)?;
        self.cursor = found.end - self.base;
        Some(found)
    }
}

/// Lazily scan `text`, whose first byte sits at `base` in the buffer
pub fn matches(text: &str, base: usize) -> Matches<'_> {
    Matches {
        text,
        cursor: 0,
        base,
    }
}

/// All literals in `text`, left to right
pub fn find_all(text: &str, base: usize) -> Vec<ColorMatch> {
    matches(text, base).collect()
}

/// The literal covering `pos`, if any
pub fn literal_at(text: &str, pos: usize) -> Option<ColorMatch> {
    matches(text, 0)
        .take_while(|m| m.start <= pos)
        .find(|m| m.touches(pos))
}

/// Byte ranges of the hashtags in `text`, `#` included
///
/// A hashtag starts the text or follows whitespace. All-digit words such as
/// `#123` are not tags.
pub fn hashtags(text: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    HASHTAG
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|tag| tag.range())
}
