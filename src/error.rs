//! Error types shared across the crate
//!
//! Core operations are total: these errors are produced internally and turned
//! into fallbacks plus a log line. Only the `try_*` entry points, the sink and
//! the picker's manual command hand them to callers.

use std::ops::Range;

use thiserror::Error;

/// A matched literal whose numeric content could not be turned into a color
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("unrecognized color literal: {0:?}")]
    UnknownFamily(String),

    #[error("malformed numeric group in {literal:?}")]
    Malformed { literal: String },

    #[error("{literal:?} has {found} channels, expected {expected}")]
    MissingChannel {
        literal: String,
        expected: usize,
        found: usize,
    },

    #[error("{component} = {value} is out of range in {literal:?}")]
    OutOfRange {
        literal: String,
        component: &'static str,
        value: f64,
    },
}

/// Rejection of a single annotation by a decoration sink
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("empty or inverted range {start}..{end}")]
    EmptyRange { start: usize, end: usize },

    #[error("annotation at {position} precedes previous annotation ending at {previous_end}")]
    OutOfOrder { position: usize, previous_end: usize },

    #[error("range {start}..{end} exceeds document length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Color picker bridge failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("no color literal at position {0}")]
    NoColorAtPosition(usize),

    #[error("no active picker session")]
    NoSession,

    #[error("color picker is disabled")]
    Disabled,

    #[error("session range {range:?} no longer matches the buffer")]
    StaleRange { range: Range<usize> },
}

/// Settings persistence failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
