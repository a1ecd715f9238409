//! Error types for the formatting engine

use thiserror::Error;

use crate::model::{Path, Point};

/// Result type for formatting commands and tree transforms
pub type FormatResult<T> = Result<T, FormatError>;

/// Why a command left the document untouched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("no selection")]
    NoSelection,

    #[error("selection point {point} does not resolve to a text leaf")]
    StaleRange { point: Point },

    #[error("no node at path {path:?}")]
    InvalidPath { path: Path },

    #[error("document invariant violated: {0}")]
    InvariantViolation(String),
}

impl FormatError {
    /// `NoSelection` is the ordinary "nothing to do" case, everything else
    /// means the caller handed us something we could not act on.
    pub fn is_no_selection(&self) -> bool {
        matches!(self, FormatError::NoSelection)
    }
}

/// Failure to parse a format name, hotkey, or point literal
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    #[error("invalid hotkey {hotkey:?}: {reason}")]
    InvalidHotkey { hotkey: String, reason: String },

    #[error("invalid point {0:?}: expected PATH:OFFSET such as 0.1:4")]
    InvalidPoint(String),
}
