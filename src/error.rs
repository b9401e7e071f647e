use thiserror::Error;

/// Errors raised by the editing engine.
///
/// Only `InvalidRange` is meant to reach callers; the other variants are
/// recovered close to where they happen (parse failures fall back to a plain
/// text import, clipboard failures turn the operation into a no-op).
#[derive(Debug, Error, PartialEq)]
pub enum EditorError {
    #[error("invalid range {start}..{end} for document of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("malformed note content at byte {offset}: {reason}")]
    ParseFailure { offset: usize, reason: String },

    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<arboard::Error> for EditorError {
    fn from(err: arboard::Error) -> Self {
        EditorError::ClipboardUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        EditorError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
