use thiserror::Error;

/// Errors raised by [`TextBuffer`](crate::buffer::TextBuffer) operations.
///
/// The buffer trusts its callers to pass coordinates that are already in
/// bounds. Seeing one of these outside of tests means a motion produced an
/// unclamped endpoint; the buffer is left untouched when an operation fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("coordinate out of range: row {row}, col {col}")]
    CoordinateOutOfRange { row: usize, col: usize },

    #[error("offset {offset} is outside the document or not on a character boundary")]
    OffsetOutOfRange { offset: usize },

    #[error("range start {start} lies after range end {end}")]
    InvertedRange { start: usize, end: usize },

    #[error("replacement text for line {row} contains a line break")]
    MalformedLineMutation { row: usize },
}

/// Errors surfaced by the session-level queries that take user patterns.
#[derive(Error, Debug, Clone)]
pub enum EditError {
    #[error("buffer operation failed")]
    Buffer(#[from] BufferError),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T, E = BufferError> = std::result::Result<T, E>;
