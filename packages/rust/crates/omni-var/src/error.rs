//! Error types for var refactoring operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for the refactoring pipeline.
///
/// The edit variants describe a malformed edit sequence handed to the
/// rewrite engine. The file variants only surface from the batch driver
/// and [`crate::read_source_file`].
#[derive(Error, Debug)]
pub enum RefactorError {
    /// Edit starts after it ends.
    #[error("Inverted edit: start {start} > end {end}")]
    InvertedEdit {
        /// Original start offset.
        start: usize,
        /// Original end offset.
        end: usize,
    },

    /// Edit reaches past the end of the source.
    #[error("Edit out of bounds: end {end} exceeds source length {len}")]
    EditOutOfBounds {
        /// Original end offset.
        end: usize,
        /// Source length in bytes.
        len: usize,
    },

    /// Edit offset splits a UTF-8 character.
    #[error("Edit offset {offset} is not on a character boundary")]
    NotCharBoundary {
        /// Offending byte offset.
        offset: usize,
    },

    /// Edit starts before the previous edit's start.
    #[error("Edits out of order: start {start} precedes previous start {previous_start}")]
    EditOutOfOrder {
        /// Start of the previous edit.
        previous_start: usize,
        /// Start of the offending edit.
        start: usize,
    },

    /// Edit starts inside the previous edit's span.
    #[error("Overlapping edits: start {start} is inside previous span ending at {previous_end}")]
    EditOverlap {
        /// End of the previous edit.
        previous_end: usize,
        /// Start of the offending edit.
        start: usize,
    },

    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// Source is not valid UTF-8; rewriting it would not be byte-exact.
    #[error("UTF-8 decoding error")]
    Encoding,

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefactorError {
    /// Whether this error describes a malformed edit sequence (a caller bug)
    /// rather than a file problem.
    #[must_use]
    pub fn is_malformed_edit(&self) -> bool {
        matches!(
            self,
            Self::InvertedEdit { .. }
                | Self::EditOutOfBounds { .. }
                | Self::NotCharBoundary { .. }
                | Self::EditOutOfOrder { .. }
                | Self::EditOverlap { .. }
        )
    }
}
