//! Core types for var refactoring.
//!
//! Defines the data structures used throughout the refactoring pipeline.

use std::ops::Range;

use serde::Serialize;

/// Where a declaration lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Inside a method, constructor, initializer block or lambda body.
    Local,
    /// Directly inside a type body.
    Field,
}

/// A located variable declaration with an explicit type and an initializer.
///
/// Produced by a [`crate::DeclarationLocator`] (or built by a caller with
/// its own parser) and consumed once by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Declared type text, exactly as written (may include generics).
    pub declared_type: String,
    /// Variable name.
    pub variable_name: String,
    /// Byte span of the declared-type token; the only text ever replaced.
    pub type_span: Range<usize>,
    /// Initializer expression text, trimmed.
    pub initializer: String,
    /// Byte span of the trimmed initializer.
    pub initializer_span: Range<usize>,
    /// Type supplied by an external resolver. `None` means infer it.
    pub initializer_type: Option<String>,
    /// Local or field.
    pub scope: Scope,
    /// Controlling variable of a loop construct.
    pub is_loop_variable: bool,
}

impl Declaration {
    /// Whether the declaration is a local variable.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.scope == Scope::Local
    }
}

/// Replacement of `start..end` in the original text's coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOperation {
    /// Original start offset (bytes).
    pub start: usize,
    /// Original end offset (bytes, exclusive).
    pub end: usize,
    /// Text spliced in place of the span.
    pub replacement: String,
}

impl EditOperation {
    /// Create an edit replacing `span` with `replacement`.
    #[must_use]
    pub fn new(span: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            start: span.start,
            end: span.end,
            replacement: replacement.into(),
        }
    }

    /// Length change this edit causes.
    #[must_use]
    pub fn delta(&self) -> isize {
        signed_len(self.replacement.len()) - signed_len(self.end.saturating_sub(self.start))
    }
}

pub(crate) fn signed_len(len: usize) -> isize {
    isize::try_from(len).unwrap_or(isize::MAX)
}

/// An edit after it has been applied.
///
/// Provides precise position information for each replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedEdit {
    /// Line number in the original text (1-indexed).
    pub line: usize,
    /// Column number in the original text (1-indexed, bytes).
    pub column: usize,
    /// Span in the original text.
    pub original_span: Range<usize>,
    /// Span the replacement occupies in the output text.
    pub physical_span: Range<usize>,
    /// Original text that was replaced.
    pub original_text: String,
    /// New text after replacement.
    pub new_text: String,
}

/// Result of refactoring one source text.
///
/// Contains both the transformed content and metadata about the changes.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    /// Original content before modification.
    pub original: String,
    /// Content after replacement; equal to `original` when nothing applied.
    pub modified: String,
    /// Number of replacements made.
    pub count: usize,
    /// Unified diff showing changes.
    pub diff: String,
    /// Individual edits, in source order.
    pub edits: Vec<AppliedEdit>,
}

impl ProcessingResult {
    /// Result for text that passes through untouched.
    #[must_use]
    pub fn unchanged(content: &str) -> Self {
        Self {
            original: content.to_string(),
            modified: content.to_string(),
            count: 0,
            diff: String::new(),
            edits: Vec::new(),
        }
    }

    /// Whether any declaration was rewritten.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.count > 0
    }
}
