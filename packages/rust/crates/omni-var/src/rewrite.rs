//! Offset-safe text substitution.
//!
//! Edits arrive in original-text coordinates. They are applied left to
//! right in a single pass over the source. A running delta translates each
//! one into output coordinates, so any number of shrinking or growing
//! replacements can precede a given edit.

use memchr::memchr_iter;

use crate::error::RefactorError;
use crate::types::{AppliedEdit, EditOperation, signed_len};

/// Text produced by [`apply_edits`] together with the applied edits.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// Rewritten text.
    pub text: String,
    /// One entry per input edit, in the same order.
    pub applied: Vec<AppliedEdit>,
}

/// Apply `edits` to `source` and return the rewritten text.
///
/// Bytes outside the edit spans are preserved exactly.
///
/// # Errors
/// Returns a malformed-edit variant of [`RefactorError`] when an edit is
/// inverted, out of bounds, splits a character, or is out of order with /
/// overlaps the previous edit. Nothing is applied in that case.
///
/// # Example
///
/// ```rust
/// use omni_var::{EditOperation, rewrite};
///
/// let out = rewrite("String a; String b;", &[
///     EditOperation::new(0..6, "var"),
///     EditOperation::new(10..16, "var"),
/// ])?;
/// assert_eq!(out, "var a; var b;");
/// # Ok::<(), omni_var::RefactorError>(())
/// ```
pub fn rewrite(source: &str, edits: &[EditOperation]) -> Result<String, RefactorError> {
    apply_edits(source, edits).map(|outcome| outcome.text)
}

/// Apply `edits` to `source`, reporting where each one landed.
///
/// # Errors
/// Same as [`rewrite`].
pub fn apply_edits(source: &str, edits: &[EditOperation]) -> Result<RewriteOutcome, RefactorError> {
    validate_edits(source, edits)?;

    let growth: usize = edits.iter().map(|edit| edit.replacement.len()).sum();
    let mut text = String::with_capacity(source.len() + growth);
    let mut applied = Vec::with_capacity(edits.len());
    let mut delta: isize = 0;
    let mut cursor = 0;
    let mut position = LinePosition::default();

    for edit in edits {
        text.push_str(&source[cursor..edit.start]);
        text.push_str(&edit.replacement);
        cursor = edit.end;

        let physical_start = edit.start.saturating_add_signed(delta);
        position.advance(source, edit.start);

        applied.push(AppliedEdit {
            line: position.line,
            column: edit.start - position.line_start + 1,
            original_span: edit.start..edit.end,
            physical_span: physical_start..physical_start + edit.replacement.len(),
            original_text: source[edit.start..edit.end].to_string(),
            new_text: edit.replacement.clone(),
        });

        delta += signed_len(edit.replacement.len()) - signed_len(edit.end - edit.start);
    }
    text.push_str(&source[cursor..]);

    Ok(RewriteOutcome { text, applied })
}

/// 1-based line of an offset, counted forward from the previous offset.
#[derive(Debug)]
struct LinePosition {
    scanned: usize,
    line: usize,
    line_start: usize,
}

impl Default for LinePosition {
    fn default() -> Self {
        Self {
            scanned: 0,
            line: 1,
            line_start: 0,
        }
    }
}

impl LinePosition {
    /// Move to `offset`, which must not precede the last one.
    fn advance(&mut self, source: &str, offset: usize) {
        for newline in memchr_iter(b'\n', &source.as_bytes()[self.scanned..offset]) {
            self.line += 1;
            self.line_start = self.scanned + newline + 1;
        }
        self.scanned = offset;
    }
}

/// Check that every edit is well formed and that the sequence is ascending
/// and non-overlapping.
fn validate_edits(source: &str, edits: &[EditOperation]) -> Result<(), RefactorError> {
    let mut previous: Option<&EditOperation> = None;

    for edit in edits {
        if edit.start > edit.end {
            return Err(RefactorError::InvertedEdit {
                start: edit.start,
                end: edit.end,
            });
        }
        if edit.end > source.len() {
            return Err(RefactorError::EditOutOfBounds {
                end: edit.end,
                len: source.len(),
            });
        }
        for offset in [edit.start, edit.end] {
            if !source.is_char_boundary(offset) {
                return Err(RefactorError::NotCharBoundary { offset });
            }
        }
        if let Some(prev) = previous {
            if edit.start < prev.start {
                return Err(RefactorError::EditOutOfOrder {
                    previous_start: prev.start,
                    start: edit.start,
                });
            }
            if edit.start < prev.end {
                return Err(RefactorError::EditOverlap {
                    previous_end: prev.end,
                    start: edit.start,
                });
            }
        }
        previous = Some(edit);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_edits_returns_source() {
        let source = "class X {}";
        assert_eq!(rewrite(source, &[]).expect("rewrite"), source);
    }

    #[test]
    fn test_shrinking_then_growing() {
        let source = "String a = x; T b = y; Object c = z;";
        let edits = [
            EditOperation::new(0..6, "var"),
            EditOperation::new(14..15, "Longer"),
            EditOperation::new(23..29, "var"),
        ];
        let outcome = apply_edits(source, &edits).expect("apply");
        assert_eq!(outcome.text, "var a = x; Longer b = y; var c = z;");

        assert_eq!(outcome.applied[0].physical_span, 0..3);
        assert_eq!(outcome.applied[1].physical_span, 11..17);
        assert_eq!(outcome.applied[2].physical_span, 25..28);
        for applied in &outcome.applied {
            assert_eq!(&outcome.text[applied.physical_span.clone()], applied.new_text);
            assert_eq!(&source[applied.original_span.clone()], applied.original_text);
        }
    }

    #[test]
    fn test_line_and_column() {
        let source = "a\n  String s = \"\";";
        let outcome = apply_edits(source, &[EditOperation::new(4..10, "var")]).expect("apply");
        assert_eq!(outcome.applied[0].line, 2);
        assert_eq!(outcome.applied[0].column, 3);
    }

    #[test]
    fn test_many_edits_in_large_source() {
        let decl = "String s = \"x\";\n";
        let count = 50_000;
        let source = decl.repeat(count);
        let edits: Vec<EditOperation> = (0..count)
            .map(|i| {
                let start = i * decl.len();
                EditOperation::new(start..start + 6, "var")
            })
            .collect();

        let outcome = apply_edits(&source, &edits).expect("apply");
        assert_eq!(outcome.applied.len(), count);
        assert_eq!(outcome.text.len(), source.len() - 3 * count);

        let last = &outcome.applied[count - 1];
        assert_eq!(last.line, count);
        assert_eq!(last.column, 1);
        assert_eq!(last.physical_span.start, (count - 1) * (decl.len() - 3));
        assert_eq!(&outcome.text[last.physical_span.clone()], "var");
        assert!(outcome.text.ends_with("var s = \"x\";\n"));
    }

    #[test]
    fn test_line_and_column_across_edits() {
        let source = "String a = x;\n\n  String b = y; String c = z;";
        let outcome = apply_edits(
            source,
            &[
                EditOperation::new(0..6, "var"),
                EditOperation::new(17..23, "var"),
                EditOperation::new(31..37, "var"),
            ],
        )
        .expect("apply");
        let positions: Vec<(usize, usize)> =
            outcome.applied.iter().map(|a| (a.line, a.column)).collect();
        assert_eq!(positions, vec![(1, 1), (3, 3), (3, 17)]);
        assert_eq!(outcome.text, "var a = x;\n\n  var b = y; var c = z;");
    }

    #[test]
    fn test_adjacent_edits_allowed() {
        let out = rewrite(
            "abcdef",
            &[EditOperation::new(0..3, "X"), EditOperation::new(3..6, "Y")],
        )
        .expect("rewrite");
        assert_eq!(out, "XY");
    }

    #[test]
    fn test_overlap_rejected() {
        let err = rewrite(
            "abcdef",
            &[EditOperation::new(0..4, "X"), EditOperation::new(2..5, "Y")],
        )
        .expect_err("overlap");
        assert!(matches!(err, RefactorError::EditOverlap { previous_end: 4, start: 2 }));
        assert!(err.is_malformed_edit());
    }

    #[test]
    fn test_out_of_order_rejected() {
        let err = rewrite(
            "abcdef",
            &[EditOperation::new(3..4, "X"), EditOperation::new(0..1, "Y")],
        )
        .expect_err("order");
        assert!(matches!(err, RefactorError::EditOutOfOrder { .. }));
    }

    #[test]
    fn test_bounds_and_boundaries_rejected() {
        assert!(matches!(
            rewrite("abc", &[EditOperation::new(1..9, "X")]),
            Err(RefactorError::EditOutOfBounds { end: 9, len: 3 })
        ));
        assert!(matches!(
            rewrite("abc", &[EditOperation { start: 2, end: 1, replacement: String::new() }]),
            Err(RefactorError::InvertedEdit { .. })
        ));
        assert!(matches!(
            rewrite("é", &[EditOperation::new(1..2, "X")]),
            Err(RefactorError::NotCharBoundary { offset: 1 })
        ));
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let source = "/* café */ String s = \"naïve\";";
        let start = source.find("String").expect("type");
        let out = rewrite(source, &[EditOperation::new(start..start + 6, "var")]).expect("rewrite");
        assert_eq!(out, "/* café */ var s = \"naïve\";");
    }
}
