//! Diff previews for refactored sources, built on the `similar` crate.

use std::time::Duration;

use similar::TextDiff;

/// Lines of unchanged context around each hunk.
const CONTEXT_LINES: usize = 3;

/// Upper bound on diffing time; past it `similar` settles for a coarser
/// (still correct) diff.
const DIFF_TIMEOUT: Duration = Duration::from_secs(1);

fn line_diff<'a>(original: &'a str, modified: &'a str) -> TextDiff<'a, 'a, 'a, str> {
    TextDiff::configure()
        .timeout(DIFF_TIMEOUT)
        .diff_lines(original, modified)
}

/// Unified diff between two texts, with `@@` hunk headers.
///
/// Empty when the texts are equal.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }
    line_diff(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .missing_newline_hint(false)
        .to_string()
}

/// Unified diff with `--- a/<path>` / `+++ b/<path>` file headers.
#[must_use]
pub fn generate_file_diff(path: &str, original: &str, modified: &str) -> String {
    if original == modified {
        return String::new();
    }
    line_diff(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .missing_newline_hint(false)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_change() {
        let original = "class X {\n  String s = \"a\";\n}\n";
        let modified = "class X {\n  var s = \"a\";\n}\n";
        let diff = generate_unified_diff(original, modified);

        assert!(diff.contains("@@"));
        assert!(diff.contains("-  String s = \"a\";"));
        assert!(diff.contains("+  var s = \"a\";"));
    }

    #[test]
    fn test_no_changes() {
        assert!(generate_unified_diff("same", "same").is_empty());
        assert!(generate_file_diff("X.java", "same", "same").is_empty());
    }

    #[test]
    fn test_file_headers() {
        let diff = generate_file_diff("src/X.java", "int a = 1;\n", "var a = 1;\n");
        assert!(diff.starts_with("--- a/src/X.java\n+++ b/src/X.java\n"));
        assert!(diff.contains("+var a = 1;"));
    }

    #[test]
    fn test_large_change_still_diffs() {
        let original = "    String s = \"x\";\n".repeat(20_000);
        let modified = "    var s = \"x\";\n".repeat(20_000);
        let diff = generate_unified_diff(&original, &modified);
        assert!(diff.contains("-    String s = \"x\";"));
        assert!(diff.contains("+    var s = \"x\";"));
    }
}
