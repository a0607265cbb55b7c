//! Refactoring pipeline: version gate, then locate, infer, decide, rewrite.
//!
//! Every entry point is a pure function of its inputs. The policy is passed
//! explicitly on each call; nothing here reads global settings.

use rayon::prelude::*;

use crate::diff::generate_unified_diff;
use crate::eligibility::is_eligible;
use crate::error::RefactorError;
use crate::infer::{InitializerKind, infer_type, initializer_kind};
use crate::locate::{DeclarationLocator, TextLocator};
use crate::policy::RefactorPolicy;
use crate::rewrite::apply_edits;
use crate::types::{Declaration, EditOperation, ProcessingResult};

/// Oldest language version that accepts `var` for local variables.
pub const MIN_LANGUAGE_VERSION: u32 = 10;

/// Keyword written in place of an explicit type.
pub const INFERRED_TYPE_KEYWORD: &str = "var";

/// Whether `version` names a release that supports `var`.
///
/// The token is trimmed and parsed as an integer; anything unparseable
/// (`"1.8"`, `""`, `"latest"`) counts as unsupported.
#[must_use]
pub fn supports_inferred_types(version: &str) -> bool {
    version
        .trim()
        .parse::<u32>()
        .is_ok_and(|v| v >= MIN_LANGUAGE_VERSION)
}

/// Refactor one source text and return the new text.
///
/// Returns `source` unchanged when the version gate is closed or nothing is
/// eligible.
///
/// # Example
///
/// ```rust
/// use omni_var::{RefactorPolicy, process_file};
///
/// let out = process_file(
///     "class X { void m() { String s = \"hi\"; } }",
///     "11",
///     &RefactorPolicy::default(),
/// );
/// assert_eq!(out, "class X { void m() { var s = \"hi\"; } }");
/// ```
#[must_use]
pub fn process_file(source: &str, version: &str, policy: &RefactorPolicy) -> String {
    refactor_source(source, version, policy).modified
}

/// Refactor many source texts independently.
///
/// Output order mirrors input order. Files are processed in parallel; no
/// state is shared between them.
#[must_use]
pub fn process_files<S>(sources: &[S], version: &str, policy: &RefactorPolicy) -> Vec<String>
where
    S: AsRef<str> + Sync,
{
    if !supports_inferred_types(version) {
        tracing::debug!(version, files = sources.len(), "version gate closed");
        return sources.iter().map(|s| s.as_ref().to_string()).collect();
    }
    sources
        .par_iter()
        .map(|source| process_file(source.as_ref(), version, policy))
        .collect()
}

/// Refactor one source text and describe what changed.
#[must_use]
pub fn refactor_source(source: &str, version: &str, policy: &RefactorPolicy) -> ProcessingResult {
    refactor_with(&TextLocator, source, version, policy)
}

/// [`refactor_source`] with a caller-chosen locator.
#[must_use]
pub fn refactor_with<L>(
    locator: &L,
    source: &str,
    version: &str,
    policy: &RefactorPolicy,
) -> ProcessingResult
where
    L: DeclarationLocator + ?Sized,
{
    if !supports_inferred_types(version) {
        tracing::debug!(version, "version gate closed; returning source unchanged");
        return ProcessingResult::unchanged(source);
    }

    let declarations = locator.locate(source);
    match process_declarations(source, &declarations, policy) {
        Ok(result) => result,
        Err(error) => {
            // A locator broke the ordering contract; leave the text alone.
            tracing::warn!(error = %error, "locator produced a malformed edit sequence");
            ProcessingResult::unchanged(source)
        }
    }
}

/// Rewrite the eligible ones among caller-supplied declarations.
///
/// For integrations with their own parser: declarations may carry resolved
/// `initializer_type`s, and must be ascending and non-overlapping. No
/// version gate is applied here.
///
/// # Errors
/// Returns a malformed-edit [`RefactorError`] when the declarations' type
/// spans are out of order, overlap, or do not fit `source`.
pub fn process_declarations(
    source: &str,
    declarations: &[Declaration],
    policy: &RefactorPolicy,
) -> Result<ProcessingResult, RefactorError> {
    let edits = plan_edits(declarations, policy);
    if edits.is_empty() {
        return Ok(ProcessingResult::unchanged(source));
    }

    let outcome = apply_edits(source, &edits)?;
    let diff = generate_unified_diff(source, &outcome.text);

    tracing::debug!(
        candidates = declarations.len(),
        replaced = outcome.applied.len(),
        "rewrote declarations"
    );

    Ok(ProcessingResult {
        original: source.to_string(),
        modified: outcome.text,
        count: outcome.applied.len(),
        diff,
        edits: outcome.applied,
    })
}

/// Edits replacing the type of every eligible declaration with `var`.
///
/// Edits follow the order of `declarations`.
#[must_use]
pub fn plan_edits(declarations: &[Declaration], policy: &RefactorPolicy) -> Vec<EditOperation> {
    declarations
        .iter()
        .filter(|decl| should_rewrite(decl, policy))
        .map(|decl| EditOperation::new(decl.type_span.clone(), INFERRED_TYPE_KEYWORD))
        .collect()
}

/// Full decision for one declaration.
#[must_use]
pub fn should_rewrite(decl: &Declaration, policy: &RefactorPolicy) -> bool {
    if decl.declared_type == INFERRED_TYPE_KEYWORD {
        return false;
    }

    let admitted = match initializer_kind(&decl.initializer) {
        InitializerKind::NullLiteral | InitializerKind::ArrayInitializer => false,
        InitializerKind::Lambda => policy.refactors_lambda_expressions(),
        InitializerKind::AnonymousClass => policy.refactors_anonymous_classes(),
        InitializerKind::Expression => true,
    };
    if !admitted {
        return false;
    }

    let initializer_type = decl
        .initializer_type
        .clone()
        .unwrap_or_else(|| infer_type(&decl.initializer));

    is_eligible(
        &decl.declared_type,
        &initializer_type,
        decl.is_local(),
        decl.is_loop_variable,
        policy,
    )
}

/// Format a processing result for display.
///
/// Returns a human-readable summary of the changes.
#[must_use]
pub fn format_result(result: &ProcessingResult, path: Option<&str>) -> String {
    let mut output = String::new();

    if let Some(p) = path {
        output.push_str(&format!("// FILE: {p}\n"));
    }
    output.push_str(&format!("// Replacements: {}\n", result.count));

    if result.count == 0 {
        output.push_str("[No eligible declarations]\n");
        return output;
    }

    output.push_str("\n// Changes:\n");
    for edit in &result.edits {
        output.push_str(&format!(
            "L{}:{}: \"{}\" -> \"{}\"\n",
            edit.line, edit.column, edit.original_text, edit.new_text
        ));
    }

    output.push_str("\n// Diff:\n");
    output.push_str(&result.diff);

    output
}
