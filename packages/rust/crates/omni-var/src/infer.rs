//! Literal-driven type inference for initializer expressions.
//!
//! A heuristic, not a type checker. Callers that own a real resolver put
//! its answer in [`crate::Declaration::initializer_type`] and this module
//! is never consulted for that declaration.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Type name reported for string literals.
pub const STRING_TYPE: &str = "String";

/// Fallback when nothing more specific can be inferred.
pub const OBJECT_TYPE: &str = "Object";

/// Compile a hardcoded pattern, falling back to a never-matching regex.
pub(crate) fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(fallback) => fallback,
            Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
        },
    }
}

static INT_LITERAL: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"^\d+$"));
static LONG_LITERAL: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"^\d+[lL]$"));
static FLOAT_LITERAL: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"^\d+\.\d+[fF]$"));
static DOUBLE_LITERAL: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"^\d+\.\d+$"));
static CONSTRUCTION: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^new\s+([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*)"));
static LAMBDA_HEAD: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^(?:\([^()]*\)|[A-Za-z_$][\w$]*)\s*->"));
static METHOD_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^[A-Za-z_$][\w$.<>\[\]]*\s*::\s*(?:new|[A-Za-z_$][\w$]*)$"));

/// Infer a type name from an initializer's literal form.
///
/// Rules, first match wins: `int`, `long`, `float`, `double` numeric
/// literals, `boolean`, string literal, `new T(...)` / `new T<...>(...)`,
/// then [`OBJECT_TYPE`]. Total: never fails.
///
/// # Example
///
/// ```rust
/// use omni_var::infer_type;
///
/// assert_eq!(infer_type("42"), "int");
/// assert_eq!(infer_type("new HashMap<>()"), "HashMap");
/// assert_eq!(infer_type("compute()"), "Object");
/// ```
#[must_use]
pub fn infer_type(initializer: &str) -> String {
    let text = initializer.trim();

    if INT_LITERAL.is_match(text) {
        return "int".to_string();
    }
    if LONG_LITERAL.is_match(text) {
        return "long".to_string();
    }
    if FLOAT_LITERAL.is_match(text) {
        return "float".to_string();
    }
    if DOUBLE_LITERAL.is_match(text) {
        return "double".to_string();
    }
    if text == "true" || text == "false" {
        return "boolean".to_string();
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return STRING_TYPE.to_string();
    }
    if let Some(constructed) = constructed_type(text) {
        return constructed;
    }

    OBJECT_TYPE.to_string()
}

/// Type named by an object or array construction expression.
fn constructed_type(text: &str) -> Option<String> {
    let caps = CONSTRUCTION.captures(text)?;
    let name = caps.get(1)?;
    let type_name: String = name.as_str().chars().filter(|c| !c.is_whitespace()).collect();
    let rest = text[name.end()..].trim_start();

    if rest.starts_with('[') {
        let dims = array_dimensions(rest);
        return Some(format!("{type_name}{}", "[]".repeat(dims)));
    }
    Some(type_name)
}

/// Count the leading `[...]` groups of an array creation suffix.
fn array_dimensions(rest: &str) -> usize {
    let mut dims = 0;
    let mut depth = 0usize;
    for ch in rest.chars() {
        match ch {
            '[' => {
                if depth == 0 {
                    dims += 1;
                }
                depth += 1;
            }
            ']' => depth = depth.saturating_sub(1),
            c if depth == 0 && !c.is_whitespace() => break,
            _ => {}
        }
    }
    dims
}

/// Shape of an initializer expression.
///
/// The language forbids `var` for some shapes outright and changes the
/// variable's type for others, so the orchestrator gates on this before
/// consulting the eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializerKind {
    /// Any other expression.
    Expression,
    /// Lambda or method reference; needs an explicit target type.
    Lambda,
    /// `new T(...) { ... }`; `var` would capture the anonymous subtype.
    AnonymousClass,
    /// Bare `{ ... }` array initializer.
    ArrayInitializer,
    /// The `null` literal.
    NullLiteral,
}

/// Classify an initializer expression.
#[must_use]
pub fn initializer_kind(initializer: &str) -> InitializerKind {
    let text = initializer.trim();

    if text == "null" {
        return InitializerKind::NullLiteral;
    }
    if text.starts_with('{') {
        return InitializerKind::ArrayInitializer;
    }
    if LAMBDA_HEAD.is_match(text) || METHOD_REFERENCE.is_match(text) {
        return InitializerKind::Lambda;
    }
    if is_anonymous_class(text) {
        return InitializerKind::AnonymousClass;
    }
    InitializerKind::Expression
}

/// `new T(args) {` with the body brace directly after the argument list.
fn is_anonymous_class(text: &str) -> bool {
    if !CONSTRUCTION.is_match(text) {
        return false;
    }
    let Some(open) = text.find('(') else {
        return false;
    };
    let mut depth = 0usize;
    for (idx, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return text[open + idx + 1..].trim_start().starts_with('{');
                }
            }
            _ => {}
        }
    }
    false
}
