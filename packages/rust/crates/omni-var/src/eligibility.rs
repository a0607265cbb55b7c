//! Policy-driven eligibility rules for `var` replacement.

use crate::policy::RefactorPolicy;

/// Type names the language treats as primitives.
pub const PRIMITIVE_TYPES: [&str; 8] = [
    "int", "long", "short", "byte", "char", "float", "double", "boolean",
];

/// Decide whether a declaration's explicit type may become `var`.
///
/// Each rule is a hard veto, checked in order:
/// 1. only local variables qualify;
/// 2. loop variables need `allows_loop_variables`;
/// 3. a diamond in the declared type needs `allows_diamond_operator`;
/// 4. primitive declared types need `allows_primitive_types`;
/// 5. declared and initializer types must match exactly unless
///    `allows_type_mismatch`.
///
/// Type names may come from [`crate::infer_type`] or from an external
/// resolver; both are compared as plain text.
///
/// # Example
///
/// ```rust
/// use omni_var::{is_eligible, RefactorPolicy};
///
/// let policy = RefactorPolicy::default();
/// assert!(is_eligible("String", "String", true, false, &policy));
/// assert!(!is_eligible("String", "String", false, false, &policy));
/// ```
#[must_use]
pub fn is_eligible(
    declared_type: &str,
    initializer_type: &str,
    is_local: bool,
    is_loop_variable: bool,
    policy: &RefactorPolicy,
) -> bool {
    if !is_local {
        return false;
    }

    if is_loop_variable && !policy.allows_loop_variables() {
        return false;
    }

    if has_diamond(declared_type) && !policy.allows_diamond_operator() {
        return false;
    }

    if is_primitive(declared_type) && !policy.allows_primitive_types() {
        return false;
    }

    if declared_type != initializer_type && !policy.allows_type_mismatch() {
        return false;
    }

    true
}

/// Whether `type_name` is one of [`PRIMITIVE_TYPES`].
#[must_use]
pub fn is_primitive(type_name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&type_name)
}

/// Whether the type carries an empty generic argument list (`<>`, `<,>`).
#[must_use]
pub fn has_diamond(type_name: &str) -> bool {
    type_name.match_indices('<').any(|(idx, _)| {
        type_name[idx + 1..]
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',')
            .starts_with('>')
    })
}
