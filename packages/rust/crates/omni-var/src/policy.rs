//! Refactoring policy: which declaration categories may become `var`.

use serde::{Deserialize, Serialize};

/// Immutable set of switches consulted by the eligibility evaluator.
///
/// Built from [`RefactorPolicy::default`] and adjusted with the `with_*`
/// methods, each of which returns a new value. The engine only reads it, so
/// a single policy can be shared across threads processing many files.
///
/// # Example
///
/// ```rust
/// use omni_var::RefactorPolicy;
///
/// let strict = RefactorPolicy::default().with_primitive_types(false);
/// assert!(!strict.allows_primitive_types());
/// assert!(strict.allows_loop_variables());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RefactorPolicy {
    allow_primitive_types: bool,
    allow_loop_variables: bool,
    allow_diamond_operator: bool,
    allow_type_mismatch: bool,
    refactor_anonymous_classes: bool,
    refactor_lambda_expressions: bool,
}

impl Default for RefactorPolicy {
    fn default() -> Self {
        Self {
            allow_primitive_types: true,
            allow_loop_variables: true,
            allow_diamond_operator: true,
            allow_type_mismatch: false,
            refactor_anonymous_classes: false,
            refactor_lambda_expressions: false,
        }
    }
}

impl RefactorPolicy {
    /// Policy with every switch enabled.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            allow_primitive_types: true,
            allow_loop_variables: true,
            allow_diamond_operator: true,
            allow_type_mismatch: true,
            refactor_anonymous_classes: true,
            refactor_lambda_expressions: true,
        }
    }

    /// Primitive declarations (`int`, `double`, ...) may be rewritten.
    #[must_use]
    pub fn allows_primitive_types(&self) -> bool {
        self.allow_primitive_types
    }

    /// Loop-controlling variables may be rewritten.
    #[must_use]
    pub fn allows_loop_variables(&self) -> bool {
        self.allow_loop_variables
    }

    /// Declared types with a diamond (`<>`) may be rewritten.
    #[must_use]
    pub fn allows_diamond_operator(&self) -> bool {
        self.allow_diamond_operator
    }

    /// Declared and initializer types may differ.
    #[must_use]
    pub fn allows_type_mismatch(&self) -> bool {
        self.allow_type_mismatch
    }

    /// Anonymous class initializers may be rewritten.
    #[must_use]
    pub fn refactors_anonymous_classes(&self) -> bool {
        self.refactor_anonymous_classes
    }

    /// Lambda and method reference initializers may be rewritten.
    #[must_use]
    pub fn refactors_lambda_expressions(&self) -> bool {
        self.refactor_lambda_expressions
    }

    /// Set `allows_primitive_types`.
    #[must_use]
    pub fn with_primitive_types(self, allow: bool) -> Self {
        Self {
            allow_primitive_types: allow,
            ..self
        }
    }

    /// Set `allows_loop_variables`.
    #[must_use]
    pub fn with_loop_variables(self, allow: bool) -> Self {
        Self {
            allow_loop_variables: allow,
            ..self
        }
    }

    /// Set `allows_diamond_operator`.
    #[must_use]
    pub fn with_diamond_operator(self, allow: bool) -> Self {
        Self {
            allow_diamond_operator: allow,
            ..self
        }
    }

    /// Set `allows_type_mismatch`.
    #[must_use]
    pub fn with_type_mismatch(self, allow: bool) -> Self {
        Self {
            allow_type_mismatch: allow,
            ..self
        }
    }

    /// Set `refactors_anonymous_classes`.
    #[must_use]
    pub fn with_anonymous_classes(self, allow: bool) -> Self {
        Self {
            refactor_anonymous_classes: allow,
            ..self
        }
    }

    /// Set `refactors_lambda_expressions`.
    #[must_use]
    pub fn with_lambda_expressions(self, allow: bool) -> Self {
        Self {
            refactor_lambda_expressions: allow,
            ..self
        }
    }
}

/// Partial policy as it appears in a settings file or on the command line.
///
/// Unset switches fall through to the layer below when merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PolicySettings {
    pub allow_primitive_types: Option<bool>,
    pub allow_loop_variables: Option<bool>,
    pub allow_diamond_operator: Option<bool>,
    pub allow_type_mismatch: Option<bool>,
    pub refactor_anonymous_classes: Option<bool>,
    pub refactor_lambda_expressions: Option<bool>,
}

impl PolicySettings {
    /// Overlay wins where it has a value.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        Self {
            allow_primitive_types: overlay.allow_primitive_types.or(self.allow_primitive_types),
            allow_loop_variables: overlay.allow_loop_variables.or(self.allow_loop_variables),
            allow_diamond_operator: overlay
                .allow_diamond_operator
                .or(self.allow_diamond_operator),
            allow_type_mismatch: overlay.allow_type_mismatch.or(self.allow_type_mismatch),
            refactor_anonymous_classes: overlay
                .refactor_anonymous_classes
                .or(self.refactor_anonymous_classes),
            refactor_lambda_expressions: overlay
                .refactor_lambda_expressions
                .or(self.refactor_lambda_expressions),
        }
    }

    /// Apply the set switches on top of `base`.
    #[must_use]
    pub fn resolve(&self, base: RefactorPolicy) -> RefactorPolicy {
        RefactorPolicy {
            allow_primitive_types: self.allow_primitive_types.unwrap_or(base.allow_primitive_types),
            allow_loop_variables: self.allow_loop_variables.unwrap_or(base.allow_loop_variables),
            allow_diamond_operator: self
                .allow_diamond_operator
                .unwrap_or(base.allow_diamond_operator),
            allow_type_mismatch: self.allow_type_mismatch.unwrap_or(base.allow_type_mismatch),
            refactor_anonymous_classes: self
                .refactor_anonymous_classes
                .unwrap_or(base.refactor_anonymous_classes),
            refactor_lambda_expressions: self
                .refactor_lambda_expressions
                .unwrap_or(base.refactor_lambda_expressions),
        }
    }
}
