#![allow(clippy::doc_markdown)]

//! omni-var - Local Variable Type Inference Refactoring for Omni DevEnv
//!
//! Rewrites explicitly typed Java local variable declarations into `var`
//! declarations wherever a configurable policy allows it, touching nothing
//! but the type token of each accepted declaration.
//!
//! # Features
//!
//! - **Version Gate**: Sources targeting a release older than 10 pass through untouched
//! - **Policy Driven**: Primitives, loop variables, diamond generics, type mismatch,
//!   anonymous classes and lambdas are each switchable
//! - **Offset-Safe Rewrite**: Edits are validated, then spliced with a running delta
//! - **Diff Preview**: Unified diffs for every processed source
//! - **Batch Refactoring**: Parallel processing across entire source trees
//!
//! # Architecture
//!
//! ```text
//! omni-var/src/
//! ├── lib.rs          # Re-exports (this file)
//! ├── error.rs        # RefactorError enum (thiserror)
//! ├── types.rs        # Declaration, EditOperation, ProcessingResult
//! ├── policy.rs       # RefactorPolicy, PolicySettings
//! ├── infer.rs        # Initializer type inference
//! ├── eligibility.rs  # Policy vetoes
//! ├── locate.rs       # Textual declaration locator
//! ├── rewrite.rs      # Ordered edit application
//! ├── processor.rs    # Version gate + pipeline
//! ├── diff.rs         # Diff generation utilities
//! ├── io.rs           # Source file reading
//! ├── settings.rs     # YAML settings (system + user)
//! └── batch.rs        # Tree refactoring with rayon
//! ```
//!
//! # Example
//!
//! ```rust
//! use omni_var::{RefactorPolicy, process_file};
//!
//! let source = "class A { void m() { StringBuilder sb = new StringBuilder(); } }";
//! let out = process_file(source, "17", &RefactorPolicy::default());
//! assert_eq!(out, "class A { void m() { var sb = new StringBuilder(); } }");
//!
//! // Java 8 sources are never touched.
//! assert_eq!(process_file(source, "8", &RefactorPolicy::default()), source);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod batch;
mod diff;
mod eligibility;
mod error;
mod infer;
mod io;
mod locate;
mod policy;
mod processor;
mod rewrite;
mod settings;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::RefactorError;
pub use policy::{PolicySettings, RefactorPolicy};
pub use types::{AppliedEdit, Declaration, EditOperation, ProcessingResult, Scope};

pub use eligibility::{PRIMITIVE_TYPES, has_diamond, is_eligible, is_primitive};
pub use infer::{InitializerKind, OBJECT_TYPE, STRING_TYPE, infer_type, initializer_kind};
pub use locate::{DeclarationLocator, TextLocator, locate_declarations};
pub use rewrite::{RewriteOutcome, apply_edits, rewrite};

pub use processor::{
    INFERRED_TYPE_KEYWORD, MIN_LANGUAGE_VERSION, format_result, plan_edits, process_declarations,
    process_file, process_files, refactor_source, refactor_with, should_rewrite,
    supports_inferred_types,
};

// Batch refactoring exports
pub use batch::{BatchConfig, BatchRefactorStats, VarRefactorer};

pub use diff::{generate_file_diff, generate_unified_diff};
pub use io::{DEFAULT_MAX_FILE_SIZE, decode_source, read_source_file};
pub use settings::{
    BatchSettings, DEFAULT_JAVA_VERSION, VarSettings, load_settings, load_settings_from_paths,
    settings_paths,
};
