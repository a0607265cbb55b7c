use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use omni_var::PolicySettings;

#[derive(Parser)]
#[command(name = "omni-var")]
#[command(about = "Rewrite explicit Java local variable types into `var`.")]
pub(crate) struct Cli {
    /// Override config directory (replaces `PRJ_CONFIG_HOME`).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging (ignored when RUST_LOG is set).
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(flatten)]
    pub(crate) policy: PolicyFlags,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Policy switches; unset flags fall through to settings.
#[derive(Args, Debug, Default)]
pub(crate) struct PolicyFlags {
    /// Keep explicit primitive types (int, long, ...).
    #[arg(long, global = true)]
    pub(crate) no_primitives: bool,

    /// Keep explicit types on loop variables.
    #[arg(long, global = true)]
    pub(crate) no_loop_vars: bool,

    /// Keep explicit types whose generic arguments use the diamond `<>`.
    #[arg(long, global = true)]
    pub(crate) no_diamond: bool,

    /// Rewrite even when the inferred type differs from the declared one.
    #[arg(long, global = true)]
    pub(crate) allow_mismatch: bool,

    /// Rewrite declarations initialized with an anonymous class.
    #[arg(long, global = true)]
    pub(crate) anonymous_classes: bool,

    /// Rewrite declarations initialized with a lambda or method reference.
    #[arg(long, global = true)]
    pub(crate) lambdas: bool,
}

impl PolicyFlags {
    pub(crate) fn to_settings(&self) -> PolicySettings {
        PolicySettings {
            allow_primitive_types: self.no_primitives.then_some(false),
            allow_loop_variables: self.no_loop_vars.then_some(false),
            allow_diamond_operator: self.no_diamond.then_some(false),
            allow_type_mismatch: self.allow_mismatch.then_some(true),
            refactor_anonymous_classes: self.anonymous_classes.then_some(true),
            refactor_lambda_expressions: self.lambdas.then_some(true),
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Refactor one file (`-` reads stdin). Prints the result to stdout.
    File {
        /// Source file, or `-` for stdin
        path: String,

        /// Language version (default: settings, then 11)
        #[arg(long)]
        java_version: Option<String>,

        /// Write the result back to the file instead of printing it
        #[arg(long, conflicts_with = "json")]
        write: bool,

        /// Print a unified diff instead of the rewritten source
        #[arg(long, conflicts_with = "write")]
        diff: bool,

        /// Print the processing result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Refactor every matching file under a directory (preview unless --write).
    Tree {
        /// Root directory
        root: PathBuf,

        /// Language version (default: settings, then 11)
        #[arg(long)]
        java_version: Option<String>,

        /// File glob relative to root (default: **/*.java)
        #[arg(long)]
        pattern: Option<String>,

        /// Write changes back to disk
        #[arg(long)]
        write: bool,

        /// Parallel workers (0 = auto)
        #[arg(long)]
        workers: Option<usize>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_flags_only_set_what_was_passed() {
        let cli = Cli::parse_from(["omni-var", "--no-diamond", "--lambdas", "file", "A.java"]);
        let settings = cli.policy.to_settings();
        assert_eq!(settings.allow_diamond_operator, Some(false));
        assert_eq!(settings.refactor_lambda_expressions, Some(true));
        assert_eq!(settings.allow_primitive_types, None);
        assert_eq!(settings.allow_type_mismatch, None);
    }

    #[test]
    fn test_file_write_rejects_output_flags() {
        assert!(Cli::try_parse_from(["omni-var", "file", "A.java", "--write", "--diff"]).is_err());
        assert!(Cli::try_parse_from(["omni-var", "file", "A.java", "--write", "--json"]).is_err());
        assert!(Cli::try_parse_from(["omni-var", "file", "A.java", "--diff", "--json"]).is_ok());
    }

    #[test]
    fn test_tree_command_parses() {
        let cli = Cli::parse_from([
            "omni-var", "tree", "src", "--pattern", "**/*Test.java", "--workers", "2", "--write",
        ]);
        match cli.command {
            Command::Tree {
                root,
                pattern,
                workers,
                write,
                ..
            } => {
                assert_eq!(root, PathBuf::from("src"));
                assert_eq!(pattern.as_deref(), Some("**/*Test.java"));
                assert_eq!(workers, Some(2));
                assert!(write);
            }
            Command::File { .. } => panic!("expected tree command"),
        }
    }
}
