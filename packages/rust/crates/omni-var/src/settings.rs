//! Settings loader for omni-var.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/omni-var.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/omni-dev-fusion/omni-var.yaml`
//!
//! Merge precedence is user over system. Missing files are silent; files
//! that fail to read or parse are logged and ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::batch::BatchConfig;
use crate::policy::{PolicySettings, RefactorPolicy};

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/omni-var.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "omni-dev-fusion/omni-var.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";

/// Language version assumed when neither settings nor flags name one.
pub const DEFAULT_JAVA_VERSION: &str = "11";

/// Merged omni-var settings. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VarSettings {
    /// Policy switches.
    #[serde(default)]
    pub policy: PolicySettings,
    /// Language version token, e.g. `"17"`.
    pub java_version: Option<String>,
    /// Tree refactoring options.
    #[serde(default)]
    pub batch: BatchSettings,
}

/// Partial [`BatchConfig`] as written in a settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(missing_docs)]
pub struct BatchSettings {
    pub file_pattern: Option<String>,
    pub max_file_size: Option<u64>,
    pub workers: Option<usize>,
    pub skip_dirs: Option<Vec<String>>,
    pub dry_run: Option<bool>,
}

impl VarSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            policy: self.policy.merge(overlay.policy),
            java_version: overlay.java_version.or(self.java_version),
            batch: self.batch.merge(overlay.batch),
        }
    }

    /// Policy with the configured switches applied to the defaults.
    #[must_use]
    pub fn policy(&self) -> RefactorPolicy {
        self.policy.resolve(RefactorPolicy::default())
    }

    /// Configured language version, or [`DEFAULT_JAVA_VERSION`].
    #[must_use]
    pub fn java_version(&self) -> &str {
        self.java_version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_JAVA_VERSION)
    }

    /// Batch configuration with the configured values applied to the defaults.
    #[must_use]
    pub fn batch_config(&self) -> BatchConfig {
        self.batch.resolve(BatchConfig::default())
    }
}

impl BatchSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            file_pattern: overlay.file_pattern.or(self.file_pattern),
            max_file_size: overlay.max_file_size.or(self.max_file_size),
            workers: overlay.workers.or(self.workers),
            skip_dirs: overlay.skip_dirs.or(self.skip_dirs),
            dry_run: overlay.dry_run.or(self.dry_run),
        }
    }

    fn resolve(&self, base: BatchConfig) -> BatchConfig {
        BatchConfig {
            file_pattern: self.file_pattern.clone().unwrap_or(base.file_pattern),
            dry_run: self.dry_run.unwrap_or(base.dry_run),
            max_file_size: self.max_file_size.unwrap_or(base.max_file_size),
            workers: self.workers.unwrap_or(base.workers),
            skip_dirs: self.skip_dirs.clone().unwrap_or(base.skip_dirs),
        }
    }
}

/// Load merged settings (user overrides system).
///
/// `config_home` replaces `PRJ_CONFIG_HOME` when given (CLI `--conf`).
#[must_use]
pub fn load_settings(config_home: Option<&Path>) -> VarSettings {
    let (system_path, user_path) = settings_paths(config_home);
    load_settings_from_paths(&system_path, &user_path)
}

#[doc(hidden)]
#[must_use]
pub fn settings_paths(config_home: Option<&Path>) -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let home = match config_home {
        Some(path) if !path.as_os_str().is_empty() => absolutize(&root, path.to_path_buf()),
        _ => resolve_config_home(&root),
    };
    (system_path, home.join(DEFAULT_USER_SETTINGS_RELATIVE_PATH))
}

#[doc(hidden)]
#[must_use]
pub fn load_settings_from_paths(system: &Path, user: &Path) -> VarSettings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> VarSettings {
    if !path.exists() {
        return VarSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return VarSettings::default();
        }
    };
    match serde_yaml::from_str::<Option<VarSettings>>(&raw) {
        // An empty file parses as `None`.
        Ok(value) => value.unwrap_or_default(),
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            VarSettings::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    absolutize(project_root, PathBuf::from(configured))
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_version_fallback() {
        let mut settings = VarSettings::default();
        assert_eq!(settings.java_version(), DEFAULT_JAVA_VERSION);
        settings.java_version = Some("  ".to_string());
        assert_eq!(settings.java_version(), DEFAULT_JAVA_VERSION);
        settings.java_version = Some(" 17 ".to_string());
        assert_eq!(settings.java_version(), "17");
    }

    #[test]
    fn test_batch_resolve_keeps_defaults() {
        let settings = BatchSettings {
            workers: Some(2),
            ..Default::default()
        };
        let config = settings.resolve(BatchConfig::default());
        assert_eq!(config.workers, 2);
        assert_eq!(config.file_pattern, "**/*.java");
        assert!(config.dry_run);
    }

    #[test]
    fn test_explicit_config_home() {
        let (_, user) = settings_paths(Some(Path::new("/tmp/conf")));
        assert_eq!(user, PathBuf::from("/tmp/conf/omni-dev-fusion/omni-var.yaml"));
    }
}
