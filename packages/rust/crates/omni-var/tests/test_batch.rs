//! Tests for batch module - tree-wide `var` refactoring.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

use omni_var::{BatchConfig, RefactorPolicy, VarRefactorer};

const SERVICE: &str = "class Service {\n    void run() {\n        String name = \"svc\";\n        int retries = 3;\n    }\n}\n";
const MODEL: &str = "class Model {\n    String id = \"m\";\n}\n";

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Create parent dir");
    }
    File::create(path)
        .expect("Create file")
        .write_all(content.as_bytes())
        .expect("Write content");
}

#[test]
fn test_refactor_tree_apply() {
    let dir = TempDir::new().expect("Create temp dir");
    let service = dir.path().join("src/Service.java");
    let model = dir.path().join("src/Model.java");
    write_file(&service, SERVICE);
    write_file(&model, MODEL);

    let stats = VarRefactorer::refactor_tree(
        dir.path(),
        "17",
        &RefactorPolicy::default(),
        &BatchConfig {
            dry_run: false,
            ..Default::default()
        },
        None,
    );

    assert_eq!(stats.files_scanned, 2);
    assert_eq!(stats.files_changed, 1);
    assert_eq!(stats.replacements, 2);
    assert!(stats.errors.is_empty());
    assert_eq!(stats.modified_files, vec![service.display().to_string()]);

    let modified = fs::read_to_string(&service).expect("Read service");
    assert!(modified.contains("        var name = \"svc\";\n"));
    assert!(modified.contains("        var retries = 3;\n"));
    assert_eq!(fs::read_to_string(&model).expect("Read model"), MODEL);
}

#[test]
fn test_refactor_tree_pattern_filters_files() {
    let dir = TempDir::new().expect("Create temp dir");
    let java = dir.path().join("Service.java");
    let text = dir.path().join("notes.txt");
    write_file(&java, SERVICE);
    write_file(&text, SERVICE);

    let stats = VarRefactorer::refactor_tree(
        dir.path(),
        "17",
        &RefactorPolicy::default(),
        &BatchConfig {
            dry_run: false,
            ..Default::default()
        },
        None,
    );

    assert_eq!(stats.files_scanned, 1);
    assert_eq!(fs::read_to_string(&text).expect("Read notes"), SERVICE);
}

#[test]
fn test_refactor_tree_skips_build_dirs() {
    let dir = TempDir::new().expect("Create temp dir");
    write_file(&dir.path().join("build/generated/Gen.java"), SERVICE);
    write_file(&dir.path().join("src/Service.java"), SERVICE);

    let stats = VarRefactorer::refactor_tree(
        dir.path(),
        "17",
        &RefactorPolicy::default(),
        &BatchConfig::default(),
        None,
    );

    assert_eq!(stats.files_scanned, 1);
    assert_eq!(stats.files_changed, 1);
}

#[test]
fn test_refactor_tree_old_version_changes_nothing() {
    let dir = TempDir::new().expect("Create temp dir");
    let service = dir.path().join("Service.java");
    write_file(&service, SERVICE);

    let stats = VarRefactorer::refactor_tree(
        dir.path(),
        "8",
        &RefactorPolicy::permissive(),
        &BatchConfig {
            dry_run: false,
            ..Default::default()
        },
        None,
    );

    assert_eq!(stats.files_scanned, 1);
    assert_eq!(stats.files_changed, 0);
    assert_eq!(fs::read_to_string(&service).expect("Read service"), SERVICE);
}

#[test]
fn test_refactor_tree_reports_unreadable_files() {
    let dir = TempDir::new().expect("Create temp dir");
    let binary = dir.path().join("Broken.java");
    fs::write(&binary, b"class \x00\x01 {}").expect("Write binary");
    write_file(&dir.path().join("Service.java"), SERVICE);

    let stats = VarRefactorer::refactor_tree(
        dir.path(),
        "17",
        &RefactorPolicy::default(),
        &BatchConfig::default(),
        None,
    );

    assert_eq!(stats.files_scanned, 2);
    assert_eq!(stats.files_changed, 1);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors.contains_key(&binary.display().to_string()));
}

#[test]
fn test_refactor_tree_cancelled_before_start() {
    let dir = TempDir::new().expect("Create temp dir");
    write_file(&dir.path().join("A.java"), SERVICE);
    write_file(&dir.path().join("B.java"), SERVICE);

    let cancel = AtomicBool::new(true);
    let stats = VarRefactorer::refactor_tree(
        dir.path(),
        "17",
        &RefactorPolicy::default(),
        &BatchConfig {
            dry_run: false,
            ..Default::default()
        },
        Some(&cancel),
    );

    assert_eq!(stats.files_scanned, 0);
    assert_eq!(stats.files_skipped, 2);
    assert_eq!(
        fs::read_to_string(dir.path().join("A.java")).expect("Read A"),
        SERVICE
    );
}

#[test]
fn test_refactor_tree_with_dedicated_workers() {
    let dir = TempDir::new().expect("Create temp dir");
    for idx in 0..8 {
        write_file(&dir.path().join(format!("pkg/S{idx}.java")), SERVICE);
    }

    let stats = VarRefactorer::refactor_tree(
        dir.path(),
        "21",
        &RefactorPolicy::default().with_primitive_types(false),
        &BatchConfig {
            workers: 2,
            ..Default::default()
        },
        None,
    );

    assert_eq!(stats.files_scanned, 8);
    assert_eq!(stats.files_changed, 8);
    assert_eq!(stats.replacements, 8);
    let mut sorted = stats.modified_files.clone();
    sorted.sort();
    assert_eq!(stats.modified_files, sorted);
}
