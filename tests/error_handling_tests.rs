//! Error reporting for broken manifests, components and environments

mod common;

use common::TestWorkspace;
use predicates::prelude::*;
use serial_test::serial;

use cinstall::{CinstallError, Project};

#[test]
fn test_malformed_manifest() {
    let workspace = TestWorkspace::new();
    workspace.write_manifest("components: [unclosed\n");

    workspace
        .cmd()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse manifest"));
}

#[test]
fn test_manifest_with_duplicate_names() {
    let workspace = TestWorkspace::new();
    workspace.write_manifest(
        "components:\n  - {name: core, path: a}\n  - {name: core, path: b}\n",
    );

    workspace
        .cmd()
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid manifest"));
}

#[test]
fn test_unknown_component_pattern() {
    let workspace = TestWorkspace::new();
    workspace.create_component("core", &[]);
    workspace.write_directory_manifest(&["core"]);

    workspace
        .cmd()
        .args(["install", "--no-progress", "lesson-*"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No components match"));
}

#[test]
fn test_invalid_component_pattern() {
    let workspace = TestWorkspace::new();
    workspace.create_component("core", &[]);
    workspace.write_directory_manifest(&["core"]);

    workspace
        .cmd()
        .args(["install", "--no-progress", "core/**/["])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid component pattern"));
}

#[test]
fn test_descriptor_name_mismatch_is_load_failure() {
    let workspace = TestWorkspace::new();
    workspace.write_file("src/core/component.yaml", "name: something-else\n");
    workspace.write_directory_manifest(&["core"]);

    workspace
        .cmd()
        .args(["install", "--no-progress"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed"));

    // Content was fetched before loading rejected it
    assert!(workspace.installed("core/component.yaml").exists());
}

#[test]
fn test_unreachable_git_source() {
    let workspace = TestWorkspace::new();
    let missing = workspace.path.join("no-such-repo");
    workspace.write_manifest(&format!(
        "components:\n  - name: remote\n    git: {}\n",
        missing.display()
    ));

    workspace
        .cmd()
        .args(["install", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote"));
}

#[test]
fn test_install_root_from_environment() {
    let workspace = TestWorkspace::new();
    workspace.create_component("core", &[]);
    workspace.write_directory_manifest(&["core"]);
    let root = workspace.path.join("elsewhere");

    workspace
        .cmd()
        .env("CINSTALL_ROOT", &root)
        .args(["install", "--no-progress"])
        .assert()
        .success();

    assert!(root.join("core/lesson.md").exists());
    assert!(!workspace.installed("core").exists());
}

#[test]
fn test_manifest_from_environment() {
    let workspace = TestWorkspace::new();
    workspace.write_file(
        "course/cinstall.yaml",
        "name: from-env\ncomponents: []\n",
    );

    workspace
        .cmd()
        .env("CINSTALL_MANIFEST", "course/cinstall.yaml")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No components declared"));
}

#[test]
fn test_root_flag_overrides_environment() {
    let workspace = TestWorkspace::new();
    workspace.create_component("core", &[]);
    workspace.write_directory_manifest(&["core"]);

    workspace
        .cmd()
        .env("CINSTALL_ROOT", workspace.path.join("from-env"))
        .args(["--root", "from-flag", "install", "--no-progress"])
        .assert()
        .success();

    assert!(workspace.file_exists("from-flag/core/lesson.md"));
    assert!(!workspace.file_exists("from-env"));
}

// The tests below change the process working directory.

#[test]
#[serial]
fn test_relative_root_resolves_against_working_directory() {
    let workspace = TestWorkspace::new();
    workspace.write_file("project/cinstall.yaml", "components: []\n");
    let previous = std::env::current_dir().expect("current dir");

    std::env::set_current_dir(&workspace.path).expect("enter workspace");
    let project = Project::open(
        std::path::Path::new("project/cinstall.yaml"),
        Some(std::path::Path::new("installed")),
    );
    std::env::set_current_dir(previous).expect("leave workspace");

    let project = project.expect("project opens");
    assert!(project.install_root().is_absolute());
    assert_eq!(
        dunce::canonicalize(project.install_root().parent().expect("parent"))
            .expect("canonical parent"),
        dunce::canonicalize(&workspace.path).expect("canonical workspace")
    );
}

#[test]
#[serial]
fn test_missing_relative_manifest() {
    let workspace = TestWorkspace::new();
    let previous = std::env::current_dir().expect("current dir");

    std::env::set_current_dir(&workspace.path).expect("enter workspace");
    let result = Project::open(std::path::Path::new("cinstall.yaml"), None);
    std::env::set_current_dir(previous).expect("leave workspace");

    assert!(matches!(
        result,
        Err(CinstallError::ManifestNotFound { .. })
    ));
}
