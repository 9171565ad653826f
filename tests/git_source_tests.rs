//! Installing components from git repositories

mod common;

use common::{TestWorkspace, create_git_repo};
use predicates::prelude::*;

#[test]
fn test_install_from_local_git_repository() {
    let workspace = TestWorkspace::new();
    let repo_path = workspace.path.join("repos/core");
    create_git_repo(
        &repo_path,
        &[
            ("component.yaml", "name: core\ndependencies: [util]\n"),
            ("lesson.md", "# core from git\n"),
        ],
    );
    workspace.create_component("util", &[]);
    workspace.write_manifest(&format!(
        "components:\n  - name: core\n    git: {}\n  - name: util\n    path: src/util\n",
        repo_path.display()
    ));

    workspace
        .cmd()
        .args(["install", "--no-progress", "core"])
        .assert()
        .success();

    assert_eq!(
        workspace.read_file("components/core/lesson.md"),
        "# core from git\n"
    );
    assert!(!workspace.installed("core/.git").exists());
    assert!(workspace.installed("util/lesson.md").exists());

    let marker = workspace.read_file("components/core/.cinstall.yaml");
    assert!(marker.contains("revision"));
}

#[test]
fn test_git_tag_checkout() {
    let workspace = TestWorkspace::new();
    let repo_path = workspace.path.join("repos/core");
    let repo = create_git_repo(&repo_path, &[("lesson.md", "v1\n")]);
    let head = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .expect("head commit");
    repo.tag_lightweight("v1", head.as_object(), false)
        .expect("tag");

    std::fs::write(repo_path.join("lesson.md"), "v2\n").expect("edit");
    let mut index = repo.index().expect("index");
    index
        .add_path(std::path::Path::new("lesson.md"))
        .expect("add");
    index.write().expect("write index");
    let tree = repo
        .find_tree(index.write_tree().expect("tree"))
        .expect("find tree");
    let signature = git2::Signature::now("Test", "test@example.com").expect("signature");
    repo.commit(Some("HEAD"), &signature, &signature, "v2", &tree, &[&head])
        .expect("commit");

    workspace.write_manifest(&format!(
        "components:\n  - name: core\n    git: {}\n    ref: v1\n",
        repo_path.display()
    ));

    workspace
        .cmd()
        .args(["install", "--no-progress"])
        .assert()
        .success();
    assert_eq!(workspace.read_file("components/core/lesson.md"), "v1\n");

    workspace
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetched"))
        .stdout(predicate::str::contains("update available").not());
}
