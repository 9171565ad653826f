//! Common test utilities for cinstall integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary project directory holding a manifest and component sources
#[allow(dead_code)]
pub struct TestWorkspace {
    pub temp: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file relative to the workspace root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Write `cinstall.yaml`
    pub fn write_manifest(&self, yaml: &str) {
        self.write_file("cinstall.yaml", yaml);
    }

    /// Create a component source under `src/<name>` with one lesson file
    /// and a descriptor listing `dependencies`
    pub fn create_component(&self, name: &str, dependencies: &[&str]) {
        let mut descriptor = format!("name: {name}\nversion: 1.0.0\n");
        if !dependencies.is_empty() {
            descriptor.push_str("dependencies:\n");
            for dependency in dependencies {
                descriptor.push_str(&format!("  - {dependency}\n"));
            }
        }
        self.write_file(&format!("src/{name}/component.yaml"), &descriptor);
        self.write_file(&format!("src/{name}/lesson.md"), &format!("# {name}\n"));
    }

    /// Manifest listing directory components under `src/`
    pub fn write_directory_manifest(&self, names: &[&str]) {
        let mut yaml = String::from("name: test-course\ncomponents:\n");
        for name in names {
            yaml.push_str(&format!("  - name: {name}\n    path: src/{name}\n"));
        }
        self.write_manifest(&yaml);
    }

    /// Path of an installed file, relative to the default install root
    pub fn installed(&self, path: &str) -> PathBuf {
        self.path.join("components").join(path)
    }

    /// `cinstall` command running inside the workspace, without progress
    /// output or inherited configuration
    pub fn cmd(&self) -> Command {
        let mut cmd = cinstall_cmd();
        cmd.current_dir(&self.path)
            .env_remove("CINSTALL_MANIFEST")
            .env_remove("CINSTALL_ROOT")
            .env_remove("CINSTALL_LOG");
        cmd
    }
}

#[allow(deprecated)]
pub fn cinstall_cmd() -> Command {
    Command::cargo_bin("cinstall").expect("cinstall binary is built")
}

/// Initialize a git repository at `path` with one commit holding `files`
#[allow(dead_code)]
pub fn create_git_repo(path: &std::path::Path, files: &[(&str, &str)]) -> git2::Repository {
    let repo = git2::Repository::init(path).expect("Failed to init git repository");
    for (file, content) in files {
        let file_path = path.join(file);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(file_path, content).expect("Failed to write file");
    }
    {
        let mut index = repo.index().expect("Failed to open index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");
        let signature =
            git2::Signature::now("Test", "test@example.com").expect("Failed to create signature");
        repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
            .expect("Failed to commit");
    }
    repo
}
