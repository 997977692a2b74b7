//! Throwaway git repositories for end-to-end tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A git repository in a temp directory, deleted on drop
///
/// Starts on `main` with one commit (`README.md`) and a local identity so
/// commits work on machines without a global git config.
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.write_file("README.md", "# test\n");
        repo.commit_all("Initial commit");
        repo
    }

    /// Initialized repository with no commits
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Self { dir };
        repo.git(&["init", "--quiet"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git and return trimmed stdout, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn write_file(&self, name: &str, contents: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, contents).expect("write file");
    }

    pub fn commit_all(&self, message: &str) -> String {
        self.git(&["add", "-A"]);
        self.git(&["commit", "--quiet", "-m", message]);
        self.head()
    }

    /// Write one file and commit it
    pub fn commit_file(&self, name: &str, contents: &str, message: &str) -> String {
        self.write_file(name, contents);
        self.commit_all(message)
    }

    pub fn branch(&self, name: &str) {
        self.git(&["branch", name]);
    }

    pub fn checkout(&self, name: &str) {
        self.git(&["checkout", "--quiet", name]);
    }

    pub fn checkout_new(&self, name: &str) {
        self.git(&["checkout", "--quiet", "-b", name]);
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"])
    }

    pub fn current_branch(&self) -> String {
        self.git(&["branch", "--show-current"])
    }

    pub fn commit_count(&self) -> usize {
        self.git(&["rev-list", "--count", "HEAD"])
            .parse()
            .expect("numeric commit count")
    }

    /// Subjects from HEAD backwards
    pub fn subjects(&self) -> Vec<String> {
        self.git(&["log", "--format=%s"])
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    /// Create a bare repository and register it as `name`
    pub fn add_bare_remote(&self, name: &str) -> TempDir {
        let bare = TempDir::new().expect("create temp dir");
        let status = Command::new("git")
            .args(["init", "--quiet", "--bare"])
            .current_dir(bare.path())
            .status()
            .expect("run git");
        assert!(status.success(), "git init --bare failed");

        let url: PathBuf = bare.path().to_path_buf();
        self.git(&["remote", "add", name, &url.to_string_lossy()]);
        bare
    }
}
