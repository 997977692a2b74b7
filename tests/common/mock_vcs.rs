//! Mock version control client for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use branchflow::error::{Error, Result};
use branchflow::vcs::VersionControl;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Call record for `push`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCall {
    pub remote: String,
    pub branch: String,
}

/// Simple mock version control client
///
/// This manually implements `VersionControl` rather than using mockall so
/// the mock can keep a little state (current branch, HEAD) between calls.
///
/// Features:
/// - Ordered call log for sequencing assertions (`"checkout pre-test"`)
/// - Configurable branch/remote listings and log output
/// - Error injection per operation (`"merge"`) or operation + argument
///   (`"checkout feat-a"`)
pub struct MockVcs {
    current_branch: Mutex<String>,
    head: Mutex<String>,
    merge_head: Mutex<String>,
    parent_count: Mutex<usize>,
    changed_files: Mutex<Vec<String>>,
    conflicting_files: Mutex<Vec<String>>,
    local_branches: Mutex<Vec<String>>,
    remote_branches: Mutex<Vec<String>>,
    remotes: Mutex<Vec<String>>,
    log_output: Mutex<String>,
    // Call tracking
    calls: Mutex<Vec<String>>,
    push_calls: Mutex<Vec<PushCall>>,
    commit_messages: Mutex<Vec<String>>,
    // Error injection
    errors: Mutex<HashMap<String, String>>,
}

impl MockVcs {
    /// Create a mock checked out on `branch`
    pub fn on_branch(branch: &str) -> Self {
        Self {
            current_branch: Mutex::new(branch.to_string()),
            head: Mutex::new("base_sha".to_string()),
            merge_head: Mutex::new("merged_sha".to_string()),
            parent_count: Mutex::new(1),
            changed_files: Mutex::new(Vec::new()),
            conflicting_files: Mutex::new(Vec::new()),
            local_branches: Mutex::new(Vec::new()),
            remote_branches: Mutex::new(Vec::new()),
            remotes: Mutex::new(Vec::new()),
            log_output: Mutex::new(String::new()),
            calls: Mutex::new(Vec::new()),
            push_calls: Mutex::new(Vec::new()),
            commit_messages: Mutex::new(Vec::new()),
            errors: Mutex::new(HashMap::new()),
        }
    }

    // === Error injection methods ===

    /// Make an operation fail; `key` is `"op"` or `"op arg"`
    pub fn fail(&self, key: &str, msg: &str) {
        self.errors
            .lock()
            .unwrap()
            .insert(key.to_string(), msg.to_string());
    }

    // === Response setters ===

    pub fn set_merge_result(&self, sha: &str, parents: usize, files: &[&str]) {
        *self.merge_head.lock().unwrap() = sha.to_string();
        *self.parent_count.lock().unwrap() = parents;
        *self.changed_files.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    pub fn set_conflicting_files(&self, files: &[&str]) {
        *self.conflicting_files.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    pub fn set_local_branches(&self, branches: &[&str]) {
        *self.local_branches.lock().unwrap() = branches.iter().map(ToString::to_string).collect();
    }

    pub fn set_remote_branches(&self, branches: &[&str]) {
        *self.remote_branches.lock().unwrap() =
            branches.iter().map(ToString::to_string).collect();
    }

    pub fn set_remotes(&self, remotes: &[&str]) {
        *self.remotes.lock().unwrap() = remotes.iter().map(ToString::to_string).collect();
    }

    pub fn set_log_output(&self, raw: &str) {
        *self.log_output.lock().unwrap() = raw.to_string();
    }

    // === Call verification methods ===

    /// Every call in order, formatted as `"op arg..."`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_calls(&self) -> Vec<PushCall> {
        self.push_calls.lock().unwrap().clone()
    }

    pub fn commit_messages(&self) -> Vec<String> {
        self.commit_messages.lock().unwrap().clone()
    }

    pub fn current(&self) -> String {
        self.current_branch.lock().unwrap().clone()
    }

    /// Assert an exact call was made
    pub fn assert_called(&self, call: &str) {
        let calls = self.calls();
        assert!(
            calls.iter().any(|c| c == call),
            "Expected {call:?} but got: {calls:?}"
        );
    }

    /// Assert no call starts with `op`
    pub fn assert_not_called(&self, op: &str) {
        let calls = self.calls();
        assert!(
            !calls.iter().any(|c| c.split(' ').next() == Some(op)),
            "Expected no {op} call but got: {calls:?}"
        );
    }

    fn record(&self, op: &str, args: &[&str]) -> Result<()> {
        let call = std::iter::once(op)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(call.clone());

        let errors = self.errors.lock().unwrap();
        if let Some(msg) = errors.get(&call).or_else(|| errors.get(op)) {
            return Err(Error::Git(msg.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl VersionControl for MockVcs {
    async fn current_branch(&self, _repo: &Path) -> Result<String> {
        self.record("current_branch", &[])?;
        Ok(self.current())
    }

    async fn checkout(&self, _repo: &Path, branch: &str) -> Result<()> {
        self.record("checkout", &[branch])?;
        *self.current_branch.lock().unwrap() = branch.to_string();
        Ok(())
    }

    async fn merge(&self, _repo: &Path, branch: &str, strategy_flag: Option<&str>) -> Result<()> {
        let mut args: Vec<&str> = strategy_flag.into_iter().collect();
        args.push(branch);
        self.record("merge", &args)?;
        *self.head.lock().unwrap() = self.merge_head.lock().unwrap().clone();
        Ok(())
    }

    async fn head_commit(&self, _repo: &Path) -> Result<String> {
        self.record("head_commit", &[])?;
        Ok(self.head.lock().unwrap().clone())
    }

    async fn parent_count(&self, _repo: &Path, sha: &str) -> Result<usize> {
        self.record("parent_count", &[sha])?;
        Ok(*self.parent_count.lock().unwrap())
    }

    async fn changed_files(&self, _repo: &Path, from: &str, to: &str) -> Result<Vec<String>> {
        self.record("changed_files", &[from, to])?;
        Ok(self.changed_files.lock().unwrap().clone())
    }

    async fn conflicting_files(&self, _repo: &Path) -> Result<Vec<String>> {
        self.record("conflicting_files", &[])?;
        Ok(self.conflicting_files.lock().unwrap().clone())
    }

    async fn list_local_branches(&self, _repo: &Path) -> Result<Vec<String>> {
        self.record("list_local_branches", &[])?;
        Ok(self.local_branches.lock().unwrap().clone())
    }

    async fn list_remote_branches(&self, _repo: &Path) -> Result<Vec<String>> {
        self.record("list_remote_branches", &[])?;
        Ok(self.remote_branches.lock().unwrap().clone())
    }

    async fn list_remotes(&self, _repo: &Path) -> Result<Vec<String>> {
        self.record("list_remotes", &[])?;
        Ok(self.remotes.lock().unwrap().clone())
    }

    async fn push(&self, _repo: &Path, remote: &str, branch: &str) -> Result<()> {
        self.record("push", &[remote, branch])?;
        self.push_calls.lock().unwrap().push(PushCall {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }

    async fn stage_all(&self, _repo: &Path) -> Result<()> {
        self.record("stage_all", &[])
    }

    async fn commit(&self, _repo: &Path, message: &str, allow_empty: bool) -> Result<()> {
        let flag = if allow_empty { "--allow-empty" } else { "" };
        self.record("commit", &[flag])?;
        self.commit_messages.lock().unwrap().push(message.to_string());
        *self.head.lock().unwrap() = "squashed_sha".to_string();
        Ok(())
    }

    async fn reset_soft(&self, _repo: &Path, reference: &str) -> Result<()> {
        self.record("reset_soft", &[reference])
    }

    async fn log(&self, _repo: &Path, max_count: usize, format: &str) -> Result<String> {
        let count = max_count.to_string();
        self.record("log", &[&count, format])?;
        Ok(self.log_output.lock().unwrap().clone())
    }

    async fn create_branch(&self, _repo: &Path, name: &str, start_point: &str) -> Result<()> {
        self.record("create_branch", &[name, start_point])?;
        self.local_branches.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn create_empty_root_commit(&self, _repo: &Path, message: &str) -> Result<String> {
        self.record("create_empty_root_commit", &[message])?;
        Ok("empty_root_sha".to_string())
    }
}
