//! Version control access
//!
//! Every flow talks to the working tree through [`VersionControl`] so the
//! planning and execution logic can run against a mock in tests.

mod git;

pub use git::GitCli;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Version control operations needed by the workflow
///
/// All failures are `Error::Git` carrying the tool's raw diagnostic text.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Name of the checked-out branch, empty when HEAD is detached
    async fn current_branch(&self, repo: &Path) -> Result<String>;

    /// Check out an existing branch
    async fn checkout(&self, repo: &Path, branch: &str) -> Result<()>;

    /// Merge `branch` into the checked-out branch
    async fn merge(&self, repo: &Path, branch: &str, strategy_flag: Option<&str>) -> Result<()>;

    /// Full SHA of HEAD
    async fn head_commit(&self, repo: &Path) -> Result<String>;

    /// Number of parents of `sha`
    async fn parent_count(&self, repo: &Path, sha: &str) -> Result<usize>;

    /// Paths that differ between two commits
    async fn changed_files(&self, repo: &Path, from: &str, to: &str) -> Result<Vec<String>>;

    /// Paths with unresolved merge conflicts
    async fn conflicting_files(&self, repo: &Path) -> Result<Vec<String>>;

    /// Local branch names
    async fn list_local_branches(&self, repo: &Path) -> Result<Vec<String>>;

    /// Remote-tracking branch names (`<remote>/<branch>`)
    async fn list_remote_branches(&self, repo: &Path) -> Result<Vec<String>>;

    /// Remote names, `origin` first when present
    async fn list_remotes(&self, repo: &Path) -> Result<Vec<String>>;

    /// Push `branch` to `remote`
    async fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<()>;

    /// Stage every change in the working tree
    async fn stage_all(&self, repo: &Path) -> Result<()>;

    /// Commit the index
    async fn commit(&self, repo: &Path, message: &str, allow_empty: bool) -> Result<()>;

    /// `reset --soft` to `reference`
    async fn reset_soft(&self, repo: &Path, reference: &str) -> Result<()>;

    /// Raw `log` output for at most `max_count` commits
    async fn log(&self, repo: &Path, max_count: usize, format: &str) -> Result<String>;

    /// Create `name` pointing at `start_point` without checking it out
    async fn create_branch(&self, repo: &Path, name: &str, start_point: &str) -> Result<()>;

    /// Create a parentless commit with an empty tree, returning its SHA
    async fn create_empty_root_commit(&self, repo: &Path, message: &str) -> Result<String>;
}
