//! Squashing of counter-suffixed fix-up commits
//!
//! The engine only proposes a selection (see [`find_consecutive_commit_group`]);
//! the caller may override it. [`execute_squash`] enforces that whatever is
//! finally chosen starts at HEAD and has no gaps.

use crate::error::{Result, SelectionError};
use crate::naming::{is_root_reset_error, strip_trailing_counter};
use crate::vcs::VersionControl;
use std::path::Path;
use tracing::{debug, info};

/// `git log` format understood by [`parse_commit_log`]
pub const LOG_FORMAT: &str = "%H|%s";

/// Default number of commits offered for squashing
pub const DEFAULT_LOG_DEPTH: usize = 20;

/// Message of the synthetic root used when squashing the whole history
pub const EMPTY_ROOT_MESSAGE: &str = "Initial empty commit";

/// A commit from the log, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full SHA
    pub hash: String,
    /// Subject line (may itself contain `|`)
    pub message: String,
}

/// Inclusive index range of commits sharing a base message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitGroup {
    /// First (newest) index
    pub start: usize,
    /// Last (oldest) index
    pub end: usize,
}

impl CommitGroup {
    /// Indices covered by the group, ascending
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        (self.start..=self.end).collect()
    }

    /// Number of commits in the group
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Groups always hold at least two commits
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// A validated squash: collapse the newest `count` commits into one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquashPlan {
    /// Number of commits to collapse, counted from HEAD
    pub count: usize,
    /// Message for the resulting commit (the oldest selected one)
    pub message: String,
}

/// What a squash did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquashOutcome {
    /// Commits collapsed
    pub count: usize,
    /// Message of the new commit
    pub message: String,
    /// SHA of the new commit
    pub head_commit: String,
    /// Whether the whole history was squashed onto a synthetic root
    pub used_empty_root: bool,
}

/// Parse `%H|%s` log output. Only the first `|` separates hash and message.
#[must_use]
pub fn parse_commit_log(raw: &str) -> Vec<CommitInfo> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (hash, message) = line.split_once('|').unwrap_or((line, ""));
            CommitInfo {
                hash: hash.trim().to_string(),
                message: message.to_string(),
            }
        })
        .collect()
}

/// First run (scanning from the newest commit) of at least two consecutive
/// commits whose messages match once trailing digits are stripped.
#[must_use]
pub fn find_consecutive_commit_group(commits: &[CommitInfo]) -> Option<CommitGroup> {
    for start in 0..commits.len() {
        let base = strip_trailing_counter(&commits[start].message);
        let end = commits[start..]
            .iter()
            .take_while(|c| strip_trailing_counter(&c.message) == base)
            .count()
            + start
            - 1;
        if end > start {
            return Some(CommitGroup { start, end });
        }
    }
    None
}

/// Check a user selection and turn it into a [`SquashPlan`].
///
/// The selection must include index 0 (HEAD) and be contiguous.
pub fn plan_squash(commits: &[CommitInfo], selection: &[usize]) -> Result<SquashPlan> {
    let mut indices = selection.to_vec();
    indices.sort_unstable();
    indices.dedup();

    let Some(&max) = indices.last() else {
        return Err(SelectionError::Empty.into());
    };
    if max >= commits.len() {
        return Err(SelectionError::OutOfRange(max).into());
    }
    if indices[0] != 0 {
        return Err(SelectionError::MissingHead.into());
    }
    if max + 1 != indices.len() {
        return Err(SelectionError::NotContiguous.into());
    }

    let count = max + 1;
    Ok(SquashPlan {
        count,
        message: commits[count - 1].message.clone(),
    })
}

/// Read the newest `max_count` commits.
pub async fn load_commits(
    vcs: &dyn VersionControl,
    repo: &Path,
    max_count: usize,
) -> Result<Vec<CommitInfo>> {
    let raw = vcs.log(repo, max_count, LOG_FORMAT).await?;
    Ok(parse_commit_log(&raw))
}

/// Perform a squash (EFFECTFUL)
///
/// Soft-resets `count` commits and re-commits the index. When history is
/// exactly `count` commits deep the reset target does not exist, so an
/// empty-tree root commit is created and used as the reset target instead.
pub async fn execute_squash(
    vcs: &dyn VersionControl,
    repo: &Path,
    plan: &SquashPlan,
) -> Result<SquashOutcome> {
    let reference = format!("HEAD~{}", plan.count);
    let mut used_empty_root = false;

    if let Err(e) = vcs.reset_soft(repo, &reference).await {
        let message = e.to_string();
        if !is_root_reset_error(&message) {
            return Err(e);
        }
        debug!(%reference, "Reset target missing, squashing onto an empty root");
        let root = vcs.create_empty_root_commit(repo, EMPTY_ROOT_MESSAGE).await?;
        vcs.reset_soft(repo, &root).await?;
        used_empty_root = true;
    }

    vcs.commit(repo, &plan.message, true).await?;
    let head_commit = vcs.head_commit(repo).await?;
    info!(count = plan.count, %head_commit, used_empty_root, "Squashed commits");

    Ok(SquashOutcome {
        count: plan.count,
        message: plan.message.clone(),
        head_commit,
        used_empty_root,
    })
}

/// Squash the pre-selected group if it starts at HEAD.
///
/// Convenience for non-interactive use; returns `Ok(None)` when there is
/// nothing to squash.
pub async fn squash_detected_group(
    vcs: &dyn VersionControl,
    repo: &Path,
    max_count: usize,
) -> Result<Option<SquashOutcome>> {
    let commits = load_commits(vcs, repo, max_count).await?;
    let Some(group) = find_consecutive_commit_group(&commits) else {
        return Ok(None);
    };
    let plan = plan_squash(&commits, &group.indices())?;
    execute_squash(vcs, repo, &plan).await.map(Some)
}
