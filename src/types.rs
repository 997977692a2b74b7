//! Core types for branchflow

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Merge strategy flag passed to `git merge`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Let git decide (fast-forward when possible)
    #[default]
    Default,
    /// Always create a merge commit
    NoFf,
    /// Refuse anything but a fast-forward
    FfOnly,
}

impl MergeStrategy {
    /// The `git merge` flag, `None` for the default strategy
    #[must_use]
    pub const fn flag(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::NoFf => Some("--no-ff"),
            Self::FfOnly => Some("--ff-only"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches("--") {
            "" | "default" => Ok(Self::Default),
            "no-ff" => Ok(Self::NoFf),
            "ff-only" => Ok(Self::FfOnly),
            other => Err(format!("unknown merge strategy: {other}")),
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::NoFf => write!(f, "--no-ff"),
            Self::FfOnly => write!(f, "--ff-only"),
        }
    }
}

/// Outcome of returning to the starting branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutBackStatus {
    /// Back on the original branch
    Ok,
    /// Still on the target branch
    Failed {
        /// Raw git error
        error: String,
    },
}

/// Outcome of the post-merge push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push not requested or no remote available
    Skipped,
    /// Pushed successfully
    Ok {
        /// Remote pushed to
        remote: String,
    },
    /// Push failed; the merge itself stands
    Failed {
        /// Remote attempted
        remote: String,
        /// Raw git error
        error: String,
    },
}

/// Outcome of the CI trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CiStatus {
    /// No CI target attached to the plan
    Skipped,
    /// Build queued
    Ok {
        /// CI job id
        job: String,
    },
    /// Trigger failed; the merge itself stands
    Failed {
        /// CI job id
        job: String,
        /// Error including HTTP status and body
        error: String,
    },
}

/// A merge that went through
#[derive(Debug, Clone)]
pub struct MergeSuccess {
    /// Branch the run started from
    pub current_branch: String,
    /// Branch that received the merge
    pub target_branch: String,
    /// HEAD of the target after the merge
    pub head_commit: String,
    /// Whether HEAD has more than one parent
    pub is_merge_commit: bool,
    /// Files changed by the merge
    pub changed_files: Vec<String>,
    /// Wall-clock duration of the run
    pub duration_ms: u64,
    /// Return-to-start result
    pub checkout_back: CheckoutBackStatus,
    /// Push result
    pub push_status: PushStatus,
    /// CI trigger result
    pub ci_status: CiStatus,
}

/// A merge that stopped on conflicts (or any other merge error)
#[derive(Debug, Clone)]
pub struct MergeFailure {
    /// Branch the run started from
    pub current_branch: String,
    /// Branch left checked out mid-merge
    pub target_branch: String,
    /// Raw git error
    pub error_message: String,
    /// Paths with unresolved conflicts (best effort)
    pub conflicting_files: Vec<String>,
    /// Wall-clock duration of the run
    pub duration_ms: u64,
}

/// Result of executing a `MergePlan`
#[derive(Debug, Clone)]
pub enum MergeOutcome {
    /// Merge succeeded; side effects carry their own status
    Success(MergeSuccess),
    /// Merge failed; nothing after the merge ran
    Failure(MergeFailure),
}

impl MergeOutcome {
    /// Check if the merge itself succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Target branch of the run
    #[must_use]
    pub fn target_branch(&self) -> &str {
        match self {
            Self::Success(s) => &s.target_branch,
            Self::Failure(f) => &f.target_branch,
        }
    }

    /// Conflicting files (empty on success)
    #[must_use]
    pub fn conflicting_files(&self) -> &[String] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(f) => &f.conflicting_files,
        }
    }
}

/// Progress callback for long-running flows
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Report a status message
    async fn on_message(&self, message: &str);
}

/// Progress callback that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}
}
