//! Merge planning - pure functions for creating merge plans
//!
//! No I/O happens here - config, branch and remotes are passed in, making
//! every validation path easy to unit test.

use crate::ci::CiTarget;
use crate::config::DeployConfig;
use crate::error::DeployValidationError;
use crate::types::MergeStrategy;

/// Everything the planners need, gathered beforehand by the caller
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    /// Decoded config, `None` when no config file exists
    pub config: Option<&'a DeployConfig>,
    /// Checked-out branch (may be blank)
    pub current_branch: &'a str,
    /// Remote names, preferred remote first
    pub remotes: &'a [String],
}

/// Merge plan - the functional core output
///
/// Immutable once built; executed by `execute_merge_plan()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Branch to return to when done
    pub current_branch: String,
    /// Branch being merged
    pub source_branch: String,
    /// Branch receiving the merge
    pub target_branch: String,
    /// `git merge` strategy
    pub strategy: MergeStrategy,
    /// Whether to push the target afterwards
    pub push_after_merge: bool,
    /// Remote to push to; `None` skips the push whatever the flag says
    pub push_remote: Option<String>,
    /// CI job to trigger after the push step
    pub ci: Option<CiTarget>,
}

impl MergePlan {
    /// Plan merging `source` into `target` from `current`, with no push or CI
    #[must_use]
    pub fn new(current: &str, source: &str, target: &str) -> Self {
        Self {
            current_branch: current.to_string(),
            source_branch: source.to_string(),
            target_branch: target.to_string(),
            strategy: MergeStrategy::Default,
            push_after_merge: false,
            push_remote: None,
            ci: None,
        }
    }

    /// Push the target to `remote` after merging
    #[must_use]
    pub fn with_push(mut self, remote: Option<String>) -> Self {
        self.push_after_merge = remote.is_some();
        self.push_remote = remote;
        self
    }

    /// Use `strategy` for the merge
    #[must_use]
    pub const fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Remote the push step will actually use
    #[must_use]
    pub fn effective_push_remote(&self) -> Option<&str> {
        if self.push_after_merge {
            self.push_remote.as_deref()
        } else {
            None
        }
    }
}

impl std::fmt::Display for MergePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "merge {} into {}", self.source_branch, self.target_branch)?;
        if let Some(flag) = self.strategy.flag() {
            write!(f, " ({flag})")?;
        }
        if let Some(remote) = self.effective_push_remote() {
            write!(f, ", push to {remote}")?;
        }
        if let Some(ci) = &self.ci {
            write!(f, ", trigger {}", ci.job)?;
        }
        write!(f, ", return to {}", self.current_branch)
    }
}

fn trimmed_branch(input: &PlanInput<'_>) -> Option<String> {
    let branch = input.current_branch.trim();
    (!branch.is_empty()).then(|| branch.to_string())
}

/// Create the deploy-to-test plan (PURE - no I/O)
///
/// Error precedence: config, then CI, then current branch. Pushes to the
/// first remote when there is one.
pub fn build_deploy_test_plan(input: &PlanInput<'_>) -> Result<MergePlan, DeployValidationError> {
    let branch = trimmed_branch(input);

    let deploy = input
        .config
        .and_then(|c| c.deploy_to_test.as_ref())
        .ok_or(DeployValidationError::MissingConfig)?;
    let ci = deploy
        .ci
        .as_ref()
        .and_then(CiTarget::from_config)
        .ok_or(DeployValidationError::MissingCi)?;
    let branch = branch.ok_or(DeployValidationError::MissingBranch)?;

    let mut plan = MergePlan::new(&branch, &branch, &deploy.target_branch())
        .with_strategy(deploy.strategy.unwrap_or_default())
        .with_push(input.remotes.first().cloned());
    plan.ci = Some(ci);
    Ok(plan)
}

/// Create the merge-to-test plan (PURE - no I/O)
///
/// Same shape as the deploy plan without CI. A remote is required since the
/// point of this flow is publishing the integration branch.
pub fn build_merge_to_test_plan(
    input: &PlanInput<'_>,
) -> Result<MergePlan, DeployValidationError> {
    let branch = trimmed_branch(input);

    let deploy = input
        .config
        .and_then(|c| c.deploy_to_test.as_ref())
        .ok_or(DeployValidationError::MissingConfig)?;
    let branch = branch.ok_or(DeployValidationError::MissingBranch)?;
    let remote = input
        .remotes
        .first()
        .cloned()
        .ok_or(DeployValidationError::MissingRemote)?;

    Ok(MergePlan::new(&branch, &branch, &deploy.target_branch())
        .with_strategy(deploy.strategy.unwrap_or_default())
        .with_push(Some(remote)))
}
