//! Merge execution - effectful operations
//!
//! Runs a `MergePlan` against the working tree. Steps are strictly
//! sequential; only a failed merge stops the pipeline. Push, CI and the
//! checkout back each record their own status and never undo the merge.

use crate::ci::{
    CiTrigger, PARAM_COMMIT, PARAM_CURRENT_BRANCH, PARAM_SOURCE_BRANCH, PARAM_TARGET_BRANCH,
};
use crate::error::Result;
use crate::merge::plan::MergePlan;
use crate::naming::is_no_upstream_error;
use crate::types::{
    CheckoutBackStatus, CiStatus, MergeFailure, MergeOutcome, MergeSuccess, ProgressCallback,
    PushStatus,
};
use crate::vcs::VersionControl;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Parameter context handed to the CI trigger
#[must_use]
pub fn parameter_context(plan: &MergePlan, head_commit: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (PARAM_CURRENT_BRANCH.to_string(), plan.current_branch.clone()),
        (PARAM_SOURCE_BRANCH.to_string(), plan.source_branch.clone()),
        (PARAM_TARGET_BRANCH.to_string(), plan.target_branch.clone()),
        (PARAM_COMMIT.to_string(), head_commit.to_string()),
    ])
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Execute the merge plan (EFFECTFUL)
///
/// Returns `Err` only when checking out the target fails; every later
/// failure is reported inside the `MergeOutcome`.
///
/// # Arguments
/// * `plan` - The merge plan to execute
/// * `repo` - Working tree root
/// * `vcs` - Version control client
/// * `ci` - CI trigger, used only when the plan carries a CI target
/// * `progress` - Progress callback for status updates
pub async fn execute_merge_plan(
    plan: &MergePlan,
    repo: &Path,
    vcs: &dyn VersionControl,
    ci: &dyn CiTrigger,
    progress: &dyn ProgressCallback,
) -> Result<MergeOutcome> {
    let started = Instant::now();

    progress
        .on_message(&format!("Checking out {}", plan.target_branch))
        .await;
    vcs.checkout(repo, &plan.target_branch).await?;

    let head_before = match vcs.head_commit(repo).await {
        Ok(sha) => Some(sha),
        Err(e) => {
            warn!(error = %e, "Could not read target HEAD before merge");
            None
        }
    };

    progress
        .on_message(&format!(
            "Merging {} into {}",
            plan.source_branch, plan.target_branch
        ))
        .await;
    if let Err(e) = vcs
        .merge(repo, &plan.source_branch, plan.strategy.flag())
        .await
    {
        let conflicting_files = vcs.conflicting_files(repo).await.unwrap_or_else(|list_err| {
            warn!(error = %list_err, "Could not list conflicting files");
            Vec::new()
        });
        info!(
            target_branch = %plan.target_branch,
            conflicts = conflicting_files.len(),
            "Merge failed, leaving working tree on target"
        );
        return Ok(MergeOutcome::Failure(MergeFailure {
            current_branch: plan.current_branch.clone(),
            target_branch: plan.target_branch.clone(),
            error_message: e.to_string(),
            conflicting_files,
            duration_ms: elapsed_ms(started),
        }));
    }

    let head_commit = vcs.head_commit(repo).await?;
    let is_merge_commit = vcs.parent_count(repo, &head_commit).await? > 1;
    let changed_files = match &head_before {
        Some(before) => vcs
            .changed_files(repo, before, &head_commit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Could not diff merge result");
                Vec::new()
            }),
        None => Vec::new(),
    };
    info!(%head_commit, is_merge_commit, files = changed_files.len(), "Merged");

    let push_status = push_step(plan, repo, vcs, progress).await;
    let ci_status = ci_step(plan, &head_commit, ci, progress).await;

    progress
        .on_message(&format!("Checking out {}", plan.current_branch))
        .await;
    let checkout_back = match vcs.checkout(repo, &plan.current_branch).await {
        Ok(()) => CheckoutBackStatus::Ok,
        Err(e) => {
            warn!(error = %e, branch = %plan.current_branch, "Checkout back failed");
            CheckoutBackStatus::Failed {
                error: e.to_string(),
            }
        }
    };

    Ok(MergeOutcome::Success(MergeSuccess {
        current_branch: plan.current_branch.clone(),
        target_branch: plan.target_branch.clone(),
        head_commit,
        is_merge_commit,
        changed_files,
        duration_ms: elapsed_ms(started),
        checkout_back,
        push_status,
        ci_status,
    }))
}

async fn push_step(
    plan: &MergePlan,
    repo: &Path,
    vcs: &dyn VersionControl,
    progress: &dyn ProgressCallback,
) -> PushStatus {
    let Some(remote) = plan.effective_push_remote() else {
        return PushStatus::Skipped;
    };

    progress
        .on_message(&format!("Pushing {} to {remote}", plan.target_branch))
        .await;
    match vcs.push(repo, remote, &plan.target_branch).await {
        Ok(()) => PushStatus::Ok {
            remote: remote.to_string(),
        },
        Err(e) => {
            let error = e.to_string();
            if is_no_upstream_error(&error) {
                info!(%remote, "Remote has no upstream for target, push skipped");
                return PushStatus::Skipped;
            }
            warn!(%remote, %error, "Push failed");
            PushStatus::Failed {
                remote: remote.to_string(),
                error,
            }
        }
    }
}

async fn ci_step(
    plan: &MergePlan,
    head_commit: &str,
    ci: &dyn CiTrigger,
    progress: &dyn ProgressCallback,
) -> CiStatus {
    let Some(target) = &plan.ci else {
        return CiStatus::Skipped;
    };

    progress
        .on_message(&format!("Triggering CI job {}", target.job))
        .await;
    let context = parameter_context(plan, head_commit);
    match ci.trigger(target, &context).await {
        Ok(()) => CiStatus::Ok {
            job: target.job.clone(),
        },
        Err(e) => {
            warn!(job = %target.job, error = %e, "CI trigger failed");
            CiStatus::Failed {
                job: target.job.clone(),
                error: e.to_string(),
            }
        }
    }
}
