//! Merge commands - deploy-to-test, merge-to-test and plain merges

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, cross, link};
use anstream::{eprintln, println};
use branchflow::ci::JenkinsTrigger;
use branchflow::error::{DeployValidationError, Error, Result};
use branchflow::merge::{
    MergePlan, PlanInput, build_deploy_test_plan, build_merge_to_test_plan, execute_merge_plan,
};
use branchflow::types::{
    CheckoutBackStatus, CiStatus, MergeOutcome, MergeStrategy, MergeSuccess, PushStatus,
};
use dialoguer::Confirm;
use std::path::Path;

/// Which integration flow to plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFlow {
    /// Merge, push and trigger CI
    Deploy,
    /// Merge and push only
    Merge,
}

/// Options shared by merge commands
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Show the plan without executing it
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before executing
    pub confirm: bool,
}

/// Options for a plain `merge <source> <target>`
#[derive(Debug, Clone)]
pub struct PlainMergeOptions {
    /// Branch to merge
    pub source: String,
    /// Branch receiving the merge
    pub target: String,
    /// Merge strategy
    pub strategy: MergeStrategy,
    /// Push the target afterwards
    pub push: bool,
    /// Remote override (defaults to the preferred remote)
    pub remote: Option<String>,
}

/// Run deploy-to-test or merge-to-test
pub async fn run_test_flow(path: &Path, flow: TestFlow, options: MergeOptions) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let (current_branch, remotes) = ctx.branch_and_remotes().await?;

    let input = PlanInput {
        config: ctx.config.as_ref(),
        current_branch: &current_branch,
        remotes: &remotes,
    };
    let plan = match flow {
        TestFlow::Deploy => build_deploy_test_plan(&input),
        TestFlow::Merge => build_merge_to_test_plan(&input),
    }
    .inspect_err(print_remediation)?;

    execute_and_report(ctx, &plan, &options).await
}

/// Run a plain merge built from command-line arguments
pub async fn run_plain_merge(
    path: &Path,
    merge: PlainMergeOptions,
    options: MergeOptions,
) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let (current_branch, remotes) = ctx.branch_and_remotes().await?;
    if current_branch.trim().is_empty() {
        return Err(DeployValidationError::MissingBranch.into());
    }

    let remote = if merge.push {
        Some(
            merge
                .remote
                .or_else(|| remotes.first().cloned())
                .ok_or(DeployValidationError::MissingRemote)?,
        )
    } else {
        None
    };

    let plan = MergePlan::new(&current_branch, &merge.source, &merge.target)
        .with_strategy(merge.strategy)
        .with_push(remote);

    execute_and_report(ctx, &plan, &options).await
}

/// Show the files left conflicted by the last failed merge
pub async fn run_conflicts(path: &Path) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let files = &ctx.session.last_conflict_files;

    if files.is_empty() {
        println!("{}", "No recorded conflicts.".muted());
        return Ok(());
    }

    let branch = ctx
        .session
        .last_conflict_branch
        .as_deref()
        .unwrap_or("(unknown)");
    println!(
        "{} on {}:",
        "Conflicted files".emphasis(),
        branch.accent()
    );
    for file in files {
        println!("  {}", ctx.repo_root.join(file).display());
    }
    Ok(())
}

async fn execute_and_report(
    mut ctx: CommandContext,
    plan: &MergePlan,
    options: &MergeOptions,
) -> Result<()> {
    println!("{}: {}", "Plan".emphasis(), plan);

    if options.dry_run {
        println!("{}", "Run without --dry-run to execute.".muted());
        return Ok(());
    }

    if options.confirm
        && !Confirm::new()
            .with_prompt("Proceed with merge?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
    {
        println!("{}", "Aborted".muted());
        return Ok(());
    }

    let ci = JenkinsTrigger::new()?;
    let progress = CliProgress::compact();
    let outcome = execute_merge_plan(plan, &ctx.repo_root, &ctx.vcs, &ci, &progress).await?;

    match &outcome {
        MergeOutcome::Success(success) => {
            ctx.session.clear_conflicts();
            print_success(success, plan);
        }
        MergeOutcome::Failure(failure) => {
            ctx.session
                .record_conflicts(&failure.target_branch, &failure.conflicting_files);
            println!();
            println!(
                "{} Merge into {} failed ({} ms)",
                cross(),
                failure.target_branch.accent(),
                failure.duration_ms
            );
            println!("{}", failure.error_message.muted());
            if !failure.conflicting_files.is_empty() {
                println!("{}:", "Conflicting files".warn());
                for file in &failure.conflicting_files {
                    println!("  {file}");
                }
            }
            println!(
                "{}",
                format!(
                    "Working tree left on {}; resolve and commit, then run 'git checkout {}'.",
                    failure.target_branch, failure.current_branch
                )
                .muted()
            );
        }
    }

    if let Err(e) = ctx.save_session() {
        println!("{}", format!("⚠️  Failed to save session: {e}").warn());
    }

    if outcome.is_success() {
        Ok(())
    } else {
        Err(Error::Internal(format!(
            "merge into {} did not complete",
            outcome.target_branch()
        )))
    }
}

fn print_success(success: &MergeSuccess, plan: &MergePlan) {
    println!();
    let kind = if success.is_merge_commit {
        "merge commit"
    } else {
        "fast-forward"
    };
    println!(
        "{} Merged into {} ({kind}, {} ms)",
        check(),
        success.target_branch.accent(),
        success.duration_ms
    );
    println!("   HEAD: {}", success.head_commit.muted());
    if !success.changed_files.is_empty() {
        println!(
            "   {} file(s) changed",
            success.changed_files.len().accent()
        );
    }

    match &success.push_status {
        PushStatus::Skipped => println!("   Push: {}", "skipped".muted()),
        PushStatus::Ok { remote } => println!("   Push: {} {}", check(), remote.accent()),
        PushStatus::Failed { remote, error } => {
            println!("   Push: {} {}", cross(), remote.accent());
            println!("          {}", error.muted());
        }
    }

    match &success.ci_status {
        CiStatus::Skipped => println!("   CI: {}", "skipped".muted()),
        CiStatus::Ok { job } => {
            let url = plan.ci.as_ref().map(|ci| format!("{}/job/{job}", ci.url));
            let label = url.map_or_else(|| job.clone(), |url| link(job, &url));
            println!("   CI: {} {}", check(), label);
        }
        CiStatus::Failed { job, error } => {
            println!("   CI: {} {}", cross(), job.accent());
            println!("        {}", error.muted());
        }
    }

    match &success.checkout_back {
        CheckoutBackStatus::Ok => {
            println!("   Back on {}", success.current_branch.accent());
        }
        CheckoutBackStatus::Failed { error } => {
            println!(
                "   {} still on {}: {}",
                cross(),
                success.target_branch.accent(),
                error.muted()
            );
        }
    }
}

fn print_remediation(error: &DeployValidationError) {
    let hint = match error {
        DeployValidationError::MissingConfig => {
            "Add a deployToTest section to .branchflow.json or .branchflow.toml."
        }
        DeployValidationError::MissingCi => "Set deployToTest.ci.url and deployToTest.ci.job.",
        DeployValidationError::MissingBranch => "Check out a branch first.",
        DeployValidationError::MissingRemote => "Add a remote with 'git remote add'.",
    };
    eprintln!("{} [{}] {}", "hint:".warn(), error.code(), hint);
}
