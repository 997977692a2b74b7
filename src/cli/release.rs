//! Release commands - resolve and cut dated release/prod branches

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, check, cross, spinner_style};
use anstream::println;
use branchflow::error::{Error, Result};
use branchflow::naming::dated_branch_name;
use branchflow::release::{
    CutBranch, cut_prod_branches, cut_release_branch, get_latest_release_branch,
};
use branchflow::vcs::VersionControl;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;

/// Options for branch cutting commands
#[derive(Debug, Clone, Default)]
pub struct CutOptions {
    /// Base ref for a release branch (defaults to the current branch)
    pub base: Option<String>,
    /// Skip pushing the new branches
    pub no_push: bool,
    /// Show the branch names without creating them
    pub dry_run: bool,
}

/// Print the latest release branch
pub async fn run_latest(path: &Path) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let prefix = ctx.release_prefix();

    match get_latest_release_branch(&ctx.vcs, &ctx.repo_root, &prefix).await? {
        Some(branch) => println!("{branch}"),
        None => {
            return Err(Error::BranchNotFound(format!("{prefix}_<YYYYMMDD>")));
        }
    }
    Ok(())
}

/// Cut today's release branch
pub async fn run_cut_release(path: &Path, options: CutOptions) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let (current_branch, remotes) = ctx.branch_and_remotes().await?;
    let prefix = ctx.release_prefix();
    let stamp = CommandContext::today_stamp();

    let base = options
        .base
        .clone()
        .or_else(|| (!current_branch.is_empty()).then_some(current_branch))
        .ok_or_else(|| Error::Internal("no base branch (detached HEAD?)".to_string()))?;

    if options.dry_run {
        println!(
            "Would create {} from {}",
            dated_branch_name(&prefix, &stamp).accent(),
            base.accent()
        );
        return Ok(());
    }

    let remote = remote_for(&remotes, &options);
    let cut = cut_release_branch(&ctx.vcs, &ctx.repo_root, &prefix, &stamp, &base, remote).await;
    print_cut(&cut);
    ensure_created(&[cut])
}

/// Cut today's prod branches from the latest release branch
pub async fn run_deploy_prod(path: &Path, options: CutOptions) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let prod_prefixes = ctx
        .config
        .as_ref()
        .and_then(|c| c.deploy_to_prod.as_ref())
        .map(|p| p.prefixes())
        .unwrap_or_default();
    if prod_prefixes.is_empty() {
        return Err(Error::Config(
            "deployToProd.prodPrefix must list at least one prefix".to_string(),
        ));
    }

    let remotes = ctx.vcs.list_remotes(&ctx.repo_root).await?;
    let release_prefix = ctx.release_prefix();
    let stamp = CommandContext::today_stamp();

    if options.dry_run {
        for prefix in &prod_prefixes {
            println!("  {} {}", arrow(), dated_branch_name(prefix, &stamp).accent());
        }
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Cutting {} prod branch(es)...", prod_prefixes.len()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let remote = remote_for(&remotes, &options);
    let result = cut_prod_branches(
        &ctx.vcs,
        &ctx.repo_root,
        &release_prefix,
        &prod_prefixes,
        &stamp,
        remote,
    )
    .await;
    spinner.finish_and_clear();

    let (base, cuts) = result?;
    println!("{} {}", "From".emphasis(), base.accent());
    for cut in &cuts {
        print_cut(cut);
    }
    ensure_created(&cuts)
}

fn remote_for<'a>(remotes: &'a [String], options: &CutOptions) -> Option<&'a str> {
    if options.no_push {
        None
    } else {
        remotes.first().map(String::as_str)
    }
}

fn print_cut(cut: &CutBranch) {
    if let Some(error) = &cut.create_error {
        println!("{} {}: {}", cross(), cut.branch.accent(), error.muted());
        return;
    }
    match (&cut.pushed_to, &cut.push_error) {
        (Some(remote), _) => println!(
            "{} {} pushed to {}",
            check(),
            cut.branch.accent(),
            remote.accent()
        ),
        (None, Some(error)) => println!(
            "{} {} created, push failed: {}",
            check(),
            cut.branch.accent(),
            error.warn()
        ),
        (None, None) => println!("{} {} created", check(), cut.branch.accent()),
    }
}

fn ensure_created(cuts: &[CutBranch]) -> Result<()> {
    let failed: Vec<&str> = cuts
        .iter()
        .filter(|c| !c.created())
        .map(|c| c.branch.as_str())
        .collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::Internal(format!(
            "failed to create: {}",
            failed.join(", ")
        )))
    }
}
