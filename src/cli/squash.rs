//! Squash command - collapse counter-suffixed fix-up commits

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use branchflow::error::{Error, Result};
use branchflow::squash::{
    CommitInfo, execute_squash, find_consecutive_commit_group, load_commits, plan_squash,
};
use dialoguer::{Confirm, MultiSelect};
use std::path::Path;

/// Options for the squash command
#[derive(Debug, Clone)]
pub struct SquashOptions {
    /// How many commits to offer
    pub depth: usize,
    /// Accept the detected group without prompting
    pub yes: bool,
}

/// Run the squash command
pub async fn run_squash(path: &Path, options: SquashOptions) -> Result<()> {
    let ctx = CommandContext::new(path).await?;

    loop {
        let commits = load_commits(&ctx.vcs, &ctx.repo_root, options.depth).await?;
        if commits.len() < 2 {
            println!("{}", "Need at least two commits to squash.".muted());
            return Ok(());
        }

        let preselected = find_consecutive_commit_group(&commits)
            .map(|group| group.indices())
            .unwrap_or_default();

        let selection = if options.yes {
            if preselected.is_empty() {
                println!("{}", "No consecutive fix-up commits found.".muted());
                return Ok(());
            }
            preselected
        } else {
            prompt_selection(&commits, &preselected)?
        };

        if selection.is_empty() {
            println!("{}", "Nothing selected".muted());
            return Ok(());
        }

        let plan = plan_squash(&commits, &selection)?;
        let outcome = execute_squash(&ctx.vcs, &ctx.repo_root, &plan).await?;

        println!(
            "{} Squashed {} commit(s) into {}",
            check(),
            outcome.count.accent(),
            outcome.message.emphasis()
        );
        if outcome.used_empty_root {
            println!("{}", "   History rewritten onto an empty root commit.".muted());
        }

        if options.yes || !ask("Squash more?", false)? {
            return Ok(());
        }
    }
}

fn prompt_selection(commits: &[CommitInfo], preselected: &[usize]) -> Result<Vec<usize>> {
    let items: Vec<String> = commits
        .iter()
        .map(|c| format!("{} {}", short_hash(&c.hash), c.message))
        .collect();
    let defaults: Vec<bool> = (0..commits.len()).map(|i| preselected.contains(&i)).collect();

    MultiSelect::new()
        .with_prompt("Select commits to squash (newest first)")
        .items(&items)
        .defaults(&defaults)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read selection: {e}")))
}

fn ask(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))
}

fn short_hash(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}
