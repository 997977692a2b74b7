//! Commit command - demand-prefixed and counter-incremented commits

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use branchflow::demand::resolve_commit_prefix;
use branchflow::error::{Error, Result};
use branchflow::naming::{build_next_commit_message, format_demand_message, pick_base_commit_message};
use branchflow::vcs::VersionControl;
use std::path::Path;

/// Options for the commit command
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Message text; the demand prefix is added when missing
    pub text: Option<String>,
    /// Reuse the previous message with its counter incremented
    pub again: bool,
    /// Stage all changes first
    pub all: bool,
}

/// Run the commit command
pub async fn run_commit(path: &Path, options: CommitOptions) -> Result<()> {
    let mut ctx = CommandContext::new(path).await?;
    let repo = ctx.repo_root.clone();

    // An empty repository has no log yet
    let last_message = ctx
        .vcs
        .log(&repo, 1, "%s")
        .await
        .ok()
        .filter(|m| !m.trim().is_empty());

    let message = if options.again {
        let base = pick_base_commit_message(
            last_message.as_deref(),
            ctx.session.last_commit_message.as_deref(),
        )
        .ok_or_else(|| Error::Internal("no previous commit message to continue".to_string()))?;
        build_next_commit_message(&base)
    } else {
        let text = options
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Internal("commit message is required".to_string()))?;
        let branch = ctx.vcs.current_branch(&repo).await?;
        let demand = ctx
            .config
            .as_ref()
            .and_then(|c| c.demand_branch.clone())
            .unwrap_or_default();
        let prefix = resolve_commit_prefix(
            &branch,
            &demand.demand_types(),
            &demand.commit_prefix_map(),
            last_message.as_deref(),
        );
        format_demand_message(text, prefix.as_deref().unwrap_or_default())
    };

    if options.all {
        ctx.vcs.stage_all(&repo).await?;
    }
    ctx.vcs.commit(&repo, &message, false).await?;
    println!("{} {}", check(), message.emphasis());

    ctx.session.last_commit_message = Some(message);
    if let Err(e) = ctx.save_session() {
        println!("{}", format!("⚠️  Failed to save session: {e}").warn());
    }
    Ok(())
}
