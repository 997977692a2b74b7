//! Demand command - create a dated feature branch from a description

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use branchflow::demand::{
    ChatTranslator, PassthroughTranslator, Translator, build_demand_branch_name,
};
use branchflow::error::{Error, Result};
use branchflow::naming::{DemandType, slugify};
use branchflow::release::get_latest_release_branch;
use branchflow::vcs::VersionControl;
use dialoguer::Select;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;

/// Options for the demand command
#[derive(Debug, Clone, Default)]
pub struct DemandOptions {
    /// Free-text description (any language)
    pub description: String,
    /// Demand type prefix; prompted for when omitted
    pub kind: Option<String>,
    /// Use the description as-is
    pub no_translate: bool,
    /// Print the branch name without creating it
    pub dry_run: bool,
}

/// Run the demand command
pub async fn run_demand(path: &Path, options: DemandOptions) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let demand_config = ctx
        .config
        .as_ref()
        .and_then(|c| c.demand_branch.clone())
        .unwrap_or_default();
    let types = demand_config.demand_types();
    let prefix = choose_type(&types, options.kind.as_deref())?;

    let translator: Box<dyn Translator> = match ChatTranslator::from_config(&demand_config)? {
        Some(chat) if !options.no_translate => Box::new(chat),
        _ => Box::new(PassthroughTranslator),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message("Translating description...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let translated = translator.translate(&options.description).await;
    spinner.finish_and_clear();
    let translated = translated?;

    let stamp = CommandContext::today_stamp();
    let branch = build_demand_branch_name(&prefix, &translated, &stamp).ok_or_else(|| {
        Error::Internal(format!("description {translated:?} yields an empty branch name"))
    })?;

    let release_prefix = demand_config.release_prefix();
    let base = match get_latest_release_branch(&ctx.vcs, &ctx.repo_root, &release_prefix).await? {
        Some(release) => release,
        None => ctx.vcs.current_branch(&ctx.repo_root).await?,
    };
    if base.is_empty() {
        return Err(Error::Internal("no base branch (detached HEAD?)".to_string()));
    }

    if options.dry_run {
        println!("Would create {} from {}", branch.accent(), base.accent());
        return Ok(());
    }

    ctx.vcs.create_branch(&ctx.repo_root, &branch, &base).await?;
    ctx.vcs.checkout(&ctx.repo_root, &branch).await?;
    println!(
        "{} Created {} from {}",
        check(),
        branch.accent(),
        base.accent()
    );
    Ok(())
}

fn choose_type(types: &[DemandType], kind: Option<&str>) -> Result<String> {
    if let Some(kind) = kind {
        let slug = slugify(kind);
        if slug.is_empty() {
            return Err(Error::Config(format!("invalid demand type {kind:?}")));
        }
        if !types.is_empty() && !types.iter().any(|t| t.prefix == slug) {
            let known: Vec<&str> = types.iter().map(|t| t.prefix.as_str()).collect();
            return Err(Error::Config(format!(
                "unknown demand type {slug:?} (configured: {})",
                known.join(", ")
            )));
        }
        return Ok(slug);
    }

    if types.is_empty() {
        return Err(Error::Config(
            "no demandBranch.types configured; pass --type".to_string(),
        ));
    }

    let labels: Vec<&str> = types.iter().map(|t| t.prefix.as_str()).collect();
    let index = Select::new()
        .with_prompt("Demand type")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read selection: {e}")))?;
    Ok(types[index].prefix.clone())
}
