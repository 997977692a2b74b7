//! `bflow` - git branching workflow automation

mod cli;

use anstream::eprintln;
use branchflow::squash::DEFAULT_LOG_DEPTH;
use branchflow::types::MergeStrategy;
use clap::{Parser, Subcommand};
use cli::commit::{CommitOptions, run_commit};
use cli::demand::{DemandOptions, run_demand};
use cli::merge::{
    MergeOptions, PlainMergeOptions, TestFlow, run_conflicts, run_plain_merge, run_test_flow,
};
use cli::release::{CutOptions, run_cut_release, run_deploy_prod, run_latest};
use cli::squash::{SquashOptions, run_squash};
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bflow", version, about = "Merge-to-test, squash and release branch workflow for git")]
struct Cli {
    /// Path inside the repository (defaults to the current directory)
    #[arg(long, global = true, default_value = ".")]
    path: PathBuf,

    /// Log git invocations and HTTP requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the current branch into the test branch, push and trigger CI
    DeployTest {
        /// Show the plan without executing it
        #[arg(long)]
        dry_run: bool,
        /// Preview the plan and ask before executing
        #[arg(long)]
        confirm: bool,
    },
    /// Merge the current branch into the test branch and push (no CI)
    MergeTest {
        /// Show the plan without executing it
        #[arg(long)]
        dry_run: bool,
        /// Preview the plan and ask before executing
        #[arg(long)]
        confirm: bool,
    },
    /// Merge SOURCE into TARGET and return to the current branch
    Merge {
        /// Branch to merge
        source: String,
        /// Branch receiving the merge
        target: String,
        /// Merge strategy: default, no-ff or ff-only
        #[arg(long, default_value = "default")]
        strategy: MergeStrategy,
        /// Push TARGET after merging
        #[arg(long)]
        push: bool,
        /// Remote to push to (defaults to origin or the first remote)
        #[arg(long)]
        remote: Option<String>,
        /// Show the plan without executing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Squash consecutive fix-up commits (same message, incremented counter)
    Squash {
        /// Number of recent commits to consider
        #[arg(long, default_value_t = DEFAULT_LOG_DEPTH)]
        depth: usize,
        /// Squash the detected group without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Release branch operations
    Release {
        #[command(subcommand)]
        command: ReleaseCommand,
    },
    /// Cut today's prod branches from the latest release branch
    DeployProd {
        /// Do not push the new branches
        #[arg(long)]
        no_push: bool,
        /// Show the branch names without creating them
        #[arg(long)]
        dry_run: bool,
    },
    /// Create a demand branch from a free-text description
    Demand {
        /// Description of the demand (any language)
        #[arg(required = true)]
        description: Vec<String>,
        /// Demand type prefix
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Use the description without translating it
        #[arg(long)]
        no_translate: bool,
        /// Print the branch name without creating it
        #[arg(long)]
        dry_run: bool,
    },
    /// Commit with the branch's demand prefix
    Commit {
        /// Commit message text
        text: Vec<String>,
        /// Repeat the previous message with its counter incremented
        #[arg(long, conflicts_with = "text")]
        again: bool,
        /// Stage all changes first
        #[arg(short, long)]
        all: bool,
    },
    /// List files left conflicted by the last failed merge
    Conflicts,
}

#[derive(Subcommand)]
enum ReleaseCommand {
    /// Print the latest release branch
    Latest,
    /// Cut today's release branch
    Cut {
        /// Base ref (defaults to the current branch)
        #[arg(long)]
        base: Option<String>,
        /// Do not push the new branch
        #[arg(long)]
        no_push: bool,
        /// Show the branch name without creating it
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("branchflow=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn joined(words: &[String]) -> String {
    words.join(" ")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let path = cli.path;

    let result = match cli.command {
        Commands::DeployTest { dry_run, confirm } => {
            run_test_flow(&path, TestFlow::Deploy, MergeOptions { dry_run, confirm }).await
        }
        Commands::MergeTest { dry_run, confirm } => {
            run_test_flow(&path, TestFlow::Merge, MergeOptions { dry_run, confirm }).await
        }
        Commands::Merge {
            source,
            target,
            strategy,
            push,
            remote,
            dry_run,
        } => {
            run_plain_merge(
                &path,
                PlainMergeOptions {
                    source,
                    target,
                    strategy,
                    push,
                    remote,
                },
                MergeOptions {
                    dry_run,
                    confirm: false,
                },
            )
            .await
        }
        Commands::Squash { depth, yes } => run_squash(&path, SquashOptions { depth, yes }).await,
        Commands::Release { command } => match command {
            ReleaseCommand::Latest => run_latest(&path).await,
            ReleaseCommand::Cut {
                base,
                no_push,
                dry_run,
            } => {
                run_cut_release(
                    &path,
                    CutOptions {
                        base,
                        no_push,
                        dry_run,
                    },
                )
                .await
            }
        },
        Commands::DeployProd { no_push, dry_run } => {
            run_deploy_prod(
                &path,
                CutOptions {
                    base: None,
                    no_push,
                    dry_run,
                },
            )
            .await
        }
        Commands::Demand {
            description,
            kind,
            no_translate,
            dry_run,
        } => {
            run_demand(
                &path,
                DemandOptions {
                    description: joined(&description),
                    kind,
                    no_translate,
                    dry_run,
                },
            )
            .await
        }
        Commands::Commit { text, again, all } => {
            let text = (!text.is_empty()).then(|| joined(&text));
            run_commit(&path, CommitOptions { text, again, all }).await
        }
        Commands::Conflicts => run_conflicts(&path).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".error());
            ExitCode::FAILURE
        }
    }
}
