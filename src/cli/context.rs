//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by every command.

use branchflow::config::{DeployConfig, load_config};
use branchflow::error::Result;
use branchflow::session::{SessionState, load_session, save_session};
use branchflow::vcs::{GitCli, VersionControl};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Shared context for CLI commands
///
/// This struct encapsulates the common setup:
/// - Resolving the working tree root
/// - Loading the config (if any)
/// - Loading session state
pub struct CommandContext {
    /// Git client
    pub vcs: GitCli,
    /// Root path of the working tree
    pub repo_root: PathBuf,
    /// Decoded config, `None` when no config file exists
    pub config: Option<DeployConfig>,
    /// Session state carried between invocations
    pub session: SessionState,
}

impl CommandContext {
    /// Create a new command context for the repository containing `path`
    pub async fn new(path: &Path) -> Result<Self> {
        let vcs = GitCli::new();
        let repo_root = vcs.repo_root(path).await?;
        let config = load_config(&repo_root)?;
        let session = load_session(&repo_root)?;

        Ok(Self {
            vcs,
            repo_root,
            config,
            session,
        })
    }

    /// Current branch and remotes, fetched concurrently
    pub async fn branch_and_remotes(&self) -> Result<(String, Vec<String>)> {
        tokio::try_join!(
            self.vcs.current_branch(&self.repo_root),
            self.vcs.list_remotes(&self.repo_root)
        )
    }

    /// Release prefix from config, `release` by default
    pub fn release_prefix(&self) -> String {
        self.config
            .as_ref()
            .map_or_else(|| DeployConfig::default().release_prefix(), DeployConfig::release_prefix)
    }

    /// Today's `YYYYMMDD` in local time
    pub fn today_stamp() -> String {
        branchflow::naming::format_date_stamp(&Local::now().date_naive())
    }

    /// Persist session state
    pub fn save_session(&self) -> Result<()> {
        save_session(&self.repo_root, &self.session)
    }
}
