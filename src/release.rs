//! Release and production branch resolution and cutting
//!
//! Release branches are named `<prefix>_<YYYYMMDD>`. Remote-tracking
//! branches are consulted before local ones since a local checkout may be
//! stale.

use crate::error::{Error, Result};
use crate::naming::{dated_branch_name, find_latest_release_branch};
use crate::vcs::VersionControl;
use std::path::Path;
use tracing::{debug, info, warn};

/// Result of creating one dated branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutBranch {
    /// Branch name
    pub branch: String,
    /// Creation error, `None` on success
    pub create_error: Option<String>,
    /// Remote pushed to, if the push succeeded
    pub pushed_to: Option<String>,
    /// Push error, if the push was attempted and failed
    pub push_error: Option<String>,
}

impl CutBranch {
    /// Whether the branch exists locally after the cut
    #[must_use]
    pub const fn created(&self) -> bool {
        self.create_error.is_none()
    }
}

/// Latest `<prefix>_<date>` branch, remote branches first.
pub async fn get_latest_release_branch(
    vcs: &dyn VersionControl,
    repo: &Path,
    prefix: &str,
) -> Result<Option<String>> {
    let remote = vcs.list_remote_branches(repo).await?;
    if let Some(branch) = find_latest_release_branch(&remote, prefix) {
        debug!(%branch, "Latest release branch found on remote");
        return Ok(Some(branch));
    }

    let local = vcs.list_local_branches(repo).await?;
    let latest = find_latest_release_branch(&local, prefix);
    debug!(branch = ?latest, "Latest release branch from local branches");
    Ok(latest)
}

/// Create `name` from `base`, then push it to `remote` if given.
///
/// Failures are recorded on the returned [`CutBranch`] rather than returned.
pub async fn cut_branch(
    vcs: &dyn VersionControl,
    repo: &Path,
    name: &str,
    base: &str,
    remote: Option<&str>,
) -> CutBranch {
    let mut cut = CutBranch {
        branch: name.to_string(),
        create_error: None,
        pushed_to: None,
        push_error: None,
    };

    if let Err(e) = vcs.create_branch(repo, name, base).await {
        warn!(branch = %name, %base, error = %e, "Branch creation failed");
        cut.create_error = Some(e.to_string());
        return cut;
    }
    info!(branch = %name, %base, "Created branch");

    if let Some(remote) = remote {
        match vcs.push(repo, remote, name).await {
            Ok(()) => cut.pushed_to = Some(remote.to_string()),
            Err(e) => {
                warn!(branch = %name, %remote, error = %e, "Push failed");
                cut.push_error = Some(e.to_string());
            }
        }
    }
    cut
}

/// Cut `<release_prefix>_<stamp>` from `base`.
pub async fn cut_release_branch(
    vcs: &dyn VersionControl,
    repo: &Path,
    release_prefix: &str,
    stamp: &str,
    base: &str,
    remote: Option<&str>,
) -> CutBranch {
    let name = dated_branch_name(release_prefix, stamp);
    cut_branch(vcs, repo, &name, base, remote).await
}

/// Cut one `<prod_prefix>_<stamp>` branch per prefix from the latest release.
///
/// Fails with `BranchNotFound` when no release branch exists at all.
pub async fn cut_prod_branches(
    vcs: &dyn VersionControl,
    repo: &Path,
    release_prefix: &str,
    prod_prefixes: &[String],
    stamp: &str,
    remote: Option<&str>,
) -> Result<(String, Vec<CutBranch>)> {
    let base = get_latest_release_branch(vcs, repo, release_prefix)
        .await?
        .ok_or_else(|| Error::BranchNotFound(format!("{release_prefix}_<YYYYMMDD>")))?;

    let mut cuts = Vec::with_capacity(prod_prefixes.len());
    for prefix in prod_prefixes {
        let name = dated_branch_name(prefix, stamp);
        cuts.push(cut_branch(vcs, repo, &name, &base, remote).await);
    }
    Ok((base, cuts))
}
