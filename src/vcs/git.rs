//! `git` subprocess implementation of [`VersionControl`]

use super::VersionControl;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Drives the `git` binary found on `PATH`
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl GitCli {
    /// Create a new git client
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Execute a git command and return trimmed stdout
    async fn run(&self, repo: &Path, args: &[&str]) -> Result<String> {
        self.run_with_input(repo, args, None).await
    }

    async fn run_with_input(&self, repo: &Path, args: &[&str], input: Option<&str>) -> Result<String> {
        debug!(repo = %repo.display(), "git {}", args.join(" "));

        let mut child = Command::new("git")
            .args(["-c", "core.quotepath=off"])
            .args(args)
            .current_dir(repo)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Git(format!("failed to execute git: {e}")))?;

        if let (Some(text), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(text.as_bytes()).await?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::Git(format!("failed to execute git: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            // Merge conflicts are reported on stdout, usage errors on stderr
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            debug!(status = ?output.status.code(), "git {} failed", args.join(" "));
            return Err(Error::Git(if detail.is_empty() {
                format!("git {} failed", args.join(" "))
            } else {
                detail
            }));
        }

        Ok(stdout.trim().to_string())
    }

    /// Top-level directory of the working tree containing `path`
    pub async fn repo_root(&self, path: &Path) -> Result<PathBuf> {
        self.run(path, &["rev-parse", "--show-toplevel"])
            .await
            .map(PathBuf::from)
    }

    async fn run_lines(&self, repo: &Path, args: &[&str]) -> Result<Vec<String>> {
        Ok(lines(&self.run(repo, args).await?))
    }
}

fn lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[async_trait]
impl VersionControl for GitCli {
    async fn current_branch(&self, repo: &Path) -> Result<String> {
        self.run(repo, &["branch", "--show-current"]).await
    }

    async fn checkout(&self, repo: &Path, branch: &str) -> Result<()> {
        self.run(repo, &["checkout", branch]).await.map(|_| ())
    }

    async fn merge(&self, repo: &Path, branch: &str, strategy_flag: Option<&str>) -> Result<()> {
        let mut args = vec!["merge", "--no-edit"];
        args.extend(strategy_flag);
        args.push(branch);
        self.run(repo, &args).await.map(|_| ())
    }

    async fn head_commit(&self, repo: &Path) -> Result<String> {
        self.run(repo, &["rev-parse", "HEAD"]).await
    }

    async fn parent_count(&self, repo: &Path, sha: &str) -> Result<usize> {
        // First token is the commit itself, the rest are its parents
        let line = self.run(repo, &["rev-list", "--parents", "-n", "1", sha]).await?;
        Ok(line.split_whitespace().count().saturating_sub(1))
    }

    async fn changed_files(&self, repo: &Path, from: &str, to: &str) -> Result<Vec<String>> {
        self.run_lines(repo, &["diff", "--name-only", from, to]).await
    }

    async fn conflicting_files(&self, repo: &Path) -> Result<Vec<String>> {
        self.run_lines(repo, &["diff", "--name-only", "--diff-filter=U"])
            .await
    }

    async fn list_local_branches(&self, repo: &Path) -> Result<Vec<String>> {
        self.run_lines(
            repo,
            &["for-each-ref", "--format=%(refname:short)", "refs/heads"],
        )
        .await
    }

    async fn list_remote_branches(&self, repo: &Path) -> Result<Vec<String>> {
        let refs = self
            .run_lines(
                repo,
                &["for-each-ref", "--format=%(refname:short)", "refs/remotes"],
            )
            .await?;
        // `refs/remotes/origin/HEAD` shortens to plain `origin`
        Ok(refs
            .into_iter()
            .filter(|r| r.contains('/') && !r.ends_with("/HEAD"))
            .collect())
    }

    async fn list_remotes(&self, repo: &Path) -> Result<Vec<String>> {
        let mut remotes = self.run_lines(repo, &["remote"]).await?;
        if let Some(pos) = remotes.iter().position(|r| r == "origin") {
            let origin = remotes.remove(pos);
            remotes.insert(0, origin);
        }
        Ok(remotes)
    }

    async fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<()> {
        self.run(repo, &["push", remote, branch]).await.map(|_| ())
    }

    async fn stage_all(&self, repo: &Path) -> Result<()> {
        self.run(repo, &["add", "-A"]).await.map(|_| ())
    }

    async fn commit(&self, repo: &Path, message: &str, allow_empty: bool) -> Result<()> {
        let mut args = vec!["commit", "-m", message];
        if allow_empty {
            args.push("--allow-empty");
        }
        self.run(repo, &args).await.map(|_| ())
    }

    async fn reset_soft(&self, repo: &Path, reference: &str) -> Result<()> {
        self.run(repo, &["reset", "--soft", reference])
            .await
            .map(|_| ())
    }

    async fn log(&self, repo: &Path, max_count: usize, format: &str) -> Result<String> {
        let count = max_count.to_string();
        let format = format!("--format={format}");
        self.run(repo, &["log", "-n", &count, &format]).await
    }

    async fn create_branch(&self, repo: &Path, name: &str, start_point: &str) -> Result<()> {
        self.run(repo, &["branch", name, start_point])
            .await
            .map(|_| ())
    }

    async fn create_empty_root_commit(&self, repo: &Path, message: &str) -> Result<String> {
        let tree = self
            .run_with_input(repo, &["hash-object", "-t", "tree", "-w", "--stdin"], Some(""))
            .await?;
        self.run(repo, &["commit-tree", &tree, "-m", message]).await
    }
}
