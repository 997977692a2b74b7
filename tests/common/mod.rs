//! Shared test utilities

mod mock_ci;
mod mock_vcs;
mod temp_repo;

#[allow(unused_imports)]
pub use mock_ci::{MockCi, TriggerCall};
#[allow(unused_imports)]
pub use mock_vcs::{MockVcs, PushCall};
#[allow(unused_imports)]
pub use temp_repo::TempGitRepo;

use branchflow::squash::CommitInfo;

/// Commits with synthetic hashes, newest first
#[allow(dead_code)]
pub fn make_commits(messages: &[&str]) -> Vec<CommitInfo> {
    messages
        .iter()
        .enumerate()
        .map(|(i, message)| CommitInfo {
            hash: format!("{i:040x}"),
            message: (*message).to_string(),
        })
        .collect()
}
