//! Session context for the CLI
//!
//! The library flows are stateless; the CLI keeps what it needs between
//! invocations (last conflicts, last commit message) in an explicit
//! [`SessionState`] that it loads and saves itself.

mod storage;

pub use storage::{load_session, save_session, session_path};

use serde::{Deserialize, Serialize};

/// Current session file format version
pub const SESSION_VERSION: u32 = 1;

/// Persisted per-repository session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Format version
    pub version: u32,
    /// Target branch of the last failed merge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_conflict_branch: Option<String>,
    /// Files left conflicted by the last failed merge
    #[serde(default)]
    pub last_conflict_files: Vec<String>,
    /// Message of the last commit made through `bflow commit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit_message: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Create an empty session
    #[must_use]
    pub const fn new() -> Self {
        Self {
            version: SESSION_VERSION,
            last_conflict_branch: None,
            last_conflict_files: Vec::new(),
            last_commit_message: None,
        }
    }

    /// Remember the files of a failed merge
    pub fn record_conflicts(&mut self, target_branch: &str, files: &[String]) {
        self.last_conflict_branch = Some(target_branch.to_string());
        self.last_conflict_files = files.to_vec();
    }

    /// Forget recorded conflicts
    pub fn clear_conflicts(&mut self) {
        self.last_conflict_branch = None;
        self.last_conflict_files.clear();
    }
}
