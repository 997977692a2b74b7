//! Persistence for session state in `<git-dir>/branchflow/`.

use super::{SESSION_VERSION, SessionState};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for branchflow metadata within the git dir.
const BRANCHFLOW_DIR: &str = "branchflow";

/// Filename for session state.
const SESSION_FILE: &str = "session.toml";

/// Resolve the git dir, handling linked worktrees.
///
/// In linked worktrees (created via `git worktree add`) `.git` is a plain
/// text file of the form `gitdir: <path>`, pointing at the real git dir.
///
/// Falls back to `<root>/.git` if resolution fails.
pub(super) fn resolve_git_dir(workspace_root: &Path) -> PathBuf {
    let git_path = workspace_root.join(".git");

    if git_path.is_file() {
        if let Ok(contents) = fs::read_to_string(&git_path) {
            if let Some(target) = contents.trim().strip_prefix("gitdir:") {
                let target = workspace_root.join(target.trim());
                if target.is_dir() {
                    return fs::canonicalize(&target).unwrap_or(target);
                }
            }
        }
        // Pointer file exists but is invalid/unreadable - return as-is to surface error
        return git_path;
    }

    git_path
}

/// Get path to the branchflow metadata directory.
fn branchflow_dir(workspace_root: &Path) -> PathBuf {
    resolve_git_dir(workspace_root).join(BRANCHFLOW_DIR)
}

/// Get path to the session file.
pub fn session_path(workspace_root: &Path) -> PathBuf {
    branchflow_dir(workspace_root).join(SESSION_FILE)
}

/// Load session state from disk.
///
/// Returns an empty `SessionState` if the file doesn't exist.
pub fn load_session(workspace_root: &Path) -> Result<SessionState> {
    let path = session_path(workspace_root);

    if !path.exists() {
        return Ok(SessionState::new());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Session(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Session(format!("failed to parse {}: {e}", path.display())))
}

/// Save session state to disk.
///
/// Creates the `<git-dir>/branchflow/` directory if it doesn't exist.
pub fn save_session(workspace_root: &Path, state: &SessionState) -> Result<()> {
    let dir = branchflow_dir(workspace_root);
    let path = dir.join(SESSION_FILE);

    if !dir.exists() {
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Session(format!("failed to create {}: {e}", dir.display())))?;
    }

    let mut state_to_save = state.clone();
    state_to_save.version = SESSION_VERSION;

    let content = toml::to_string_pretty(&state_to_save)
        .map_err(|e| Error::Session(format!("failed to serialize session state: {e}")))?;

    let content_with_header = format!(
        "# branchflow session state\n# Auto-generated - manual edits may be overwritten\n\n{content}"
    );

    fs::write(&path, content_with_header)
        .map_err(|e| Error::Session(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}
