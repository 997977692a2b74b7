//! Error types for branchflow

use thiserror::Error;

/// Result type alias for branchflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for all branchflow operations
#[derive(Debug, Error)]
pub enum Error {
    /// Git subprocess failure, carrying git's own diagnostic text untouched
    #[error("{0}")]
    Git(String),

    /// CI trigger failure (HTTP status and response body embedded)
    #[error("CI trigger failed: {0}")]
    Ci(String),

    /// Plan could not be built from the given input
    #[error(transparent)]
    Validation(#[from] DeployValidationError),

    /// Squash selection rejected before touching the repository
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Configuration file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// Session state could not be read or written
    #[error("session error: {0}")]
    Session(String),

    /// Free-text translation failed
    #[error("translation failed: {0}")]
    Translate(String),

    /// Branch does not exist locally or on any remote
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Internal error (prompt failures, unexpected state)
    #[error("{0}")]
    Internal(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Plan validation failures
///
/// These are terminal: the user must edit the config or switch branch,
/// retrying the same input produces the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeployValidationError {
    /// No `deployToTest` section in the config
    #[error("missing deployToTest configuration")]
    MissingConfig,
    /// `deployToTest.ci` lacks a URL or job
    #[error("missing CI configuration (deployToTest.ci.url and deployToTest.ci.job are required)")]
    MissingCi,
    /// Current branch is blank (detached HEAD or unknown)
    #[error("no current branch (detached HEAD?)")]
    MissingBranch,
    /// Repository has no remote to push to
    #[error("no git remote configured")]
    MissingRemote,
}

impl DeployValidationError {
    /// Stable code for programmatic handling
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingConfig => "missing-config",
            Self::MissingCi => "missing-jenkins",
            Self::MissingBranch => "missing-branch",
            Self::MissingRemote => "missing-remote",
        }
    }
}

/// Reasons a squash selection is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Nothing selected
    #[error("no commits selected")]
    Empty,
    /// Selection skips the current HEAD
    #[error("select from the most recent commit")]
    MissingHead,
    /// Selection has a gap
    #[error("selection must be contiguous")]
    NotContiguous,
    /// Selection points past the end of the log
    #[error("selection index {0} is out of range")]
    OutOfRange(usize),
}
