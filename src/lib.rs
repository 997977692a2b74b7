//! branchflow - git branching workflow automation
//!
//! Merges feature branches into a shared test branch, triggers CI, squashes
//! counter-suffixed fix-up commits and cuts dated release/prod branches.
//!
//! Like a functional core with an imperative shell, every flow is split into
//! a pure planning step and an effectful execution step:
//! - [`merge::build_deploy_test_plan`] / [`merge::execute_merge_plan`]
//! - [`squash::find_consecutive_commit_group`] / [`squash::execute_squash`]
//! - [`release::get_latest_release_branch`] / [`release::cut_prod_branches`]

pub mod ci;
pub mod config;
pub mod demand;
pub mod error;
pub mod merge;
pub mod naming;
pub mod release;
pub mod session;
pub mod squash;
pub mod types;
pub mod vcs;
