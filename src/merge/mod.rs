//! Merge engine for integration branches
//!
//! Three-phase pattern:
//! 1. Gather - current branch and remotes (read-only, may run concurrently)
//! 2. Plan - create `MergePlan` (pure, testable)
//! 3. Execute - checkout, merge, push, trigger CI, checkout back (effectful)

mod execute;
mod plan;

pub use execute::{execute_merge_plan, parameter_context};
pub use plan::{MergePlan, PlanInput, build_deploy_test_plan, build_merge_to_test_plan};
