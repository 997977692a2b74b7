//! Command implementations for the `bflow` binary

pub mod commit;
pub mod context;
pub mod demand;
pub mod merge;
pub mod release;
pub mod squash;
pub mod style;

use anstream::println;
use async_trait::async_trait;
use branchflow::types::ProgressCallback;
use style::{Stylize, arrow};

/// Progress reporter printing one line per step
#[derive(Debug, Clone, Copy, Default)]
pub struct CliProgress;

impl CliProgress {
    /// One muted line per step
    pub const fn compact() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        println!("  {} {}", arrow(), message.muted());
    }
}
