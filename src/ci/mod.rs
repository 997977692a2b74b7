//! CI build triggering
//!
//! Provides the [`CiTrigger`] seam used by the merge orchestrator plus the
//! `${key}` parameter interpolation shared by every implementation.

mod jenkins;

pub use jenkins::JenkinsTrigger;

use crate::config::CiConfig;
use crate::error::Result;
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Context key for the branch the run started from
pub const PARAM_CURRENT_BRANCH: &str = "currentBranch";
/// Context key for the merged branch
pub const PARAM_SOURCE_BRANCH: &str = "sourceBranch";
/// Context key for the integration branch
pub const PARAM_TARGET_BRANCH: &str = "targetBranch";
/// Context key for the merge result SHA
pub const PARAM_COMMIT: &str = "commit";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_.-]+)\}").expect("valid placeholder regex"));

/// Credentials for the CI server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiAuth {
    /// User name
    pub user: String,
    /// API token
    pub token: String,
}

/// A CI job to trigger after a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiTarget {
    /// Server base URL
    pub url: String,
    /// Job id (`folder/job` for nested jobs)
    pub job: String,
    /// Parameter templates
    pub parameters: BTreeMap<String, String>,
    /// Basic auth, if configured
    pub auth: Option<CiAuth>,
    /// Whether a crumb must be fetched first
    pub crumb: bool,
}

impl CiTarget {
    /// Build a target from config, `None` when URL or job is missing
    #[must_use]
    pub fn from_config(config: &CiConfig) -> Option<Self> {
        let url = config.url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let job = config.job.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let auth = match (config.user.as_deref(), config.token.as_deref()) {
            (Some(user), Some(token)) if !user.is_empty() && !token.is_empty() => Some(CiAuth {
                user: user.to_string(),
                token: token.to_string(),
            }),
            _ => None,
        };
        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            job: job.to_string(),
            parameters: config.parameters.clone().unwrap_or_default(),
            auth,
            crumb: config.crumb,
        })
    }

    /// Parameters with every `${key}` resolved against `context`
    #[must_use]
    pub fn resolve_parameters(
        &self,
        context: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        self.parameters
            .iter()
            .map(|(k, v)| (k.clone(), interpolate(v, context)))
            .collect()
    }
}

/// Replace `${key}` with `context[key]`; unknown keys are left as written.
#[must_use]
pub fn interpolate(template: &str, context: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            context
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Triggers a CI build
#[async_trait]
pub trait CiTrigger: Send + Sync {
    /// Queue a build of `target` with parameters resolved against `context`
    async fn trigger(&self, target: &CiTarget, context: &BTreeMap<String, String>) -> Result<()>;
}
