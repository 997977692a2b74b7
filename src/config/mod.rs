//! Deploy configuration
//!
//! Mirrors the team config file. List- and map-shaped fields that users
//! commonly get wrong are kept as raw JSON values and cleaned up by the
//! [`crate::naming`] normalizers.

mod loader;

pub use loader::{CONFIG_FILE_JSON, CONFIG_FILE_TOML, load_config, load_config_file};

use crate::naming::{self, DemandType};
use crate::types::MergeStrategy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default integration branch for deploy-to-test
pub const DEFAULT_TEST_BRANCH: &str = "pre-test";

/// Root configuration object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    /// Merge-to-test settings
    #[serde(default)]
    pub deploy_to_test: Option<DeployToTestConfig>,
    /// Production branch settings
    #[serde(default)]
    pub deploy_to_prod: Option<DeployToProdConfig>,
    /// Demand branch settings
    #[serde(default)]
    pub demand_branch: Option<DemandBranchConfig>,
}

/// `deployToTest` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployToTestConfig {
    /// Integration branch, defaults to `pre-test`
    #[serde(default)]
    pub target_branch: Option<String>,
    /// Merge strategy for the integration merge
    #[serde(default)]
    pub strategy: Option<MergeStrategy>,
    /// CI job to trigger after pushing
    #[serde(default, alias = "jenkins")]
    pub ci: Option<CiConfig>,
}

impl DeployToTestConfig {
    /// Configured target branch or [`DEFAULT_TEST_BRANCH`]
    #[must_use]
    pub fn target_branch(&self) -> String {
        self.target_branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_TEST_BRANCH)
            .to_string()
    }
}

/// CI server settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiConfig {
    /// Server base URL
    #[serde(default)]
    pub url: Option<String>,
    /// Job id, `/` separates folders
    #[serde(default)]
    pub job: Option<String>,
    /// Build parameters; values may contain `${key}` placeholders
    #[serde(default)]
    pub parameters: Option<BTreeMap<String, String>>,
    /// User for basic auth
    #[serde(default)]
    pub user: Option<String>,
    /// API token for basic auth
    #[serde(default, alias = "apiToken")]
    pub token: Option<String>,
    /// Fetch a crumb before triggering
    #[serde(default)]
    pub crumb: bool,
}

/// `deployToProd` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployToProdConfig {
    /// Prefixes of the prod branches to cut
    #[serde(default)]
    pub prod_prefix: Value,
}

impl DeployToProdConfig {
    /// Normalized prod prefixes
    #[must_use]
    pub fn prefixes(&self) -> Vec<String> {
        naming::normalize_prefixes(&self.prod_prefix)
    }
}

/// `demandBranch` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandBranchConfig {
    /// Demand types (`[{prefix, commitPrefix?}]`)
    #[serde(default)]
    pub types: Value,
    /// Release branch prefix
    #[serde(default)]
    pub release_prefix: Value,
    /// Branch prefix → commit prefix overrides
    #[serde(default)]
    pub commit_prefix_map: Value,
    /// Translation API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Translation API base URL
    #[serde(default)]
    pub base_url: Option<String>,
    /// Translation model
    #[serde(default)]
    pub model: Option<String>,
}

impl DemandBranchConfig {
    /// Normalized demand types
    #[must_use]
    pub fn demand_types(&self) -> Vec<DemandType> {
        naming::normalize_demand_types(&self.types)
    }

    /// Normalized release prefix
    #[must_use]
    pub fn release_prefix(&self) -> String {
        naming::normalize_release_prefix(&self.release_prefix)
    }

    /// Normalized commit prefix overrides
    #[must_use]
    pub fn commit_prefix_map(&self) -> BTreeMap<String, String> {
        naming::normalize_commit_prefix_map(&self.commit_prefix_map)
    }
}

impl DeployConfig {
    /// Release prefix, `release` when no demand section is configured
    #[must_use]
    pub fn release_prefix(&self) -> String {
        self.demand_branch.as_ref().map_or_else(
            || naming::DEFAULT_RELEASE_PREFIX.to_string(),
            DemandBranchConfig::release_prefix,
        )
    }
}
