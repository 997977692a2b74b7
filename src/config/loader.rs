//! Config file discovery and parsing

use super::DeployConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-repository JSON config file name
pub const CONFIG_FILE_JSON: &str = ".branchflow.json";

/// Per-repository TOML config file name
pub const CONFIG_FILE_TOML: &str = ".branchflow.toml";

const USER_CONFIG_DIR: &str = "branchflow";
const USER_CONFIG_FILE: &str = "config.toml";

fn candidate_paths(repo_root: &Path) -> Vec<PathBuf> {
    let mut paths = vec![
        repo_root.join(CONFIG_FILE_JSON),
        repo_root.join(CONFIG_FILE_TOML),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE));
    }
    paths
}

/// Load the first config found for `repo_root`.
///
/// Returns `Ok(None)` when no config file exists anywhere.
pub fn load_config(repo_root: &Path) -> Result<Option<DeployConfig>> {
    for path in candidate_paths(repo_root) {
        if path.is_file() {
            debug!(path = %path.display(), "Loading config");
            return load_config_file(&path).map(Some);
        }
    }
    debug!("No config file found");
    Ok(None)
}

/// Parse a config file, choosing the format from its extension.
pub fn load_config_file(path: &Path) -> Result<DeployConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    if is_toml {
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    } else {
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }
}
