//! Demand branches and demand commit messages
//!
//! A demand branch is named `<type>_<slug>_<YYYYMMDD>` where the slug comes
//! from a free-text description translated to English by a [`Translator`].

mod translate;

pub use translate::{ChatTranslator, PassthroughTranslator, Translator};

use crate::naming::{DemandType, extract_commit_prefix, slugify};
use std::collections::BTreeMap;

/// `<type>_<slug>_<stamp>`, `None` when the description has no usable characters
#[must_use]
pub fn build_demand_branch_name(type_prefix: &str, description: &str, stamp: &str) -> Option<String> {
    let slug = slugify(description);
    if slug.is_empty() {
        return None;
    }
    Some(
        [type_prefix, slug.as_str(), stamp]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_"),
    )
}

/// Demand type whose prefix the branch name starts with (longest match wins)
#[must_use]
pub fn match_demand_type<'a>(branch: &str, types: &'a [DemandType]) -> Option<&'a DemandType> {
    let segment = branch.rsplit('/').next().unwrap_or(branch);
    types
        .iter()
        .filter(|t| segment == t.prefix || segment.starts_with(&format!("{}_", t.prefix)))
        .max_by_key(|t| t.prefix.len())
}

/// Commit prefix for work on `branch`.
///
/// Lookup order: `commitPrefixMap` entry for the matched branch prefix, the
/// demand type's own commit prefix, the map alone, then the prefix of the
/// previous commit message.
#[must_use]
pub fn resolve_commit_prefix(
    branch: &str,
    types: &[DemandType],
    prefix_map: &BTreeMap<String, String>,
    last_message: Option<&str>,
) -> Option<String> {
    if let Some(demand_type) = match_demand_type(branch, types) {
        return Some(
            prefix_map
                .get(&demand_type.prefix)
                .unwrap_or(&demand_type.commit_prefix)
                .clone(),
        );
    }

    let segment = branch.rsplit('/').next().unwrap_or(branch);
    let from_map = prefix_map
        .iter()
        .filter(|(prefix, _)| segment.starts_with(&format!("{prefix}_")))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, commit_prefix)| commit_prefix.clone());

    from_map.or_else(|| last_message.and_then(extract_commit_prefix))
}
