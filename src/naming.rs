//! Branch and commit-message naming utilities
//!
//! Pure string functions used across every flow. Inputs that come from the
//! config file arrive as raw `serde_json::Value` so malformed shapes can be
//! dropped here instead of failing deserialization.

use chrono::Datelike;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Fallback when `releasePrefix` is missing or slugifies to nothing
pub const DEFAULT_RELEASE_PREFIX: &str = "release";

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("valid slug regex"));

/// A demand branch type, e.g. `feature` branches committing with `feat:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandType {
    /// Branch-name prefix
    pub prefix: String,
    /// Commit-message prefix
    pub commit_prefix: String,
}

/// Lowercase `text` and collapse every run of non `[a-z0-9]` characters into `_`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_SLUG
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

fn value_to_slug(value: &Value) -> String {
    match value {
        Value::String(s) => slugify(s),
        Value::Number(n) => slugify(&n.to_string()),
        _ => String::new(),
    }
}

/// Normalize a list of branch prefixes.
///
/// Only a JSON array is accepted; a bare string yields an empty list.
/// Entries are slugified, empties dropped, duplicates removed (first wins).
#[must_use]
pub fn normalize_prefixes(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    let mut result: Vec<String> = Vec::new();
    for item in items {
        let slug = value_to_slug(item);
        if !slug.is_empty() && !result.contains(&slug) {
            result.push(slug);
        }
    }
    result
}

/// Slugified release prefix, `"release"` when empty.
#[must_use]
pub fn normalize_release_prefix(value: &Value) -> String {
    let slug = value_to_slug(value);
    if slug.is_empty() {
        DEFAULT_RELEASE_PREFIX.to_string()
    } else {
        slug
    }
}

/// Normalize configured demand types.
///
/// Items without a usable `prefix` are dropped. `commitPrefix` falls back to
/// the prefix itself. The first item for a given prefix wins.
#[must_use]
pub fn normalize_demand_types(value: &Value) -> Vec<DemandType> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    let mut result: Vec<DemandType> = Vec::new();
    for item in items {
        let Value::Object(fields) = item else {
            continue;
        };
        let prefix = fields.get("prefix").map(value_to_slug).unwrap_or_default();
        if prefix.is_empty() || result.iter().any(|t| t.prefix == prefix) {
            continue;
        }
        let commit_prefix = fields
            .get("commitPrefix")
            .map(value_to_slug)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| prefix.clone());
        result.push(DemandType {
            prefix,
            commit_prefix,
        });
    }
    result
}

/// Normalize a branch-prefix → commit-prefix map; entries with an empty key
/// or value after slugifying are dropped.
#[must_use]
pub fn normalize_commit_prefix_map(value: &Value) -> BTreeMap<String, String> {
    let Value::Object(fields) = value else {
        return BTreeMap::new();
    };

    fields
        .iter()
        .filter_map(|(key, val)| {
            let key = slugify(key);
            let val = value_to_slug(val);
            (!key.is_empty() && !val.is_empty()).then_some((key, val))
        })
        .collect()
}

/// Extract the `YYYYMMDD` date from `<prefix>_<8 digits>`.
///
/// Only the last path segment is inspected, so remote names such as
/// `origin/release_20240102` resolve too.
#[must_use]
pub fn extract_release_date(branch: &str, prefix: &str) -> Option<String> {
    let segment = branch.rsplit('/').next().unwrap_or(branch);
    let date = segment.strip_prefix(prefix)?.strip_prefix('_')?;
    (date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit())).then(|| date.to_string())
}

/// Branch with the greatest release date, first seen wins on ties.
#[must_use]
pub fn find_latest_release_branch<S: AsRef<str>>(branches: &[S], prefix: &str) -> Option<String> {
    let mut latest: Option<(String, &str)> = None;
    for branch in branches {
        let branch = branch.as_ref();
        let Some(date) = extract_release_date(branch, prefix) else {
            continue;
        };
        if latest.as_ref().is_none_or(|(best, _)| date > *best) {
            latest = Some((date, branch));
        }
    }
    latest.map(|(_, branch)| branch.to_string())
}

/// Format a calendar date as `YYYYMMDD`.
#[must_use]
pub fn format_date_stamp<D: Datelike>(date: &D) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// `<prefix>_<YYYYMMDD>`
#[must_use]
pub fn dated_branch_name(prefix: &str, stamp: &str) -> String {
    format!("{prefix}_{stamp}")
}

/// Token before the first ASCII or full-width colon.
#[must_use]
pub fn extract_commit_prefix(message: &str) -> Option<String> {
    let (head, _) = message.split_once([':', '：'])?;
    let head = head.trim();
    (!head.is_empty()).then(|| head.to_string())
}

/// Whether `message` starts with `prefix` (case-insensitive) followed by the
/// end of the message or one of space, `:`, `：`, `-`.
#[must_use]
pub fn has_commit_prefix(message: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    let Some(head) = message.get(..prefix.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(prefix) {
        return false;
    }
    matches!(
        message[prefix.len()..].chars().next(),
        None | Some(' ' | ':' | '：' | '-')
    )
}

/// Prepend `"<prefix>: "` unless the message already carries it.
#[must_use]
pub fn format_demand_message(text: &str, prefix: &str) -> String {
    let text = text.trim();
    if prefix.is_empty() || has_commit_prefix(text, prefix) {
        text.to_string()
    } else {
        format!("{prefix}: {text}")
    }
}

/// Prefer the last commit's message, fall back to the stored one.
#[must_use]
pub fn pick_base_commit_message(last: Option<&str>, stored: Option<&str>) -> Option<String> {
    [last, stored]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(ToString::to_string)
}

/// Message with its trailing run of ASCII digits removed.
#[must_use]
pub fn strip_trailing_counter(message: &str) -> &str {
    message.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Increment a trailing decimal counter, or append `1` when there is none.
///
/// The counter is treated as a plain integer: `x007` becomes `x8`.
#[must_use]
pub fn build_next_commit_message(message: &str) -> String {
    if message.is_empty() {
        return String::new();
    }
    let base = strip_trailing_counter(message);
    let digits = &message[base.len()..];
    if digits.is_empty() {
        return format!("{message}1");
    }
    format!("{base}{}", increment_decimal(digits))
}

// String arithmetic so arbitrarily long counters never overflow.
fn increment_decimal(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let mut bytes: Vec<u8> = if trimmed.is_empty() {
        vec![b'0']
    } else {
        trimmed.bytes().collect()
    };

    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    bytes.insert(0, b'1');
    String::from_utf8_lossy(&bytes).into_owned()
}

const NO_UPSTREAM_PATTERNS: &[&str] = &[
    "has no upstream branch",
    "no upstream branch",
    "no upstream configured",
    "no configured push destination",
    "没有上游分支",
    "没有配置推送目标",
];

const ROOT_RESET_PATTERNS: &[&str] = &[
    "unknown revision",
    "ambiguous argument",
    "bad revision",
    "needed a single revision",
    "未知的版本",
    "有歧义的参数",
    "坏的版本",
    "需要一个单独的版本",
];

fn matches_any(message: &str, patterns: &[&str]) -> bool {
    let lowered = message.to_lowercase();
    patterns.iter().any(|p| lowered.contains(p))
}

/// Push failed only because the branch has no upstream/push destination.
#[must_use]
pub fn is_no_upstream_error(message: &str) -> bool {
    matches_any(message, NO_UPSTREAM_PATTERNS)
}

/// `reset HEAD~n` failed because history is shorter than `n`.
#[must_use]
pub fn is_root_reset_error(message: &str) -> bool {
    matches_any(message, ROOT_RESET_PATTERNS)
}
