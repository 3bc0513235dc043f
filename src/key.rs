//! Partition key derivation.
//!
//! A partition is named after the designated field's value, but the storage
//! backend constrains names: at most 100 characters, none of `[ ] * ? / \`,
//! and never empty. `normalize` is the single place those constraints are
//! enforced; every partition name in the system passes through it.

use crate::core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_KEY_LEN: usize = 100;
const FALLBACK_KEY: &str = "Unnamed";
const FORBIDDEN: [char; 6] = ['[', ']', '*', '?', '/', '\\'];

/// A validated partition name. Only produced by [`normalize`], so holding
/// one guarantees the naming constraints are satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionKey(String);

impl PartitionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derives a partition key from a raw field value.
///
/// Pure: the same input always yields the same key. Forbidden characters
/// become spaces, the result is trimmed and capped at 100 characters, and an
/// empty result falls back to `"Unnamed"`.
pub fn normalize(raw: &Value) -> PartitionKey {
    let replaced: String = raw
        .to_text()
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { ' ' } else { c })
        .collect();

    let trimmed = replaced.trim();
    let bounded: String = trimmed.chars().take(MAX_KEY_LEN).collect();

    if bounded.is_empty() {
        PartitionKey(FALLBACK_KEY.to_string())
    } else {
        PartitionKey(bounded)
    }
}
