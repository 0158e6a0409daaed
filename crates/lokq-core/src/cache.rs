//! Read-only label cache: a single JSON file mapping label names and values,
//! consulted before any live logcli call when caching is enabled.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// On-disk cache shape: `{"labels": [...], "values": {"<label>": [...]}}`.
/// Both keys are optional; an absent key is a miss for that lookup, not an
/// empty result.
#[derive(Debug, Default, Deserialize)]
pub struct LabelCache {
    pub labels: Option<Vec<String>>,
    pub values: Option<HashMap<String, Vec<String>>>,
}

impl LabelCache {
    /// Load the cache from `path`. A missing, unreadable, or malformed file
    /// yields `None`; cache problems never surface as errors, the caller
    /// falls through to the live source instead.
    pub fn load(path: &Path) -> Option<Self> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Cached values for `label`, if both the `values` key and the label
    /// entry exist.
    pub fn values_for(&self, label: &str) -> Option<&[String]> {
        self.values.as_ref()?.get(label).map(Vec::as_slice)
    }
}
