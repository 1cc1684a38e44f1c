//! The resolution cache: maps a coordinate+version to its
//! [`AnalysisResult`], so a PDoc reachable via multiple paths (a BOM import,
//! a diamond dependency, a parent shared by siblings) is analyzed once.

use graft_core::analysis::AnalysisResult;
use std::collections::HashMap;

#[derive(Default)]
pub struct ResolutionCache {
    entries: HashMap<String, AnalysisResult>,
}

fn key(group_id: &str, artifact_id: &str, version: &str) -> String {
    format!("{group_id}:{artifact_id}:{version}")
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group_id: &str, artifact_id: &str, version: &str) -> Option<&AnalysisResult> {
        self.entries.get(&key(group_id, artifact_id, version))
    }

    /// Records the analysis for a key. The cache is meant to be
    /// single-writer per key; a second insert for the same key simply
    /// replaces the first, which should never happen in practice since
    /// callers check `contains` before analyzing.
    pub fn insert(&mut self, group_id: &str, artifact_id: &str, version: &str, result: AnalysisResult) {
        self.entries.insert(key(group_id, artifact_id, version), result);
    }

    pub fn contains(&self, group_id: &str, artifact_id: &str, version: &str) -> bool {
        self.entries.contains_key(&key(group_id, artifact_id, version))
    }
}
