use serde::Serialize;
use std::fmt;

/// A resolved package in the final output. `id` is the stable
/// `group:artifact:version` identifier used to key packages and edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub id: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub licenses: Vec<String>,
}

impl Package {
    pub fn id_for(group_id: &str, artifact_id: &str, version: &str) -> String {
        format!("{group_id}:{artifact_id}:{version}")
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A direct-dependency edge: `from` depends on each name in `to`, both
/// expressed as resolved package ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub from: String,
    pub to: Vec<String>,
}

/// The resolver's single output value: the flat package list plus the
/// direct-dependency edges between them, both sorted for determinism.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionOutput {
    pub packages: Vec<Package>,
    pub dependencies: Vec<ResolvedDependency>,
}
