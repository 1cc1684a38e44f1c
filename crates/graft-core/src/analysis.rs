use crate::artifact::Artifact;
use crate::managed_dependency::ManagedDependency;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The output of analyzing a single PDoc: the artifact's own coordinate
/// plus its fully merged, filtered dependency list and the
/// managed-dependency overlay that governed it.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub file_path: Option<PathBuf>,
    pub artifact: Artifact,
    pub dependencies: Vec<Artifact>,
    pub dependency_management: Vec<ManagedDependency>,
    pub properties: BTreeMap<String, String>,
    pub modules: Vec<String>,
}

impl AnalysisResult {
    pub fn empty(artifact: Artifact) -> Self {
        Self {
            file_path: None,
            artifact,
            dependencies: Vec::new(),
            dependency_management: Vec::new(),
            properties: BTreeMap::new(),
            modules: Vec::new(),
        }
    }
}
