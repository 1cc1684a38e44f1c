//! Output assembly: flattens the per-subtree `UniqueArtifacts`/edge maps
//! produced by the traversal engine into the sorted
//! `Package`/`ResolvedDependency` records callers consume.
//!
//! Module subtrees each keep their own uniqueness namespace during
//! traversal, but the final list must still contain no two packages
//! sharing a name. Where the same name is resolved by more than one
//! subtree, the earlier subtree in traversal order (the root, then
//! modules in declaration order) wins — see DESIGN.md for the rationale.

use std::collections::HashMap;

use graft_core::artifact::Artifact;
use graft_core::output::{Package, ResolutionOutput, ResolvedDependency};

use crate::engine::ModuleResult;

pub fn assemble(modules: Vec<ModuleResult>) -> ResolutionOutput {
    let mut merged_artifacts: HashMap<String, Artifact> = HashMap::new();
    let mut merged_edges: HashMap<String, Vec<String>> = HashMap::new();

    for module in modules {
        for (name, artifact) in module.artifacts {
            merged_artifacts.entry(name).or_insert(artifact);
        }
        for (name, targets) in module.edges {
            merged_edges.entry(name).or_insert(targets);
        }
    }

    let mut packages: Vec<Package> = merged_artifacts
        .values()
        .map(|artifact| Package {
            id: Package::id_for(&artifact.coordinate.group_id, &artifact.coordinate.artifact_id, artifact.version.as_str()),
            group_id: artifact.coordinate.group_id.clone(),
            artifact_id: artifact.coordinate.artifact_id.clone(),
            version: artifact.version.as_str().to_string(),
            licenses: artifact.licenses.clone(),
        })
        .collect();
    packages.sort_by(|a, b| a.id.cmp(&b.id));

    let mut dependencies: Vec<ResolvedDependency> = Vec::new();
    for (from_name, to_names) in &merged_edges {
        let Some(from_artifact) = merged_artifacts.get(from_name) else {
            continue;
        };
        let from_id = Package::id_for(&from_artifact.coordinate.group_id, &from_artifact.coordinate.artifact_id, from_artifact.version.as_str());

        let mut to_ids: Vec<String> = to_names
            .iter()
            .filter_map(|to_name| merged_artifacts.get(to_name))
            .map(|artifact| Package::id_for(&artifact.coordinate.group_id, &artifact.coordinate.artifact_id, artifact.version.as_str()))
            .collect();
        to_ids.sort();

        dependencies.push(ResolvedDependency { from: from_id, to: to_ids });
    }
    dependencies.sort_by(|a, b| a.from.cmp(&b.from));

    ResolutionOutput { packages, dependencies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_core::{Coordinate, Relationship, Version};
    use std::collections::HashMap as StdHashMap;

    fn artifact(group_id: &str, artifact_id: &str, version: &str) -> Artifact {
        Artifact::new(Coordinate::new(group_id, artifact_id), Version::new(version), Relationship::Direct)
    }

    #[test]
    fn drops_edges_to_unresolved_targets() {
        let mut artifacts = StdHashMap::new();
        artifacts.insert("g:root".to_string(), artifact("g", "root", "1.0"));
        let mut edges = StdHashMap::new();
        edges.insert("g:root".to_string(), vec!["g:missing".to_string()]);

        let output = assemble(vec![ModuleResult { artifacts, edges }]);
        assert_eq!(output.dependencies[0].to, Vec::<String>::new());
    }

    #[test]
    fn cross_module_name_collision_keeps_first_subtree() {
        let mut root_artifacts = StdHashMap::new();
        root_artifacts.insert("g:a".to_string(), artifact("g", "a", "1.0"));
        let mut module_artifacts = StdHashMap::new();
        module_artifacts.insert("g:a".to_string(), artifact("g", "a", "2.0"));

        let output = assemble(vec![
            ModuleResult { artifacts: root_artifacts, edges: StdHashMap::new() },
            ModuleResult { artifacts: module_artifacts, edges: StdHashMap::new() },
        ]);
        assert_eq!(output.packages.len(), 1);
        assert_eq!(output.packages[0].version, "1.0");
    }

    #[test]
    fn packages_sorted_by_id() {
        let mut artifacts = StdHashMap::new();
        artifacts.insert("g:b".to_string(), artifact("g", "b", "1.0"));
        artifacts.insert("g:a".to_string(), artifact("g", "a", "1.0"));
        let output = assemble(vec![ModuleResult { artifacts, edges: StdHashMap::new() }]);
        assert_eq!(output.packages[0].id, "g:a:1.0");
        assert_eq!(output.packages[1].id, "g:b:1.0");
    }
}
