//! The traversal engine: a FIFO queue over artifacts that applies
//! nearest-wins, propagates exclusions, and recurses into modules under a
//! namespace separate from the enclosing traversal.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use graft_core::artifact::Artifact;
use graft_core::coordinate::Coordinate;
use graft_core::exclusion::ExclusionPattern;
use graft_core::managed_dependency::ManagedDependency;
use graft_core::pdoc_source::PdocSource;
use graft_core::relationship::Relationship;
use graft_core::version::Version;
use graft_core::PDoc;
use graft_util::errors::GraftResult;

use crate::analyzer::{self, AnalysisOptions};
use crate::cache::ResolutionCache;
use crate::parent::resolve_relative;

/// State shared across a module and all of its nested module subtrees:
/// cycle-breaking and the single resolution cache.
pub struct Shared {
    pub cache: ResolutionCache,
    pub unique_modules: HashSet<String>,
    pub visited_local_paths: HashSet<PathBuf>,
}

impl Shared {
    pub fn new() -> Self {
        Self {
            cache: ResolutionCache::new(),
            unique_modules: HashSet::new(),
            visited_local_paths: HashSet::new(),
        }
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}

/// One module (or the overall root)'s own traversal output: its private
/// `UniqueArtifacts` map and per-root edge map.
pub struct ModuleResult {
    pub artifacts: HashMap<String, Artifact>,
    pub edges: HashMap<String, Vec<String>>,
}

struct QueueEntry {
    artifact: Artifact,
    exclusions: HashSet<ExclusionPattern>,
    preloaded_pdoc: Option<PDoc>,
}

/// Runs the queue-driven traversal starting at `root_pdoc`, recursing into
/// declared modules (each under its own `ModuleResult`) and returning the
/// concatenation of this subtree's output with every nested module's.
pub async fn run_module<S: PdocSource + Sync>(
    source: &S,
    root_pdoc: PDoc,
    shared: &mut Shared,
) -> GraftResult<Vec<ModuleResult>> {
    let mut results = Vec::new();
    let mut queue: VecDeque<QueueEntry> = VecDeque::new();
    let mut unique_artifacts: HashMap<String, Artifact> = HashMap::new();
    let mut edges: HashMap<String, Vec<String>> = HashMap::new();
    let mut managed_overlay: Vec<ManagedDependency> = Vec::new();
    let mut is_first = true;

    let root_coordinate = root_pdoc
        .coordinate()
        .unwrap_or_else(|| Coordinate::new("", root_pdoc.artifact_id.clone()));
    let root_version = Version::new(root_pdoc.effective_version().unwrap_or_default());
    let root_artifact = Artifact::new(root_coordinate, root_version, Relationship::Root);

    queue.push_back(QueueEntry {
        artifact: root_artifact,
        exclusions: HashSet::new(),
        preloaded_pdoc: Some(root_pdoc),
    });

    while let Some(entry) = queue.pop_front() {
        let QueueEntry {
            artifact,
            exclusions,
            preloaded_pdoc,
        } = entry;

        if artifact.module {
            let module_key = artifact.coordinate.name();
            if !shared.unique_modules.insert(module_key) {
                continue;
            }
            let pdoc = preloaded_pdoc.expect("module queue entries always carry a preloaded PDoc");
            let nested = Box::pin(run_module(source, pdoc, shared)).await?;
            results.extend(nested);
            continue;
        }

        let name = artifact.coordinate.name();
        if let Some(existing) = unique_artifacts.get(&name) {
            if !existing.version.should_override(&artifact.version) {
                let upgraded = existing.relationship.strongest(artifact.relationship);
                if upgraded != existing.relationship {
                    unique_artifacts.get_mut(&name).unwrap().relationship = upgraded;
                }
                continue;
            }
        }

        let pdoc = match preloaded_pdoc {
            Some(pdoc) => Some(pdoc),
            None => source.load_by_coordinate(&artifact.coordinate, &artifact.version).await?,
        };

        let Some(pdoc) = pdoc else {
            tracing::debug!(%name, version = %artifact.version, "no PDoc found for this coordinate; keeping unresolved");
            merge_into_unique(&mut unique_artifacts, name, artifact);
            continue;
        };

        let opts = AnalysisOptions {
            exclusions: exclusions.clone(),
            managed_overlay: managed_overlay.clone(),
        };

        let analysis = match analyzer::analyze(source, pdoc, opts, &mut shared.cache, &mut shared.visited_local_paths).await {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(%name, %error, "analysis failed; keeping artifact unresolved");
                merge_into_unique(&mut unique_artifacts, name, artifact);
                continue;
            }
        };

        let is_root = is_first;
        if is_root {
            managed_overlay = analyzer::dedup_managed(analysis.dependency_management.iter().cloned());
            is_first = false;
        }

        let mut resolved_artifact = analysis.artifact.clone();
        resolved_artifact.relationship = artifact.relationship;
        resolved_artifact.module = false;
        resolved_artifact.exclusions = artifact.exclusions.clone();

        let mut child_names = Vec::new();
        for mut dep in analysis.dependencies {
            dep.relationship = if is_root { Relationship::Direct } else { Relationship::Indirect };
            child_names.push(dep.coordinate.name());
            let child_exclusions: HashSet<ExclusionPattern> = exclusions.union(&dep.exclusions).cloned().collect();
            queue.push_back(QueueEntry {
                artifact: dep,
                exclusions: child_exclusions,
                preloaded_pdoc: None,
            });
        }
        edges.insert(name.clone(), child_names);

        if let Some(base_dir) = analysis.file_path.as_deref().and_then(Path::parent) {
            for module_rel in &analysis.modules {
                let module_path = resolve_relative(base_dir, module_rel);
                match source.load_by_path(&module_path).await {
                    Ok(Some(module_pdoc)) => {
                        let coordinate = module_pdoc
                            .coordinate()
                            .unwrap_or_else(|| Coordinate::new("", module_pdoc.artifact_id.clone()));
                        let version = Version::new(module_pdoc.effective_version().unwrap_or_default());
                        let mut module_artifact = Artifact::new(coordinate, version, Relationship::Indirect);
                        module_artifact.module = true;
                        queue.push_back(QueueEntry {
                            artifact: module_artifact,
                            exclusions: HashSet::new(),
                            preloaded_pdoc: Some(module_pdoc),
                        });
                    }
                    Ok(None) => tracing::warn!(module = %module_rel, "module descriptor not found, skipping"),
                    Err(error) => tracing::warn!(module = %module_rel, %error, "failed loading module descriptor, skipping"),
                }
            }
        }

        merge_into_unique(&mut unique_artifacts, name, resolved_artifact);
    }

    results.insert(0, ModuleResult { artifacts: unique_artifacts, edges });
    Ok(results)
}

fn merge_into_unique(map: &mut HashMap<String, Artifact>, name: String, mut incoming: Artifact) {
    if let Some(existing) = map.get(&name) {
        incoming.relationship = existing.relationship.strongest(incoming.relationship);
        if incoming.locations.is_empty() {
            incoming.locations = existing.locations.clone();
        }
    }
    map.insert(name, incoming);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tests::FixtureSource;
    use graft_core::managed_dependency::ManagedDependency;

    fn pdoc(group_id: &str, artifact_id: &str, version: &str) -> PDoc {
        let mut p = PDoc::empty(artifact_id);
        p.group_id = Some(group_id.to_string());
        p.version = Some(version.to_string());
        p
    }

    #[tokio::test]
    async fn single_leaf_produces_root_and_direct_dependency() {
        let mut root = pdoc("org.example", "root", "1.0");
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::new("1.0")));
        let leaf = pdoc("g", "a", "1.0");
        let source = FixtureSource::default().with_coordinate("g", "a", "1.0", leaf);

        let mut shared = Shared::new();
        let results = run_module(&source, root, &mut shared).await.unwrap();
        assert_eq!(results.len(), 1);
        let module = &results[0];
        assert_eq!(module.artifacts.len(), 2);
        assert_eq!(module.artifacts["org.example:root"].relationship, Relationship::Root);
        assert_eq!(module.artifacts["g:a"].relationship, Relationship::Direct);
        assert_eq!(module.edges["org.example:root"], vec!["g:a".to_string()]);
    }

    #[tokio::test]
    async fn nearest_wins_keeps_shallower_soft_version() {
        let mut root = pdoc("org.example", "root", "1.0");
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "x"), Version::new("1.0")));
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "y"), Version::new("1.0")));

        let x10 = pdoc("g", "x", "1.0");
        let x20 = pdoc("g", "x", "2.0");
        let mut y = pdoc("g", "y", "1.0");
        y.dependencies.push(ManagedDependency::new(Coordinate::new("g", "x"), Version::new("2.0")));

        let source = FixtureSource::default()
            .with_coordinate("g", "x", "1.0", x10)
            .with_coordinate("g", "x", "2.0", x20)
            .with_coordinate("g", "y", "1.0", y);

        let mut shared = Shared::new();
        let results = run_module(&source, root, &mut shared).await.unwrap();
        let module = &results[0];
        assert_eq!(module.artifacts["g:x"].version.as_str(), "1.0");
    }

    #[tokio::test]
    async fn hard_requirement_overrides_soft_even_when_deeper() {
        let mut root = pdoc("org.example", "root", "1.0");
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "x"), Version::new("1.0")));
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "y"), Version::new("1.0")));

        let x10 = pdoc("g", "x", "1.0");
        let x15 = pdoc("g", "x", "[1.5]");
        let mut y = pdoc("g", "y", "1.0");
        y.dependencies.push(ManagedDependency::new(Coordinate::new("g", "x"), Version::new("[1.5]")));

        let source = FixtureSource::default()
            .with_coordinate("g", "x", "1.0", x10)
            .with_coordinate("g", "x", "[1.5]", x15)
            .with_coordinate("g", "y", "1.0", y);

        let mut shared = Shared::new();
        let results = run_module(&source, root, &mut shared).await.unwrap();
        let module = &results[0];
        assert_eq!(module.artifacts["g:x"].version.as_str(), "[1.5]");
    }

    #[tokio::test]
    async fn exclusion_drops_dependency_subtree() {
        let mut root = pdoc("org.example", "root", "1.0");
        let mut y_dep = ManagedDependency::new(Coordinate::new("g", "y"), Version::new("1.0"));
        y_dep.exclusions.push(ExclusionPattern::new("g", "x"));
        root.dependencies.push(y_dep);

        let mut y = pdoc("g", "y", "1.0");
        y.dependencies.push(ManagedDependency::new(Coordinate::new("g", "x"), Version::new("1.0")));
        let x = pdoc("g", "x", "1.0");

        let source = FixtureSource::default()
            .with_coordinate("g", "y", "1.0", y)
            .with_coordinate("g", "x", "1.0", x);

        let mut shared = Shared::new();
        let results = run_module(&source, root, &mut shared).await.unwrap();
        let module = &results[0];
        assert!(!module.artifacts.contains_key("g:x"));
    }

    #[tokio::test]
    async fn managed_override_from_root_applies_to_transitive_dependency() {
        let mut root = pdoc("org.example", "root", "1.0");
        root.dependency_management.push(ManagedDependency::new(Coordinate::new("g", "x"), Version::new("2.0")));
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "y"), Version::new("1.0")));

        let mut y = pdoc("g", "y", "1.0");
        y.dependencies.push(ManagedDependency::new(Coordinate::new("g", "x"), Version::empty()));
        let x20 = pdoc("g", "x", "2.0");

        let source = FixtureSource::default()
            .with_coordinate("g", "y", "1.0", y)
            .with_coordinate("g", "x", "2.0", x20);

        let mut shared = Shared::new();
        let results = run_module(&source, root, &mut shared).await.unwrap();
        let module = &results[0];
        assert_eq!(module.artifacts["g:x"].version.as_str(), "2.0");
    }

    #[tokio::test]
    async fn unresolvable_coordinate_is_kept_without_exploring_subtree() {
        let mut root = pdoc("org.example", "root", "1.0");
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "missing"), Version::new("1.0")));
        let source = FixtureSource::default();

        let mut shared = Shared::new();
        let results = run_module(&source, root, &mut shared).await.unwrap();
        let module = &results[0];
        assert_eq!(module.artifacts["g:missing"].version.as_str(), "1.0");
        assert!(!module.edges.contains_key("g:missing"));
    }
}
