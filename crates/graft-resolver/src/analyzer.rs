//! The Analyzer: given a PDoc, resolves its parent, merges properties
//! and managed dependencies, and produces the list of effective child
//! artifacts a single traversal step enqueues.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use graft_core::analysis::AnalysisResult;
use graft_core::artifact::Artifact;
use graft_core::managed_dependency::{ManagedDependency, Scope};
use graft_core::pdoc_source::PdocSource;
use graft_core::relationship::Relationship;
use graft_core::{Coordinate, ExclusionPattern, Version, PDoc};
use graft_util::errors::GraftResult;

use crate::cache::ResolutionCache;
use crate::parent;
use crate::properties::{self, BuiltIns};

/// The inherited context a single analysis step needs from its caller:
/// the accumulated exclusion set and the managed-dependency overlay
/// established further up the traversal.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub exclusions: HashSet<ExclusionPattern>,
    pub managed_overlay: Vec<ManagedDependency>,
}

/// Runs the nine-step Analyzer algorithm on `pdoc`, recursing into its
/// parent and any BOM imports through `source`. Boxed because parent
/// resolution and import resolution both recurse back into `analyze`.
pub fn analyze<'a, S: PdocSource + Sync>(
    source: &'a S,
    pdoc: PDoc,
    opts: AnalysisOptions,
    cache: &'a mut ResolutionCache,
    visited_local_paths: &'a mut HashSet<PathBuf>,
) -> Pin<Box<dyn Future<Output = GraftResult<AnalysisResult>> + Send + 'a>> {
    Box::pin(async move {
        // Step 1: empty PDoc short-circuits to an empty result.
        if pdoc.is_empty() {
            return Ok(AnalysisResult::empty(Artifact::new(
                Coordinate::new("", ""),
                Version::empty(),
                Relationship::Indirect,
            )));
        }

        // Step 2: break cycles through the parent chain / sibling references.
        if let Some(path) = pdoc.file_path.clone() {
            if !visited_local_paths.insert(path) {
                return Ok(AnalysisResult::empty(Artifact::new(
                    pdoc.coordinate().unwrap_or_else(|| Coordinate::new("", pdoc.artifact_id.clone())),
                    Version::empty(),
                    Relationship::Indirect,
                )));
            }
        }

        // Short-circuit on the resolution cache when this PDoc already
        // names its own coordinate+version, so a PDoc reachable from
        // multiple paths is analyzed only once.
        if let (Some(group_id), Some(version)) = (pdoc.group_id.clone(), pdoc.version.clone()) {
            if let Some(cached) = cache.get(&group_id, &pdoc.artifact_id, &version) {
                return Ok(cached.clone());
            }
        }

        // Step 3: augment the effective repository lists with this PDoc's
        // own declared repositories, ahead of existing ones.
        source.register_repositories(&pdoc.repositories);

        // Step 4: parent overlay = managedOverlay ++ this PDoc's own managed
        // list, de-duplicated by Name, earlier entries winning.
        let parent_overlay = dedup_managed(
            opts.managed_overlay
                .iter()
                .cloned()
                .chain(pdoc.dependency_management.iter().cloned()),
        );

        // Step 5: resolve the parent and inherit.
        let parent_result = parent::resolve_parent(source, &pdoc, parent_overlay, cache, visited_local_paths).await;

        let effective_group_id = pdoc
            .group_id
            .clone()
            .or_else(|| parent_result.as_ref().map(|p| p.artifact.coordinate.group_id.clone()))
            .unwrap_or_default();
        let effective_version = pdoc
            .version
            .clone()
            .or_else(|| parent_result.as_ref().map(|p| p.artifact.version.as_str().to_string()))
            .unwrap_or_default();

        let mut merged_properties: BTreeMap<String, String> = parent_result
            .as_ref()
            .map(|p| p.properties.clone())
            .unwrap_or_default();
        merged_properties.extend(pdoc.properties.clone());

        let built_ins = BuiltIns::new(&effective_group_id, &pdoc.artifact_id, &effective_version, pdoc.packaging.as_deref());
        let built_ins = if let Some(parent) = &parent_result {
            built_ins.with_parent(&parent.artifact.coordinate.group_id, parent.artifact.version.as_str())
        } else {
            built_ins
        };

        // Step 6: effective managed list = child managed entries first, then
        // parent managed entries, de-duplicated by Name.
        let parent_managed = parent_result
            .as_ref()
            .map(|p| p.dependency_management.clone())
            .unwrap_or_default();
        let effective_managed = dedup_managed(
            pdoc.dependency_management
                .iter()
                .cloned()
                .chain(parent_managed.into_iter()),
        );

        // Step 7: expand non-import entries in place; resolve imports after
        // all literal entries, each contributing its own managed list.
        let mut literal_managed: Vec<ManagedDependency> = Vec::new();
        let mut import_managed: Vec<ManagedDependency> = Vec::new();
        for entry in effective_managed {
            if entry.is_bom_import() {
                import_managed.push(entry);
            } else {
                literal_managed.push(expand_managed(entry, &merged_properties, &built_ins));
            }
        }

        let mut final_managed = literal_managed;
        for import in import_managed {
            let import = expand_managed(import, &merged_properties, &built_ins);
            match source.load_by_coordinate(&import.coordinate, &import.version).await {
                Ok(Some(import_pdoc)) => {
                    let import_opts = AnalysisOptions::default();
                    match analyze(source, import_pdoc, import_opts, cache, visited_local_paths).await {
                        Ok(import_result) => {
                            for entry in import_result.dependency_management {
                                if !final_managed.iter().any(|e| e.coordinate.name() == entry.coordinate.name()) {
                                    final_managed.push(entry);
                                }
                            }
                        }
                        Err(error) => {
                            tracing::warn!(bom = %import.coordinate, %error, "BOM import analysis failed; ignoring");
                        }
                    }
                }
                Ok(None) => {
                    tracing::warn!(bom = %import.coordinate, "BOM import not found in any repository; ignoring");
                }
                Err(error) => {
                    tracing::warn!(bom = %import.coordinate, %error, "BOM import fetch failed; ignoring");
                }
            }
        }

        // Step 8: process this PDoc's own literal dependencies.
        let mut child_dependencies: Vec<Artifact> = Vec::new();
        for dep in &pdoc.dependencies {
            let expanded = expand_managed(dep.clone(), &merged_properties, &built_ins);
            let mut version = expanded.version.clone();
            let mut scope = expanded.scope;
            let mut optional = expanded.optional;
            let mut exclusions = expanded.exclusions.clone();

            if version.is_empty() {
                if let Some(managed) = lookup_managed(&final_managed, &expanded.coordinate)
                    .or_else(|| lookup_managed(&opts.managed_overlay, &expanded.coordinate))
                {
                    version = managed.version.clone();
                    if scope.is_none() {
                        scope = managed.scope;
                    }
                    if exclusions.is_empty() {
                        exclusions = managed.exclusions.clone();
                    }
                    if !optional {
                        optional = managed.optional;
                    }
                }
            }

            let effective_scope = scope.unwrap_or_default();
            if !effective_scope.is_kept() || optional {
                continue;
            }

            let mut artifact = Artifact::new(expanded.coordinate, version, Relationship::Indirect);
            artifact.exclusions = exclusions.into_iter().collect();
            child_dependencies.push(artifact);
        }

        // Step 9: merge parent dependencies after child dependencies, child
        // first, de-duplicated by Name, then filter through opts.exclusions.
        let parent_dependencies = parent_result.as_ref().map(|p| p.dependencies.clone()).unwrap_or_default();
        let mut merged_dependencies = dedup_artifacts(child_dependencies.into_iter().chain(parent_dependencies.into_iter()));
        merged_dependencies.retain(|artifact| !opts.exclusions.iter().any(|pattern| pattern.matches(&artifact.coordinate)));

        let modules = if pdoc.modules.is_empty() {
            parent_result.as_ref().map(|p| p.modules.clone()).unwrap_or_default()
        } else {
            pdoc.modules.clone()
        };

        let own_coordinate = Coordinate::new(effective_group_id, pdoc.artifact_id.clone());
        let mut own_artifact = Artifact::new(own_coordinate, Version::new(effective_version), Relationship::Indirect);
        own_artifact.licenses = pdoc.licenses.clone();

        let result = AnalysisResult {
            file_path: pdoc.file_path.clone(),
            artifact: own_artifact,
            dependencies: merged_dependencies,
            dependency_management: final_managed,
            properties: merged_properties,
            modules,
        };

        let group_id = result.artifact.coordinate.group_id.clone();
        let version = result.artifact.version.as_str().to_string();
        if !group_id.is_empty() && !version.is_empty() {
            cache.insert(&group_id, &result.artifact.coordinate.artifact_id, &version, result.clone());
        }

        Ok(result)
    })
}

/// De-duplicates managed dependencies by Name, keeping the first occurrence.
pub fn dedup_managed(entries: impl Iterator<Item = ManagedDependency>) -> Vec<ManagedDependency> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for entry in entries {
        if seen.insert(entry.coordinate.name()) {
            out.push(entry);
        }
    }
    out
}

/// De-duplicates dependency artifacts by Name, keeping the first occurrence.
fn dedup_artifacts(entries: impl Iterator<Item = Artifact>) -> Vec<Artifact> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for entry in entries {
        if seen.insert(entry.coordinate.name()) {
            out.push(entry);
        }
    }
    out
}

fn lookup_managed<'a>(list: &'a [ManagedDependency], coordinate: &Coordinate) -> Option<&'a ManagedDependency> {
    list.iter().find(|m| m.coordinate.name() == coordinate.name())
}

/// Property-expands a managed dependency's groupId, artifactId, and version.
/// Scope is parsed to an enum before this point in `graft-maven::pom`, so
/// it never carries a literal `${...}` token.
fn expand_managed(dep: ManagedDependency, properties: &BTreeMap<String, String>, built_ins: &BuiltIns) -> ManagedDependency {
    let group_id = properties::expand(&dep.coordinate.group_id, properties, built_ins);
    let artifact_id = properties::expand(&dep.coordinate.artifact_id, properties, built_ins);
    let version = properties::expand(dep.version.as_str(), properties, built_ins);
    ManagedDependency {
        coordinate: Coordinate::new(group_id, artifact_id),
        version: Version::new(version),
        scope: dep.scope,
        optional: dep.optional,
        type_: dep.type_,
        exclusions: dep.exclusions,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use graft_core::PDoc;
    use std::path::Path;

    /// An in-memory `PdocSource` fixture keyed by `group:artifact:version`
    /// (repository-sourced) and by path (filesystem-sourced), used across
    /// the resolver crate's unit and integration tests.
    #[derive(Default, Clone)]
    pub struct FixtureSource {
        pub by_coordinate: std::collections::HashMap<String, PDoc>,
        pub by_path: std::collections::HashMap<PathBuf, PDoc>,
    }

    impl FixtureSource {
        pub fn with_coordinate(mut self, group_id: &str, artifact_id: &str, version: &str, pdoc: PDoc) -> Self {
            self.by_coordinate.insert(format!("{group_id}:{artifact_id}:{version}"), pdoc);
            self
        }

        pub fn with_path(mut self, path: impl Into<PathBuf>, pdoc: PDoc) -> Self {
            self.by_path.insert(path.into(), pdoc);
            self
        }
    }

    impl PdocSource for FixtureSource {
        async fn load_by_coordinate(&self, coordinate: &Coordinate, version: &Version) -> GraftResult<Option<PDoc>> {
            let key = format!("{}:{}:{}", coordinate.group_id, coordinate.artifact_id, version.as_str());
            Ok(self.by_coordinate.get(&key).cloned())
        }

        async fn load_by_path(&self, path: &Path) -> GraftResult<Option<PDoc>> {
            Ok(self.by_path.get(path).cloned())
        }
    }

    fn simple_pdoc(group_id: &str, artifact_id: &str, version: &str) -> PDoc {
        let mut pdoc = PDoc::empty(artifact_id);
        pdoc.group_id = Some(group_id.to_string());
        pdoc.version = Some(version.to_string());
        pdoc
    }

    #[tokio::test]
    async fn empty_pdoc_yields_empty_result() {
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = analyze(&source, PDoc::empty(""), AnalysisOptions::default(), &mut cache, &mut visited)
            .await
            .unwrap();
        assert!(result.dependencies.is_empty());
    }

    #[tokio::test]
    async fn literal_dependency_passes_through_with_version() {
        let mut root = simple_pdoc("org.example", "root", "1.0");
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::new("1.0")));
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = analyze(&source, root, AnalysisOptions::default(), &mut cache, &mut visited)
            .await
            .unwrap();
        assert_eq!(result.dependencies.len(), 1);
        assert_eq!(result.dependencies[0].version.as_str(), "1.0");
    }

    #[tokio::test]
    async fn test_scoped_dependency_is_dropped() {
        let mut root = simple_pdoc("org.example", "root", "1.0");
        let mut dep = ManagedDependency::new(Coordinate::new("g", "a"), Version::new("1.0"));
        dep.scope = Some(Scope::Test);
        root.dependencies.push(dep);
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = analyze(&source, root, AnalysisOptions::default(), &mut cache, &mut visited)
            .await
            .unwrap();
        assert!(result.dependencies.is_empty());
    }

    #[tokio::test]
    async fn optional_dependency_is_dropped() {
        let mut root = simple_pdoc("org.example", "root", "1.0");
        let mut dep = ManagedDependency::new(Coordinate::new("g", "a"), Version::new("1.0"));
        dep.optional = true;
        root.dependencies.push(dep);
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = analyze(&source, root, AnalysisOptions::default(), &mut cache, &mut visited)
            .await
            .unwrap();
        assert!(result.dependencies.is_empty());
    }

    #[tokio::test]
    async fn missing_version_filled_from_managed_list() {
        let mut root = simple_pdoc("org.example", "root", "1.0");
        root.dependency_management.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::new("2.0")));
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::empty()));
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = analyze(&source, root, AnalysisOptions::default(), &mut cache, &mut visited)
            .await
            .unwrap();
        assert_eq!(result.dependencies[0].version.as_str(), "2.0");
    }

    #[tokio::test]
    async fn root_level_overlay_fills_version_when_no_child_management() {
        let mut root = simple_pdoc("org.example", "root", "1.0");
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::empty()));
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let opts = AnalysisOptions {
            exclusions: HashSet::new(),
            managed_overlay: vec![ManagedDependency::new(Coordinate::new("g", "a"), Version::new("3.0"))],
        };
        let result = analyze(&source, root, opts, &mut cache, &mut visited).await.unwrap();
        assert_eq!(result.dependencies[0].version.as_str(), "3.0");
    }

    #[tokio::test]
    async fn bom_import_contributes_managed_versions() {
        let mut bom = simple_pdoc("org.example", "bom", "1.0");
        bom.dependency_management.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::new("5.0")));
        let source = FixtureSource::default().with_coordinate("org.example", "bom", "1.0", bom);

        let mut root = simple_pdoc("org.example", "root", "1.0");
        let mut import = ManagedDependency::new(Coordinate::new("org.example", "bom"), Version::new("1.0"));
        import.scope = Some(Scope::Import);
        import.type_ = Some("pom".to_string());
        root.dependency_management.push(import);
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::empty()));

        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = analyze(&source, root, AnalysisOptions::default(), &mut cache, &mut visited)
            .await
            .unwrap();
        assert_eq!(result.dependencies[0].version.as_str(), "5.0");
    }

    #[tokio::test]
    async fn literal_managed_entry_overrides_bom_import() {
        let mut bom = simple_pdoc("org.example", "bom", "1.0");
        bom.dependency_management.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::new("5.0")));
        let source = FixtureSource::default().with_coordinate("org.example", "bom", "1.0", bom);

        let mut root = simple_pdoc("org.example", "root", "1.0");
        root.dependency_management.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::new("9.0")));
        let mut import = ManagedDependency::new(Coordinate::new("org.example", "bom"), Version::new("1.0"));
        import.scope = Some(Scope::Import);
        import.type_ = Some("pom".to_string());
        root.dependency_management.push(import);
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::empty()));

        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = analyze(&source, root, AnalysisOptions::default(), &mut cache, &mut visited)
            .await
            .unwrap();
        assert_eq!(result.dependencies[0].version.as_str(), "9.0");
    }

    #[tokio::test]
    async fn exclusion_drops_matching_dependency() {
        let mut root = simple_pdoc("org.example", "root", "1.0");
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::new("1.0")));
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let mut exclusions = HashSet::new();
        exclusions.insert(ExclusionPattern::new("g", "a"));
        let opts = AnalysisOptions {
            exclusions,
            managed_overlay: Vec::new(),
        };
        let result = analyze(&source, root, opts, &mut cache, &mut visited).await.unwrap();
        assert!(result.dependencies.is_empty());
    }

    #[tokio::test]
    async fn property_token_expands_in_version() {
        let mut root = simple_pdoc("org.example", "root", "1.0");
        root.properties.insert("dep.version".to_string(), "7.0".to_string());
        root.dependencies.push(ManagedDependency::new(Coordinate::new("g", "a"), Version::new("${dep.version}")));
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = analyze(&source, root, AnalysisOptions::default(), &mut cache, &mut visited)
            .await
            .unwrap();
        assert_eq!(result.dependencies[0].version.as_str(), "7.0");
    }
}
