//! Parent PDoc retrieval: three strategies tried in order, with errors
//! aggregated and surfaced only when every strategy fails.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use graft_core::analysis::AnalysisResult;
use graft_core::managed_dependency::ManagedDependency;
use graft_core::pdoc_source::PdocSource;
use graft_core::PDoc;

use crate::analyzer::{self, AnalysisOptions};
use crate::cache::ResolutionCache;

const DEFAULT_POM_FILENAME: &str = "pom.xml";

/// Resolves and analyzes `pdoc`'s parent, trying `relativePath`, then
/// `../pom.xml`, then the repository client, in that order. Returns `None`
/// (after logging every strategy's failure) if `pdoc` declares no parent or
/// all three strategies miss — a parent load failure never fails the child.
pub async fn resolve_parent<S: PdocSource + Sync>(
    source: &S,
    pdoc: &PDoc,
    parent_overlay: Vec<ManagedDependency>,
    cache: &mut ResolutionCache,
    visited_local_paths: &mut HashSet<PathBuf>,
) -> Option<AnalysisResult> {
    let hint = pdoc.parent.as_ref()?;
    let mut errors: Vec<String> = Vec::new();

    if let Some(relative_path) = hint.relative_path.as_deref().filter(|p| !p.is_empty()) {
        if let Some(dir) = pdoc.file_path.as_deref().and_then(Path::parent) {
            let candidate = resolve_relative(dir, relative_path);
            match try_candidate(source, &candidate, &hint.coordinate.artifact_id, cache, visited_local_paths, parent_overlay.clone()).await {
                Ok(result) if coordinate_matches(&result, hint) => return Some(result),
                Ok(_) => errors.push(format!("relativePath {candidate:?} loaded a PDoc that did not match the parent hint")),
                Err(message) => errors.push(message),
            }
        } else {
            errors.push("relativePath strategy skipped: child PDoc has no known file path".to_string());
        }
    }

    if let Some(dir) = pdoc.file_path.as_deref().and_then(Path::parent) {
        let candidate = resolve_relative(dir, &format!("../{DEFAULT_POM_FILENAME}"));
        match try_candidate(source, &candidate, &hint.coordinate.artifact_id, cache, visited_local_paths, parent_overlay.clone()).await {
            Ok(result) if coordinate_matches(&result, hint) => return Some(result),
            Ok(_) => errors.push(format!("../{DEFAULT_POM_FILENAME} at {candidate:?} did not match the parent hint")),
            Err(message) => errors.push(message),
        }
    }

    match source.load_by_coordinate(&hint.coordinate, &hint.version).await {
        Ok(Some(parent_pdoc)) => {
            let opts = AnalysisOptions {
                exclusions: HashSet::new(),
                managed_overlay: parent_overlay,
            };
            match analyzer::analyze(source, parent_pdoc, opts, cache, visited_local_paths).await {
                Ok(result) => return Some(result),
                Err(error) => errors.push(format!("repository-sourced parent analysis failed: {error}")),
            }
        }
        Ok(None) => errors.push(format!("parent {} not found in any repository", hint.coordinate)),
        Err(error) => errors.push(format!("repository fetch for parent {} failed: {error}", hint.coordinate)),
    }

    tracing::warn!(
        parent = %hint.coordinate,
        errors = %errors.join("; "),
        "every parent retrieval strategy failed; proceeding without parent inheritance"
    );
    None
}

pub(crate) fn resolve_relative(base: &Path, relative: &str) -> PathBuf {
    let joined = base.join(relative);
    if joined.is_dir() {
        joined.join(DEFAULT_POM_FILENAME)
    } else {
        joined
    }
}

async fn try_candidate<S: PdocSource + Sync>(
    source: &S,
    path: &Path,
    expected_artifact_id: &str,
    cache: &mut ResolutionCache,
    visited_local_paths: &mut HashSet<PathBuf>,
    parent_overlay: Vec<ManagedDependency>,
) -> Result<AnalysisResult, String> {
    let loaded = source
        .load_by_path(path)
        .await
        .map_err(|error| format!("loading {path:?} failed: {error}"))?;
    let Some(loaded) = loaded else {
        return Err(format!("{path:?} not found"));
    };
    if loaded.artifact_id != expected_artifact_id {
        return Err(format!(
            "{path:?} names artifactId {:?}, expected {expected_artifact_id:?}",
            loaded.artifact_id
        ));
    }
    let opts = AnalysisOptions {
        exclusions: HashSet::new(),
        managed_overlay: parent_overlay,
    };
    analyzer::analyze(source, loaded, opts, cache, visited_local_paths)
        .await
        .map_err(|error| format!("analyzing {path:?} failed: {error}"))
}

fn coordinate_matches(result: &AnalysisResult, hint: &graft_core::pdoc::ParentHint) -> bool {
    result.artifact.coordinate == hint.coordinate && result.artifact.version == hint.version
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tests::FixtureSource;
    use graft_core::{Coordinate, Version};

    fn pdoc_with_parent(relative_path: Option<&str>) -> PDoc {
        let mut child = PDoc::empty("child");
        child.file_path = Some(PathBuf::from("/project/child/pom.xml"));
        child.parent = Some(graft_core::pdoc::ParentHint {
            coordinate: Coordinate::new("org.example", "parent"),
            version: Version::new("1.0"),
            relative_path: relative_path.map(str::to_string),
        });
        child
    }

    #[tokio::test]
    async fn no_parent_hint_returns_none() {
        let source = FixtureSource::default();
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let pdoc = PDoc::empty("child");
        let result = resolve_parent(&source, &pdoc, Vec::new(), &mut cache, &mut visited).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn relative_path_strategy_succeeds() {
        let mut parent_pdoc = PDoc::empty("parent");
        parent_pdoc.group_id = Some("org.example".to_string());
        parent_pdoc.version = Some("1.0".to_string());
        let source = FixtureSource::default().with_path("/project/parent/pom.xml", parent_pdoc);

        let child = pdoc_with_parent(Some("../parent/pom.xml"));
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = resolve_parent(&source, &child, Vec::new(), &mut cache, &mut visited)
            .await
            .expect("parent should resolve");
        assert_eq!(result.artifact.coordinate, Coordinate::new("org.example", "parent"));
    }

    #[tokio::test]
    async fn falls_through_to_dotdot_pom_when_relative_path_mismatches() {
        let mut wrong = PDoc::empty("not-the-parent");
        wrong.group_id = Some("org.example".to_string());
        wrong.version = Some("9.9".to_string());
        let mut parent_pdoc = PDoc::empty("parent");
        parent_pdoc.group_id = Some("org.example".to_string());
        parent_pdoc.version = Some("1.0".to_string());

        let source = FixtureSource::default()
            .with_path("/project/child/bogus.xml", wrong)
            .with_path("/project/pom.xml", parent_pdoc);

        let child = pdoc_with_parent(Some("bogus.xml"));
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = resolve_parent(&source, &child, Vec::new(), &mut cache, &mut visited)
            .await
            .expect("../pom.xml fallback should resolve");
        assert_eq!(result.artifact.coordinate, Coordinate::new("org.example", "parent"));
    }

    #[tokio::test]
    async fn falls_through_to_repository_when_no_local_paths_exist() {
        let mut parent_pdoc = PDoc::empty("parent");
        parent_pdoc.group_id = Some("org.example".to_string());
        parent_pdoc.version = Some("1.0".to_string());
        let source = FixtureSource::default().with_coordinate("org.example", "parent", "1.0", parent_pdoc);

        let child = pdoc_with_parent(None);
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = resolve_parent(&source, &child, Vec::new(), &mut cache, &mut visited)
            .await
            .expect("repository strategy should resolve");
        assert_eq!(result.artifact.coordinate, Coordinate::new("org.example", "parent"));
    }

    #[tokio::test]
    async fn every_strategy_failing_returns_none() {
        let source = FixtureSource::default();
        let child = pdoc_with_parent(None);
        let mut cache = ResolutionCache::new();
        let mut visited = HashSet::new();
        let result = resolve_parent(&source, &child, Vec::new(), &mut cache, &mut visited).await;
        assert!(result.is_none());
    }
}
