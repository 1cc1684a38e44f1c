use crate::coordinate::Coordinate;
use crate::managed_dependency::ManagedDependency;
use crate::version::Version;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A parent reference as declared by a child PDoc: coordinates plus an
/// optional relative path hint used by the first parent-retrieval strategy.
#[derive(Debug, Clone)]
pub struct ParentHint {
    pub coordinate: Coordinate,
    pub version: Version,
    pub relative_path: Option<String>,
}

/// A repository declared inside a PDoc's own `<repositories>` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub id: String,
    pub url: String,
    pub releases_enabled: bool,
    pub snapshots_enabled: bool,
}

/// An in-memory, already-parsed Maven project descriptor.
///
/// `PDoc` is the raw tree as read off the wire or off disk: `groupId`/
/// `version` may be absent (inherited from the parent during analysis),
/// and any field may still contain unexpanded `${...}` property tokens.
#[derive(Debug, Clone)]
pub struct PDoc {
    pub file_path: Option<PathBuf>,
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub parent: Option<ParentHint>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<ManagedDependency>,
    pub dependency_management: Vec<ManagedDependency>,
    pub modules: Vec<String>,
    pub repositories: Vec<RepositoryRef>,
    pub licenses: Vec<String>,
}

impl PDoc {
    pub fn empty(artifact_id: impl Into<String>) -> Self {
        Self {
            file_path: None,
            group_id: None,
            artifact_id: artifact_id.into(),
            version: None,
            packaging: None,
            parent: None,
            properties: BTreeMap::new(),
            dependencies: Vec::new(),
            dependency_management: Vec::new(),
            modules: Vec::new(),
            repositories: Vec::new(),
            licenses: Vec::new(),
        }
    }

    /// `groupId` inherited from the parent hint if not declared directly.
    pub fn effective_group_id(&self) -> Option<String> {
        self.group_id
            .clone()
            .or_else(|| self.parent.as_ref().map(|p| p.coordinate.group_id.clone()))
    }

    /// `version` inherited from the parent hint if not declared directly.
    pub fn effective_version(&self) -> Option<String> {
        self.version
            .clone()
            .or_else(|| self.parent.as_ref().map(|p| p.version.as_str().to_string()))
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.effective_group_id()
            .map(|group_id| Coordinate::new(group_id, self.artifact_id.clone()))
    }

    /// True for the sentinel "no document" PDoc the Analyzer's step 1
    /// short-circuits on, as opposed to a load failure (which callers see
    /// as `Ok(None)` from `PdocSource` and never wrap in a `PDoc` at all).
    pub fn is_empty(&self) -> bool {
        self.artifact_id.is_empty()
    }
}
