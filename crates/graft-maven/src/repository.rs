//! Maven repository URL layout and the release/snapshot repository lists.

use graft_core::pdoc::RepositoryRef;

const DEFAULT_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// Resolves the default central URL, honoring the `MAVEN_CENTRAL_URL`
/// environment variable override.
pub fn default_central_url() -> String {
    std::env::var("MAVEN_CENTRAL_URL").unwrap_or_else(|_| DEFAULT_CENTRAL_URL.to_string())
}

/// A single remote Maven repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenRepository {
    pub id: String,
    pub url: String,
}

impl MavenRepository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    pub fn central() -> Self {
        Self::new("central", default_central_url())
    }

    /// Converts a dotted groupId into the directory path Maven's flat
    /// repository layout uses (`.` → `/`).
    pub fn coordinate_path(group_id: &str, artifact_id: &str, version: &str) -> String {
        format!("{}/{artifact_id}/{version}", group_id.replace('.', "/"))
    }

    pub fn pom_url(&self, group_id: &str, artifact_id: &str, version: &str, filename: &str) -> String {
        format!(
            "{}/{}/{filename}",
            self.url.trim_end_matches('/'),
            Self::coordinate_path(group_id, artifact_id, version)
        )
    }

    pub fn artifact_metadata_url(&self, group_id: &str, artifact_id: &str) -> String {
        format!(
            "{}/{}/{artifact_id}/maven-metadata.xml",
            self.url.trim_end_matches('/'),
            group_id.replace('.', "/")
        )
    }

    pub fn snapshot_metadata_url(&self, group_id: &str, artifact_id: &str, version: &str) -> String {
        format!(
            "{}/{}/maven-metadata.xml",
            self.url.trim_end_matches('/'),
            Self::coordinate_path(group_id, artifact_id, version)
        )
    }
}

/// The ordered repository lists a resolve run consults: one for release
/// lookups, one for SNAPSHOT lookups. Central is appended to the release
/// list if not already present, matching Maven's own implicit-central
/// behavior.
#[derive(Debug, Clone)]
pub struct RepositoryLists {
    pub release: Vec<MavenRepository>,
    pub snapshot: Vec<MavenRepository>,
}

impl RepositoryLists {
    pub fn new(release: Vec<MavenRepository>, snapshot: Vec<MavenRepository>) -> Self {
        let mut lists = Self { release, snapshot };
        lists.ensure_central();
        lists
    }

    fn ensure_central(&mut self) {
        let central = MavenRepository::central();
        if !self.release.iter().any(|r| r.url == central.url) {
            self.release.push(central);
        }
    }

    pub fn for_version(&self, is_snapshot: bool) -> &[MavenRepository] {
        if is_snapshot {
            &self.snapshot
        } else {
            &self.release
        }
    }

    /// Merges a PDoc's declared `<repositories>` ahead of the existing
    /// lists, de-duplicated by URL — matches the Analyzer's step 3 without
    /// ever dropping the repositories the caller configured.
    pub fn merge_declared(&mut self, declared: &[RepositoryRef]) {
        for entry in declared {
            let repo = MavenRepository::new(entry.id.clone(), entry.url.clone());
            if entry.releases_enabled && !self.release.iter().any(|r| r.url == entry.url) {
                self.release.insert(0, repo.clone());
            }
            if entry.snapshots_enabled && !self.snapshot.iter().any(|r| r.url == entry.url) {
                self.snapshot.insert(0, repo);
            }
        }
    }
}

impl Default for RepositoryLists {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}
