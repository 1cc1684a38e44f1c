//! The repository client: local filesystem lookup first, then the ordered
//! remote repository lists, with the optional response cache and per-host
//! blocklist mediating every remote request.

use graft_core::pdoc_source::PdocSource;
use graft_core::{Coordinate, RepositoryRef, UserSettings, Version, PDoc};
use graft_util::errors::GraftResult;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::cache::{CacheLookup, ResponseCache};
use crate::download::{self, FetchOutcome};
use crate::metadata;
use crate::pom;
use crate::repository::{MavenRepository, RepositoryLists};

/// Looks a coordinate up in the conventional local Maven repository layout
/// (`<root>/<group>/<artifact>/<version>/<artifact>-<version>.pom`).
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn pom_path(&self, group_id: &str, artifact_id: &str, version: &str) -> PathBuf {
        self.root
            .join(MavenRepository::coordinate_path(group_id, artifact_id, version))
            .join(format!("{artifact_id}-{version}.pom"))
    }

    pub fn load(&self, group_id: &str, artifact_id: &str, version: &str) -> GraftResult<Option<PDoc>> {
        let path = self.pom_path(group_id, artifact_id, version);
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(graft_util::errors::GraftError::Io)?;
        let mut pdoc = pom::parse_pom(&content)?;
        pdoc.file_path = Some(path);
        Ok(Some(pdoc))
    }
}

/// Extracts the host from a URL for blocklist/timeout bookkeeping.
fn host_of(url: &str) -> String {
    url.split("://")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or(url)
        .to_string()
}

/// The `PdocSource` implementation backing the resolution core: real
/// filesystem + HTTP I/O, kept entirely outside `graft-resolver`.
pub struct MavenPdocSource {
    local: LocalRepository,
    repos: Mutex<RepositoryLists>,
    client: Client,
    settings: UserSettings,
    response_cache: Option<Mutex<ResponseCache>>,
    offline: bool,
}

impl MavenPdocSource {
    pub fn new(settings: UserSettings, repos: RepositoryLists, offline: bool) -> GraftResult<Self> {
        Ok(Self {
            local: LocalRepository::new(settings.local_repository.clone()),
            repos: Mutex::new(repos),
            client: download::build_client()?,
            settings,
            response_cache: None,
            offline,
        })
    }

    pub fn with_response_cache(mut self, cache_root: &Path, ttl_hours: u64) -> GraftResult<Self> {
        self.response_cache = Some(Mutex::new(ResponseCache::open(cache_root, ttl_hours)?));
        Ok(self)
    }

    pub fn flush_cache(&self) -> GraftResult<()> {
        if let Some(cache) = &self.response_cache {
            cache
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .save()?;
        }
        Ok(())
    }

    async fn fetch(&self, repo: &MavenRepository, url: &str) -> Option<String> {
        let host = host_of(&repo.url);
        // Cache keys are hashed rather than the raw URL so the on-disk sidecar
        // never has to worry about path separators or length limits in a
        // request path.
        let key = graft_util::hash::sha256_bytes(url.as_bytes());

        if let Some(cache) = &self.response_cache {
            let blocklisted = cache.lock().unwrap_or_else(|p| p.into_inner()).is_blocklisted(&host);
            if blocklisted {
                tracing::debug!(%host, "host is blocklisted, skipping request");
                return None;
            }
            match cache.lock().unwrap_or_else(|p| p.into_inner()).lookup(&key) {
                CacheLookup::Hit { status: 200, body } => return body,
                CacheLookup::Hit { .. } => return None,
                CacheLookup::Stale | CacheLookup::Miss => {}
            }
        }

        match download::fetch_text(&self.client, &self.settings, &repo.id, url).await {
            FetchOutcome::Found(body) => {
                if let Some(cache) = &self.response_cache {
                    cache.lock().unwrap_or_else(|p| p.into_inner()).put(&key, 200, Some(body.clone()));
                }
                Some(body)
            }
            FetchOutcome::Miss { status } => {
                if let Some(cache) = &self.response_cache {
                    cache
                        .lock()
                        .unwrap_or_else(|p| p.into_inner())
                        .put(&key, status.unwrap_or(0), None);
                }
                None
            }
            FetchOutcome::Timeout => {
                if let Some(cache) = &self.response_cache {
                    cache.lock().unwrap_or_else(|p| p.into_inner()).record_timeout(&host);
                }
                None
            }
            FetchOutcome::NetworkError(message) => {
                tracing::warn!(%url, %message, "network error");
                None
            }
        }
    }

    async fn snapshot_filename(&self, repo: &MavenRepository, group_id: &str, artifact_id: &str, version: &str) -> String {
        let metadata_url = repo.snapshot_metadata_url(group_id, artifact_id, version);
        let fallback = format!("{artifact_id}-{version}.pom");
        let Some(body) = self.fetch(repo, &metadata_url).await else {
            return fallback;
        };
        match metadata::parse_snapshot_metadata(&body) {
            Ok(meta) => meta
                .pom_value()
                .map(|value| format!("{artifact_id}-{value}.pom"))
                .unwrap_or(fallback),
            Err(_) => fallback,
        }
    }
}

impl PdocSource for MavenPdocSource {
    async fn load_by_coordinate(&self, coordinate: &Coordinate, version: &Version) -> GraftResult<Option<PDoc>> {
        if let Some(pdoc) = self.local.load(&coordinate.group_id, &coordinate.artifact_id, version.as_str())? {
            return Ok(Some(pdoc));
        }

        if self.offline {
            return Ok(None);
        }

        let is_snapshot = version.is_snapshot();
        let candidates: Vec<MavenRepository> = self
            .repos
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .for_version(is_snapshot)
            .to_vec();
        for repo in &candidates {
            let filename = if is_snapshot {
                self.snapshot_filename(repo, &coordinate.group_id, &coordinate.artifact_id, version.as_str())
                    .await
            } else {
                format!("{}-{}.pom", coordinate.artifact_id, version.as_str())
            };
            let url = repo.pom_url(&coordinate.group_id, &coordinate.artifact_id, version.as_str(), &filename);
            if let Some(body) = self.fetch(repo, &url).await {
                let mut pdoc = pom::parse_pom(&body)?;
                pdoc.file_path = None;
                return Ok(Some(pdoc));
            }
        }

        Ok(None)
    }

    async fn load_by_path(&self, path: &Path) -> GraftResult<Option<PDoc>> {
        let path = if path.is_dir() { path.join("pom.xml") } else { path.to_path_buf() };
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(graft_util::errors::GraftError::Io)?;
        let mut pdoc = pom::parse_pom(&content)?;
        pdoc.file_path = Some(path);
        Ok(Some(pdoc))
    }

    /// Merges repositories a PDoc declares in its own `<repositories>`
    /// section ahead of the configured release/snapshot lists, so a
    /// dependency hosted only on a project-declared mirror can still be
    /// found by later lookups in this same resolve run.
    fn register_repositories(&self, declared: &[RepositoryRef]) {
        if declared.is_empty() {
            return;
        }
        self.repos.lock().unwrap_or_else(|p| p.into_inner()).merge_declared(declared);
    }
}
