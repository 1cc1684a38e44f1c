//! The resolver's configuration options.

use graft_maven::MavenRepository;

/// The configuration options a resolve run accepts.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Skip all remote HTTP; missing artifacts remain with an empty version.
    pub offline: bool,
    /// Enable the on-disk HTTP response cache.
    pub use_http_cache: bool,
    /// TTL for cached responses, in hours.
    pub http_cache_ttl_hours: u64,
    /// Ordered release-lookup remote repositories.
    pub release_remote_repos: Vec<MavenRepository>,
    /// Ordered snapshot-lookup remote repositories.
    pub snapshot_remote_repos: Vec<MavenRepository>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            offline: false,
            use_http_cache: false,
            http_cache_ttl_hours: 720,
            release_remote_repos: vec![MavenRepository::central()],
            snapshot_remote_repos: Vec::new(),
        }
    }
}
