//! The optional on-disk HTTP response cache and per-host timeout blocklist.
//!
//! Rather than one file per cached artifact, the whole cache lives in a
//! single JSON sidecar (`cache.json`) since a resolve run's request count is
//! small enough that a flat file is the simpler, adequate design.

use graft_util::errors::{GraftError, GraftResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// After this many recorded timeouts against a single host, the host is
/// blocklisted and further requests to it short-circuit to a clean miss.
const MAX_DOMAIN_TIMEOUTS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    status: u16,
    body: Option<String>,
    fetched_at_epoch_secs: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    entries: HashMap<String, CacheEntry>,
    #[serde(default)]
    host_timeouts: HashMap<String, u32>,
    #[serde(default)]
    blocklist: HashSet<String>,
}

pub struct ResponseCache {
    root: PathBuf,
    ttl_hours: u64,
    file: CacheFile,
    dirty: bool,
}

pub enum CacheLookup {
    Hit { status: u16, body: Option<String> },
    Stale,
    Miss,
}

impl ResponseCache {
    pub fn open(root: &Path, ttl_hours: u64) -> GraftResult<Self> {
        graft_util::fs::ensure_dir(root).map_err(GraftError::Io)?;
        let path = root.join("cache.json");
        let file = if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(GraftError::Io)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            CacheFile::default()
        };
        Ok(Self {
            root: root.to_path_buf(),
            ttl_hours,
            file,
            dirty: false,
        })
    }

    /// `key` is a hashed request path (see `graft_util::hash::sha256_bytes`),
    /// not the raw URL.
    pub fn lookup(&self, key: &str) -> CacheLookup {
        match self.file.entries.get(key) {
            Some(entry) => {
                if self.is_stale(entry) {
                    CacheLookup::Stale
                } else {
                    CacheLookup::Hit {
                        status: entry.status,
                        body: entry.body.clone(),
                    }
                }
            }
            None => CacheLookup::Miss,
        }
    }

    fn is_stale(&self, entry: &CacheEntry) -> bool {
        let now = now_epoch_secs();
        let ttl_secs = self.ttl_hours * 3600;
        now.saturating_sub(entry.fetched_at_epoch_secs) > ttl_secs
    }

    /// Records a 200 or 404 response; other statuses are not cached.
    pub fn put(&mut self, key: &str, status: u16, body: Option<String>) {
        if status == 200 || status == 404 {
            self.file.entries.insert(
                key.to_string(),
                CacheEntry {
                    status,
                    body,
                    fetched_at_epoch_secs: now_epoch_secs(),
                },
            );
            self.dirty = true;
        }
    }

    pub fn is_blocklisted(&self, host: &str) -> bool {
        self.file.blocklist.contains(host)
    }

    /// Records an I/O timeout against `host`; once it reaches
    /// `MAX_DOMAIN_TIMEOUTS`, the host is added to the persistent blocklist.
    pub fn record_timeout(&mut self, host: &str) {
        let count = self.file.host_timeouts.entry(host.to_string()).or_insert(0);
        *count += 1;
        if *count >= MAX_DOMAIN_TIMEOUTS {
            self.file.blocklist.insert(host.to_string());
        }
        self.dirty = true;
    }

    pub fn save(&mut self) -> GraftResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let path = self.root.join("cache.json");
        let content = serde_json::to_string_pretty(&self.file).map_err(|e| GraftError::Generic {
            message: format!("failed to serialize response cache: {e}"),
        })?;
        std::fs::write(&path, content).map_err(GraftError::Io)?;
        self.dirty = false;
        Ok(())
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
