//! Handler for `graft resolve`.

use std::path::{Path, PathBuf};

use graft_core::PdocSource;
use graft_maven::{MavenPdocSource, MavenRepository, RepositoryLists};
use graft_resolver::config::ResolverConfig;
use graft_resolver::graph;
use graft_util::errors::{GraftError, GraftResult};
use graft_util::progress;

use crate::cli::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub async fn exec(
    path: &Path,
    format: OutputFormat,
    offline: bool,
    http_cache: bool,
    http_cache_ttl: u64,
    local_repository: Option<PathBuf>,
    release_repos: Vec<String>,
    snapshot_repos: Vec<String>,
    verbose: bool,
) -> GraftResult<()> {
    let settings = match local_repository {
        Some(local_repository) => graft_core::UserSettings::new(local_repository, Vec::new()),
        None => graft_core::UserSettings::default(),
    };

    let config = ResolverConfig {
        offline,
        use_http_cache: http_cache,
        http_cache_ttl_hours: http_cache_ttl,
        release_remote_repos: release_repos
            .iter()
            .enumerate()
            .map(|(i, url)| MavenRepository::new(format!("release-{i}"), url.as_str()))
            .chain(std::iter::once(MavenRepository::central()))
            .collect(),
        snapshot_remote_repos: snapshot_repos
            .iter()
            .enumerate()
            .map(|(i, url)| MavenRepository::new(format!("snapshot-{i}"), url.as_str()))
            .collect(),
    };
    let repos = RepositoryLists::new(config.release_remote_repos.clone(), config.snapshot_remote_repos.clone());

    let mut source = MavenPdocSource::new(settings.clone(), repos, config.offline)?;
    if config.use_http_cache {
        let cache_dir = settings.local_repository.join(".graft-cache");
        source = source.with_response_cache(&cache_dir, config.http_cache_ttl_hours)?;
    }

    if verbose {
        tracing::info!(path = %path.display(), "resolving dependencies");
    }
    progress::status("Resolving", &path.display().to_string());

    let root_pdoc = source.load_by_path(path).await?.ok_or_else(|| GraftError::Generic {
        message: format!("no project descriptor found at {}", path.display()),
    })?;

    let root_id = graft_core::output::Package::id_for(
        &root_pdoc.effective_group_id().unwrap_or_default(),
        &root_pdoc.artifact_id,
        &root_pdoc.effective_version().unwrap_or_default(),
    );

    let output = graft_resolver::resolve(&source, root_pdoc).await?;
    source.flush_cache()?;
    progress::status_info("Resolved", &format!("{} packages", output.packages.len()));

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output).map_err(|error| GraftError::Generic {
                message: format!("failed to serialize resolution output: {error}"),
            })?;
            println!("{json}");
        }
        OutputFormat::Tree => {
            let tree = graph::from_output(&output, &root_id);
            print!("{}", tree.print_tree());
        }
    }

    Ok(())
}
