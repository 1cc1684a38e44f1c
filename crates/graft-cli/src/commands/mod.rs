//! Command dispatch and handler modules.

mod resolve;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            path,
            format,
            offline,
            http_cache,
            http_cache_ttl,
            local_repository,
            release_repos,
            snapshot_repos,
        } => {
            resolve::exec(
                &path,
                format,
                offline,
                http_cache,
                http_cache_ttl,
                local_repository,
                release_repos,
                snapshot_repos,
                cli.verbose,
            )
            .await
        }
    }
}
