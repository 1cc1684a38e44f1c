//! CLI argument definitions for graft.
//!
//! Uses `clap` derive macros. The single `resolve` command wires a real
//! `PdocSource` into the resolver and prints the resulting package/edge
//! lists; see [`super::commands`].

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "graft",
    version,
    about = "Resolve a Maven project descriptor's transitive dependency graph"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Tree,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a project descriptor's dependencies
    Resolve {
        /// Path to a pom.xml file, or a directory containing one
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print output as this format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
        /// Skip all remote HTTP; rely on the local repository only
        #[arg(long)]
        offline: bool,
        /// Enable the on-disk HTTP response cache
        #[arg(long)]
        http_cache: bool,
        /// TTL in hours for cached HTTP responses
        #[arg(long, default_value_t = 720)]
        http_cache_ttl: u64,
        /// Override the local Maven repository root (default `${HOME}/.m2/repository`)
        #[arg(long)]
        local_repository: Option<PathBuf>,
        /// Additional remote repository URL for non-SNAPSHOT lookups (repeatable)
        #[arg(long = "release-repo")]
        release_repos: Vec<String>,
        /// Additional remote repository URL for SNAPSHOT lookups (repeatable)
        #[arg(long = "snapshot-repo")]
        snapshot_repos: Vec<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
