//! The resolution core: property expansion, the resolution cache, the
//! Analyzer, the FIFO traversal engine, the exclusion matcher (folded into
//! [`graft_core::exclusion`]), and the output assembler.
//!
//! This crate never touches XML or HTTP directly; it is generic over
//! [`graft_core::pdoc_source::PdocSource`], the seam a concrete collaborator
//! like `graft-maven` plugs into.

pub mod analyzer;
pub mod assemble;
pub mod cache;
pub mod config;
pub mod engine;
pub mod graph;
pub mod parent;
pub mod properties;

use graft_core::output::ResolutionOutput;
use graft_core::pdoc_source::PdocSource;
use graft_core::PDoc;
use graft_util::errors::GraftResult;

/// Runs the full resolver over `root_pdoc`: analysis, traversal, and output
/// assembly in sequence. `root_pdoc` must already be parsed — loading it is
/// the caller's job.
pub async fn resolve<S: PdocSource + Sync>(source: &S, root_pdoc: PDoc) -> GraftResult<ResolutionOutput> {
    let mut shared = engine::Shared::new();
    let module_results = engine::run_module(source, root_pdoc, &mut shared).await?;
    Ok(assemble::assemble(module_results))
}
