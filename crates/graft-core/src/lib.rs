//! Core data model for graft: the coordinate/version model, the PDoc tree,
//! the artifact/relationship model, and the resolver's output types.
//!
//! This crate is intentionally free of XML parsing and network I/O — see
//! [`pdoc_source::PdocSource`] for the seam where those are plugged in.

pub mod analysis;
pub mod artifact;
pub mod coordinate;
pub mod exclusion;
pub mod managed_dependency;
pub mod output;
pub mod pdoc;
pub mod pdoc_source;
pub mod relationship;
pub mod settings;
pub mod version;

pub use artifact::Artifact;
pub use coordinate::Coordinate;
pub use exclusion::ExclusionPattern;
pub use managed_dependency::{ManagedDependency, Scope};
pub use output::{Package, ResolutionOutput, ResolvedDependency};
pub use pdoc::{PDoc, ParentHint, RepositoryRef};
pub use pdoc_source::PdocSource;
pub use relationship::Relationship;
pub use settings::{ServerCredential, UserSettings};
pub use version::Version;
