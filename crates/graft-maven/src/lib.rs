//! Maven repository protocol: PDoc (POM) parsing, `maven-metadata.xml`
//! parsing, the repository client, the on-disk response cache, and
//! authentication.
//!
//! This crate is the external collaborator carved out of the resolution
//! core: it is the only place that touches XML parsing, the filesystem
//! layout, or HTTP.

pub mod auth;
pub mod cache;
pub mod client;
pub mod download;
pub mod metadata;
pub mod pom;
pub mod repository;

pub use client::{LocalRepository, MavenPdocSource};
pub use repository::{MavenRepository, RepositoryLists};
