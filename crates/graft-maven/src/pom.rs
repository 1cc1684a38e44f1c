//! Parses a Maven POM XML document into a [`graft_core::PDoc`].
//!
//! This module is purely structural: it builds the raw tree, leaving any
//! `${...}` property tokens unexpanded. Property expansion is a separate
//! concern, owned by `graft-resolver`'s analyzer.

use graft_core::managed_dependency::{ManagedDependency, Scope};
use graft_core::{Coordinate, ExclusionPattern, ParentHint, RepositoryRef, Version, PDoc};
use graft_util::errors::{GraftError, GraftResult};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

#[derive(Default)]
struct DependencyBuilder {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    scope: Option<String>,
    optional: bool,
    type_: Option<String>,
    exclusions: Vec<ExclusionBuilder>,
}

#[derive(Default)]
struct ExclusionBuilder {
    group_id: Option<String>,
    artifact_id: Option<String>,
}

#[derive(Default)]
struct RepositoryBuilder {
    id: Option<String>,
    url: Option<String>,
    releases_enabled: bool,
    snapshots_enabled: bool,
}

/// Parses POM XML text into a [`PDoc`]. A malformed document is a fatal
/// error to its own analysis; callers decide whether that's fatal to the
/// whole resolve (root) or merely skipped (a parent or module that fails
/// to parse).
pub fn parse_pom(xml: &str) -> GraftResult<PDoc> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    let mut group_id: Option<String> = None;
    let mut artifact_id: Option<String> = None;
    let mut version: Option<String> = None;
    let mut packaging: Option<String> = None;
    let mut properties = std::collections::BTreeMap::new();
    let mut dependencies = Vec::new();
    let mut dependency_management = Vec::new();
    let mut modules = Vec::new();
    let mut repositories = Vec::new();
    let mut licenses = Vec::new();

    let mut parent_group: Option<String> = None;
    let mut parent_artifact: Option<String> = None;
    let mut parent_version: Option<String> = None;
    let mut parent_relative_path: Option<String> = None;

    let mut current_dep: Option<DependencyBuilder> = None;
    let mut current_exclusion: Option<ExclusionBuilder> = None;
    let mut current_repo: Option<RepositoryBuilder> = None;
    let mut current_license_name: Option<String> = None;
    let mut in_management = false;

    loop {
        match reader.read_event().map_err(|e| GraftError::XmlParse {
            message: format!("{e}"),
        })? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(name);
                let ctx = path.join("/");
                text.clear();
                match ctx.as_str() {
                    "project/dependencyManagement" => in_management = true,
                    "project/dependencyManagement/dependencies/dependency" | "project/dependencies/dependency" => {
                        current_dep = Some(DependencyBuilder::default());
                    }
                    _ if ctx.ends_with("/exclusions/exclusion") => {
                        current_exclusion = Some(ExclusionBuilder::default());
                    }
                    "project/repositories/repository" => {
                        current_repo = Some(RepositoryBuilder::default());
                    }
                    "project/licenses/license" => {
                        current_license_name = None;
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(name);
                path.pop();
            }
            Event::Text(e) => {
                text.push_str(&e.unescape().map_err(|err| GraftError::XmlParse {
                    message: format!("{err}"),
                })?);
            }
            Event::End(_) => {
                let ctx = path.join("/");
                let value = text.trim().to_string();
                text.clear();

                match ctx.as_str() {
                    "project/groupId" => group_id = Some(value),
                    "project/artifactId" => artifact_id = Some(value),
                    "project/version" => version = Some(value),
                    "project/packaging" => packaging = Some(value),
                    "project/parent/groupId" => parent_group = Some(value),
                    "project/parent/artifactId" => parent_artifact = Some(value),
                    "project/parent/version" => parent_version = Some(value),
                    "project/parent/relativePath" => parent_relative_path = Some(value),
                    "project/modules/module" => modules.push(value),
                    _ if ctx.starts_with("project/properties/") => {
                        if let Some(key) = ctx.strip_prefix("project/properties/") {
                            properties.insert(key.to_string(), value);
                        }
                    }
                    _ if ctx.ends_with("/dependency/groupId") => {
                        if let Some(dep) = current_dep.as_mut() {
                            dep.group_id = Some(value);
                        }
                    }
                    _ if ctx.ends_with("/dependency/artifactId") => {
                        if let Some(dep) = current_dep.as_mut() {
                            dep.artifact_id = Some(value);
                        }
                    }
                    _ if ctx.ends_with("/dependency/version") => {
                        if let Some(dep) = current_dep.as_mut() {
                            dep.version = Some(value);
                        }
                    }
                    _ if ctx.ends_with("/dependency/scope") => {
                        if let Some(dep) = current_dep.as_mut() {
                            dep.scope = Some(value);
                        }
                    }
                    _ if ctx.ends_with("/dependency/optional") => {
                        if let Some(dep) = current_dep.as_mut() {
                            dep.optional = value.eq_ignore_ascii_case("true");
                        }
                    }
                    _ if ctx.ends_with("/dependency/type") => {
                        if let Some(dep) = current_dep.as_mut() {
                            dep.type_ = Some(value);
                        }
                    }
                    _ if ctx.ends_with("/exclusion/groupId") => {
                        if let Some(excl) = current_exclusion.as_mut() {
                            excl.group_id = Some(value);
                        }
                    }
                    _ if ctx.ends_with("/exclusion/artifactId") => {
                        if let Some(excl) = current_exclusion.as_mut() {
                            excl.artifact_id = Some(value);
                        }
                    }
                    "project/repositories/repository/id" => {
                        if let Some(repo) = current_repo.as_mut() {
                            repo.id = Some(value);
                        }
                    }
                    "project/repositories/repository/url" => {
                        if let Some(repo) = current_repo.as_mut() {
                            repo.url = Some(value);
                        }
                    }
                    "project/repositories/repository/releases/enabled" => {
                        if let Some(repo) = current_repo.as_mut() {
                            repo.releases_enabled = value.eq_ignore_ascii_case("true");
                        }
                    }
                    "project/repositories/repository/snapshots/enabled" => {
                        if let Some(repo) = current_repo.as_mut() {
                            repo.snapshots_enabled = value.eq_ignore_ascii_case("true");
                        }
                    }
                    "project/licenses/license/name" => current_license_name = Some(value),
                    _ => {}
                }

                if ctx.ends_with("/exclusions/exclusion") {
                    if let Some(excl) = current_exclusion.take() {
                        if let Some(dep) = current_dep.as_mut() {
                            dep.exclusions.push(excl);
                        }
                    }
                }

                if ctx == "project/dependencyManagement/dependencies/dependency" || ctx == "project/dependencies/dependency" {
                    if let Some(dep) = current_dep.take() {
                        let managed = build_managed_dependency(dep);
                        if in_management {
                            dependency_management.push(managed);
                        } else {
                            dependencies.push(managed);
                        }
                    }
                }

                if ctx == "project/dependencyManagement" {
                    in_management = false;
                }

                if ctx == "project/repositories/repository" {
                    if let Some(repo) = current_repo.take() {
                        if let (Some(id), Some(url)) = (repo.id, repo.url) {
                            repositories.push(RepositoryRef {
                                id,
                                url,
                                releases_enabled: repo.releases_enabled,
                                snapshots_enabled: repo.snapshots_enabled,
                            });
                        }
                    }
                }

                if ctx == "project/licenses/license" {
                    if let Some(name) = current_license_name.take() {
                        licenses.push(name);
                    }
                }

                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let artifact_id = artifact_id.ok_or_else(|| GraftError::XmlParse {
        message: "POM is missing <artifactId>".to_string(),
    })?;

    let parent = match (parent_group, parent_artifact, parent_version) {
        (Some(group), Some(artifact), Some(parent_version)) => Some(ParentHint {
            coordinate: Coordinate::new(group, artifact),
            version: Version::new(parent_version),
            relative_path: parent_relative_path,
        }),
        _ => None,
    };

    Ok(PDoc {
        file_path: None,
        group_id,
        artifact_id,
        version,
        packaging,
        parent,
        properties,
        dependencies,
        dependency_management,
        modules,
        repositories,
        licenses,
    })
}

fn build_managed_dependency(dep: DependencyBuilder) -> ManagedDependency {
    let coordinate = Coordinate::new(
        dep.group_id.unwrap_or_default(),
        dep.artifact_id.unwrap_or_default(),
    );
    let mut managed = ManagedDependency::new(coordinate, Version::new(dep.version.unwrap_or_default()));
    managed.scope = dep.scope.as_deref().and_then(Scope::parse);
    managed.optional = dep.optional;
    managed.type_ = dep.type_;
    managed.exclusions = dep
        .exclusions
        .into_iter()
        .map(|excl| {
            ExclusionPattern::new(
                excl.group_id.unwrap_or_default(),
                excl.artifact_id.unwrap_or_else(|| "*".to_string()),
            )
        })
        .collect();
    managed
}
