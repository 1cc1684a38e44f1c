use crate::coordinate::Coordinate;
use crate::exclusion::ExclusionPattern;
use crate::version::Version;
use serde::{Deserialize, Serialize};

/// A Maven dependency scope, restricted to the values this resolver cares
/// about. `Import` is not a real dependency scope in the Maven sense — it
/// marks a `<dependencyManagement>` entry as a BOM reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Compile,
    Runtime,
    Provided,
    Test,
    System,
    Import,
}

impl Scope {
    pub fn parse(raw: &str) -> Option<Scope> {
        match raw {
            "" => Some(Scope::Compile),
            "compile" => Some(Scope::Compile),
            "runtime" => Some(Scope::Runtime),
            "provided" => Some(Scope::Provided),
            "test" => Some(Scope::Test),
            "system" => Some(Scope::System),
            "import" => Some(Scope::Import),
            _ => None,
        }
    }

    /// The effective scopes the resolver keeps in its output.
    pub fn is_kept(self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Compile
    }
}

/// An entry from either `<dependencies>` or `<dependencyManagement>`, before
/// scope/optional filtering and property expansion have necessarily run.
#[derive(Debug, Clone)]
pub struct ManagedDependency {
    pub coordinate: Coordinate,
    pub version: Version,
    pub scope: Option<Scope>,
    pub optional: bool,
    pub type_: Option<String>,
    pub exclusions: Vec<ExclusionPattern>,
}

impl ManagedDependency {
    pub fn new(coordinate: Coordinate, version: Version) -> Self {
        Self {
            coordinate,
            version,
            scope: None,
            optional: false,
            type_: None,
            exclusions: Vec::new(),
        }
    }

    pub fn effective_scope(&self) -> Scope {
        self.scope.unwrap_or_default()
    }

    /// True for a `<dependencyManagement>` entry that names a BOM to import
    /// rather than a managed version for the coordinate itself.
    pub fn is_bom_import(&self) -> bool {
        self.effective_scope() == Scope::Import && self.type_.as_deref().unwrap_or("jar") == "pom"
    }
}
