use crate::coordinate::Coordinate;
use std::fmt;

/// An exclusion pattern of the form `group:artifact`, where either side may
/// be the wildcard `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExclusionPattern {
    pub group: String,
    pub artifact: String,
}

const WILDCARD: &str = "*";

impl ExclusionPattern {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// Parses a `"group:artifact"` exclusion declaration. A missing
    /// artifact half (`"group"` with no colon) is treated as `group:*`.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((group, artifact)) => Self::new(group, artifact),
            None => Self::new(spec, WILDCARD),
        }
    }

    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        let group_matches = self.group == WILDCARD || self.group == coordinate.group_id;
        let artifact_matches = self.artifact == WILDCARD || self.artifact == coordinate.artifact_id;
        group_matches && artifact_matches
    }
}

impl fmt::Display for ExclusionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}
