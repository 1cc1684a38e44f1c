//! The property expander: substitutes `${name}` tokens against a layered
//! property environment of built-ins, parent-chain properties, and the
//! PDoc's own `<properties>` entries.

use std::collections::BTreeMap;

const MAX_PASSES: usize = 20;

/// The built-in `project.*`/`pom.*` properties Maven makes available
/// without requiring a `<properties>` declaration.
pub struct BuiltIns {
    values: BTreeMap<String, String>,
}

impl BuiltIns {
    pub fn new(group_id: &str, artifact_id: &str, version: &str, packaging: Option<&str>) -> Self {
        let mut values = BTreeMap::new();
        values.insert("project.groupId".to_string(), group_id.to_string());
        values.insert("pom.groupId".to_string(), group_id.to_string());
        values.insert("project.artifactId".to_string(), artifact_id.to_string());
        values.insert("pom.artifactId".to_string(), artifact_id.to_string());
        values.insert("project.version".to_string(), version.to_string());
        values.insert("pom.version".to_string(), version.to_string());
        let packaging = packaging.unwrap_or("jar").to_string();
        values.insert("project.packaging".to_string(), packaging.clone());
        values.insert("pom.packaging".to_string(), packaging);
        Self { values }
    }

    pub fn with_parent(mut self, parent_group_id: &str, parent_version: &str) -> Self {
        self.values
            .insert("project.parent.groupId".to_string(), parent_group_id.to_string());
        self.values
            .insert("project.parent.version".to_string(), parent_version.to_string());
        self
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Expands `${...}` tokens in `input` against `properties` (highest
/// priority — already merged child-over-parent by the analyzer) falling
/// back to `built_ins`. Runs to a fixed point (bounded, so a property that
/// expands to a reference to itself can't loop forever); an unresolved
/// token is left literal.
pub fn expand(input: &str, properties: &BTreeMap<String, String>, built_ins: &BuiltIns) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_PASSES {
        let mut next = String::with_capacity(current.len());
        let mut cursor = 0;
        let mut replaced_any = false;

        while let Some(rel_start) = current[cursor..].find("${") {
            let start = cursor + rel_start;
            let Some(rel_end) = current[start..].find('}') else {
                break;
            };
            let end = start + rel_end;
            let key = &current[start + 2..end];

            let replacement = properties.get(key).map(String::as_str).or_else(|| built_ins.get(key));

            next.push_str(&current[cursor..start]);
            match replacement {
                Some(replacement) => {
                    next.push_str(replacement);
                    replaced_any = true;
                }
                None => next.push_str(&current[start..=end]),
            }
            cursor = end + 1;
        }
        next.push_str(&current[cursor..]);

        current = next;
        if !replaced_any {
            break;
        }
    }
    current
}
