//! An internal `petgraph`-backed view of the artifacts the traversal engine
//! resolves, used to print a dependency tree. The resolver's actual output
//! is the flat `Package`/`ResolvedDependency` lists in `graft-core`; this
//! graph is a convenience the CLI renders, not a required component.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct GraphNode {
    pub name: String,
    pub version: String,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

pub struct DependencyGraph {
    graph: DiGraph<GraphNode, ()>,
    index: HashMap<String, NodeIndex>,
    root: Option<NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            root: None,
        }
    }

    pub fn add_node(&mut self, name: &str, version: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            name: name.to_string(),
            version: version.to_string(),
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn set_root(&mut self, idx: NodeIndex) {
        self.root = Some(idx);
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if !self.graph.edges_connecting(from, to).next().is_some() {
            self.graph.add_edge(from, to, ());
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Renders an indented dependency tree starting from the root, in the
    /// style of `mvn dependency:tree`.
    pub fn print_tree(&self) -> String {
        let Some(root) = self.root else {
            return String::new();
        };
        let mut out = String::new();
        let mut visited = std::collections::HashSet::new();
        self.write_subtree(root, "", true, &mut out, &mut visited);
        out
    }

    fn write_subtree(
        &self,
        node: NodeIndex,
        prefix: &str,
        is_last: bool,
        out: &mut String,
        visited: &mut std::collections::HashSet<NodeIndex>,
    ) {
        let connector = if prefix.is_empty() {
            ""
        } else if is_last {
            "└── "
        } else {
            "├── "
        };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&self.graph[node].to_string());
        out.push('\n');

        if !visited.insert(node) {
            return;
        }

        let children: Vec<NodeIndex> = self.graph.neighbors_directed(node, Direction::Outgoing).collect();
        let child_prefix = if prefix.is_empty() {
            String::new()
        } else if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        let inner_prefix = if prefix.is_empty() { "    ".to_string() } else { child_prefix.clone() };
        for (i, child) in children.iter().enumerate() {
            let last = i == children.len() - 1;
            self.write_subtree(*child, &inner_prefix, last, out, visited);
        }
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a renderable tree from the resolver's flat output, rooted at
/// `root_id` (the caller already knows this — it parsed the root PDoc).
pub fn from_output(output: &graft_core::output::ResolutionOutput, root_id: &str) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for package in &output.packages {
        let name = format!("{}:{}", package.group_id, package.artifact_id);
        let idx = graph.graph.add_node(GraphNode { name, version: package.version.clone() });
        graph.index.insert(package.id.clone(), idx);
    }
    if let Some(&root_idx) = graph.index.get(root_id) {
        graph.set_root(root_idx);
    }
    for dependency in &output.dependencies {
        let Some(&from_idx) = graph.index.get(&dependency.from) else {
            continue;
        };
        for to_id in &dependency.to {
            if let Some(&to_idx) = graph.index.get(to_id) {
                graph.add_edge(from_idx, to_idx);
            }
        }
    }
    graph
}
