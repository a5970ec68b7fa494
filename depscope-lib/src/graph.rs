use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::{graph::NodeIndex, prelude::StableGraph, visit::EdgeRef};
use tracing::{debug, warn};

use crate::source::DependencySource;

/// A dependency graph produced by [`GraphBuilder::build`].
///
/// Every package mentioned during the build owns one node. Packages that were visited by the
/// build are the graph's keys, each carrying the dependency list it was recorded with; packages
/// only ever mentioned as a dependency (because the depth bound was reached) are nodes without a
/// list.
#[derive(Debug)]
pub struct Graph {
    pub(crate) inner: StableGraph<NodeWeight, ()>,
    indices: HashMap<String, NodeIndex>,
    recorded: Vec<NodeIndex>,
    root: NodeIndex,
}

impl Graph {
    fn new(root: &str) -> Self {
        let mut inner = StableGraph::default();
        let index = inner.add_node(NodeWeight {
            name: root.to_string(),
            depth: 0,
            state: NodeState::Expanded,
        });
        Graph {
            inner,
            indices: HashMap::from([(root.to_string(), index)]),
            recorded: vec![index],
            root: index,
        }
    }

    fn node(&mut self, name: &str, depth: usize) -> NodeIndex {
        if let Some(index) = self.indices.get(name) {
            return *index;
        }
        let index = self.inner.add_node(NodeWeight {
            name: name.to_string(),
            depth,
            state: NodeState::Unexpanded,
        });
        self.indices.insert(name.to_string(), index);
        index
    }

    /// Stores `dependencies` verbatim under `index` and returns their node indices in order.
    fn record(
        &mut self,
        index: NodeIndex,
        dependencies: Vec<String>,
        state: NodeState,
    ) -> Vec<NodeIndex> {
        let depth = self.inner[index].depth;
        if self.inner[index].state == NodeState::Unexpanded {
            self.recorded.push(index);
        }
        self.inner[index].state = state;

        dependencies
            .iter()
            .map(|dependency| {
                let target = self.node(dependency, depth + 1);
                self.inner.add_edge(index, target, ());
                target
            })
            .collect()
    }

    pub fn root(&self) -> &str {
        &self.inner[self.root].name
    }

    /// Number of packages that carry a dependency list.
    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.node_weight(name)
            .is_some_and(|n| n.state != NodeState::Unexpanded)
    }

    pub fn node_weight(&self, name: &str) -> Option<&NodeWeight> {
        self.indices.get(name).map(|i| &self.inner[*i])
    }

    /// The recorded dependency list of `name`, or `None` if `name` is not a key.
    pub fn dependencies(&self, name: &str) -> Option<Vec<&str>> {
        let index = *self.indices.get(name)?;
        if self.inner[index].state == NodeState::Unexpanded {
            return None;
        }
        Some(self.children(index).map(|i| self.name(i)).collect())
    }

    /// Keys with their dependency lists, in the order they were visited.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.recorded.iter().map(|index| {
            let dependencies = self.children(*index).map(|i| self.name(i)).collect();
            (self.name(*index), dependencies)
        })
    }

    /// Every package that depends on `target`, directly or transitively, in breadth-first
    /// discovery order. `target` itself is never included.
    pub fn reverse_dependencies(&self, target: &str) -> Vec<&str> {
        let Some(target) = self.index(target) else {
            return Vec::new();
        };

        let mut reverse: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        for parent in self.recorded.iter().copied() {
            for child in self.children(parent) {
                reverse.entry(child).or_default().push(parent);
            }
        }

        let mut result = Vec::new();
        let mut visited = HashSet::from([target]);
        let mut queue = VecDeque::from([target]);

        while let Some(node) = queue.pop_front() {
            for parent in reverse.get(&node).into_iter().flatten().copied() {
                if visited.insert(parent) {
                    result.push(self.name(parent));
                    queue.push_back(parent);
                }
            }
        }

        result
    }

    pub(crate) fn index(&self, name: &str) -> Option<NodeIndex> {
        self.indices.get(name).copied()
    }

    pub(crate) fn name(&self, index: NodeIndex) -> &str {
        &self.inner[index].name
    }

    /// Dependencies of `index` in the order they were recorded.
    pub(crate) fn children(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> {
        let mut edges: Vec<_> = self
            .inner
            .edges(index)
            .map(|e| (e.id(), e.target()))
            .collect();
        edges.sort_unstable_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum NodeState {
    /// Mentioned as a dependency but never visited.
    Unexpanded,
    Expanded,
    /// Matched the filter; recorded without dependencies.
    Filtered,
}

#[derive(Debug, Clone)]
pub struct NodeWeight {
    name: String,
    depth: usize,
    state: NodeState,
}

impl NodeWeight {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hops from the root at which the package was first seen.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn state(&self) -> NodeState {
        self.state
    }
}

/// Breadth-first, depth-bounded construction of a [`Graph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    max_depth: usize,
    filter: Option<String>,
}

impl GraphBuilder {
    /// Packages at depth `max_depth` or deeper are never visited, though they may still be
    /// listed as dependencies of packages at depth `max_depth - 1`.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            filter: None,
        }
    }

    /// Packages whose name contains `filter`, ignoring case, are recorded without
    /// dependencies and not explored further. An empty filter matches nothing.
    pub fn filter(mut self, filter: Option<&str>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty()).map(str::to_lowercase);
        self
    }

    fn is_filtered(&self, name: &str) -> bool {
        self.filter
            .as_deref()
            .is_some_and(|f| name.to_lowercase().contains(f))
    }

    /// Builds a fresh graph rooted at `root`.
    ///
    /// Only the root is looked up with `version`; every other package is looked up with `None`.
    /// A failed lookup is logged and recorded as an empty dependency list.
    pub fn build<S>(&self, root: &str, version: Option<&str>, source: &S) -> Graph
    where
        S: DependencySource + ?Sized,
    {
        let mut graph = Graph::new(root);
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(graph.root, 0)]);

        while let Some((index, depth)) = queue.pop_front() {
            if depth >= self.max_depth || !visited.insert(index) {
                continue;
            }

            let name = graph.name(index);
            if self.is_filtered(name) {
                debug!("{name} matches filter, recording as leaf");
                graph.record(index, Vec::new(), NodeState::Filtered);
                continue;
            }

            let lookup_version = if depth == 0 { version } else { None };
            let dependencies = source
                .dependencies(name, lookup_version)
                .unwrap_or_else(|e| {
                    warn!("failed to look up dependencies of {name}: {e}");
                    Vec::new()
                });
            debug!(
                "{name} at depth {depth} has {} dependencies",
                dependencies.len()
            );

            let targets = graph.record(index, dependencies, NodeState::Expanded);

            let next_depth = depth + 1;
            if next_depth < self.max_depth {
                for target in targets {
                    if !visited.contains(&target) {
                        queue.push_back((target, next_depth));
                    }
                }
            }
        }

        graph
    }
}
