//! Generic dependency graph with deterministic ordering
//!
//! Edges point from dependent to dependency: if A depends on B, the edge is
//! `A -> B` and B is ordered before A. Nodes are kept in key order, which
//! is also the tie-break among nodes that become ready at the same time, so
//! the same graph always yields the same order.
//!
//! Edges whose target is not a node of the graph are ignored when sorting:
//! the target is assumed to exist already, outside the set being ordered.

use std::collections::{BTreeMap, BTreeSet};

/// A node that is part of a cycle, with every node of that cycle it
/// depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleMember<K> {
    pub node: K,
    pub depends_on: Vec<K>,
}

/// Result of [`DependencyGraph::sort`].
///
/// `order` contains every node that is not part of a cycle, dependencies
/// first. `cycles` contains one entry per node that is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorted<K> {
    pub order: Vec<K>,
    pub cycles: Vec<CycleMember<K>>,
}

impl<K> Sorted<K> {
    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Directed dependency graph.
#[derive(Debug, Clone)]
pub struct DependencyGraph<K> {
    nodes: BTreeSet<K>,
    /// Adjacency list: key depends on each value.
    edges: BTreeMap<K, BTreeSet<K>>,
}

impl<K> Default for DependencyGraph<K> {
    fn default() -> Self {
        Self {
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unvisited,
    /// On the current search path and not yet assigned to a component.
    InProgress,
    Resolved,
}

impl<K: Ord + Clone> DependencyGraph<K> {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Adding an existing node is a no-op.
    pub fn add_node(&mut self, node: K) {
        self.nodes.insert(node);
    }

    /// Declare that `from` depends on `to`.
    ///
    /// Endpoints do not have to be nodes yet; edges touching a key that is
    /// never added as a node are ignored by [`sort`](Self::sort).
    pub fn add_edge(&mut self, from: K, to: K) {
        self.edges.entry(from).or_default().insert(to);
    }

    pub fn contains(&self, node: &K) -> bool {
        self.nodes.contains(node)
    }

    /// Return the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of edges between nodes of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges
            .iter()
            .filter(|(from, _)| self.nodes.contains(*from))
            .map(|(_, targets)| targets.iter().filter(|t| self.nodes.contains(*t)).count())
            .sum()
    }

    /// Direct dependencies of `node` that are nodes of the graph.
    pub fn dependencies_of(&self, node: &K) -> Vec<&K> {
        self.edges
            .get(node)
            .map(|targets| targets.iter().filter(|t| self.nodes.contains(*t)).collect())
            .unwrap_or_default()
    }

    /// Order the graph, dependencies first.
    ///
    /// Nodes inside a cycle (including a node depending on itself) are left
    /// out of the order and reported in [`Sorted::cycles`]. Nodes outside
    /// every cycle are always ordered; an edge into a cycle does not hold
    /// them back.
    pub fn sort(&self) -> Sorted<K> {
        let keys: Vec<&K> = self.nodes.iter().collect();
        let index_of: BTreeMap<&K, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();

        let adjacency: Vec<Vec<usize>> = keys
            .iter()
            .map(|key| {
                self.edges
                    .get(*key)
                    .map(|targets| targets.iter().filter_map(|t| index_of.get(t).copied()).collect())
                    .unwrap_or_default()
            })
            .collect();

        let mut cyclic = vec![false; keys.len()];
        let mut cycles = Vec::new();

        for mut component in strongly_connected(&adjacency) {
            let first = component[0];
            if component.len() == 1 && !adjacency[first].contains(&first) {
                continue;
            }
            component.sort_unstable();
            for &member in &component {
                cyclic[member] = true;
            }
            for &member in &component {
                let depends_on = component
                    .iter()
                    .copied()
                    .filter(|&other| other != member || adjacency[member].contains(&member))
                    .map(|other| keys[other].clone())
                    .collect();
                cycles.push(CycleMember {
                    node: keys[member].clone(),
                    depends_on,
                });
            }
        }
        cycles.sort_by(|a, b| a.node.cmp(&b.node));

        // Kahn's algorithm over the acyclic remainder
        let mut remaining = vec![0usize; keys.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); keys.len()];
        for (from, targets) in adjacency.iter().enumerate() {
            if cyclic[from] {
                continue;
            }
            for &to in targets.iter().filter(|&&to| !cyclic[to]) {
                remaining[from] += 1;
                dependents[to].push(from);
            }
        }

        let mut ready: BTreeSet<usize> = (0..keys.len())
            .filter(|&i| !cyclic[i] && remaining[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(keys.len());

        while let Some(next) = ready.pop_first() {
            order.push(keys[next].clone());
            for &dependent in &dependents[next] {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        Sorted { order, cycles }
    }
}

/// Strongly connected components (Tarjan), iterative with an explicit
/// frame stack so deep graphs cannot overflow the call stack.
fn strongly_connected(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut state = vec![NodeState::Unvisited; n];
    let mut index = vec![0usize; n];
    let mut low = vec![0usize; n];
    let mut next_index = 0;
    let mut path: Vec<usize> = Vec::new();
    let mut components = Vec::new();

    for root in 0..n {
        if state[root] != NodeState::Unvisited {
            continue;
        }

        // (node, position of the next edge to follow)
        let mut frames: Vec<(usize, usize)> = Vec::new();
        state[root] = NodeState::InProgress;
        index[root] = next_index;
        low[root] = next_index;
        next_index += 1;
        path.push(root);
        frames.push((root, 0));

        while let Some(&(node, edge)) = frames.last() {
            if let Some(&target) = adjacency[node].get(edge) {
                let top = frames.len() - 1;
                frames[top].1 += 1;

                match state[target] {
                    NodeState::Unvisited => {
                        state[target] = NodeState::InProgress;
                        index[target] = next_index;
                        low[target] = next_index;
                        next_index += 1;
                        path.push(target);
                        frames.push((target, 0));
                    }
                    NodeState::InProgress => {
                        low[node] = low[node].min(index[target]);
                    }
                    NodeState::Resolved => {}
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                low[parent] = low[parent].min(low[node]);
            }

            if low[node] == index[node] {
                let mut component = Vec::new();
                while let Some(member) = path.pop() {
                    state[member] = NodeState::Resolved;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    components
}
