//! The target dependency graph.
//!
//! Nodes are targets in declaration order; an edge `a -> b` means "a depends
//! on b". Every traversal visits neighbors sorted by declaration index so
//! results never depend on petgraph's internal edge order.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::Target;

/// Dependency graph over the declared targets of one manifest.
#[derive(Debug, Clone)]
pub struct TargetGraph {
    /// Node weight is the target's declaration index
    graph: DiGraph<usize, ()>,

    /// Target names, indexed by declaration index
    names: Vec<String>,

    /// Name to node lookup
    nodes: HashMap<String, NodeIndex>,
}

impl TargetGraph {
    /// Build the graph. Names must already be unique; dependency names that
    /// do not resolve are skipped.
    pub fn new(targets: &[Target]) -> Self {
        let mut graph = DiGraph::with_capacity(targets.len(), 0);
        let mut nodes = HashMap::with_capacity(targets.len());
        let mut names = Vec::with_capacity(targets.len());

        for (idx, target) in targets.iter().enumerate() {
            let node = graph.add_node(idx);
            nodes.insert(target.name().to_string(), node);
            names.push(target.name().to_string());
        }

        for target in targets {
            let from = nodes[target.name()];
            for dep in target.dependencies() {
                if let Some(&to) = nodes.get(dep) {
                    if !graph.contains_edge(from, to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        TargetGraph {
            graph,
            names,
            nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Declaration index of a target.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.get(name).map(|&n| self.graph[n])
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    /// Direct dependencies of `idx`, in declaration order.
    pub fn deps(&self, idx: usize) -> Vec<usize> {
        self.sorted_neighbors(idx, Direction::Outgoing)
    }

    /// Targets depending directly on `idx`, in declaration order.
    pub fn dependents(&self, idx: usize) -> Vec<usize> {
        self.sorted_neighbors(idx, Direction::Incoming)
    }

    fn sorted_neighbors(&self, idx: usize, dir: Direction) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(idx), dir)
            .map(|n| self.graph[n])
            .collect();
        out.sort_unstable();
        out
    }

    /// Find a dependency cycle, returned as the names along the cycle with
    /// the first name repeated at the end (`A -> B -> A`).
    ///
    /// The search starts from targets in declaration order, so the same
    /// manifest always reports the same cycle.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        let mut marks = vec![Mark::New; self.len()];

        for start in 0..self.len() {
            if marks[start] != Mark::New {
                continue;
            }

            // Iterative DFS: (node, next neighbor position)
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            let mut path: Vec<usize> = vec![start];
            marks[start] = Mark::Active;

            while let Some(top) = stack.last_mut() {
                let node = top.0;
                let deps = self.deps(node);
                if top.1 < deps.len() {
                    let next = deps[top.1];
                    top.1 += 1;
                    match marks[next] {
                        Mark::New => {
                            marks[next] = Mark::Active;
                            stack.push((next, 0));
                            path.push(next);
                        }
                        Mark::Active => {
                            let from = path.iter().position(|&n| n == next).unwrap_or(0);
                            let mut cycle: Vec<String> =
                                path[from..].iter().map(|&n| self.names[n].clone()).collect();
                            cycle.push(self.names[next].clone());
                            return Some(cycle);
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                    stack.pop();
                    path.pop();
                }
            }
        }

        None
    }

    /// Topological order, dependencies first.
    ///
    /// Kahn's algorithm where the ready set is ordered by declaration index:
    /// whenever several targets are ready, the earliest declared goes first.
    /// Returns `None` if the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let mut remaining: Vec<usize> = (0..self.len()).map(|i| self.deps(i).len()).collect();
        let mut ready: BTreeSet<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, &n)| n == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some(idx) = ready.pop_first() {
            order.push(idx);
            for dependent in self.dependents(idx) {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        (order.len() == self.len()).then_some(order)
    }

    /// All targets `idx` depends on, directly or transitively, in
    /// declaration order.
    pub fn transitive_deps(&self, idx: usize) -> Vec<usize> {
        let mut visited = HashSet::new();
        let mut stack = self.deps(idx);

        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(self.deps(current));
            }
        }

        visited.remove(&idx);
        let mut out: Vec<usize> = visited.into_iter().collect();
        out.sort_unstable();
        out
    }

    /// Targets reachable from the given roots (roots included).
    pub fn reachable_from(&self, roots: impl IntoIterator<Item = usize>) -> HashSet<usize> {
        let mut visited = HashSet::new();
        let mut stack: Vec<usize> = roots.into_iter().collect();

        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(self.deps(current));
            }
        }

        visited
    }
}
