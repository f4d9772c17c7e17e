//! `SimpleDirectedGraph`: adjacency with successors and predecessors
//! stored bidirectionally; forbids self-loops and parallel edges.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use tracing::{debug, warn};

use crate::error::GraphError;
use crate::GraphNode;

type R<T, N> = Result<T, GraphError<N>>;

/// Direction of a bounded traversal; used by `descendants`/`ancestors`
/// and their subgraph-view counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

/// A simple directed graph over nodes of type `T`: no self-loops, no
/// parallel edges, bidirectional adjacency for O(1) neighbour lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleDirectedGraph<T: GraphNode> {
    pub(crate) successors: IndexMap<T, IndexSet<T>>,
    pub(crate) predecessors: IndexMap<T, IndexSet<T>>,
}

impl<T: GraphNode> Default for SimpleDirectedGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GraphNode> SimpleDirectedGraph<T> {
    pub fn new() -> Self {
        Self {
            successors: IndexMap::new(),
            predecessors: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn contains_node(&self, node: &T) -> bool {
        self.successors.contains_key(node)
    }

    pub fn contains_edge(&self, source: &T, target: &T) -> bool {
        self.successors
            .get(source)
            .is_some_and(|s| s.contains(target))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.successors.keys()
    }

    pub fn edges(&self) -> Vec<(T, T)> {
        self.successors
            .iter()
            .flat_map(|(s, targets)| targets.iter().map(move |t| (s.clone(), t.clone())))
            .collect()
    }

    pub fn add_node(&mut self, node: T) -> R<(), T> {
        if self.contains_node(&node) {
            return Err(GraphError::NodeAlreadyExists { node });
        }
        self.successors.insert(node.clone(), IndexSet::new());
        self.predecessors.insert(node, IndexSet::new());
        Ok(())
    }

    pub fn remove_node(&mut self, node: &T) -> R<(), T> {
        if !self.contains_node(node) {
            return Err(GraphError::NodeDoesNotExist { node: node.clone() });
        }
        let successors: Vec<T> = self.successors[node].iter().cloned().collect();
        let predecessors: Vec<T> = self.predecessors[node].iter().cloned().collect();
        if !successors.is_empty() || !predecessors.is_empty() {
            return Err(GraphError::HasNeighbours {
                node: node.clone(),
                successors,
                predecessors,
            });
        }
        self.successors.shift_remove(node);
        self.predecessors.shift_remove(node);
        Ok(())
    }

    /// Validates the structural invariants (H1-H3 at the kernel level:
    /// no self-loop, no duplicate, no inverse) but performs no
    /// cycle/reduction checks — those belong to the `Acyclic` and
    /// `Reduced` layers built on top of this one.
    pub fn add_edge(&mut self, source: &T, target: &T) -> R<(), T> {
        if !self.contains_node(source) {
            return Err(GraphError::NodeDoesNotExist {
                node: source.clone(),
            });
        }
        if !self.contains_node(target) {
            return Err(GraphError::NodeDoesNotExist {
                node: target.clone(),
            });
        }
        if source == target {
            return Err(GraphError::Loop {
                node: source.clone(),
            });
        }
        if self.contains_edge(source, target) {
            return Err(GraphError::EdgeAlreadyExists {
                source: source.clone(),
                target: target.clone(),
            });
        }
        if self.contains_edge(target, source) {
            return Err(GraphError::InverseEdgeAlreadyExists {
                source: source.clone(),
                target: target.clone(),
            });
        }
        self.successors
            .get_mut(source)
            .expect("checked above")
            .insert(target.clone());
        self.predecessors
            .get_mut(target)
            .expect("checked above")
            .insert(source.clone());
        debug!(?source, ?target, "added edge");
        Ok(())
    }

    pub fn remove_edge(&mut self, source: &T, target: &T) -> R<(), T> {
        if !self.contains_edge(source, target) {
            warn!(?source, ?target, "attempted to remove non-existent edge");
            return Err(GraphError::EdgeDoesNotExist {
                source: source.clone(),
                target: target.clone(),
            });
        }
        self.successors.get_mut(source).unwrap().shift_remove(target);
        self.predecessors.get_mut(target).unwrap().shift_remove(source);
        Ok(())
    }

    pub fn successors(&self, node: &T) -> R<Vec<T>, T> {
        self.successors
            .get(node)
            .map(|s| s.iter().cloned().collect())
            .ok_or_else(|| GraphError::NodeDoesNotExist { node: node.clone() })
    }

    pub fn predecessors(&self, node: &T) -> R<Vec<T>, T> {
        self.predecessors
            .get(node)
            .map(|s| s.iter().cloned().collect())
            .ok_or_else(|| GraphError::NodeDoesNotExist { node: node.clone() })
    }

    pub fn roots(&self) -> Vec<T> {
        self.predecessors
            .iter()
            .filter(|(_, preds)| preds.is_empty())
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn leaves(&self) -> Vec<T> {
        self.successors
            .iter()
            .filter(|(_, succs)| succs.is_empty())
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn isolated(&self) -> Vec<T> {
        self.successors
            .iter()
            .filter(|entry| {
                let (n, succs): (&T, &IndexSet<T>) = *entry;
                succs.is_empty() && self.predecessors.get(n).is_some_and(IndexSet::is_empty)
            })
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Whether the graph, taken as-is, contains a directed cycle.
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.to_petgraph())
    }

    pub(crate) fn to_petgraph(&self) -> DiGraph<T, ()> {
        let mut g = DiGraph::new();
        let mut idx = IndexMap::new();
        for n in self.nodes() {
            idx.insert(n.clone(), g.add_node(n.clone()));
        }
        for (s, t) in self.edges() {
            g.add_edge(idx[&s], idx[&t], ());
        }
        g
    }

    /// BFS traversal in `direction` from `seeds`, not including the
    /// seeds themselves in the result. `stop` nodes are included but
    /// not expanded past.
    pub(crate) fn traverse(
        &self,
        seeds: &[T],
        direction: Direction,
        stop: Option<&dyn Fn(&T) -> bool>,
    ) -> IndexSet<T> {
        let mut visited: IndexSet<T> = IndexSet::new();
        let mut queue: VecDeque<T> = seeds.iter().cloned().collect();
        let seed_set: IndexSet<T> = seeds.iter().cloned().collect();

        while let Some(node) = queue.pop_front() {
            let neighbours = match direction {
                Direction::Forward => self.successors.get(&node),
                Direction::Backward => self.predecessors.get(&node),
            };
            let Some(neighbours) = neighbours else {
                continue;
            };
            let should_stop_here = stop.is_some_and(|f| f(&node));
            if should_stop_here && !seed_set.contains(&node) {
                continue;
            }
            for next in neighbours {
                if visited.contains(next) {
                    continue;
                }
                visited.insert(next.clone());
                queue.push_back(next.clone());
            }
        }
        visited
    }

    pub fn descendants(&self, node: &T, stop: Option<&dyn Fn(&T) -> bool>) -> R<IndexSet<T>, T> {
        if !self.contains_node(node) {
            return Err(GraphError::NodeDoesNotExist { node: node.clone() });
        }
        Ok(self.traverse(&[node.clone()], Direction::Forward, stop))
    }

    pub fn ancestors(&self, node: &T, stop: Option<&dyn Fn(&T) -> bool>) -> R<IndexSet<T>, T> {
        if !self.contains_node(node) {
            return Err(GraphError::NodeDoesNotExist { node: node.clone() });
        }
        Ok(self.traverse(&[node.clone()], Direction::Backward, stop))
    }

    /// Subgraph induced by `node` and everything reachable forward
    /// from it.
    pub fn descendants_subgraph(&self, node: &T) -> R<Self, T> {
        let mut nodes = self.descendants(node, None)?;
        nodes.insert(node.clone());
        Ok(self.induced_subgraph(&nodes))
    }

    /// Subgraph induced by `node` and everything that reaches it.
    pub fn ancestors_subgraph(&self, node: &T) -> R<Self, T> {
        let mut nodes = self.ancestors(node, None)?;
        nodes.insert(node.clone());
        Ok(self.induced_subgraph(&nodes))
    }

    /// Minimal subgraph containing only nodes/edges lying on at least
    /// one directed path from `from` to `to`.
    pub fn connecting_subgraph(&self, from: &T, to: &T) -> R<Self, T> {
        if !self.contains_node(from) {
            return Err(GraphError::NodeDoesNotExist { node: from.clone() });
        }
        if !self.contains_node(to) {
            return Err(GraphError::NodeDoesNotExist { node: to.clone() });
        }
        let mut forward = self.descendants(from, None)?;
        forward.insert(from.clone());
        if !forward.contains(to) {
            return Err(GraphError::NoConnectingSubgraph {
                from: from.clone(),
                to: vec![to.clone()],
            });
        }
        let mut backward = self.ancestors(to, None)?;
        backward.insert(to.clone());

        let on_path: IndexSet<T> = forward.intersection(&backward).cloned().collect();
        Ok(self.induced_subgraph(&on_path))
    }

    /// Node-induced subgraph: keeps only the given nodes and the
    /// edges of `self` that run strictly between them.
    pub(crate) fn induced_subgraph(&self, keep: &IndexSet<T>) -> Self {
        let mut out = Self::new();
        for n in keep {
            out.add_node(n.clone()).expect("fresh graph, no duplicates");
        }
        for (s, t) in self.edges() {
            if keep.contains(&s) && keep.contains(&t) {
                out.add_edge(&s, &t).expect("both endpoints present, no self-loop by construction");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g() -> SimpleDirectedGraph<u64> {
        SimpleDirectedGraph::new()
    }

    #[test]
    fn add_and_remove_node() {
        let mut graph = g();
        graph.add_node(1).unwrap();
        assert!(graph.contains_node(&1));
        assert_eq!(graph.add_node(1), Err(GraphError::NodeAlreadyExists { node: 1 }));
        graph.remove_node(&1).unwrap();
        assert!(!graph.contains_node(&1));
    }

    #[test]
    fn rejects_self_loop() {
        let mut graph = g();
        graph.add_node(1).unwrap();
        assert!(matches!(graph.add_edge(&1, &1), Err(GraphError::Loop { .. })));
    }

    #[test]
    fn rejects_duplicate_and_inverse_edges() {
        let mut graph = g();
        graph.add_node(1).unwrap();
        graph.add_node(2).unwrap();
        graph.add_edge(&1, &2).unwrap();
        assert!(matches!(
            graph.add_edge(&1, &2),
            Err(GraphError::EdgeAlreadyExists { .. })
        ));
        assert!(matches!(
            graph.add_edge(&2, &1),
            Err(GraphError::InverseEdgeAlreadyExists { .. })
        ));
    }

    #[test]
    fn remove_node_with_neighbours_fails() {
        let mut graph = g();
        graph.add_node(1).unwrap();
        graph.add_node(2).unwrap();
        graph.add_edge(&1, &2).unwrap();
        assert!(matches!(
            graph.remove_node(&1),
            Err(GraphError::HasNeighbours { .. })
        ));
    }

    #[test]
    fn connecting_subgraph_prunes_unrelated_nodes() {
        let mut graph = g();
        for n in [1, 2, 3, 4] {
            graph.add_node(n).unwrap();
        }
        graph.add_edge(&1, &2).unwrap();
        graph.add_edge(&2, &3).unwrap();
        graph.add_edge(&1, &4).unwrap(); // unrelated branch
        let sub = graph.connecting_subgraph(&1, &3).unwrap();
        let mut nodes: Vec<_> = sub.nodes().cloned().collect();
        nodes.sort();
        assert_eq!(nodes, vec![1, 2, 3]);
    }

    #[test]
    fn connecting_subgraph_unreachable_errs() {
        let mut graph = g();
        graph.add_node(1).unwrap();
        graph.add_node(2).unwrap();
        assert!(matches!(
            graph.connecting_subgraph(&1, &2),
            Err(GraphError::NoConnectingSubgraph { .. })
        ));
    }

    #[test]
    fn roots_leaves_isolated() {
        let mut graph = g();
        for n in [1, 2, 3] {
            graph.add_node(n).unwrap();
        }
        graph.add_edge(&1, &2).unwrap();
        assert_eq!(graph.roots(), vec![1, 3]);
        assert_eq!(graph.leaves(), vec![2, 3]);
        assert_eq!(graph.isolated(), vec![3]);
    }
}
