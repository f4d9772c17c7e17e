//! `DirectedAcyclicGraph`: a `SimpleDirectedGraph` whose `add_edge`
//! additionally rejects edges that would introduce a cycle.

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::error::GraphError;
use crate::simple::SimpleDirectedGraph;
use crate::GraphNode;

type R<T, N> = Result<T, GraphError<N>>;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectedAcyclicGraph<T: GraphNode> {
    pub(crate) inner: SimpleDirectedGraph<T>,
}

impl<T: GraphNode> Default for DirectedAcyclicGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GraphNode> DirectedAcyclicGraph<T> {
    pub fn new() -> Self {
        Self {
            inner: SimpleDirectedGraph::new(),
        }
    }

    /// Validates that `data` is acyclic before accepting it.
    pub fn try_from_simple(data: SimpleDirectedGraph<T>) -> R<Self, T> {
        if data.has_cycle() {
            return Err(GraphError::UnderlyingDataHasCycle {
                subgraph: data,
            });
        }
        Ok(Self { inner: data })
    }

    /// Crate-internal constructor for data already known to be
    /// acyclic (e.g. a subgraph view reified from an acyclic source).
    pub(crate) fn from_validated(data: SimpleDirectedGraph<T>) -> Self {
        debug_assert!(!data.has_cycle());
        Self { inner: data }
    }

    pub fn as_simple(&self) -> &SimpleDirectedGraph<T> {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains_node(&self, node: &T) -> bool {
        self.inner.contains_node(node)
    }

    pub fn contains_edge(&self, source: &T, target: &T) -> bool {
        self.inner.contains_edge(source, target)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.inner.nodes()
    }

    pub fn edges(&self) -> Vec<(T, T)> {
        self.inner.edges()
    }

    pub fn add_node(&mut self, node: T) -> R<(), T> {
        self.inner.add_node(node)
    }

    pub fn remove_node(&mut self, node: &T) -> R<(), T> {
        self.inner.remove_node(node)
    }

    pub fn successors(&self, node: &T) -> R<Vec<T>, T> {
        self.inner.successors(node)
    }

    pub fn predecessors(&self, node: &T) -> R<Vec<T>, T> {
        self.inner.predecessors(node)
    }

    pub fn roots(&self) -> Vec<T> {
        self.inner.roots()
    }

    pub fn leaves(&self) -> Vec<T> {
        self.inner.leaves()
    }

    pub fn isolated(&self) -> Vec<T> {
        self.inner.isolated()
    }

    pub fn descendants(&self, node: &T, stop: Option<&dyn Fn(&T) -> bool>) -> R<IndexSet<T>, T> {
        self.inner.descendants(node, stop)
    }

    pub fn ancestors(&self, node: &T, stop: Option<&dyn Fn(&T) -> bool>) -> R<IndexSet<T>, T> {
        self.inner.ancestors(node, stop)
    }

    pub fn descendants_subgraph(&self, node: &T) -> R<Self, T> {
        Ok(Self::from_validated(self.inner.descendants_subgraph(node)?))
    }

    pub fn ancestors_subgraph(&self, node: &T) -> R<Self, T> {
        Ok(Self::from_validated(self.inner.ancestors_subgraph(node)?))
    }

    pub fn connecting_subgraph(&self, from: &T, to: &T) -> R<Self, T> {
        Ok(Self::from_validated(
            self.inner.connecting_subgraph(from, to)?,
        ))
    }

    /// Adds `source -> target`, rejecting it if doing so would
    /// introduce a cycle. On rejection, the witness is the minimal
    /// subgraph: the existing path `target ~> source` plus the
    /// candidate edge.
    pub fn add_edge(&mut self, source: &T, target: &T) -> R<(), T> {
        // Structural checks (loop/duplicate/inverse/missing-node) happen on
        // a scratch copy first so a rejected cycle never mutates self.
        let mut candidate = self.inner.clone();
        candidate.add_edge(source, target)?;

        if candidate.has_cycle() {
            let mut witness = self
                .inner
                .connecting_subgraph(target, source)
                .unwrap_or_else(|_| SimpleDirectedGraph::new());
            if !witness.contains_node(source) {
                let _ = witness.add_node(source.clone());
            }
            if !witness.contains_node(target) {
                let _ = witness.add_node(target.clone());
            }
            let _ = witness.add_edge(source, target);
            warn!(?source, ?target, "rejected edge: introduces cycle");
            return Err(GraphError::IntroducesCycle {
                source: source.clone(),
                target: target.clone(),
                subgraph: witness,
            });
        }

        self.inner = candidate;
        debug!(?source, ?target, "added acyclic edge");
        Ok(())
    }

    pub fn remove_edge(&mut self, source: &T, target: &T) -> R<(), T> {
        self.inner.remove_edge(source, target)
    }

    pub fn has_cycle(&self) -> bool {
        self.inner.has_cycle()
    }

    /// `true` if some edge `s -> t` is implied by a longer existing
    /// path `s ~> ... ~> t`.
    pub fn has_redundant_edges(&self) -> bool {
        self.first_redundant_edge().is_some()
    }

    /// The first edge `s -> t` found that is implied by a longer
    /// existing path `s ~> ... ~> t`, if any.
    pub fn first_redundant_edge(&self) -> Option<(T, T)> {
        for (s, t) in self.inner.edges() {
            let mut without_direct = self.inner.clone();
            let _ = without_direct.remove_edge(&s, &t);
            if without_direct
                .descendants(&s, None)
                .map(|d| d.contains(&t))
                .unwrap_or(false)
            {
                return Some((s, t));
            }
        }
        None
    }

    /// Groups nodes such that every successor sits in a strictly
    /// later group, and every node is in the lowest group possible
    /// (its longest path from any root, plus one).
    pub fn topological_sort_with_grouping(&self) -> Vec<Vec<T>> {
        let order = petgraph::algo::toposort(&self.inner.to_petgraph(), None)
            .expect("DirectedAcyclicGraph invariant guarantees acyclicity");
        let pg = self.inner.to_petgraph();

        let mut level: std::collections::HashMap<petgraph::graph::NodeIndex, usize> =
            std::collections::HashMap::new();
        for idx in &order {
            let preds_max = pg
                .neighbors_directed(*idx, petgraph::Direction::Incoming)
                .map(|p| level[&p])
                .max();
            level.insert(*idx, preds_max.map(|m| m + 1).unwrap_or(0));
        }

        let max_level = level.values().copied().max().unwrap_or(0);
        let mut groups: Vec<Vec<T>> = vec![Vec::new(); max_level + 1];
        for idx in &order {
            groups[level[idx]].push(pg[*idx].clone());
        }
        groups
    }
}
