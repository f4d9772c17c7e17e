//! `ReducedDirectedAcyclicGraph`: a `DirectedAcyclicGraph` whose
//! `add_edge` additionally rejects edges that are themselves
//! redundant, or that would render an existing edge redundant.

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::dag::DirectedAcyclicGraph;
use crate::error::GraphError;
use crate::simple::SimpleDirectedGraph;
use crate::GraphNode;

type R<T, N> = Result<T, GraphError<N>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ReducedDirectedAcyclicGraph<T: GraphNode> {
    pub(crate) inner: DirectedAcyclicGraph<T>,
}

impl<T: GraphNode> Default for ReducedDirectedAcyclicGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GraphNode> ReducedDirectedAcyclicGraph<T> {
    pub fn new() -> Self {
        Self {
            inner: DirectedAcyclicGraph::new(),
        }
    }

    /// Validates that `data` is both acyclic and transitively reduced.
    pub fn try_from_simple(data: SimpleDirectedGraph<T>) -> R<Self, T> {
        let dag = DirectedAcyclicGraph::try_from_simple(data)?;
        if let Some((source, target)) = dag.first_redundant_edge() {
            return Err(GraphError::UnderlyingDataHasRedundantEdges { source, target });
        }
        Ok(Self { inner: dag })
    }

    pub(crate) fn from_validated(dag: DirectedAcyclicGraph<T>) -> Self {
        debug_assert!(!dag.has_redundant_edges());
        Self { inner: dag }
    }

    pub fn as_dag(&self) -> &DirectedAcyclicGraph<T> {
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

    pub fn remove_edge(&mut self, source: &T, target: &T) -> R<(), T> {
        self.inner.remove_edge(source, target)
    }

    pub fn has_cycle(&self) -> bool {
        self.inner.has_cycle()
    }

    /// Adds `source -> target`, rejecting it if it would be redundant
    /// in either direction the spec requires: the new edge might
    /// itself be implied by an existing `source ~> target` path, or it
    /// might render an *existing* edge redundant by opening an
    /// alternate route for it — an edge `x -> target` becomes
    /// redundant if `x` already reaches `source` (giving `x ~> source
    /// -> target`), and an edge `source -> b` becomes redundant if
    /// `target` already reaches `b` (giving `source -> target ~> b`).
    pub fn add_edge(&mut self, source: &T, target: &T) -> R<(), T> {
        // Structural checks shared with the acyclic layer first (loop,
        // duplicate, inverse, missing node), without committing yet.
        let mut candidate_simple = self.inner.as_simple().clone();
        candidate_simple.add_edge(source, target)?;

        if let Some(witness) = self.find_redundancy_witness(source, target)? {
            warn!(?source, ?target, "rejected edge: would be redundant");
            return Err(GraphError::IntroducesRedundantEdge {
                source: source.clone(),
                target: target.clone(),
                subgraph: witness,
            });
        }

        self.inner.add_edge(source, target)?;
        debug!(?source, ?target, "added reduced edge");
        Ok(())
    }

    fn find_redundancy_witness(&self, source: &T, target: &T) -> R<Option<SimpleDirectedGraph<T>>, T> {
        // Case 1: a path source ~> target already exists, so the new
        // edge would itself be redundant.
        if self.inner.descendants(source, None)?.contains(target) {
            return Ok(Some(self.inner.connecting_subgraph(source, target)?.inner));
        }

        // Case 2: an existing edge x -> target would become redundant,
        // because x (other than source) already reaches source —
        // adding source -> target opens the alternate route
        // x ~> source -> target.
        for x in self.inner.predecessors(target)? {
            if &x == source {
                continue;
            }
            if self.inner.descendants(&x, None)?.contains(source) {
                let mut witness = self.inner.connecting_subgraph(&x, source)?.inner;
                if !witness.contains_node(target) {
                    witness.add_node(target.clone()).expect("fresh node");
                }
                witness.add_edge(source, target).expect("candidate edge, both endpoints present");
                if !witness.contains_edge(&x, target) {
                    witness.add_edge(&x, target).expect("x -> target is a real edge");
                }
                return Ok(Some(witness));
            }
        }

        // Case 3: an existing edge source -> b would become redundant,
        // because target (other than b) already reaches b — adding
        // source -> target opens the alternate route source -> target ~> b.
        for b in self.inner.successors(source)? {
            if &b == target {
                continue;
            }
            if self.inner.descendants(target, None)?.contains(&b) {
                let mut witness = self.inner.connecting_subgraph(target, &b)?.inner;
                if !witness.contains_node(source) {
                    witness.add_node(source.clone()).expect("fresh node");
                }
                witness.add_edge(source, target).expect("candidate edge, both endpoints present");
                if !witness.contains_edge(source, &b) {
                    witness.add_edge(source, &b).expect("source -> b is a real edge");
                }
                return Ok(Some(witness));
            }
        }

        Ok(None)
    }
}
