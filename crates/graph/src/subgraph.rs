//! Reusable "start from seeds, traverse under a predicate, collect
//! nodes and edges along visited paths" builder, shared by the
//! descendants/ancestors/connecting-subgraph constructors on every
//! layer.

use indexmap::IndexSet;

use crate::simple::{Direction, SimpleDirectedGraph};
use crate::GraphNode;

/// Collects nodes reachable from `seeds` in `direction`, honoring an
/// optional `stop` predicate that prevents expansion past a node
/// (the node itself is still included).
pub struct SubgraphBuilder<'g, T: GraphNode> {
    graph: &'g SimpleDirectedGraph<T>,
    seeds: Vec<T>,
    direction: Direction,
    stop: Option<Box<dyn Fn(&T) -> bool + 'g>>,
}

impl<'g, T: GraphNode> SubgraphBuilder<'g, T> {
    pub fn descendants_of(graph: &'g SimpleDirectedGraph<T>, seed: T) -> Self {
        Self {
            graph,
            seeds: vec![seed],
            direction: Direction::Forward,
            stop: None,
        }
    }

    pub fn ancestors_of(graph: &'g SimpleDirectedGraph<T>, seed: T) -> Self {
        Self {
            graph,
            seeds: vec![seed],
            direction: Direction::Backward,
            stop: None,
        }
    }

    pub fn with_stop(mut self, stop: impl Fn(&T) -> bool + 'g) -> Self {
        self.stop = Some(Box::new(stop));
        self
    }

    /// Reifies the traversal into a concrete, induced subgraph
    /// (including the seeds).
    pub fn build(self) -> SimpleDirectedGraph<T> {
        let stop_ref = self.stop.as_deref();
        let mut visited = self.graph.traverse(&self.seeds, self.direction, stop_ref);
        for seed in &self.seeds {
            visited.insert(seed.clone());
        }
        self.graph.induced_subgraph(&visited)
    }

    /// The visited node set without reifying edges, for callers that
    /// only need membership (e.g. `descendants`/`ancestors`).
    pub fn nodes(self) -> IndexSet<T> {
        let stop_ref = self.stop.as_deref();
        self.graph.traverse(&self.seeds, self.direction, stop_ref)
    }
}
