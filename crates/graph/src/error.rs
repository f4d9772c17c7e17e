//! Error taxonomy for the graph kernel layer.
//!
//! One enum covers all three kernel layers (simple, acyclic, reduced);
//! each add_edge validator only ever raises the subset relevant to its
//! own layer. Errors that demonstrate a structural violation carry a
//! minimal witness subgraph of the same node type as the graph that
//! raised them, pruned to only the nodes/edges needed to show the
//! violation.

use crate::simple::SimpleDirectedGraph;
use crate::GraphNode;

/// Result type alias for graph kernel operations.
pub type Result<T, N> = std::result::Result<T, GraphError<N>>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError<T: GraphNode> {
    #[error("node {node:?} already exists")]
    NodeAlreadyExists { node: T },

    #[error("node {node:?} does not exist")]
    NodeDoesNotExist { node: T },

    #[error("edge {source:?} -> {target:?} already exists")]
    EdgeAlreadyExists { source: T, target: T },

    #[error("edge {source:?} -> {target:?} does not exist")]
    EdgeDoesNotExist { source: T, target: T },

    #[error("inverse edge {target:?} -> {source:?} already exists")]
    InverseEdgeAlreadyExists { source: T, target: T },

    #[error("self-loop on node {node:?} is not allowed")]
    Loop { node: T },

    /// Node removal attempted while adjacent edges still exist.
    #[error("node {node:?} has {} adjacent edge(s) and cannot be removed", successors.len() + predecessors.len())]
    HasNeighbours {
        node: T,
        successors: Vec<T>,
        predecessors: Vec<T>,
    },

    #[error("edge {source:?} -> {target:?} would introduce a cycle")]
    IntroducesCycle {
        source: T,
        target: T,
        subgraph: SimpleDirectedGraph<T>,
    },

    #[error("edge {source:?} -> {target:?} would be redundant or would render an existing edge redundant")]
    IntroducesRedundantEdge {
        source: T,
        target: T,
        subgraph: SimpleDirectedGraph<T>,
    },

    #[error("no path connects {from:?} to any of the requested targets")]
    NoConnectingSubgraph { from: T, to: Vec<T> },

    #[error("underlying data contains a self-loop on {node:?}")]
    UnderlyingDataHasLoops { node: T },

    #[error("underlying data contains a cycle")]
    UnderlyingDataHasCycle { subgraph: SimpleDirectedGraph<T> },

    #[error("underlying data contains a redundant edge {source:?} -> {target:?}")]
    UnderlyingDataHasRedundantEdges { source: T, target: T },
}
