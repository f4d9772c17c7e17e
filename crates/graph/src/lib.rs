//! Layered directed-graph kernel.
//!
//! Three layers, each adding invariants on top of the last:
//!
//! - [`SimpleDirectedGraph`]: bidirectional adjacency, no self-loops,
//!   no parallel edges.
//! - [`DirectedAcyclicGraph`]: additionally rejects edges that would
//!   introduce a cycle.
//! - [`ReducedDirectedAcyclicGraph`]: additionally rejects edges that
//!   are themselves redundant or that would render another edge
//!   redundant.
//!
//! All three are generic over any node type satisfying [`GraphNode`].

mod dag;
mod error;
mod node;
mod reduced;
mod simple;
mod subgraph;

pub use dag::DirectedAcyclicGraph;
pub use error::{GraphError, Result};
pub use node::GraphNode;
pub use reduced::ReducedDirectedAcyclicGraph;
pub use simple::SimpleDirectedGraph;
pub use subgraph::SubgraphBuilder;
