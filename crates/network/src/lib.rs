//! Composition of the hierarchy and dependency graphs over a shared
//! task set, enforcing the cross-graph invariants neither graph can
//! check on its own.

mod error;
mod network;

pub use error::{NetworkError, Result};
pub use network::NetworkGraph;
