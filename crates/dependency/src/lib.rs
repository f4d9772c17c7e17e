//! Dependee/dependent ordering graph: an acyclic DAG over task UIDs
//! with dependency-specific error retranslation.

mod dependency;
mod error;

pub use dependency::DependencyGraph;
pub use error::{DependencyError, Result};
