//! Bound shared by every node type the graph kernel can hold.

use std::fmt::Debug;
use std::hash::Hash;

/// Nodes must be cheap to clone, hashable, and orderable for stable
/// iteration (`IndexMap` preserves insertion order; `Ord` additionally
/// lets callers get deterministic witness subgraphs for tests).
pub trait GraphNode: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> GraphNode for T {}
