use tasknet_core::TaskId;
use tasknet_graph::DirectedAcyclicGraph;

use crate::error::{translate_edge_error, translate_node_error, Result};

/// Dependee/dependent ordering graph: an acyclic DAG whose nodes are
/// task UIDs. Unlike the hierarchy graph, multiple paths between two
/// tasks are permitted — only cycles are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    graph: DirectedAcyclicGraph<TaskId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task(&mut self, task: TaskId) -> Result<()> {
        self.graph.add_node(task).map_err(translate_node_error)
    }

    pub fn remove_task(&mut self, task: TaskId) -> Result<()> {
        self.graph.remove_node(&task).map_err(translate_node_error)
    }

    pub fn contains_task(&self, task: TaskId) -> bool {
        self.graph.contains_node(&task)
    }

    /// Tasks `task` depends on (must be COMPLETED before `task` starts).
    pub fn dependee_tasks(&self, task: TaskId) -> Result<Vec<TaskId>> {
        self.graph.predecessors(&task).map_err(translate_node_error)
    }

    /// Tasks that depend on `task`.
    pub fn dependent_tasks(&self, task: TaskId) -> Result<Vec<TaskId>> {
        self.graph.successors(&task).map_err(translate_node_error)
    }

    pub fn dependencies(&self) -> Vec<(TaskId, TaskId)> {
        self.graph.edges()
    }

    pub fn has_dependency(&self, dependee: TaskId, dependent: TaskId) -> bool {
        self.graph.contains_edge(&dependee, &dependent)
    }

    pub fn add_dependency(&mut self, dependee: TaskId, dependent: TaskId) -> Result<()> {
        self.graph
            .add_edge(&dependee, &dependent)
            .map_err(translate_edge_error)
    }

    pub fn remove_dependency(&mut self, dependee: TaskId, dependent: TaskId) -> Result<()> {
        self.graph
            .remove_edge(&dependee, &dependent)
            .map_err(translate_edge_error)
    }
}
