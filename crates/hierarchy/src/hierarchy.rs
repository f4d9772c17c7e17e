use tasknet_core::TaskId;
use tasknet_graph::{GraphError, ReducedDirectedAcyclicGraph, SimpleDirectedGraph};
use tracing::warn;

use crate::error::{translate_edge_error, translate_node_error, HierarchyError, Result};

/// Supertask/subtask containment graph: a reduced, acyclic DAG whose
/// nodes are task UIDs. Every kernel error raised while mutating the
/// underlying graph is retranslated into supertask/subtask vocabulary
/// so callers never need to know it is built on a generic graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyGraph {
    graph: ReducedDirectedAcyclicGraph<TaskId>,
}

impl HierarchyGraph {
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

    pub fn supertasks(&self, task: TaskId) -> Result<Vec<TaskId>> {
        self.graph.predecessors(&task).map_err(translate_node_error)
    }

    pub fn subtasks(&self, task: TaskId) -> Result<Vec<TaskId>> {
        self.graph.successors(&task).map_err(translate_node_error)
    }

    /// Hierarchy-ancestors (transitive supertasks), not including `task` itself.
    pub fn ancestors(&self, task: TaskId) -> Result<Vec<TaskId>> {
        Ok(self
            .graph
            .ancestors(&task, None)
            .map_err(translate_node_error)?
            .into_iter()
            .collect())
    }

    /// Hierarchy-descendants (transitive subtasks), not including `task` itself.
    pub fn descendants(&self, task: TaskId) -> Result<Vec<TaskId>> {
        Ok(self
            .graph
            .descendants(&task, None)
            .map_err(translate_node_error)?
            .into_iter()
            .collect())
    }

    /// Tasks with no subtasks.
    pub fn concrete_tasks(&self) -> Vec<TaskId> {
        self.graph.leaves()
    }

    pub fn is_concrete(&self, task: TaskId) -> Result<bool> {
        Ok(self.subtasks(task)?.is_empty())
    }

    pub fn has_hierarchy(&self, supertask: TaskId, subtask: TaskId) -> bool {
        self.graph.contains_edge(&supertask, &subtask)
    }

    pub fn edges(&self) -> Vec<(TaskId, TaskId)> {
        self.graph.edges()
    }

    /// Path connecting `from` to `to` through hierarchy edges, if one exists.
    pub fn connecting_subgraph(&self, from: TaskId, to: TaskId) -> Option<SimpleDirectedGraph<TaskId>> {
        self.graph
            .connecting_subgraph(&from, &to)
            .ok()
            .map(|r| r.as_dag().as_simple().clone())
    }

    /// Adds `supertask -> subtask`. Checks H6 (diamond-via-superior)
    /// before delegating the structural/cycle/redundancy checks
    /// (H1-H5) to the underlying reduced DAG, since H6 depends only on
    /// the graph's state *before* the candidate edge is considered and
    /// is cheaper to evaluate against the unmutated graph.
    pub fn add_hierarchy(&mut self, supertask: TaskId, subtask: TaskId) -> Result<()> {
        if let Some(err) = self.check_diamond_via_superior(supertask, subtask)? {
            return Err(err);
        }

        self.graph
            .add_edge(&supertask, &subtask)
            .map_err(translate_edge_error)
    }

    pub fn remove_hierarchy(&mut self, supertask: TaskId, subtask: TaskId) -> Result<()> {
        self.graph
            .remove_edge(&supertask, &subtask)
            .map_err(translate_edge_error)
    }

    /// H6: is there a strict hierarchy-ancestor `a` of `supertask` that
    /// is *already* a direct supertask of `subtask`? If so, the new
    /// edge would make `subtask` reachable from `a` by two independent
    /// routes (the existing `a -> subtask` edge, and the new
    /// `a ~> supertask -> subtask` path), a diamond the hierarchy
    /// graph disallows even though neither edge is individually
    /// redundant.
    fn check_diamond_via_superior(
        &self,
        supertask: TaskId,
        subtask: TaskId,
    ) -> Result<Option<HierarchyError>> {
        let ancestors_of_supertask = match self.graph.ancestors(&supertask, None) {
            Ok(a) => a,
            Err(GraphError::NodeDoesNotExist { node }) => {
                return Err(HierarchyError::TaskDoesNotExist { task: node })
            }
            Err(other) => unreachable!("ancestors() raised an edge-shaped error: {other:?}"),
        };
        let direct_supertasks_of_subtask = match self.graph.predecessors(&subtask) {
            Ok(p) => p,
            Err(GraphError::NodeDoesNotExist { node }) => {
                return Err(HierarchyError::TaskDoesNotExist { task: node })
            }
            Err(other) => unreachable!("predecessors() raised an edge-shaped error: {other:?}"),
        };

        for superior in direct_supertasks_of_subtask {
            if ancestors_of_supertask.contains(&superior) {
                warn!(
                    %supertask, %subtask, %superior,
                    "rejected hierarchy: superior already has subtask as a direct subtask"
                );
                let mut witness = SimpleDirectedGraph::new();
                for n in [superior, supertask, subtask] {
                    if !witness.contains_node(&n) {
                        witness.add_node(n).expect("fresh node");
                    }
                }
                if let Ok(path) = self.graph.connecting_subgraph(&superior, &supertask) {
                    for n in path.as_dag().as_simple().nodes().cloned().collect::<Vec<_>>() {
                        if !witness.contains_node(&n) {
                            witness.add_node(n).expect("fresh node");
                        }
                    }
                    for (s, t) in path.as_dag().as_simple().edges() {
                        if !witness.contains_edge(&s, &t) {
                            witness.add_edge(&s, &t).expect("both endpoints present");
                        }
                    }
                }
                witness
                    .add_edge(&superior, &subtask)
                    .expect("direct edge confirmed present above");
                return Ok(Some(HierarchyError::SubtaskIsAlreadySubtaskOfSuperiorTaskOfSupertask {
                    supertask,
                    subtask,
                    superior,
                    subgraph: witness,
                }));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(n: u64) -> TaskId {
        TaskId::new(n)
    }

    fn three_tasks() -> HierarchyGraph {
        let mut h = HierarchyGraph::new();
        for n in [0, 1, 2] {
            h.add_task(t(n)).unwrap();
        }
        h
    }

    #[test]
    fn add_remove_hierarchy_roundtrip() {
        let mut h = three_tasks();
        h.add_hierarchy(t(0), t(1)).unwrap();
        assert!(h.has_hierarchy(t(0), t(1)));
        h.remove_hierarchy(t(0), t(1)).unwrap();
        assert!(!h.has_hierarchy(t(0), t(1)));
    }

    #[test]
    fn rejects_redundant_path() {
        let mut h = three_tasks();
        h.add_hierarchy(t(0), t(1)).unwrap();
        h.add_hierarchy(t(1), t(2)).unwrap();
        let before = h.clone();
        let err = h.add_hierarchy(t(0), t(2)).unwrap_err();
        assert!(matches!(err, HierarchyError::HierarchyPathAlreadyExists { .. }));
        assert_eq!(h, before);
    }

    #[test]
    fn rejects_diamond_via_superior() {
        // 0 -> 1 (0 super of 1), 0 -> 2 (0 already has 2 as a direct
        // subtask). Adding 1 -> 2 would make 2 reachable from 0 via
        // both the existing 0->2 edge and the new 0~>1->2 path.
        let mut h = three_tasks();
        h.add_hierarchy(t(0), t(1)).unwrap();
        h.add_hierarchy(t(0), t(2)).unwrap();
        let before = h.clone();
        let err = h.add_hierarchy(t(1), t(2)).unwrap_err();
        assert!(matches!(
            err,
            HierarchyError::SubtaskIsAlreadySubtaskOfSuperiorTaskOfSupertask { superior, .. }
                if superior == t(0)
        ));
        assert_eq!(h, before);
    }

    #[test]
    fn unrelated_hierarchies_allowed() {
        let mut h = HierarchyGraph::new();
        for n in [0, 1, 2, 3] {
            h.add_task(t(n)).unwrap();
        }
        h.add_hierarchy(t(0), t(1)).unwrap();
        h.add_hierarchy(t(2), t(3)).unwrap();
        assert!(h.has_hierarchy(t(0), t(1)));
        assert!(h.has_hierarchy(t(2), t(3)));
    }

    #[test]
    fn concrete_tasks_are_leaves() {
        let mut h = three_tasks();
        h.add_hierarchy(t(0), t(1)).unwrap();
        let mut concrete = h.concrete_tasks();
        concrete.sort();
        assert_eq!(concrete, vec![t(1), t(2)]);
        assert!(!h.is_concrete(t(0)).unwrap());
        assert!(h.is_concrete(t(1)).unwrap());
    }

    #[test]
    fn remove_task_with_neighbours_rejected() {
        let mut h = three_tasks();
        h.add_hierarchy(t(0), t(1)).unwrap();
        assert!(matches!(
            h.remove_task(t(0)),
            Err(HierarchyError::TaskHasNeighbours { .. })
        ));
    }
}
