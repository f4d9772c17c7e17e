//! Error taxonomy for the hierarchy graph.
//!
//! Kernel errors are retranslated into supertask/subtask vocabulary so
//! a caller never has to know the hierarchy is implemented on top of a
//! generic reduced DAG. Witness subgraphs are carried verbatim from
//! the kernel layer that detected the violation.

use tasknet_core::TaskId;
use tasknet_graph::{GraphError, SimpleDirectedGraph};

pub type Result<T> = std::result::Result<T, HierarchyError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HierarchyError {
    #[error("task {task} already exists")]
    TaskAlreadyExists { task: TaskId },

    #[error("task {task} does not exist")]
    TaskDoesNotExist { task: TaskId },

    #[error("task {task} still has {} supertask(s) and {} subtask(s) and cannot be removed", supertasks.len(), subtasks.len())]
    TaskHasNeighbours {
        task: TaskId,
        supertasks: Vec<TaskId>,
        subtasks: Vec<TaskId>,
    },

    #[error("a task cannot be its own supertask or subtask: {task}")]
    HierarchyLoop { task: TaskId },

    #[error("{subtask} is already a subtask of {supertask}")]
    HierarchyAlreadyExists { supertask: TaskId, subtask: TaskId },

    #[error("{subtask} is already a supertask of {supertask}")]
    InverseHierarchyAlreadyExists { supertask: TaskId, subtask: TaskId },

    #[error("{subtask} is not a subtask of {supertask}")]
    HierarchyDoesNotExist { supertask: TaskId, subtask: TaskId },

    #[error("making {subtask} a subtask of {supertask} would introduce a hierarchy cycle")]
    HierarchyIntroducesCycle {
        supertask: TaskId,
        subtask: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    #[error("{supertask} already reaches {subtask} through an existing hierarchy path")]
    HierarchyPathAlreadyExists {
        supertask: TaskId,
        subtask: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    /// H6: `superior` already reaches `subtask` by a route that does not
    /// pass through `supertask`. Adding `supertask -> subtask` would
    /// make `subtask` reachable from `superior` by two independent
    /// routes, a diamond the hierarchy graph disallows even though
    /// neither individual edge is itself redundant.
    #[error(
        "{superior} already has {subtask} as a subtask through a route other than {supertask}"
    )]
    SubtaskIsAlreadySubtaskOfSuperiorTaskOfSupertask {
        supertask: TaskId,
        subtask: TaskId,
        superior: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },
}

pub(crate) fn translate_node_error(err: GraphError<TaskId>) -> HierarchyError {
    match err {
        GraphError::NodeAlreadyExists { node } => HierarchyError::TaskAlreadyExists { task: node },
        GraphError::NodeDoesNotExist { node } => HierarchyError::TaskDoesNotExist { task: node },
        GraphError::HasNeighbours {
            node,
            successors,
            predecessors,
        } => HierarchyError::TaskHasNeighbours {
            task: node,
            supertasks: predecessors,
            subtasks: successors,
        },
        other => unreachable!("node operation raised an edge-shaped kernel error: {other:?}"),
    }
}

pub(crate) fn translate_edge_error(err: GraphError<TaskId>) -> HierarchyError {
    match err {
        GraphError::NodeDoesNotExist { node } => HierarchyError::TaskDoesNotExist { task: node },
        GraphError::Loop { node } => HierarchyError::HierarchyLoop { task: node },
        GraphError::EdgeAlreadyExists { source, target } => HierarchyError::HierarchyAlreadyExists {
            supertask: source,
            subtask: target,
        },
        GraphError::InverseEdgeAlreadyExists { source, target } => {
            HierarchyError::InverseHierarchyAlreadyExists {
                supertask: source,
                subtask: target,
            }
        }
        GraphError::EdgeDoesNotExist { source, target } => HierarchyError::HierarchyDoesNotExist {
            supertask: source,
            subtask: target,
        },
        GraphError::IntroducesCycle {
            source,
            target,
            subgraph,
        } => HierarchyError::HierarchyIntroducesCycle {
            supertask: source,
            subtask: target,
            subgraph,
        },
        GraphError::IntroducesRedundantEdge {
            source,
            target,
            subgraph,
        } => HierarchyError::HierarchyPathAlreadyExists {
            supertask: source,
            subtask: target,
            subgraph,
        },
        other => unreachable!("edge operation raised a node-shaped kernel error: {other:?}"),
    }
}
