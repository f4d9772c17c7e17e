//! Error taxonomy for the dependency graph: kernel errors retranslated
//! into dependee/dependent vocabulary.

use tasknet_core::TaskId;
use tasknet_graph::{GraphError, SimpleDirectedGraph};

pub type Result<T> = std::result::Result<T, DependencyError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DependencyError {
    #[error("task {task} already exists")]
    TaskAlreadyExists { task: TaskId },

    #[error("task {task} does not exist")]
    TaskDoesNotExist { task: TaskId },

    #[error("task {task} still has {} dependee(s) and {} dependent(s) and cannot be removed", dependees.len(), dependents.len())]
    TaskHasNeighbours {
        task: TaskId,
        dependees: Vec<TaskId>,
        dependents: Vec<TaskId>,
    },

    #[error("a task cannot depend on itself: {task}")]
    DependencyLoop { task: TaskId },

    #[error("{dependent} already depends on {dependee}")]
    DependencyAlreadyExists { dependee: TaskId, dependent: TaskId },

    #[error("{dependee} already depends on {dependent}")]
    InverseDependencyAlreadyExists { dependee: TaskId, dependent: TaskId },

    #[error("{dependee} does not have {dependent} as a dependent")]
    DependencyDoesNotExist { dependee: TaskId, dependent: TaskId },

    #[error("making {dependent} depend on {dependee} would introduce a dependency cycle")]
    DependencyIntroducesCycle {
        dependee: TaskId,
        dependent: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },
}

pub(crate) fn translate_node_error(err: GraphError<TaskId>) -> DependencyError {
    match err {
        GraphError::NodeAlreadyExists { node } => DependencyError::TaskAlreadyExists { task: node },
        GraphError::NodeDoesNotExist { node } => DependencyError::TaskDoesNotExist { task: node },
        GraphError::HasNeighbours {
            node,
            successors,
            predecessors,
        } => DependencyError::TaskHasNeighbours {
            task: node,
            dependees: predecessors,
            dependents: successors,
        },
        other => unreachable!("node operation raised an edge-shaped kernel error: {other:?}"),
    }
}

pub(crate) fn translate_edge_error(err: GraphError<TaskId>) -> DependencyError {
    match err {
        GraphError::NodeDoesNotExist { node } => DependencyError::TaskDoesNotExist { task: node },
        GraphError::Loop { node } => DependencyError::DependencyLoop { task: node },
        GraphError::EdgeAlreadyExists { source, target } => DependencyError::DependencyAlreadyExists {
            dependee: source,
            dependent: target,
        },
        GraphError::InverseEdgeAlreadyExists { source, target } => {
            DependencyError::InverseDependencyAlreadyExists {
                dependee: source,
                dependent: target,
            }
        }
        GraphError::EdgeDoesNotExist { source, target } => DependencyError::DependencyDoesNotExist {
            dependee: source,
            dependent: target,
        },
        GraphError::IntroducesCycle {
            source,
            target,
            subgraph,
        } => DependencyError::DependencyIntroducesCycle {
            dependee: source,
            dependent: target,
            subgraph,
        },
        other => unreachable!("edge operation raised an unexpected kernel error for an unreduced DAG: {other:?}"),
    }
}
