//! Error taxonomy for the network graph: cross-graph invariant
//! violations, plus hierarchy/dependency errors propagated unchanged
//! from the layer that raised them.

use tasknet_core::TaskId;
use tasknet_dependency::DependencyError;
use tasknet_graph::SimpleDirectedGraph;
use tasknet_hierarchy::HierarchyError;

pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("task {task} already exists")]
    TaskAlreadyExists { task: TaskId },

    #[error("task {task} does not exist")]
    TaskDoesNotExist { task: TaskId },

    #[error("task {task} still has neighbours and cannot be removed")]
    HasNeighbours {
        task: TaskId,
        supertasks: Vec<TaskId>,
        subtasks: Vec<TaskId>,
        dependee_tasks: Vec<TaskId>,
        dependent_tasks: Vec<TaskId>,
    },

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error("{supertask} and {subtask} are already linked by a dependency path")]
    DependencyPathAlreadyExistsBetweenHierarchyEndpoints {
        supertask: TaskId,
        subtask: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    #[error("adding hierarchy {supertask} -> {subtask} would introduce a stream cycle")]
    HierarchyIntroducesStreamCycle {
        supertask: TaskId,
        subtask: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    #[error("a hierarchy path already exists from dependee {dependee} to dependent {dependent}")]
    HierarchyPathAlreadyExistsFromDependeeToDependent {
        dependee: TaskId,
        dependent: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    #[error("a hierarchy path already exists from dependent {dependent} to dependee {dependee}")]
    HierarchyPathAlreadyExistsFromDependentToDependee {
        dependee: TaskId,
        dependent: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    #[error("making {dependent} depend on {dependee} would introduce a stream cycle")]
    DependencyIntroducesStreamCycle {
        dependee: TaskId,
        dependent: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    #[error("an inferior task of {dependent} is already stream-upstream of {dependee}")]
    StreamPathFromInferiorTaskOfDependentTaskToDependeeTaskExists {
        dependee: TaskId,
        dependent: TaskId,
        inferior: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    #[error("{dependent} is already stream-upstream of an inferior task of {dependee}")]
    StreamPathFromDependentTaskToInferiorTaskOfDependeeTaskExists {
        dependee: TaskId,
        dependent: TaskId,
        inferior: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },

    #[error("{dependee} and {dependent} already share hierarchy ancestor {common_ancestor}, making this dependency redundant")]
    DependencyIntroducesHierarchyClash {
        dependee: TaskId,
        dependent: TaskId,
        common_ancestor: TaskId,
        subgraph: SimpleDirectedGraph<TaskId>,
    },
}
