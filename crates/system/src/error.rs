//! Error taxonomy for the task system: the network/attributes errors
//! it delegates to, plus the progress-transition and importance-chain
//! checks it owns outright.

use tasknet_attributes::AttributesError;
use tasknet_core::{Progress, TaskId};
use tasknet_network::NetworkError;

pub type Result<T> = std::result::Result<T, TaskSystemError>;

/// A task named in a progress-transition witness, together with the
/// derived progress that made it block the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WitnessTask {
    pub task: TaskId,
    pub progress: Progress,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskSystemError {
    #[error("task {task} does not exist")]
    TaskDoesNotExist { task: TaskId },

    #[error("task {task} already exists")]
    TaskAlreadyExists { task: TaskId },

    #[error("task {task} has subtasks and cannot take an explicit progress")]
    NotConcreteTask { task: TaskId },

    #[error("{task} cannot move out of COMPLETED while a dependent task has already started")]
    StartedDependentTasks { task: TaskId, witness: Vec<WitnessTask> },

    #[error("{task} cannot move out of COMPLETED while a dependent of a hierarchy-ancestor has already started")]
    StartedDependentTasksOfSuperiorTasks { task: TaskId, witness: Vec<WitnessTask> },

    #[error("{task} cannot start while a dependee task is incomplete")]
    IncompleteDependeeTasks { task: TaskId, witness: Vec<WitnessTask> },

    #[error("{task} cannot start while a dependee of a hierarchy-ancestor is incomplete")]
    IncompleteDependeeTasksOfSuperiorTasks { task: TaskId, witness: Vec<WitnessTask> },

    #[error("{task}'s supertask {supertask} already has an explicit importance")]
    SupertaskHasImportance { task: TaskId, supertask: TaskId },

    #[error("{task}'s subtask {subtask} already has an explicit importance")]
    SubtaskHasImportance { task: TaskId, subtask: TaskId },

    #[error("{task}'s hierarchy ancestor {ancestor} already has an explicit importance")]
    SuperiorTaskHasImportance { task: TaskId, ancestor: TaskId },

    #[error("{task}'s hierarchy descendant {descendant} already has an explicit importance")]
    InferiorTaskHasImportance { task: TaskId, descendant: TaskId },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Attributes(#[from] AttributesError),
}
