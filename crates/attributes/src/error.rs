use tasknet_core::TaskId;

pub type Result<T> = std::result::Result<T, AttributesError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AttributesError {
    #[error("task {task} already exists in the attributes register")]
    TaskAlreadyExists { task: TaskId },

    #[error("task {task} does not exist in the attributes register")]
    TaskDoesNotExist { task: TaskId },
}
