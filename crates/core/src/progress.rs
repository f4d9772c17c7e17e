use serde::{Deserialize, Serialize};

/// Explicit or derived progress of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    NotStarted,
    InProgress,
    Completed,
}

impl Progress {
    pub const fn is_started(self) -> bool {
        matches!(self, Progress::InProgress | Progress::Completed)
    }

    pub const fn is_incomplete(self) -> bool {
        matches!(self, Progress::NotStarted | Progress::InProgress)
    }

    pub const fn is_completed(self) -> bool {
        matches!(self, Progress::Completed)
    }
}

/// Rolls up the derived progress of a non-concrete task from its
/// direct subtasks' progress values.
///
/// `IN_PROGRESS` if any subtask is `IN_PROGRESS`, or if subtasks have
/// a mix of `NOT_STARTED` and `COMPLETED`; `NOT_STARTED` if all
/// subtasks are `NOT_STARTED`; `COMPLETED` if all are `COMPLETED`.
/// Returns `None` for a task with no subtasks — callers must treat a
/// concrete task's progress as explicit, never derived.
pub fn roll_up(subtask_progress: impl IntoIterator<Item = Progress>) -> Option<Progress> {
    let mut any_in_progress = false;
    let mut any_not_started = false;
    let mut any_completed = false;
    let mut count = 0;

    for p in subtask_progress {
        count += 1;
        match p {
            Progress::InProgress => any_in_progress = true,
            Progress::NotStarted => any_not_started = true,
            Progress::Completed => any_completed = true,
        }
    }

    if count == 0 {
        return None;
    }
    if any_in_progress || (any_not_started && any_completed) {
        Some(Progress::InProgress)
    } else if any_not_started {
        Some(Progress::NotStarted)
    } else {
        debug_assert!(any_completed);
        Some(Progress::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollup_all_not_started() {
        assert_eq!(
            roll_up([Progress::NotStarted, Progress::NotStarted]),
            Some(Progress::NotStarted)
        );
    }

    #[test]
    fn rollup_all_completed() {
        assert_eq!(
            roll_up([Progress::Completed, Progress::Completed]),
            Some(Progress::Completed)
        );
    }

    #[test]
    fn rollup_mixed_not_started_and_completed_is_in_progress() {
        assert_eq!(
            roll_up([Progress::NotStarted, Progress::Completed]),
            Some(Progress::InProgress)
        );
    }

    #[test]
    fn rollup_any_in_progress_wins() {
        assert_eq!(
            roll_up([Progress::Completed, Progress::InProgress, Progress::NotStarted]),
            Some(Progress::InProgress)
        );
    }

    #[test]
    fn rollup_empty_is_none() {
        assert_eq!(roll_up(std::iter::empty()), None);
    }
}
