use serde::{Deserialize, Serialize};
use std::fmt;

/// A task identifier: a non-negative integer, unique and immutable
/// per task, never reused even after the task is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<TaskId> for u64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

/// Monotonic, never-reusing allocator for [`TaskId`]s.
///
/// Ownership of *storage* for the counter lives with whatever
/// persists the rest of a task's state; this type is the in-process
/// default used when no external collaborator supplies one. It
/// exposes a "next / mark-used" pair: `peek_next` never advances the
/// counter on its own, so a failed `create_task` call never burns a
/// UID.
#[derive(Debug, Clone, Default)]
pub struct TaskIdAllocator {
    next: u64,
}

impl TaskIdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Resumes allocation after `highest_issued`, e.g. when restoring
    /// from persisted state.
    pub fn resume_after(highest_issued: Option<TaskId>) -> Self {
        Self {
            next: highest_issued.map(|id| id.value() + 1).unwrap_or(0),
        }
    }

    pub fn peek_next(&self) -> TaskId {
        TaskId(self.next)
    }

    /// Signals that `peek_next()`'s value has been consumed;
    /// advances the counter. Must only be called after the
    /// corresponding task was successfully inserted.
    pub fn mark_used(&mut self) {
        self.next += 1;
    }

    pub fn next_unused(&self) -> TaskId {
        self.peek_next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_never_reuses_on_failure() {
        let mut alloc = TaskIdAllocator::new();
        let first = alloc.peek_next();
        // Simulate a failed insertion: no mark_used call.
        assert_eq!(alloc.peek_next(), first);
        alloc.mark_used();
        assert_ne!(alloc.peek_next(), first);
    }

    #[test]
    fn resume_after_continues_monotonically() {
        let alloc = TaskIdAllocator::resume_after(Some(TaskId::new(41)));
        assert_eq!(alloc.peek_next(), TaskId::new(42));
        let fresh = TaskIdAllocator::resume_after(None);
        assert_eq!(fresh.peek_next(), TaskId::new(0));
    }
}
