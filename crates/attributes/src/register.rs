use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tasknet_core::{Importance, Progress, TaskId};

use crate::attributes::Attributes;
use crate::error::{AttributesError, Result};

/// Mapping from task UID to [`Attributes`]. Performs no cross-task
/// validation — the network/task-system layers are responsible for
/// invariants that span multiple tasks (e.g. the importance-chain
/// rule) before delegating here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributesRegister {
    tasks: IndexMap<TaskId, Attributes>,
}

impl AttributesRegister {
    pub fn new() -> Self {
        Self {
            tasks: IndexMap::new(),
        }
    }

    pub fn view(&self) -> AttributesRegisterView<'_> {
        AttributesRegisterView { register: self }
    }

    pub fn add(&mut self, task: TaskId) -> Result<()> {
        if self.tasks.contains_key(&task) {
            return Err(AttributesError::TaskAlreadyExists { task });
        }
        self.tasks.insert(task, Attributes::default());
        debug!(%task, "added task to attributes register");
        Ok(())
    }

    pub fn remove(&mut self, task: TaskId) -> Result<Attributes> {
        self.tasks.shift_remove(&task).ok_or_else(|| {
            warn!(%task, "attempted to remove unknown task from attributes register");
            AttributesError::TaskDoesNotExist { task }
        })
    }

    pub fn get(&self, task: TaskId) -> Option<&Attributes> {
        self.tasks.get(&task)
    }

    pub fn contains(&self, task: TaskId) -> bool {
        self.tasks.contains_key(&task)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &Attributes)> {
        self.tasks.iter()
    }

    pub fn update_name(&mut self, task: TaskId, name: Option<String>) -> Result<()> {
        self.with_mut(task, |a| a.name = name)
    }

    pub fn update_description(&mut self, task: TaskId, description: Option<String>) -> Result<()> {
        self.with_mut(task, |a| a.description = description)
    }

    pub fn update_importance(&mut self, task: TaskId, importance: Option<Importance>) -> Result<()> {
        self.with_mut(task, |a| a.importance = importance)
    }

    /// Progress is mutated by the task system, which gates it on
    /// concreteness and the dependency-derived completion checks; the
    /// register just needs a primitive to store the value once the
    /// caller above has cleared it to write.
    pub fn update_progress(&mut self, task: TaskId, progress: Option<Progress>) -> Result<()> {
        self.with_mut(task, |a| a.progress = progress)
    }

    fn with_mut(&mut self, task: TaskId, f: impl FnOnce(&mut Attributes)) -> Result<()> {
        let attrs = self
            .tasks
            .get_mut(&task)
            .ok_or(AttributesError::TaskDoesNotExist { task })?;
        f(attrs);
        Ok(())
    }
}

/// Read-only view over an [`AttributesRegister`]: iteration,
/// membership, and length only.
#[derive(Debug, Clone, Copy)]
pub struct AttributesRegisterView<'a> {
    register: &'a AttributesRegister,
}

impl<'a> AttributesRegisterView<'a> {
    pub fn get(&self, task: TaskId) -> Option<&'a Attributes> {
        self.register.get(task)
    }

    pub fn contains(&self, task: TaskId) -> bool {
        self.register.contains(task)
    }

    pub fn len(&self) -> usize {
        self.register.len()
    }

    pub fn is_empty(&self) -> bool {
        self.register.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a TaskId, &'a Attributes)> {
        self.register.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_roundtrip_is_identity() {
        let mut reg = AttributesRegister::new();
        reg.add(TaskId::new(1)).unwrap();
        assert!(reg.contains(TaskId::new(1)));
        reg.remove(TaskId::new(1)).unwrap();
        assert_eq!(reg, AttributesRegister::new());
    }

    #[test]
    fn duplicate_add_rejected() {
        let mut reg = AttributesRegister::new();
        reg.add(TaskId::new(1)).unwrap();
        assert_eq!(
            reg.add(TaskId::new(1)),
            Err(AttributesError::TaskAlreadyExists { task: TaskId::new(1) })
        );
    }

    #[test]
    fn update_missing_task_rejected() {
        let mut reg = AttributesRegister::new();
        assert_eq!(
            reg.update_name(TaskId::new(1), Some("x".into())),
            Err(AttributesError::TaskDoesNotExist { task: TaskId::new(1) })
        );
    }

    #[test]
    fn updates_apply_independently() {
        let mut reg = AttributesRegister::new();
        reg.add(TaskId::new(1)).unwrap();
        reg.update_name(TaskId::new(1), Some("Ship it".into())).unwrap();
        reg.update_importance(TaskId::new(1), Some(Importance::High)).unwrap();
        let attrs = reg.get(TaskId::new(1)).unwrap();
        assert_eq!(attrs.name.as_deref(), Some("Ship it"));
        assert_eq!(attrs.importance, Some(Importance::High));
        assert_eq!(attrs.description, None);
    }
}
