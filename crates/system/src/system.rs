use indexmap::IndexMap;

use tasknet_attributes::{AttributesRegister, AttributesRegisterView};
use tasknet_core::{roll_up, Importance, Progress, TaskId, TaskIdAllocator};
use tasknet_dependency::DependencyGraph;
use tasknet_hierarchy::HierarchyGraph;
use tasknet_network::NetworkGraph;

use crate::error::{Result, TaskSystemError, WitnessTask};

/// One attributes register plus one network graph, sharing a single
/// UID allocator. This is the top-level entry point for everything
/// a caller does with a task network: creation, attribute edits,
/// structural edits, progress transitions, and importance.
#[derive(Debug, Clone, Default)]
pub struct TaskSystem {
    attributes: AttributesRegister,
    network: NetworkGraph,
    allocator: TaskIdAllocator,
}

impl TaskSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a system from its four persisted artifacts (the
    /// attributes register and network graph are assumed already
    /// mutually consistent; the allocator continues past the highest
    /// issued UID).
    pub fn from_parts(
        attributes: AttributesRegister,
        network: NetworkGraph,
        allocator: TaskIdAllocator,
    ) -> Self {
        Self {
            attributes,
            network,
            allocator,
        }
    }

    pub fn into_parts(self) -> (AttributesRegister, NetworkGraph, TaskIdAllocator) {
        (self.attributes, self.network, self.allocator)
    }

    // ---- Lifecycle -----------------------------------------------

    pub fn create_task(&mut self) -> Result<TaskId> {
        let task = self.allocator.peek_next();
        self.network.add_task(task)?;
        self.attributes
            .add(task)
            .expect("just inserted under the same uid in the network graph");
        self.allocator.mark_used();
        Ok(task)
    }

    pub fn delete_task(&mut self, task: TaskId) -> Result<()> {
        self.network.remove_task(task)?;
        self.attributes
            .remove(task)
            .expect("just removed under the same uid from the network graph");
        Ok(())
    }

    pub fn contains_task(&self, task: TaskId) -> bool {
        self.network.contains_task(task)
    }

    // ---- Attributes ------------------------------------------------

    pub fn set_name(&mut self, task: TaskId, name: Option<String>) -> Result<()> {
        self.require_task(task)?;
        self.attributes
            .update_name(task, name)
            .expect("existence checked above");
        Ok(())
    }

    pub fn set_description(&mut self, task: TaskId, description: Option<String>) -> Result<()> {
        self.require_task(task)?;
        self.attributes
            .update_description(task, description)
            .expect("existence checked above");
        Ok(())
    }

    /// Sets (or clears) `task`'s explicit importance. Setting `None`
    /// is always permitted; setting `Some` enforces X4: no strict
    /// hierarchy ancestor or descendant may already carry an explicit
    /// importance.
    pub fn set_importance(&mut self, task: TaskId, importance: Option<Importance>) -> Result<()> {
        self.require_task(task)?;

        if importance.is_some() {
            if let Some(err) = self.check_ancestor_importance(task) {
                return Err(err);
            }
            if let Some(err) = self.check_descendant_importance(task) {
                return Err(err);
            }
        }

        self.attributes
            .update_importance(task, importance)
            .expect("existence checked above");
        Ok(())
    }

    /// Explicit importance if set, else the value inferred from the
    /// nearest hierarchy ancestor carrying one.
    pub fn get_importance(&self, task: TaskId) -> Result<Option<Importance>> {
        self.require_task(task)?;
        if let Some(imp) = self.explicit_importance(task) {
            return Ok(Some(imp));
        }
        for ancestor in self.network.hierarchy().ancestors(task).unwrap_or_default() {
            if let Some(imp) = self.explicit_importance(ancestor) {
                return Ok(Some(imp));
            }
        }
        Ok(None)
    }

    pub fn has_inferred_importance(&self, task: TaskId) -> Result<bool> {
        self.require_task(task)?;
        Ok(self.explicit_importance(task).is_none() && self.get_importance(task)?.is_some())
    }

    // ---- Structure ---------------------------------------------------

    pub fn add_task_hierarchy(&mut self, supertask: TaskId, subtask: TaskId) -> Result<()> {
        self.network.add_hierarchy(supertask, subtask)?;
        // supertask just gained its first subtask and is no longer
        // concrete; only concrete tasks may carry explicit progress (I8).
        self.attributes
            .update_progress(supertask, None)
            .expect("supertask existence confirmed by the add_hierarchy above");
        Ok(())
    }

    pub fn remove_task_hierarchy(&mut self, supertask: TaskId, subtask: TaskId) -> Result<()> {
        self.network.remove_hierarchy(supertask, subtask)?;
        Ok(())
    }

    pub fn add_task_dependency(&mut self, dependee: TaskId, dependent: TaskId) -> Result<()> {
        self.network.add_dependency(dependee, dependent)?;
        Ok(())
    }

    pub fn remove_task_dependency(&mut self, dependee: TaskId, dependent: TaskId) -> Result<()> {
        self.network.remove_dependency(dependee, dependent)?;
        Ok(())
    }

    // ---- Progress ------------------------------------------------

    /// Derived progress: explicit for a concrete task (defaulting to
    /// `NOT_STARTED` until first set), recursive roll-up of subtask
    /// progress otherwise.
    pub fn get_progress(&self, task: TaskId) -> Result<Progress> {
        self.require_task(task)?;
        Ok(self.derived_progress(task))
    }

    pub fn is_concrete(&self, task: TaskId) -> Result<bool> {
        self.require_task(task)?;
        Ok(self
            .network
            .hierarchy()
            .is_concrete(task)
            .expect("existence checked above"))
    }

    /// Writes an explicit progress value for a concrete task, subject
    /// to the dependency-gating checks: a completed task cannot regress
    /// while a dependent has already started, and a not-started task
    /// cannot begin while a dependee is still incomplete. Both checks
    /// are lifted through `task`'s hierarchy ancestors as well, since a
    /// dependency on a superior task constrains every task beneath it.
    pub fn set_task_progress(&mut self, task: TaskId, progress: Progress) -> Result<()> {
        self.require_task(task)?;
        if !self
            .network
            .hierarchy()
            .is_concrete(task)
            .expect("existence checked above")
        {
            return Err(TaskSystemError::NotConcreteTask { task });
        }

        let current = self.explicit_progress(task);

        if current.is_completed() && progress.is_incomplete() {
            if let Some(witness) = self.started_dependents(task) {
                return Err(TaskSystemError::StartedDependentTasks { task, witness });
            }
            if let Some(witness) = self.started_dependents_of_ancestors(task) {
                return Err(TaskSystemError::StartedDependentTasksOfSuperiorTasks { task, witness });
            }
        }

        if current == Progress::NotStarted && progress.is_started() {
            if let Some(witness) = self.incomplete_dependees(task) {
                return Err(TaskSystemError::IncompleteDependeeTasks { task, witness });
            }
            if let Some(witness) = self.incomplete_dependees_of_ancestors(task) {
                return Err(TaskSystemError::IncompleteDependeeTasksOfSuperiorTasks { task, witness });
            }
        }

        self.attributes
            .update_progress(task, Some(progress))
            .expect("existence checked above");
        Ok(())
    }

    // ---- Queries ---------------------------------------------------

    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.attributes.iter().map(|(task, _)| *task)
    }

    pub fn attributes(&self) -> AttributesRegisterView<'_> {
        self.attributes.view()
    }

    pub fn hierarchy(&self) -> &HierarchyGraph {
        self.network.hierarchy()
    }

    pub fn dependency(&self) -> &DependencyGraph {
        self.network.dependency()
    }

    pub fn network(&self) -> &NetworkGraph {
        &self.network
    }

    pub fn next_unused_task_id(&self) -> TaskId {
        self.allocator.peek_next()
    }

    /// Groups every task by (derived progress, is-concrete), useful
    /// for board-style views that bucket tasks by status and kind.
    pub fn group_by_progress_and_concreteness(&self) -> IndexMap<(Progress, bool), Vec<TaskId>> {
        let mut groups: IndexMap<(Progress, bool), Vec<TaskId>> = IndexMap::new();
        for task in self.tasks() {
            let concrete = self
                .network
                .hierarchy()
                .is_concrete(task)
                .expect("task drawn from the attributes register always exists in the network");
            let progress = self.derived_progress(task);
            groups.entry((progress, concrete)).or_default().push(task);
        }
        groups
    }

    // ---- Internal helpers ------------------------------------------

    fn require_task(&self, task: TaskId) -> Result<()> {
        if self.network.contains_task(task) {
            Ok(())
        } else {
            Err(TaskSystemError::TaskDoesNotExist { task })
        }
    }

    fn explicit_progress(&self, task: TaskId) -> Progress {
        self.attributes
            .get(task)
            .and_then(|a| a.progress)
            .unwrap_or(Progress::NotStarted)
    }

    fn explicit_importance(&self, task: TaskId) -> Option<Importance> {
        self.attributes.get(task).and_then(|a| a.importance)
    }

    fn derived_progress(&self, task: TaskId) -> Progress {
        let subtasks = self
            .network
            .hierarchy()
            .subtasks(task)
            .expect("task known to exist in the hierarchy graph");
        if subtasks.is_empty() {
            self.explicit_progress(task)
        } else {
            roll_up(subtasks.into_iter().map(|s| self.derived_progress(s)))
                .expect("non-empty subtask set always yields a rolled-up value")
        }
    }

    fn check_ancestor_importance(&self, task: TaskId) -> Option<TaskSystemError> {
        let direct = self.network.hierarchy().supertasks(task).unwrap_or_default();
        for supertask in &direct {
            if self.explicit_importance(*supertask).is_some() {
                return Some(TaskSystemError::SupertaskHasImportance {
                    task,
                    supertask: *supertask,
                });
            }
        }
        for ancestor in self.network.hierarchy().ancestors(task).unwrap_or_default() {
            if direct.contains(&ancestor) {
                continue;
            }
            if self.explicit_importance(ancestor).is_some() {
                return Some(TaskSystemError::SuperiorTaskHasImportance { task, ancestor });
            }
        }
        None
    }

    fn check_descendant_importance(&self, task: TaskId) -> Option<TaskSystemError> {
        let direct = self.network.hierarchy().subtasks(task).unwrap_or_default();
        for subtask in &direct {
            if self.explicit_importance(*subtask).is_some() {
                return Some(TaskSystemError::SubtaskHasImportance { task, subtask: *subtask });
            }
        }
        for descendant in self.network.hierarchy().descendants(task).unwrap_or_default() {
            if direct.contains(&descendant) {
                continue;
            }
            if self.explicit_importance(descendant).is_some() {
                return Some(TaskSystemError::InferiorTaskHasImportance { task, descendant });
            }
        }
        None
    }

    fn started_dependents(&self, task: TaskId) -> Option<Vec<WitnessTask>> {
        let witness: Vec<WitnessTask> = self
            .network
            .dependency()
            .dependent_tasks(task)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|dependent| {
                let progress = self.derived_progress(dependent);
                progress.is_started().then_some(WitnessTask { task: dependent, progress })
            })
            .collect();
        (!witness.is_empty()).then_some(witness)
    }

    fn started_dependents_of_ancestors(&self, task: TaskId) -> Option<Vec<WitnessTask>> {
        let witness: Vec<WitnessTask> = self
            .network
            .hierarchy()
            .ancestors(task)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|ancestor| self.network.dependency().dependent_tasks(ancestor).unwrap_or_default())
            .filter_map(|dependent| {
                let progress = self.derived_progress(dependent);
                progress.is_started().then_some(WitnessTask { task: dependent, progress })
            })
            .collect();
        (!witness.is_empty()).then_some(witness)
    }

    fn incomplete_dependees(&self, task: TaskId) -> Option<Vec<WitnessTask>> {
        let witness: Vec<WitnessTask> = self
            .network
            .dependency()
            .dependee_tasks(task)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|dependee| {
                let progress = self.derived_progress(dependee);
                progress.is_incomplete().then_some(WitnessTask { task: dependee, progress })
            })
            .collect();
        (!witness.is_empty()).then_some(witness)
    }

    fn incomplete_dependees_of_ancestors(&self, task: TaskId) -> Option<Vec<WitnessTask>> {
        let witness: Vec<WitnessTask> = self
            .network
            .hierarchy()
            .ancestors(task)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|ancestor| self.network.dependency().dependee_tasks(ancestor).unwrap_or_default())
            .filter_map(|dependee| {
                let progress = self.derived_progress(dependee);
                progress.is_incomplete().then_some(WitnessTask { task: dependee, progress })
            })
            .collect();
        (!witness.is_empty()).then_some(witness)
    }
}
