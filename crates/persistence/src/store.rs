//! Ties the four logical artifacts spec'd for a task network — the
//! attributes register, hierarchy edges, dependency edges, and the
//! next unused task UID — to a base directory on disk.
//!
//! Atomicity of the group save is handled by [`crate::atomic_file`]:
//! every artifact is staged as a temporary sibling and only renamed
//! into place once all four have been written successfully. The core
//! (`tasknet-system`) never sees a partially-saved state; a failed
//! save leaves the previous files untouched.

use std::path::{Path, PathBuf};

use tasknet_attributes::AttributesRegister;
use tasknet_core::{TaskId, TaskIdAllocator};
use tasknet_network::NetworkGraph;
use tasknet_system::TaskSystem;
use tracing::{debug, info};

use crate::atomic_file::write_atomic_group;
use crate::envelope::{encode, read_artifact};
use crate::error::Result;

const ATTRIBUTES_ARTIFACT: &str = "attributes";
const HIERARCHY_ARTIFACT: &str = "hierarchy_edges";
const DEPENDENCY_ARTIFACT: &str = "dependency_edges";
const NEXT_UID_ARTIFACT: &str = "next_task_id";

/// Filenames for the four artifacts, rooted at a base directory. Kept
/// as a small explicit struct (following `cuenv-config`'s loader
/// pattern) rather than a global singleton, since a caller may hold
/// more than one task network on disk at once.
#[derive(Debug, Clone)]
pub struct TaskSystemStore {
    base_dir: PathBuf,
}

impl TaskSystemStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn attributes_path(&self) -> PathBuf {
        self.base_dir.join("attributes.json")
    }

    fn hierarchy_path(&self) -> PathBuf {
        self.base_dir.join("hierarchy_edges.json")
    }

    fn dependency_path(&self) -> PathBuf {
        self.base_dir.join("dependency_edges.json")
    }

    fn next_uid_path(&self) -> PathBuf {
        self.base_dir.join("next_task_id.json")
    }

    /// Loads a [`TaskSystem`] from the four artifacts. The hierarchy
    /// and dependency edges are replayed in file order through the
    /// network graph's own validators — a corrupt or hand-edited edge
    /// list that violates an invariant is rejected the same way a live
    /// mutation would be, rather than silently accepted.
    pub fn load(&self) -> Result<TaskSystem> {
        let attributes: AttributesRegister =
            read_artifact(&self.attributes_path(), ATTRIBUTES_ARTIFACT)?;
        let hierarchy_edges: Vec<(TaskId, TaskId)> =
            read_artifact(&self.hierarchy_path(), HIERARCHY_ARTIFACT)?;
        let dependency_edges: Vec<(TaskId, TaskId)> =
            read_artifact(&self.dependency_path(), DEPENDENCY_ARTIFACT)?;
        let next_task_id: TaskId = read_artifact(&self.next_uid_path(), NEXT_UID_ARTIFACT)?;

        let mut network = NetworkGraph::new();
        for task in attributes.iter().map(|(task, _)| *task) {
            network
                .add_task(task)
                .map_err(|source| crate::error::PersistenceError::InconsistentState {
                    detail: format!("duplicate task {task} in attributes register: {source}"),
                })?;
        }
        for (supertask, subtask) in hierarchy_edges {
            network.add_hierarchy(supertask, subtask).map_err(|source| {
                crate::error::PersistenceError::InconsistentState {
                    detail: format!(
                        "persisted hierarchy edge {supertask} -> {subtask} rejected on replay: {source}"
                    ),
                }
            })?;
        }
        for (dependee, dependent) in dependency_edges {
            network.add_dependency(dependee, dependent).map_err(|source| {
                crate::error::PersistenceError::InconsistentState {
                    detail: format!(
                        "persisted dependency edge {dependee} -> {dependent} rejected on replay: {source}"
                    ),
                }
            })?;
        }

        // The persisted counter is the source of truth for the next UID, but
        // resume past whichever is larger of it and the highest task actually
        // on record, in case the counter file ever drifts behind the
        // attributes register it is meant to track.
        let highest_from_counter = next_task_id.value().checked_sub(1).map(TaskId::new);
        let highest_from_tasks = attributes.iter().map(|(task, _)| *task).max();
        let allocator = TaskIdAllocator::resume_after(highest_from_counter.max(highest_from_tasks));

        debug!(base_dir = %self.base_dir.display(), "loaded task system from disk");
        Ok(TaskSystem::from_parts(attributes, network, allocator))
    }

    /// Serializes and atomically commits all four artifacts together.
    /// The core does not call this itself (per spec, persistence is an
    /// externally-committed, best-effort action performed by the
    /// caller after a successful mutation) — a caller invokes this
    /// once it is satisfied the in-memory state should be durable.
    pub fn save(&self, system: &TaskSystem) -> Result<()> {
        let attributes_bytes = {
            let mut register = AttributesRegister::new();
            for (task, attrs) in system.attributes().iter() {
                register.add(*task).expect("fresh register, task unique by construction");
                register
                    .update_name(*task, attrs.name.clone())
                    .expect("just inserted");
                register
                    .update_description(*task, attrs.description.clone())
                    .expect("just inserted");
                register
                    .update_importance(*task, attrs.importance)
                    .expect("just inserted");
                register
                    .update_progress(*task, attrs.progress)
                    .expect("just inserted");
            }
            encode(ATTRIBUTES_ARTIFACT, &register)?
        };
        let hierarchy_bytes = encode(HIERARCHY_ARTIFACT, &system.hierarchy().edges())?;
        let dependency_bytes = encode(DEPENDENCY_ARTIFACT, &system.dependency().dependencies())?;
        let next_uid_bytes = encode(NEXT_UID_ARTIFACT, &system.next_unused_task_id())?;

        write_atomic_group(&[
            (self.attributes_path(), attributes_bytes),
            (self.hierarchy_path(), hierarchy_bytes),
            (self.dependency_path(), dependency_bytes),
            (self.next_uid_path(), next_uid_bytes),
        ])?;

        info!(base_dir = %self.base_dir.display(), tasks = system.attributes().len(), "saved task system to disk");
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
