use std::collections::VecDeque;

use indexmap::IndexSet;
use tasknet_core::TaskId;
use tasknet_dependency::DependencyGraph;
use tasknet_graph::SimpleDirectedGraph;
use tasknet_hierarchy::HierarchyGraph;
use tracing::warn;

use crate::error::{NetworkError, Result};

/// Composition of the hierarchy and dependency graphs over one shared
/// task set. Every mutation that crosses a graph boundary is checked
/// here; single-graph checks are left to the layer that owns them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkGraph {
    hierarchy: HierarchyGraph,
    dependency: DependencyGraph,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hierarchy(&self) -> &HierarchyGraph {
        &self.hierarchy
    }

    pub fn dependency(&self) -> &DependencyGraph {
        &self.dependency
    }

    pub fn contains_task(&self, task: TaskId) -> bool {
        self.hierarchy.contains_task(task)
    }

    pub fn add_task(&mut self, task: TaskId) -> Result<()> {
        if self.hierarchy.contains_task(task) {
            return Err(NetworkError::TaskAlreadyExists { task });
        }
        self.hierarchy.add_task(task)?;
        self.dependency
            .add_task(task)
            .expect("just confirmed absent from the shared task set");
        Ok(())
    }

    pub fn remove_task(&mut self, task: TaskId) -> Result<()> {
        if !self.hierarchy.contains_task(task) {
            return Err(NetworkError::TaskDoesNotExist { task });
        }
        let supertasks = self.hierarchy.supertasks(task)?;
        let subtasks = self.hierarchy.subtasks(task)?;
        let dependee_tasks = self.dependency.dependee_tasks(task)?;
        let dependent_tasks = self.dependency.dependent_tasks(task)?;
        if !supertasks.is_empty()
            || !subtasks.is_empty()
            || !dependee_tasks.is_empty()
            || !dependent_tasks.is_empty()
        {
            return Err(NetworkError::HasNeighbours {
                task,
                supertasks,
                subtasks,
                dependee_tasks,
                dependent_tasks,
            });
        }
        self.hierarchy.remove_task(task)?;
        self.dependency
            .remove_task(task)
            .expect("just confirmed isolated in both graphs");
        Ok(())
    }

    pub fn remove_hierarchy(&mut self, supertask: TaskId, subtask: TaskId) -> Result<()> {
        self.hierarchy
            .remove_hierarchy(supertask, subtask)
            .map_err(NetworkError::from)
    }

    pub fn remove_dependency(&mut self, dependee: TaskId, dependent: TaskId) -> Result<()> {
        self.dependency
            .remove_dependency(dependee, dependent)
            .map_err(NetworkError::from)
    }

    /// Adds `supertask -> subtask`, rejecting if the two tasks are
    /// already linked by a dependency path in either direction, or if
    /// the hierarchy edge would introduce a stream cycle.
    pub fn add_hierarchy(&mut self, supertask: TaskId, subtask: TaskId) -> Result<()> {
        if !self.hierarchy.contains_task(supertask) {
            return Err(NetworkError::TaskDoesNotExist { task: supertask });
        }
        if !self.hierarchy.contains_task(subtask) {
            return Err(NetworkError::TaskDoesNotExist { task: subtask });
        }

        if let Some(subgraph) = self.dependency_path(supertask, subtask) {
            return Err(NetworkError::DependencyPathAlreadyExistsBetweenHierarchyEndpoints {
                supertask,
                subtask,
                subgraph,
            });
        }
        if let Some(subgraph) = self.dependency_path(subtask, supertask) {
            return Err(NetworkError::DependencyPathAlreadyExistsBetweenHierarchyEndpoints {
                supertask: subtask,
                subtask: supertask,
                subgraph,
            });
        }

        if let Some(subgraph) = self.stream_path(subtask, supertask) {
            warn!(%supertask, %subtask, "rejected hierarchy: would introduce a stream cycle");
            return Err(NetworkError::HierarchyIntroducesStreamCycle {
                supertask,
                subtask,
                subgraph,
            });
        }

        self.hierarchy.add_hierarchy(supertask, subtask)?;
        Ok(())
    }

    /// Adds a dependency edge `dependee -> dependent` (`dependent`
    /// must complete after `dependee`), running the cross-graph
    /// checks in the priority order fixed by the network's design: a
    /// direct hierarchy link, then a stream cycle, then the two
    /// inferior-task stream checks, then the hierarchy-clash check.
    /// The first matching failure is returned; later checks are not
    /// evaluated.
    pub fn add_dependency(&mut self, dependee: TaskId, dependent: TaskId) -> Result<()> {
        if !self.hierarchy.contains_task(dependee) {
            return Err(NetworkError::TaskDoesNotExist { task: dependee });
        }
        if !self.hierarchy.contains_task(dependent) {
            return Err(NetworkError::TaskDoesNotExist { task: dependent });
        }

        if let Some(subgraph) = self.hierarchy.connecting_subgraph(dependee, dependent) {
            return Err(NetworkError::HierarchyPathAlreadyExistsFromDependeeToDependent {
                dependee,
                dependent,
                subgraph,
            });
        }
        if let Some(subgraph) = self.hierarchy.connecting_subgraph(dependent, dependee) {
            return Err(NetworkError::HierarchyPathAlreadyExistsFromDependentToDependee {
                dependee,
                dependent,
                subgraph,
            });
        }

        if let Some(subgraph) = self.stream_path(dependent, dependee) {
            warn!(%dependee, %dependent, "rejected dependency: would introduce a stream cycle");
            return Err(NetworkError::DependencyIntroducesStreamCycle {
                dependee,
                dependent,
                subgraph,
            });
        }

        for inferior in self.hierarchy.descendants(dependent)? {
            if let Some(subgraph) = self.stream_path(inferior, dependee) {
                return Err(
                    NetworkError::StreamPathFromInferiorTaskOfDependentTaskToDependeeTaskExists {
                        dependee,
                        dependent,
                        inferior,
                        subgraph,
                    },
                );
            }
        }

        for inferior in self.hierarchy.descendants(dependee)? {
            if let Some(subgraph) = self.stream_path(dependent, inferior) {
                return Err(
                    NetworkError::StreamPathFromDependentTaskToInferiorTaskOfDependeeTaskExists {
                        dependee,
                        dependent,
                        inferior,
                        subgraph,
                    },
                );
            }
        }

        if let Some((common_ancestor, subgraph)) = self.hierarchy_clash(dependee, dependent) {
            return Err(NetworkError::DependencyIntroducesHierarchyClash {
                dependee,
                dependent,
                common_ancestor,
                subgraph,
            });
        }

        self.dependency.add_dependency(dependee, dependent)?;
        Ok(())
    }

    fn dependency_path(&self, from: TaskId, to: TaskId) -> Option<SimpleDirectedGraph<TaskId>> {
        if from == to {
            return None;
        }
        let mut visited: IndexSet<TaskId> = IndexSet::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);
        while let Some(node) = queue.pop_front() {
            for next in self.dependency.dependent_tasks(node).ok()? {
                if next == to {
                    return Some(self.reconstruct_dependency_path(from, to));
                }
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn reconstruct_dependency_path(&self, from: TaskId, to: TaskId) -> SimpleDirectedGraph<TaskId> {
        // BFS again, this time recording parents, to build a minimal witness.
        let mut parent: indexmap::IndexMap<TaskId, TaskId> = indexmap::IndexMap::new();
        let mut visited: IndexSet<TaskId> = IndexSet::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);
        'search: while let Some(node) = queue.pop_front() {
            for next in self.dependency.dependent_tasks(node).unwrap_or_default() {
                if visited.insert(next) {
                    parent.insert(next, node);
                    if next == to {
                        break 'search;
                    }
                    queue.push_back(next);
                }
            }
        }

        let mut witness = SimpleDirectedGraph::new();
        let mut node = to;
        witness.add_node(node).expect("fresh node");
        while node != from {
            let prev = parent[&node];
            if !witness.contains_node(&prev) {
                witness.add_node(prev).expect("fresh node");
            }
            witness.add_edge(&prev, &node).expect("edge confirmed present by traversal");
            node = prev;
        }
        witness
    }

    /// Tasks directly stream-reachable from `task` in one atomic step:
    /// dependency-forward, hierarchy-up, or hierarchy-down.
    fn stream_successors(&self, task: TaskId) -> Result<Vec<TaskId>> {
        let mut out = self.dependency.dependent_tasks(task)?;
        out.extend(self.hierarchy.supertasks(task)?);
        out.extend(self.hierarchy.subtasks(task)?);
        Ok(out)
    }

    /// Is `to` reachable from `from` via the stream relation? Returns
    /// a witness subgraph built from the true stored edges (each hop
    /// labelled as a dependency or hierarchy edge by checking which
    /// relation actually holds, not by assuming traversal direction).
    fn stream_path(&self, from: TaskId, to: TaskId) -> Option<SimpleDirectedGraph<TaskId>> {
        if from == to {
            return None;
        }
        let mut visited: IndexSet<TaskId> = IndexSet::new();
        let mut parent: indexmap::IndexMap<TaskId, TaskId> = indexmap::IndexMap::new();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);
        let mut found = false;
        'search: while let Some(node) = queue.pop_front() {
            for next in self.stream_successors(node).ok()? {
                if visited.insert(next) {
                    parent.insert(next, node);
                    if next == to {
                        found = true;
                        break 'search;
                    }
                    queue.push_back(next);
                }
            }
        }
        if !found {
            return None;
        }

        let mut witness = SimpleDirectedGraph::new();
        let mut node = to;
        witness.add_node(node).expect("fresh node");
        while node != from {
            let prev = parent[&node];
            if !witness.contains_node(&prev) {
                witness.add_node(prev).expect("fresh node");
            }
            witness.add_edge(&prev, &node).expect("edge confirmed present by traversal");
            node = prev;
        }
        Some(witness)
    }

    /// A hierarchy ancestor shared by both `dependee` and `dependent`,
    /// implying the two tasks already sit in the same containment
    /// subtree and an explicit dependency between them would duplicate
    /// that existing structural relationship.
    fn hierarchy_clash(
        &self,
        dependee: TaskId,
        dependent: TaskId,
    ) -> Option<(TaskId, SimpleDirectedGraph<TaskId>)> {
        let dependee_ancestors: IndexSet<TaskId> =
            self.hierarchy.ancestors(dependee).ok()?.into_iter().collect();
        let dependent_ancestors: IndexSet<TaskId> =
            self.hierarchy.ancestors(dependent).ok()?.into_iter().collect();

        let common = dependee_ancestors.intersection(&dependent_ancestors).next().copied()?;

        let mut witness = SimpleDirectedGraph::new();
        witness.add_node(common).expect("fresh node");
        for (from, to) in [(common, dependee), (common, dependent)] {
            if let Some(path) = self.hierarchy.connecting_subgraph(from, to) {
                for n in path.nodes().cloned().collect::<Vec<_>>() {
                    if !witness.contains_node(&n) {
                        witness.add_node(n).expect("fresh node");
                    }
                }
                for (s, t) in path.edges() {
                    if !witness.contains_edge(&s, &t) {
                        witness.add_edge(&s, &t).expect("both endpoints present");
                    }
                }
            }
        }
        Some((common, witness))
    }
}
