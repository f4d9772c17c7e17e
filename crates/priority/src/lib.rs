//! Ranks active concrete tasks by descending priority. A pure function
//! over a [`TaskSystem`] snapshot: it reads state, never mutates it,
//! and memoises its own intermediate results for the duration of one
//! call so a diamond-shaped network isn't re-walked per branch.

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use tasknet_core::{Importance, Progress, TaskId};
use tasknet_system::TaskSystem;

/// Descending priority key: `(combined_importance, own_importance,
/// progress_rank, reverse_uid)` compared lexicographically. `None`
/// importances sort after every `Some`, matching `Option`'s derived
/// `Ord`; the trailing `Reverse(uid)` makes the smaller UID win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityKey {
    combined_importance: Option<Importance>,
    own_importance: Option<Importance>,
    progress_rank: u8,
    reverse_uid: Reverse<u64>,
}

/// Returns the active concrete tasks in descending priority order. A
/// concrete task is active iff it is `IN_PROGRESS`, or it is
/// `NOT_STARTED` and every upstream requirement is `COMPLETED`.
pub fn active_tasks_by_priority(system: &TaskSystem) -> Vec<TaskId> {
    let computer = Memo::new(system);

    let mut active: Vec<(PriorityKey, TaskId)> = system
        .tasks()
        .filter(|&task| computer.is_concrete(task))
        .filter_map(|task| {
            computer.is_active(task).then(|| {
                let key = PriorityKey {
                    combined_importance: computer.combined_importance(task),
                    own_importance: computer.own_importance(task),
                    progress_rank: progress_rank(computer.progress(task)),
                    reverse_uid: Reverse(task.value()),
                };
                (key, task)
            })
        })
        .collect();

    active.sort_by(|a, b| b.0.cmp(&a.0));
    active.into_iter().map(|(_, task)| task).collect()
}

fn progress_rank(progress: Progress) -> u8 {
    match progress {
        Progress::InProgress => 1,
        Progress::NotStarted => 0,
        Progress::Completed => unreachable!("completed tasks are never active"),
    }
}

/// Per-call memoisation of derived progress, own importance, highest
/// downstream importance, and upstream-completion, keyed by task UID.
struct Memo<'a> {
    system: &'a TaskSystem,
    progress: RefCell<IndexMap<TaskId, Progress>>,
    own_importance: RefCell<IndexMap<TaskId, Option<Importance>>>,
    downstream_importance: RefCell<IndexMap<TaskId, Option<Importance>>>,
    upstream_complete: RefCell<IndexMap<TaskId, bool>>,
}

impl<'a> Memo<'a> {
    fn new(system: &'a TaskSystem) -> Self {
        Self {
            system,
            progress: RefCell::new(IndexMap::new()),
            own_importance: RefCell::new(IndexMap::new()),
            downstream_importance: RefCell::new(IndexMap::new()),
            upstream_complete: RefCell::new(IndexMap::new()),
        }
    }

    fn is_concrete(&self, task: TaskId) -> bool {
        self.system
            .is_concrete(task)
            .expect("task drawn from the system's own task list always exists")
    }

    fn progress(&self, task: TaskId) -> Progress {
        if let Some(p) = self.progress.borrow().get(&task) {
            return *p;
        }
        let p = self
            .system
            .get_progress(task)
            .expect("task drawn from the system's own task list always exists");
        self.progress.borrow_mut().insert(task, p);
        p
    }

    fn own_importance(&self, task: TaskId) -> Option<Importance> {
        if let Some(imp) = self.own_importance.borrow().get(&task) {
            return *imp;
        }
        let imp = self
            .system
            .get_importance(task)
            .expect("task drawn from the system's own task list always exists");
        self.own_importance.borrow_mut().insert(task, imp);
        imp
    }

    fn is_active(&self, task: TaskId) -> bool {
        match self.progress(task) {
            Progress::InProgress => true,
            Progress::NotStarted => self.all_upstream_completed(task),
            Progress::Completed => false,
        }
    }

    /// All dependees of `task`, and all dependees of every hierarchy
    /// ancestor of `task`, have derived progress `COMPLETED`.
    fn all_upstream_completed(&self, task: TaskId) -> bool {
        if let Some(done) = self.upstream_complete.borrow().get(&task) {
            return *done;
        }
        let mut chain = vec![task];
        chain.extend(
            self.system
                .hierarchy()
                .ancestors(task)
                .expect("task drawn from the system's own task list always exists"),
        );
        let done = chain.iter().all(|&node| {
            self.system
                .dependency()
                .dependee_tasks(node)
                .expect("task drawn from the system's own task list always exists")
                .iter()
                .all(|&dependee| self.progress(dependee) == Progress::Completed)
        });
        self.upstream_complete.borrow_mut().insert(task, done);
        done
    }

    /// Maximum own/inferred importance over `task`'s dependency
    /// descendants plus all hierarchy ancestors thereof, reached by
    /// following dependency-forward and hierarchy-up edges.
    fn highest_downstream_importance(&self, task: TaskId) -> Option<Importance> {
        if let Some(imp) = self.downstream_importance.borrow().get(&task) {
            return *imp;
        }

        let mut visited: IndexSet<TaskId> = IndexSet::new();
        let mut queue = VecDeque::new();
        visited.insert(task);
        queue.push_back(task);
        let mut best: Option<Importance> = None;

        while let Some(node) = queue.pop_front() {
            let mut neighbours = self
                .system
                .dependency()
                .dependent_tasks(node)
                .expect("task drawn from the system's own task list always exists");
            neighbours.extend(
                self.system
                    .hierarchy()
                    .supertasks(node)
                    .expect("task drawn from the system's own task list always exists"),
            );
            for next in neighbours {
                if visited.insert(next) {
                    let imp = self.own_importance(next);
                    if imp > best {
                        best = imp;
                    }
                    if best == Some(Importance::MAX) {
                        self.downstream_importance.borrow_mut().insert(task, best);
                        return best;
                    }
                    queue.push_back(next);
                }
            }
        }

        self.downstream_importance.borrow_mut().insert(task, best);
        best
    }

    fn combined_importance(&self, task: TaskId) -> Option<Importance> {
        let own = self.own_importance(task);
        if own == Some(Importance::MAX) {
            return own;
        }
        let downstream = self.highest_downstream_importance(task);
        match (own, downstream) {
            (None, None) => None,
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (Some(a), Some(b)) => Some(a.max(b)),
        }
    }
}
