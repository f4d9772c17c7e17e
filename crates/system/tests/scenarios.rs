//! The numbered end-to-end scenarios from the task-network
//! specification's testable-properties section, run against the
//! public [`TaskSystem`] contract.

use tasknet_core::{Importance, Progress};
use tasknet_network::NetworkError;
use tasknet_system::{TaskSystem, TaskSystemError};

fn linear_chain() -> (TaskSystem, tasknet_core::TaskId, tasknet_core::TaskId, tasknet_core::TaskId) {
    let mut sys = TaskSystem::new();
    let a = sys.create_task().unwrap();
    let b = sys.create_task().unwrap();
    let c = sys.create_task().unwrap();
    (sys, a, b, c)
}

#[test]
fn scenario_1_create_and_link_rolls_up_progress() {
    let (mut sys, a, b, c) = linear_chain();
    sys.add_task_hierarchy(a, b).unwrap();
    sys.add_task_hierarchy(b, c).unwrap();

    assert_eq!(sys.get_progress(a).unwrap(), Progress::NotStarted);

    sys.set_task_progress(c, Progress::InProgress).unwrap();

    assert_eq!(sys.get_progress(a).unwrap(), Progress::InProgress);
    assert_eq!(sys.get_progress(b).unwrap(), Progress::InProgress);
}

#[test]
fn scenario_2_reject_redundant_hierarchy() {
    let (mut sys, a, b, c) = linear_chain();
    sys.add_task_hierarchy(a, b).unwrap();
    sys.add_task_hierarchy(b, c).unwrap();

    let err = sys.add_task_hierarchy(a, c).unwrap_err();
    match err {
        TaskSystemError::Network(NetworkError::Hierarchy(
            tasknet_hierarchy::HierarchyError::HierarchyPathAlreadyExists { subgraph, .. },
        )) => {
            let mut nodes: Vec<_> = subgraph.nodes().cloned().collect();
            nodes.sort();
            assert_eq!(nodes, vec![a, b, c]);
            assert!(subgraph.contains_edge(&a, &b));
            assert!(subgraph.contains_edge(&b, &c));
        }
        other => panic!("expected HierarchyPathAlreadyExists, got {other:?}"),
    }
}

#[test]
fn scenario_3_reject_stream_cycle() {
    let (mut sys, a, b, c) = linear_chain();
    sys.add_task_hierarchy(b, c).unwrap();
    sys.add_task_dependency(a, b).unwrap();

    let err = sys.add_task_dependency(c, a).unwrap_err();
    assert!(matches!(
        err,
        TaskSystemError::Network(NetworkError::DependencyIntroducesStreamCycle { .. })
    ));
}

#[test]
fn scenario_4_reject_importance_conflict() {
    let (mut sys, a, b, _c) = linear_chain();
    sys.add_task_hierarchy(a, b).unwrap();
    sys.set_importance(a, Some(Importance::Medium)).unwrap();

    let err = sys.set_importance(b, Some(Importance::Low)).unwrap_err();
    match err {
        TaskSystemError::SupertaskHasImportance { task, supertask } => {
            assert_eq!(task, b);
            assert_eq!(supertask, a);
            assert_eq!(sys.get_importance(a).unwrap(), Some(Importance::Medium));
        }
        other => panic!("expected SupertaskHasImportance, got {other:?}"),
    }
}

#[test]
fn scenario_5_progress_gating_then_success() {
    let (mut sys, a, b, _c) = linear_chain();
    sys.add_task_dependency(a, b).unwrap();

    let err = sys.set_task_progress(b, Progress::InProgress).unwrap_err();
    match err {
        TaskSystemError::IncompleteDependeeTasks { task, witness } => {
            assert_eq!(task, b);
            assert_eq!(witness.len(), 1);
            assert_eq!(witness[0].task, a);
            assert_eq!(witness[0].progress, Progress::NotStarted);
        }
        other => panic!("expected IncompleteDependeeTasks, got {other:?}"),
    }

    sys.set_task_progress(a, Progress::Completed).unwrap();
    sys.set_task_progress(b, Progress::InProgress).unwrap();
    assert_eq!(sys.get_progress(b).unwrap(), Progress::InProgress);
}
