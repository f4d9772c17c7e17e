//! Cross-layer integration tests for the graph kernel.

use proptest::prelude::*;
use rstest::rstest;
use tasknet_graph::{DirectedAcyclicGraph, GraphError, ReducedDirectedAcyclicGraph, SimpleDirectedGraph};

#[rstest]
#[case(vec![(0u64, 1u64), (1, 2), (0, 2)], (0, 2), true)]
#[case(vec![(0u64, 1u64), (1, 2)], (0, 2), false)]
fn redundant_edge_detection(
    #[case] existing: Vec<(u64, u64)>,
    #[case] candidate: (u64, u64),
    #[case] should_already_be_rejected_at_build_time: bool,
) {
    let mut g = ReducedDirectedAcyclicGraph::new();
    let mut nodes = std::collections::BTreeSet::new();
    for (s, t) in &existing {
        nodes.insert(*s);
        nodes.insert(*t);
    }
    nodes.insert(candidate.0);
    nodes.insert(candidate.1);
    for n in nodes {
        g.add_node(n).unwrap();
    }

    let mut build_failed = false;
    for (s, t) in &existing {
        if g.add_edge(s, t).is_err() {
            build_failed = true;
        }
    }
    assert_eq!(build_failed, should_already_be_rejected_at_build_time);

    if !build_failed {
        let err = g.add_edge(&candidate.0, &candidate.1);
        assert!(err.is_err());
    }
}

#[test]
fn subgraph_views_preserve_reduced_invariant() {
    let mut g = ReducedDirectedAcyclicGraph::new();
    for n in 0u64..5 {
        g.add_node(n).unwrap();
    }
    g.add_edge(&0, &1).unwrap();
    g.add_edge(&1, &2).unwrap();
    g.add_edge(&2, &3).unwrap();
    g.add_edge(&0, &4).unwrap();

    let sub = g.descendants_subgraph(&0).unwrap();
    assert!(!sub.as_dag().has_redundant_edges());
    assert_eq!(sub.nodes().count(), 5);

    let sub2 = g.connecting_subgraph(&0, &3).unwrap();
    let mut ns: Vec<_> = sub2.nodes().cloned().collect();
    ns.sort_unstable();
    assert_eq!(ns, vec![0, 1, 2, 3]);
}

#[test]
fn dag_allows_diamonds_reduced_rejects_direct_shortcut() {
    let mut dag = DirectedAcyclicGraph::new();
    for n in 0u64..4 {
        dag.add_node(n).unwrap();
    }
    dag.add_edge(&0, &1).unwrap();
    dag.add_edge(&1, &3).unwrap();
    dag.add_edge(&0, &2).unwrap();
    dag.add_edge(&2, &3).unwrap();
    assert!(!dag.has_cycle());

    let mut reduced = ReducedDirectedAcyclicGraph::new();
    for n in 0u64..3 {
        reduced.add_node(n).unwrap();
    }
    reduced.add_edge(&0, &1).unwrap();
    reduced.add_edge(&1, &2).unwrap();
    assert!(matches!(
        reduced.add_edge(&0, &2),
        Err(GraphError::IntroducesRedundantEdge { .. })
    ));
}

proptest! {
    /// I1/I2 analogue at the kernel level: any sequence of accepted
    /// add_edge calls on a ReducedDirectedAcyclicGraph never leaves it
    /// cyclic or with a redundant edge.
    #[test]
    fn reduced_dag_stays_acyclic_and_reduced(
        edges in proptest::collection::vec((0u64..8, 0u64..8), 0..20)
    ) {
        let mut g = ReducedDirectedAcyclicGraph::new();
        for n in 0u64..8 {
            let _ = g.add_node(n);
        }
        for (s, t) in edges {
            let _ = g.add_edge(&s, &t);
        }
        prop_assert!(!g.as_dag().has_cycle());
        prop_assert!(!g.as_dag().has_redundant_edges());
    }
}

#[test]
fn simple_graph_roots_and_leaves() {
    let mut g: SimpleDirectedGraph<u64> = SimpleDirectedGraph::new();
    for n in 0u64..3 {
        g.add_node(n).unwrap();
    }
    g.add_edge(&0, &1).unwrap();
    assert_eq!(g.roots(), vec![0, 2]);
    assert_eq!(g.leaves(), vec![1, 2]);
}
