//! Property-based tests for graph normalization.
//!
//! Random link-token graphs must normalize to a self-consistent fixed point
//! that does not depend on the order edges were recorded in.

use linksbom::classify::{Classifier, FilterOptions, Platform, classify_components, filter_components};
use linksbom::model::{BuildTarget, DependencyEdge, ProjectGraph, TargetId, TargetKind};
use linksbom::normalize::{
    NormalizeOptions, VariantNormalizeOptions, component_from_link_token, normalize_build_variants,
    normalize_graph,
};
use proptest::prelude::*;

/// Tokens in every spelling the normalizer understands, plus noise.
fn token() -> impl Strategy<Value = String> {
    let name = "(ssl|crypto|z|fmt|fmtd|pthread|core|Boost)";
    prop_oneof![
        name.prop_map(|n| format!("-l{n}")),
        name.prop_map(|n| format!("lib{n}.a")),
        name.prop_map(|n| format!("/usr/lib/lib{n}.so")),
        name.prop_map(|n| format!("C:/vcpkg/installed/x64-windows/debug/lib/{n}.lib")),
        name.prop_map(|n| format!("D:\\libs\\{}.LIB", n.to_uppercase())),
        name.prop_map(|n| format!("{n}::{n}")),
        "\\PC{0,12}",
    ]
}

fn graph_from(edges: &[(u8, String)]) -> ProjectGraph {
    let mut graph = ProjectGraph::default();
    for (from, token) in edges {
        let id = TargetId::new(format!("tgt_{from}"));
        graph.add_target(BuildTarget::new(id.clone(), format!("t{from}"), TargetKind::Executable));
        graph.add_edge(DependencyEdge::raw(id, token.clone()));
    }
    graph
}

fn full_normalize(graph: &mut ProjectGraph) {
    let classifier = Classifier::for_platform(Platform::Linux);
    normalize_graph(graph, &NormalizeOptions::default());
    classify_components(graph, &classifier);
    normalize_build_variants(graph, &VariantNormalizeOptions::default());
    classify_components(graph, &classifier);
}

fn edge_multiset(graph: &ProjectGraph) -> Vec<String> {
    let mut edges: Vec<String> = graph
        .edges
        .iter()
        .map(|e| {
            format!(
                "{}|{}|{}",
                e.from,
                e.raw.as_deref().unwrap_or_default(),
                e.to_component.as_ref().map_or("", |c| c.value())
            )
        })
        .collect();
    edges.sort();
    edges
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn token_normalization_doesnt_panic(s in "\\PC{0,200}") {
        let c = component_from_link_token(&s, &NormalizeOptions::default());
        prop_assert!(!c.sources.is_empty());
        let _ = c.display_name();
    }

    #[test]
    fn normalization_is_idempotent(edges in prop::collection::vec((0u8..4, token()), 0..24)) {
        let mut graph = graph_from(&edges);
        full_normalize(&mut graph);
        let once = graph.clone();
        full_normalize(&mut graph);

        prop_assert_eq!(&graph.components, &once.components);
        prop_assert_eq!(edge_multiset(&graph), edge_multiset(&once));
        prop_assert_eq!(&graph.warnings, &once.warnings);
    }

    #[test]
    fn result_is_order_independent(edges in prop::collection::vec((0u8..4, token()), 0..24)) {
        let mut forward = graph_from(&edges);
        let reversed: Vec<_> = edges.iter().rev().cloned().collect();
        let mut backward = graph_from(&reversed);

        full_normalize(&mut forward);
        full_normalize(&mut backward);

        prop_assert_eq!(&forward.components, &backward.components);
        prop_assert_eq!(edge_multiset(&forward), edge_multiset(&backward));
    }

    #[test]
    fn result_is_self_consistent(
        edges in prop::collection::vec((0u8..4, token()), 0..24),
        include_system in any::<bool>(),
        include_project_local in any::<bool>(),
    ) {
        let mut graph = graph_from(&edges);
        full_normalize(&mut graph);
        prop_assert!(graph.consistency_violations().is_empty(), "{:?}", graph.consistency_violations());

        filter_components(&mut graph, &FilterOptions { include_system, include_project_local });
        prop_assert!(graph.consistency_violations().is_empty(), "{:?}", graph.consistency_violations());
    }
}
