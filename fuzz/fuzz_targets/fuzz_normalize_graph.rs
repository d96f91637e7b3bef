#![no_main]
use libfuzzer_sys::fuzz_target;
use linksbom::model::{DependencyEdge, ProjectGraph, TargetId};
use linksbom::normalize::{
    NormalizeOptions, VariantNormalizeOptions, normalize_build_variants, normalize_graph,
};

/// Fuzz whole-graph normalization.
///
/// Each input line is a link token on one of four targets. The result must
/// be self-consistent whatever the tokens are.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut graph = ProjectGraph::default();
    for (i, line) in s.lines().take(256).enumerate() {
        graph.add_edge(DependencyEdge::raw(TargetId::new(format!("tgt_{}", i % 4)), line));
    }

    normalize_graph(&mut graph, &NormalizeOptions::default());
    normalize_build_variants(&mut graph, &VariantNormalizeOptions::default());
    assert!(graph.consistency_violations().is_empty());
});
