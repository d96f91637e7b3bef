//! Normalization, classification and filtering stage.

use crate::classify::{ClassifyStats, Classifier, FilterStats, classify_components, filter_components};
use crate::config::AppConfig;
use crate::model::ProjectGraph;
use crate::normalize::{RekeyStats, normalize_build_variants, normalize_graph};

/// Counters collected while the graph was normalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub classified: ClassifyStats,
    /// Components classified by the second chain run, after variants merged
    pub reclassified: ClassifyStats,
    pub variants: RekeyStats,
    pub filtered: FilterStats,
}

/// Run every in-memory transform in order.
///
/// Classification runs twice: once on the freshly normalized graph and once
/// after variant collapsing, so components renamed by the variant pass are
/// classified under their final names.
pub fn normalize_and_classify(graph: &mut ProjectGraph, config: &AppConfig) -> NormalizeReport {
    let classifier = Classifier::from_config(&config.classify);
    tracing::debug!(
        "Classifying for platform {} ({} system libraries)",
        config.effective_platform(),
        classifier.system.len()
    );

    normalize_graph(graph, &config.normalize);
    let classified = classify_components(graph, &classifier);
    let variants = normalize_build_variants(graph, &config.variants);
    let reclassified = classify_components(graph, &classifier);
    let filtered = filter_components(graph, &config.filter);

    for violation in graph.consistency_violations() {
        tracing::warn!("Graph inconsistency: {violation}");
    }
    tracing::info!(
        "Normalized graph: {} components, {} targets, {} edges ({} unresolved), {} warnings",
        graph.component_count(),
        graph.targets.len(),
        graph.edges.len(),
        graph.unresolved_edge_count(),
        graph.warnings.len()
    );

    NormalizeReport {
        classified,
        reclassified,
        variants,
        filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Platform;
    use crate::model::{BuildTarget, ComponentOrigin, DependencyEdge, TargetId, TargetKind};

    fn graph() -> ProjectGraph {
        let mut g = ProjectGraph::default();
        let app = TargetId::new("tgt_app");
        g.add_target(BuildTarget::new(app.clone(), "app", TargetKind::Executable));
        g.add_target(BuildTarget::new(TargetId::new("tgt_core"), "core", TargetKind::StaticLibrary));
        for token in ["-lssl", "libcore.a", "-lpthread", "/vcpkg/installed/debug/lib/fmtd.lib", "fmt.lib"] {
            g.add_edge(DependencyEdge::raw(app.clone(), token));
        }
        g
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.classify.platform = Some(Platform::Linux);
        config
    }

    #[test]
    fn test_default_run_filters_system_and_project_local() {
        let mut g = graph();
        let report = normalize_and_classify(&mut g, &config());

        let mut names: Vec<_> = g.components.values().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["fmt", "ssl"]);
        assert_eq!(report.filtered.components_removed, 2);
        assert_eq!(report.variants.merged, 1);
        assert!(g.consistency_violations().is_empty());
    }

    #[test]
    fn test_includes_keep_every_origin() {
        let mut g = graph();
        let mut config = config();
        config.filter.include_system = true;
        config.filter.include_project_local = true;
        normalize_and_classify(&mut g, &config);

        assert_eq!(g.find_component_by_name("pthread").unwrap().origin, ComponentOrigin::System);
        assert_eq!(g.find_component_by_name("core").unwrap().origin, ComponentOrigin::ProjectLocal);
        assert_eq!(g.find_component_by_name("ssl").unwrap().origin, ComponentOrigin::Unknown);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let mut g = graph();
        normalize_and_classify(&mut g, &config());
        let once = g.clone();
        let report = normalize_and_classify(&mut g, &config());

        assert_eq!(g, once);
        assert_eq!(report.classified.total(), 0);
        assert_eq!(report.filtered, FilterStats::default());
    }
}
