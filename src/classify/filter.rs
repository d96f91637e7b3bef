//! Origin-based pruning of the component table.

use crate::model::{ComponentOrigin, ProjectGraph};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which origins survive filtering. Third-party and unknown always do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterOptions {
    pub include_system: bool,
    pub include_project_local: bool,
}

impl FilterOptions {
    #[must_use]
    pub const fn keeps(&self, origin: ComponentOrigin) -> bool {
        match origin {
            ComponentOrigin::System => self.include_system,
            ComponentOrigin::ProjectLocal => self.include_project_local,
            ComponentOrigin::ThirdParty | ComponentOrigin::Unknown => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub components_removed: usize,
    pub edges_removed: usize,
}

/// Drop excluded components and every edge pointing at one of them.
///
/// Targets, target-to-target edges and unresolved raw edges are kept.
pub fn filter_components(graph: &mut ProjectGraph, options: &FilterOptions) -> FilterStats {
    let mut removed = HashSet::new();
    for (key, component) in &graph.components {
        if !options.keeps(component.origin) {
            tracing::debug!(
                "Dropping {} component {}",
                component.origin.as_str(),
                component.display_name()
            );
            removed.insert(key.clone());
        }
    }

    graph.components.retain(|key, _| !removed.contains(key));

    let edges_before = graph.edges.len();
    graph.edges.retain(|e| {
        e.to_component
            .as_ref()
            .is_none_or(|id| !removed.contains(id.value()))
    });

    let stats = FilterStats {
        components_removed: removed.len(),
        edges_removed: edges_before - graph.edges.len(),
    };
    tracing::info!(
        "Filtered {} components and {} edges",
        stats.components_removed,
        stats.edges_removed
    );
    stats
}
