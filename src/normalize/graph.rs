//! Whole-graph normalization: resolve raw edges, then re-key every component.

use super::rekey::rekey_components;
use super::{NormalizeOptions, component_from_link_token, merge_component, normalize_token};
use crate::model::ProjectGraph;
use std::collections::HashSet;
use std::collections::btree_map::Entry;

/// Normalize a graph in place.
///
/// Afterwards every component is stored under its canonical id and every
/// component reference on an edge resolves. Running it again on the result
/// changes nothing.
pub fn normalize_graph(graph: &mut ProjectGraph, options: &NormalizeOptions) {
    detach_dangling_edges(graph);
    let resolved = resolve_raw_edges(graph, options);
    let stats = rekey_components(graph, |_| {}, merge_component);

    tracing::info!(
        "Normalized graph: {} components, {} edges resolved, {} re-keyed, {} merged",
        graph.components.len(),
        resolved,
        stats.rekeyed,
        stats.merged
    );
}

/// Clear component references that nothing in the table answers to.
///
/// A reference is kept when it names a table key or the stored id of some
/// component, since re-keying can still redirect the latter.
fn detach_dangling_edges(graph: &mut ProjectGraph) {
    let known: HashSet<&str> = graph
        .components
        .iter()
        .flat_map(|(key, c)| [key.as_str(), c.id.value()])
        .collect();

    let mut detached = Vec::new();
    for edge in &mut graph.edges {
        if let Some(id) = &edge.to_component
            && !known.contains(id.value())
        {
            detached.push(format!(
                "edge from {} referenced unknown component {id}; reference dropped",
                edge.from
            ));
            edge.to_component = None;
        }
    }

    for warning in detached {
        graph.push_warning(warning);
    }
}

/// Phase A: turn raw tokens into components and attach them to their edges.
///
/// Edges are processed by normalized token, then position, so the first
/// observation of any component does not depend on edge order.
fn resolve_raw_edges(graph: &mut ProjectGraph, options: &NormalizeOptions) -> usize {
    let mut pending: Vec<(String, usize)> = graph
        .edges
        .iter()
        .enumerate()
        .filter(|(_, e)| e.to_component.is_none())
        .filter_map(|(index, e)| e.raw.as_deref().map(|raw| (normalize_token(raw), index)))
        .collect();
    pending.sort();

    let mut resolved = 0;
    for (token, index) in pending {
        let candidate = component_from_link_token(&token, options);
        if candidate.name.is_empty() {
            let warning = format!(
                "link token '{token}' on edge from {} yields no component name; left unresolved",
                graph.edges[index].from
            );
            graph.push_warning(warning);
            continue;
        }

        let id = candidate.id.clone();
        match graph.components.entry(id.value().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => merge_component(slot.get_mut(), &candidate),
        }
        graph.edges[index].to_component = Some(id);
        resolved += 1;
    }

    resolved
}
