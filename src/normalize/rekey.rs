//! The re-keying pass shared by graph and variant normalization.
//!
//! Every component is passed through a transform, its id is recomputed from
//! the resulting fields, and the component table is rebuilt under the new
//! ids. Components landing on the same id are merged. Edges are rewritten
//! through the old-key to new-key remap afterwards, so no edge ever points
//! at a key that no longer exists.

use crate::model::{Component, ComponentId, ProjectGraph, component_id_of};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Counters reported by a re-keying pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RekeyStats {
    /// Components whose key changed
    pub rekeyed: usize,
    /// Components folded into another one
    pub merged: usize,
    /// Edges whose component reference was rewritten
    pub edges_rewritten: usize,
}

/// Rebuild the component table under recomputed ids.
///
/// Components are visited in ascending key order, so the first one to claim
/// a new id is the merge destination and the outcome does not depend on how
/// the table was populated.
pub fn rekey_components<T, M>(graph: &mut ProjectGraph, mut transform: T, mut merge: M) -> RekeyStats
where
    T: FnMut(&mut Component),
    M: FnMut(&mut Component, &Component),
{
    let mut stats = RekeyStats::default();
    let mut remap: HashMap<String, ComponentId> = HashMap::new();
    let mut stale_ids: Vec<(String, ComponentId)> = Vec::new();
    let mut rebuilt: BTreeMap<String, Component> = BTreeMap::new();

    for (old_key, mut component) in std::mem::take(&mut graph.components) {
        let stored_id = std::mem::take(&mut component.id);
        transform(&mut component);

        let new_id = component_id_of(&component);
        component.id = new_id.clone();
        if old_key != new_id.value() {
            stats.rekeyed += 1;
        }
        if stored_id.value() != old_key {
            stale_ids.push((stored_id.into_inner(), new_id.clone()));
        }

        match rebuilt.entry(new_id.value().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(component);
            }
            Entry::Occupied(mut slot) => {
                tracing::debug!(
                    "merging '{}' ({old_key}) into {}",
                    component.name,
                    new_id
                );
                merge(slot.get_mut(), &component);
                stats.merged += 1;
            }
        }
        remap.insert(old_key, new_id);
    }

    // A stale stored id only redirects when no table key already claims it.
    for (stale, new_id) in stale_ids {
        remap.entry(stale).or_insert(new_id);
    }

    graph.components = rebuilt;

    for edge in &mut graph.edges {
        if let Some(current) = &edge.to_component
            && let Some(target) = remap.get(current.value())
            && target != current
        {
            edge.to_component = Some(target.clone());
            stats.edges_rewritten += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentType, DependencyEdge, TargetId};
    use crate::normalize::merge_component;

    fn graph_with_stale_keys() -> ProjectGraph {
        let mut g = ProjectGraph::default();
        let mut a = Component::new("fmt", ComponentType::Library);
        a.id = ComponentId::new("raw:fmt-a");
        let mut b = Component::new("fmt", ComponentType::Library);
        b.id = ComponentId::new("raw:fmt-b");
        b.supplier = Some("fmtlib".to_string());
        g.components.insert("raw:fmt-a".to_string(), a);
        g.components.insert("raw:fmt-b".to_string(), b);
        g.add_edge(DependencyEdge::to_component(
            TargetId::new("tgt_app"),
            ComponentId::new("raw:fmt-b"),
        ));
        g
    }

    #[test]
    fn test_rekey_merges_collisions_and_remaps_edges() {
        let mut g = graph_with_stale_keys();
        let stats = rekey_components(&mut g, |_| {}, merge_component);

        assert_eq!(g.components.len(), 1);
        assert_eq!(stats.rekeyed, 2);
        assert_eq!(stats.merged, 1);
        assert_eq!(stats.edges_rewritten, 1);

        let (key, merged) = g.components.iter().next().unwrap();
        assert_eq!(key, merged.id.value());
        assert_eq!(merged.supplier.as_deref(), Some("fmtlib"));
        assert_eq!(g.edges[0].to_component.as_ref(), Some(&merged.id));
    }

    #[test]
    fn test_rekey_applies_transform_before_hashing() {
        let mut g = ProjectGraph::default();
        g.add_component(Component::new("fmtd", ComponentType::Library));
        g.add_component(Component::new("fmt", ComponentType::Library));

        rekey_components(
            &mut g,
            |c| {
                if c.name == "fmtd" {
                    c.name.pop();
                }
            },
            merge_component,
        );

        assert_eq!(g.components.len(), 1);
        assert!(g.consistency_violations().is_empty());
    }

    #[test]
    fn test_rekey_on_consistent_graph_changes_nothing() {
        let mut g = ProjectGraph::default();
        let c = Component::new("zlib", ComponentType::Library);
        g.add_edge(DependencyEdge::to_component(TargetId::new("tgt_a"), c.id.clone()));
        g.add_component(c);
        let before = g.clone();

        let stats = rekey_components(&mut g, |_| {}, merge_component);

        assert_eq!(stats, RekeyStats::default());
        assert_eq!(g, before);
    }

    #[test]
    fn test_stale_stored_id_redirects_edges() {
        let mut g = ProjectGraph::default();
        let mut c = Component::new("png", ComponentType::Library);
        c.id = ComponentId::new("legacy-id");
        g.components.insert("raw:png".to_string(), c);
        g.add_edge(DependencyEdge::to_component(
            TargetId::new("tgt_a"),
            ComponentId::new("legacy-id"),
        ));

        rekey_components(&mut g, |_| {}, merge_component);

        let id = g.components.values().next().unwrap().id.clone();
        assert_eq!(g.edges[0].to_component, Some(id));
    }
}
