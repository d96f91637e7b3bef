//! Build-context provider: how each component is consumed by the build.

use super::{EnrichmentOverlay, EnrichmentProvider, Evidence, MetaField, MetaValue, Provenance};
use crate::model::ProjectGraph;
use std::collections::{BTreeMap, BTreeSet};

pub const CONFIGURATIONS_KEY: &str = "linksbom:enrich.build.configurations";
pub const TOOLCHAINS_KEY: &str = "linksbom:enrich.build.toolchains";
pub const PLATFORMS_KEY: &str = "linksbom:enrich.build.platforms";
pub const USED_BY_TARGETS_COUNT_KEY: &str = "linksbom:enrich.build.used_by_targets_count";

const RULE_ID: &str = "AGG_FROM_CONSUMING_TARGETS";

/// Aggregates configurations, toolchains and platforms of the targets that
/// link each component.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildContextProvider;

impl EnrichmentProvider for BuildContextProvider {
    fn name(&self) -> &'static str {
        "build-context"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn enrich(&self, graph: &ProjectGraph, overlay: &mut EnrichmentOverlay) {
        let mut consumers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for edge in &graph.edges {
            if let Some(component) = &edge.to_component {
                consumers
                    .entry(component.value())
                    .or_default()
                    .insert(edge.from.value());
            }
        }

        for (component_id, target_ids) in consumers {
            let mut configurations = BTreeSet::new();
            let mut toolchains = BTreeSet::new();
            let mut platforms = BTreeSet::new();
            let mut evidence = Vec::with_capacity(target_ids.len());

            for target_id in &target_ids {
                evidence.push(Evidence::new("target", *target_id, "consumes component"));
                let Some(target) = graph.targets.get(*target_id) else {
                    continue;
                };
                configurations.extend(target.configuration.clone());
                toolchains.extend(target.toolchain.clone());
                platforms.extend(target.platform.clone());
            }
            evidence.sort();

            let provenance = Provenance {
                provider: self.name().to_string(),
                provider_version: self.version().to_string(),
                rule_id: RULE_ID.to_string(),
                confidence: 1.0,
                evidence,
            };

            let fields = overlay
                .component_fields
                .entry(component_id.to_string())
                .or_default();
            for (key, values) in [
                (CONFIGURATIONS_KEY, configurations),
                (TOOLCHAINS_KEY, toolchains),
                (PLATFORMS_KEY, platforms),
            ] {
                if !values.is_empty() {
                    fields.push(MetaField {
                        key: key.to_string(),
                        value: MetaValue::List(values.into_iter().collect()),
                        provenance: provenance.clone(),
                    });
                }
            }
            fields.push(MetaField {
                key: USED_BY_TARGETS_COUNT_KEY.to_string(),
                value: MetaValue::Int(i64::try_from(target_ids.len()).unwrap_or(i64::MAX)),
                provenance,
            });
            fields.sort_by(|a, b| a.key.cmp(&b.key));
        }
    }
}
