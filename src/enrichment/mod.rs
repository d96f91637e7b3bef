//! Component enrichment.
//!
//! Enrichment never touches the graph. Providers write namespaced fields into
//! an [`EnrichmentOverlay`] keyed by component id, which carries the graph's
//! fingerprint and a hash of its own content so stale overlays can be
//! detected.
//!
//! ```ignore
//! let overlay = enrich(&graph, &EnrichmentConfig { enabled: true, ..Default::default() });
//! for field in overlay.fields_for(component.id.value()) {
//!     println!("{} = {}", field.key, field.value);
//! }
//! ```

mod build_context;
mod traits;
mod types;

pub use build_context::{
    BuildContextProvider, CONFIGURATIONS_KEY, PLATFORMS_KEY, TOOLCHAINS_KEY,
    USED_BY_TARGETS_COUNT_KEY,
};
pub use traits::{EnrichmentProvider, NoOpProvider};
pub use types::{EnrichmentOverlay, Evidence, MetaField, MetaValue, Provenance};

use crate::model::ProjectGraph;
use crate::utils::{content_hash, hex_u64};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Enrichment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Run enrichment at all
    pub enabled: bool,
    /// Run the build-context provider
    pub build_context: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            build_context: true,
        }
    }
}

/// Providers selected by a configuration, in the order they run
#[must_use]
pub fn providers_for(config: &EnrichmentConfig) -> Vec<Box<dyn EnrichmentProvider>> {
    let mut providers: Vec<Box<dyn EnrichmentProvider>> = Vec::new();
    if !config.enabled {
        return providers;
    }
    if config.build_context {
        providers.push(Box::new(BuildContextProvider));
    }
    providers
}

/// Compute the overlay for a graph.
///
/// The fingerprint is always set. Fields and the overlay hash are only
/// produced when enrichment is enabled.
#[must_use]
pub fn enrich(graph: &ProjectGraph, config: &EnrichmentConfig) -> EnrichmentOverlay {
    let mut overlay = EnrichmentOverlay {
        model_fingerprint: graph.fingerprint(),
        ..EnrichmentOverlay::default()
    };
    if !config.enabled {
        return overlay;
    }

    for provider in providers_for(config) {
        let before = overlay.field_count();
        provider.enrich(graph, &mut overlay);
        tracing::debug!(
            "{} {} added {} fields",
            provider.name(),
            provider.version(),
            overlay.field_count() - before
        );
    }

    overlay.overlay_hash = compute_overlay_hash(&overlay);
    tracing::info!(
        "Enrichment: {} fields on {} components",
        overlay.field_count(),
        overlay.component_fields.len()
    );
    overlay
}

/// Hash over the fingerprint and every field, including provenance.
#[must_use]
pub fn compute_overlay_hash(overlay: &EnrichmentOverlay) -> String {
    let mut input = String::new();
    let _ = writeln!(input, "fp:{}", overlay.model_fingerprint);

    for (component_id, fields) in &overlay.component_fields {
        let _ = writeln!(input, "comp:{component_id}");
        for field in fields {
            let p = &field.provenance;
            let _ = writeln!(input, "k:{}", field.key);
            let _ = writeln!(input, "v:{}", field.value.canonical());
            let _ = writeln!(
                input,
                "prov:{}@{}:{}:{}",
                p.provider, p.provider_version, p.rule_id, p.confidence
            );
            for ev in &p.evidence {
                let _ = writeln!(input, "ev:{}|{}|{}", ev.kind, ev.reference, ev.note);
            }
        }
    }

    hex_u64(content_hash(input.as_bytes()))
}
