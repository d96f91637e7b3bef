//! Enrichment traits for extensibility.

use super::EnrichmentOverlay;
use crate::model::ProjectGraph;

/// A source of extra component metadata.
///
/// Providers read the graph and append fields to the overlay. They must be
/// deterministic: the same graph yields the same fields in the same order.
///
/// ```ignore
/// let provider: Box<dyn EnrichmentProvider> = if config.build_context {
///     Box::new(BuildContextProvider)
/// } else {
///     Box::new(NoOpProvider)
/// };
/// provider.enrich(&graph, &mut overlay);
/// ```
pub trait EnrichmentProvider {
    /// Provider name recorded in provenance
    fn name(&self) -> &'static str;

    /// Provider version recorded in provenance
    fn version(&self) -> &'static str;

    fn enrich(&self, graph: &ProjectGraph, overlay: &mut EnrichmentOverlay);
}

/// A provider that adds nothing.
///
/// Used when enrichment is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProvider;

impl EnrichmentProvider for NoOpProvider {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn version(&self) -> &'static str {
        "0"
    }

    fn enrich(&self, _graph: &ProjectGraph, _overlay: &mut EnrichmentOverlay) {}
}
