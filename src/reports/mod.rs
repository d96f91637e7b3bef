//! SBOM writers.
//!
//! Writers take the normalized graph plus an optional enrichment overlay and
//! render a document. The graph is borrowed immutably; overlay fields are
//! merged in at render time only.

mod cyclonedx;

pub use cyclonedx::{CycloneDxWriter, ORIGIN_PROPERTY, cyclonedx_type};

use crate::enrichment::EnrichmentOverlay;
use crate::error::Result;
use crate::model::ProjectGraph;
use std::io::Write;

/// Trait for SBOM document writers
pub trait SbomWriter {
    /// Human-readable name of the output format
    fn format_name(&self) -> &'static str;

    /// Render the graph into a document string
    fn render(&self, graph: &ProjectGraph, overlay: Option<&EnrichmentOverlay>) -> Result<String>;

    /// Render straight into a writer
    fn write_to(
        &self,
        graph: &ProjectGraph,
        overlay: Option<&EnrichmentOverlay>,
        out: &mut dyn Write,
    ) -> Result<()> {
        let document = self.render(graph, overlay)?;
        out.write_all(document.as_bytes())?;
        Ok(())
    }
}
