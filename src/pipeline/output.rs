//! SBOM rendering and output.

use crate::enrichment::EnrichmentOverlay;
use crate::model::ProjectGraph;
use crate::reports::{CycloneDxWriter, SbomWriter};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }
}

/// Render the CycloneDX document.
///
/// An overlay without fields (enrichment disabled) adds nothing, so it is
/// passed through only when it carries data.
pub fn render_sbom(
    graph: &ProjectGraph,
    overlay: &EnrichmentOverlay,
    pretty: bool,
) -> Result<String> {
    let overlay = (overlay.field_count() > 0).then_some(overlay);
    let writer = CycloneDxWriter::new().pretty(pretty);
    writer
        .render(graph, overlay)
        .with_context(|| format!("Failed to render {} document", writer.format_name()))
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write SBOM to stdout")
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write SBOM to {}", path.display()))?;
            tracing::info!("SBOM written to {}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, ComponentType};

    #[test]
    fn test_output_target_from_option() {
        assert_eq!(OutputTarget::from_option(None), OutputTarget::Stdout);
        let path = PathBuf::from("sbom.json");
        assert_eq!(
            OutputTarget::from_option(Some(path.clone())),
            OutputTarget::File(path)
        );
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sbom.json");
        write_output("{}\n", &OutputTarget::File(path.clone())).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}\n");
    }

    #[test]
    fn test_write_output_to_missing_dir_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = OutputTarget::File(dir.path().join("missing").join("sbom.json"));
        assert!(write_output("{}", &target).is_err());
    }

    #[test]
    fn test_render_sbom() {
        let mut graph = ProjectGraph::default();
        graph.add_component(Component::new("zlib", ComponentType::Library));
        let doc = render_sbom(&graph, &EnrichmentOverlay::default(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["components"][0]["name"], "zlib");
    }
}
