//! Build metadata ingestion stage.

use crate::ingest::{IngestOptions, ingest};
use crate::model::ProjectGraph;
use anyhow::{Context, Result};
use std::path::Path;

/// Read a build directory into a raw graph, with context for error messages.
pub fn ingest_build_dir(build_dir: &Path, options: &IngestOptions) -> Result<ProjectGraph> {
    if !build_dir.is_dir() {
        anyhow::bail!("build directory {} does not exist", build_dir.display());
    }

    let graph = ingest(build_dir, options)
        .with_context(|| format!("Failed to read build metadata in {}", build_dir.display()))?;

    tracing::info!(
        "Ingested {} targets and {} link edges (run {})",
        graph.targets.len(),
        graph.edges.len(),
        graph.context.run_id
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ingest_build_dir(&dir.path().join("absent"), &IngestOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_unrecognized_directory_has_context() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ingest_build_dir(dir.path(), &IngestOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read build metadata"));
    }
}
