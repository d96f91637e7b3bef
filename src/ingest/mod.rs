//! Build-system ingestion.
//!
//! An ingestor reads whatever a build system leaves behind in its build
//! directory and produces a raw [`ProjectGraph`]: targets, target-to-target
//! edges, and raw-token edges for everything handed to the linker. Component
//! resolution is left to [`crate::normalize`].

mod cmake;

pub use cmake::CMakeFileApiIngestor;

use crate::error::{IngestErrorKind, LinkSbomError, Result};
use crate::model::ProjectGraph;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ingestion switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IngestOptions {
    /// Keep `UTILITY` targets (custom commands, `ALL_BUILD`, ...)
    pub include_utility_targets: bool,
    /// Record a SHA-256 checksum for artifacts present on disk
    pub hash_artifacts: bool,
}

/// A reader for one build system's metadata.
pub trait BuildIngestor {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Quick check whether this ingestor understands the directory.
    fn can_ingest(&self, build_dir: &Path) -> bool;

    /// Read the build directory into a raw graph.
    fn ingest(&self, build_dir: &Path, options: &IngestOptions) -> Result<ProjectGraph>;
}

/// All known ingestors, in the order they are tried
#[must_use]
pub fn ingestors() -> Vec<Box<dyn BuildIngestor>> {
    vec![Box::new(CMakeFileApiIngestor::new())]
}

/// Ingest a build directory with the first ingestor that recognizes it.
pub fn ingest(build_dir: &Path, options: &IngestOptions) -> Result<ProjectGraph> {
    let ingestor = ingestors()
        .into_iter()
        .find(|i| i.can_ingest(build_dir))
        .ok_or_else(|| {
            LinkSbomError::ingest(
                format!("at {}", build_dir.display()),
                IngestErrorKind::UnsupportedBuildDir(build_dir.display().to_string()),
            )
        })?;

    tracing::info!(
        "Ingesting {} with the {} ingestor",
        build_dir.display(),
        ingestor.name()
    );
    ingestor.ingest(build_dir, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unsupported_directory() {
        let dir = TempDir::new().unwrap();
        let err = ingest(dir.path(), &IngestOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            LinkSbomError::Ingest {
                source: IngestErrorKind::UnsupportedBuildDir(_),
                ..
            }
        ));
    }

    #[test]
    fn test_default_options() {
        let options = IngestOptions::default();
        assert!(!options.include_utility_targets);
        assert!(!options.hash_artifacts);
    }
}
