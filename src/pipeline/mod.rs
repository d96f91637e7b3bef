//! Pipeline orchestration.
//!
//! Runs the stages in their fixed order:
//! ingest → normalize → classify → variants → classify → filter → enrich → write.
//! Command handlers call [`run_pipeline`] or the individual stages.

mod ingest_stage;
mod normalize_stage;
mod output;

pub use ingest_stage::ingest_build_dir;
pub use normalize_stage::{NormalizeReport, normalize_and_classify};
pub use output::{OutputTarget, render_sbom, write_output};

use crate::config::AppConfig;
use crate::enrichment::{EnrichmentOverlay, enrich};
use crate::model::ProjectGraph;
use std::path::Path;

/// Structured pipeline error types, each mapping to an exit status.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Bad arguments or configuration
    #[error("{reason}")]
    Usage { reason: String },

    /// Build metadata could not be read
    #[error("Ingestion failed for {path}")]
    IngestFailed {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Rendering or writing the SBOM failed
    #[error("Output failed")]
    OutputFailed {
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// Process exit status for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } => exit_codes::USAGE,
            Self::IngestFailed { .. } | Self::OutputFailed { .. } => exit_codes::ERROR,
        }
    }
}

/// Exit codes
pub mod exit_codes {
    /// SBOM written
    pub const SUCCESS: i32 = 0;
    /// Bad arguments or invalid configuration
    pub const USAGE: i32 = 1;
    /// Ingestion or any other fatal error
    pub const ERROR: i32 = 2;
}

/// Everything the pipeline produced for one build directory.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub graph: ProjectGraph,
    pub overlay: EnrichmentOverlay,
    pub report: NormalizeReport,
}

/// Ingest, normalize, classify, filter and enrich one build directory.
pub fn run_pipeline(
    build_dir: &Path,
    config: &AppConfig,
) -> Result<PipelineOutput, PipelineError> {
    let mut graph =
        ingest_build_dir(build_dir, &config.ingest).map_err(|source| PipelineError::IngestFailed {
            path: build_dir.display().to_string(),
            source,
        })?;

    let report = normalize_and_classify(&mut graph, config);
    let overlay = enrich(&graph, &config.enrichment);

    Ok(PipelineOutput {
        graph,
        overlay,
        report,
    })
}
