//! Scan command handler.
//!
//! Implements the `scan` subcommand: build directory in, CycloneDX SBOM out.

use crate::config::{AppConfig, CliOverrides, Validatable, load_or_default};
use crate::pipeline::{
    OutputTarget, PipelineError, exit_codes, render_sbom, run_pipeline, write_output,
};
use anyhow::Result;
use std::path::PathBuf;

/// Inputs of the `scan` command
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    pub build_dir: PathBuf,
    /// Explicit `--config` path
    pub config_path: Option<PathBuf>,
    pub overrides: CliOverrides,
}

/// Resolve the effective configuration: file (or defaults), then flags.
pub fn resolve_config(scan: &ScanConfig) -> Result<AppConfig, PipelineError> {
    let (mut config, _) =
        load_or_default(scan.config_path.as_deref()).map_err(|e| PipelineError::Usage {
            reason: e.to_string(),
        })?;
    config.apply_overrides(&scan.overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        let reason = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(PipelineError::Usage {
            reason: format!("Invalid configuration: {reason}"),
        });
    }
    Ok(config)
}

/// Run the scan command.
///
/// Failures are returned as [`PipelineError`] inside the `anyhow` error so
/// the caller can map them to an exit status.
pub fn run_scan(scan: &ScanConfig) -> Result<i32> {
    let config = resolve_config(scan)?;

    let output = run_pipeline(&scan.build_dir, &config)?;

    let document = render_sbom(&output.graph, &output.overlay, config.output.pretty)
        .map_err(|source| PipelineError::OutputFailed { source })?;
    write_output(
        &document,
        &OutputTarget::from_option(config.output.file.clone()),
    )
    .map_err(|source| PipelineError::OutputFailed { source })?;

    tracing::info!(
        "Wrote {} components ({} variants merged, {} filtered out)",
        output.graph.component_count(),
        output.report.variants.merged,
        output.report.filtered.components_removed
    );
    Ok(exit_codes::SUCCESS)
}

/// Exit status for an error returned by a command handler.
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<PipelineError>()
        .map_or(exit_codes::ERROR, PipelineError::exit_code)
}
