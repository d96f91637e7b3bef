//! **Deterministic SBOM generation from build-system link data.**
//!
//! `linksbom` reads what a build actually links (the CMake File API reply
//! directory), turns every raw link token into a content-addressed component,
//! and normalizes the resulting graph until it is stable: duplicate spellings
//! of a library collapse into one component, debug variants fold into their
//! release counterpart, and each component gets an origin (project-local,
//! system, third-party). The result is written as CycloneDX JSON.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: [`ProjectGraph`] with its targets, components and edges,
//!   and the canonical keys components are identified by.
//! - **[`ingest`]**: readers for build metadata.
//! - **[`normalize`]**: token normalization, graph resolution, variant
//!   collapsing, and the re-keying pass they share.
//! - **[`classify`]**: origin classification and filtering.
//! - **[`enrichment`]**: read-only overlays of extra per-component metadata.
//! - **[`reports`]**: the CycloneDX writer.
//! - **[`pipeline`]**: the stages wired together in their fixed order.
//!
//! ## Normalizing a graph
//!
//! ```
//! use linksbom::{DependencyEdge, NormalizeOptions, ProjectGraph, TargetId, normalize_graph};
//!
//! let mut graph = ProjectGraph::default();
//! let app = TargetId::new("tgt_app");
//! graph.add_edge(DependencyEdge::raw(app.clone(), "-lssl"));
//! graph.add_edge(DependencyEdge::raw(app, "/usr/lib/libssl.so"));
//!
//! normalize_graph(&mut graph, &NormalizeOptions::default());
//!
//! assert_eq!(graph.component_count(), 1);
//! assert_eq!(graph.unresolved_edge_count(), 0);
//! ```
//!
//! ## Scanning a build directory
//!
//! ```no_run
//! use linksbom::config::AppConfig;
//! use linksbom::pipeline::{render_sbom, run_pipeline};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     let output = run_pipeline(Path::new("build"), &config)?;
//!     let json = render_sbom(&output.graph, &output.overlay, true)?;
//!     print!("{json}");
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod reports;
pub mod utils;

// Re-export main types for convenience
pub use classify::{Classifier, FilterOptions, Platform, classify_components, filter_components};
pub use config::AppConfig;
pub use enrichment::{EnrichmentConfig, EnrichmentOverlay, enrich};
pub use error::{LinkSbomError, Result};
pub use ingest::{IngestOptions, ingest};
pub use model::{
    BuildTarget, Component, ComponentId, ComponentOrigin, ComponentType, DependencyEdge,
    ProjectGraph, TargetId,
};
pub use normalize::{
    NormalizeOptions, VariantNormalizeOptions, component_from_link_token,
    normalize_build_variants, normalize_graph,
};
pub use reports::{CycloneDxWriter, SbomWriter};
