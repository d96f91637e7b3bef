//! Graph model for build-derived dependency data.
//!
//! Ingestion produces a [`ProjectGraph`] with provisional keys and raw link
//! tokens. The normalization passes turn it into a graph where every table key
//! is the content-addressed id of its record:
//!
//! ```ignore
//! let mut graph = ingest(&build_dir, &IngestOptions::default())?;
//! normalize_graph(&mut graph, &NormalizeOptions::default());
//! assert!(graph.consistency_violations().is_empty());
//! ```

mod graph;
mod identifiers;
mod metadata;

pub use graph::*;
pub use identifiers::*;
pub use metadata::*;
