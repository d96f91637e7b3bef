//! Error types for linksbom.
//!
//! Normalization and classification cannot fail. Errors come from the edges
//! of the pipeline: reading build metadata and writing the SBOM.
//! Configuration failures are reported through `config::ConfigFileError`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for linksbom operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LinkSbomError {
    /// Errors while reading build-system metadata
    #[error("Failed to ingest build metadata: {context}")]
    Ingest {
        context: String,
        #[source]
        source: IngestErrorKind,
    },

    /// Errors during SBOM generation
    #[error("SBOM generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Specific ingestion error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestErrorKind {
    #[error("No ingestor recognizes build directory {0}")]
    UnsupportedBuildDir(String),

    #[error("CMake File API reply directory not found: {0}")]
    MissingReplyDir(String),

    #[error("No index file in reply directory {0}")]
    MissingIndex(String),

    #[error("Index does not reference a codemodel (version 2) object")]
    MissingCodemodel,

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for linksbom operations
pub type Result<T> = std::result::Result<T, LinkSbomError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl LinkSbomError {
    /// Create an ingestion error with context
    pub fn ingest(context: impl Into<String>, source: IngestErrorKind) -> Self {
        Self::Ingest {
            context: context.into(),
            source,
        }
    }

    /// Create an ingestion error for a missing JSON field
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::ingest(
            "missing required field",
            IngestErrorKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for LinkSbomError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for LinkSbomError {
    fn from(err: serde_json::Error) -> Self {
        Self::ingest(
            "JSON deserialization",
            IngestErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// ```ignore
/// use linksbom::error::ErrorContext;
///
/// let index = read_json(&path).with_context(|| format!("reading {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error, prepended to any existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<LinkSbomError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: LinkSbomError, new_ctx: &str) -> LinkSbomError {
    match err {
        LinkSbomError::Ingest {
            context: existing,
            source,
        } => LinkSbomError::Ingest {
            context: chain_context(new_ctx, &existing),
            source,
        },
        LinkSbomError::Report {
            context: existing,
            source,
        } => LinkSbomError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        LinkSbomError::Io {
            path,
            message,
            source,
        } => LinkSbomError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
    }
}

/// `"new: existing"`, or just `new` when there is nothing to chain onto.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
