//! Overlay data types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value of an enrichment field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<String>),
}

impl MetaValue {
    /// Type-tagged rendering, used for hashing so `"1"` and `1` differ.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::String(s) => format!("s:{s}"),
            Self::Bool(b) => format!("b:{}", u8::from(*b)),
            Self::Int(i) => format!("i:{i}"),
            Self::Float(f) => format!("d:{f}"),
            Self::List(items) => format!("a[{}]", items.join(",")),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// One observation backing a field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Evidence {
    /// e.g. `target`, `path`, `manifest`
    pub kind: String,
    pub reference: String,
    pub note: String,
}

impl Evidence {
    pub fn new(
        kind: impl Into<String>,
        reference: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            reference: reference.into(),
            note: note.into(),
        }
    }
}

/// Who produced a field, by which rule, and from what
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub provider: String,
    pub provider_version: String,
    pub rule_id: String,
    pub confidence: f64,
    /// Sorted
    pub evidence: Vec<Evidence>,
}

/// A single enrichment field attached to a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaField {
    /// Namespaced key, e.g. `linksbom:enrich.build.configurations`
    pub key: String,
    pub value: MetaValue,
    pub provenance: Provenance,
}

/// Read-only metadata computed alongside a graph.
///
/// Keyed by component id. The graph itself is never modified; writers merge
/// the overlay in at output time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentOverlay {
    /// Fingerprint of the graph the overlay was computed from
    pub model_fingerprint: String,
    pub component_fields: BTreeMap<String, Vec<MetaField>>,
    /// Hash over the fingerprint and every field; empty until computed
    pub overlay_hash: String,
}

impl EnrichmentOverlay {
    #[must_use]
    pub fn fields_for(&self, component_id: &str) -> &[MetaField] {
        self.component_fields
            .get(component_id)
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.component_fields.values().map(Vec::len).sum()
    }
}
