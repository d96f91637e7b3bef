//! Content-addressed identifiers for components and build targets.
//!
//! An identifier is derived only from a canonical key: a fixed, normalized
//! subset of a record's fields. Nothing else feeds into it, so the same
//! observation always produces the same id no matter how or when it was
//! inserted into a graph.
//!
//! - Components: if a purl is present it is the complete external identity
//!   (`purl=..;type=..`). Otherwise `type=..;ns=..;name=..;ver=..`.
//! - Targets: `bs=..;project=..;target=..;cfg=..`.
//!
//! Every field is passed through [`normalize_field`] before it enters a key,
//! and the key is hashed with 64-bit FNV-1a. Collisions are accepted given the
//! expected cardinality (thousands of entries per build).

use super::{Component, ComponentType};
use crate::utils::{fnv1a64, hex_u64, normalize_field};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every component id.
pub const COMPONENT_ID_PREFIX: &str = "cmp_";
/// Prefix of every target id.
pub const TARGET_ID_PREFIX: &str = "tgt_";

/// Stable identifier of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Wrap an existing key.
    ///
    /// Used for keys handed in by ingestion; normalization replaces them with
    /// hash-derived ids.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a build target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the canonical key of a component.
#[must_use]
pub fn canonical_component_key(
    component_type: ComponentType,
    namespace: &str,
    name: &str,
    version: &str,
    purl: &str,
) -> String {
    let purl = normalize_field(purl);
    if !purl.is_empty() {
        return format!("purl={purl};type={component_type}");
    }

    format!(
        "type={component_type};ns={};name={};ver={}",
        normalize_field(namespace),
        normalize_field(name),
        normalize_field(version)
    )
}

/// Build the canonical key of a build target.
#[must_use]
pub fn canonical_target_key(
    buildsystem: &str,
    project: &str,
    target_name: &str,
    configuration: &str,
) -> String {
    format!(
        "bs={};project={};target={};cfg={}",
        normalize_field(buildsystem),
        normalize_field(project),
        normalize_field(target_name),
        normalize_field(configuration)
    )
}

/// Compute a component id from its identity fields.
#[must_use]
pub fn make_component_id(
    component_type: ComponentType,
    namespace: &str,
    name: &str,
    version: &str,
    purl: &str,
) -> ComponentId {
    let key = canonical_component_key(component_type, namespace, name, version, purl);
    ComponentId(format!("{COMPONENT_ID_PREFIX}{}", hex_u64(fnv1a64(&key))))
}

/// Compute a target id from its identity fields.
#[must_use]
pub fn make_target_id(
    buildsystem: &str,
    project: &str,
    target_name: &str,
    configuration: &str,
) -> TargetId {
    let key = canonical_target_key(buildsystem, project, target_name, configuration);
    TargetId(format!("{TARGET_ID_PREFIX}{}", hex_u64(fnv1a64(&key))))
}

/// Recompute the id a component should have given its current fields.
#[must_use]
pub fn component_id_of(component: &Component) -> ComponentId {
    make_component_id(
        component.component_type,
        component.namespace.as_deref().unwrap_or_default(),
        &component.name,
        component.version.as_deref().unwrap_or_default(),
        component.purl.as_deref().unwrap_or_default(),
    )
}
