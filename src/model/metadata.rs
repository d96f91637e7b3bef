//! Enumerations and small value types shared by components and targets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-level precedence order: an unset bottom value below every concrete one.
///
/// Merges and classifiers only ever move a value up from the bottom, which
/// keeps classification monotonic regardless of merge order.
pub trait Precedence: Sized + Clone {
    /// Whether this value is the bottom of the order.
    fn is_unset(&self) -> bool;

    /// Adopt `other` only if `self` is still unset.
    ///
    /// Returns `true` when the value changed.
    fn refine_from(&mut self, other: &Self) -> bool {
        if self.is_unset() && !other.is_unset() {
            *self = other.clone();
            true
        } else {
            false
        }
    }
}

/// Component type classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Library,
    Executable,
    HeaderOnly,
    Framework,
    Tool,
    System,
    #[default]
    Unknown,
}

impl ComponentType {
    /// Stable string used in canonical keys. Changing it changes every id.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::Executable => "executable",
            Self::HeaderOnly => "header-only",
            Self::Framework => "framework",
            Self::Tool => "tool",
            Self::System => "system",
            Self::Unknown => "unknown",
        }
    }
}

impl Precedence for ComponentType {
    fn is_unset(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a component comes from, relative to the project being scanned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentOrigin {
    #[default]
    Unknown,
    System,
    ThirdParty,
    ProjectLocal,
}

impl ComponentOrigin {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::System => "system",
            Self::ThirdParty => "third-party",
            Self::ProjectLocal => "project-local",
        }
    }
}

impl Precedence for ComponentOrigin {
    fn is_unset(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for ComponentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dependency scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    #[default]
    Runtime,
    Build,
    Test,
    Dev,
    Optional,
}

/// How a dependency is linked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Linkage {
    Static,
    Shared,
    Interface,
    #[default]
    Unknown,
}

/// Build target kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    Executable,
    StaticLibrary,
    SharedLibrary,
    ModuleLibrary,
    InterfaceLibrary,
    ObjectLibrary,
    Utility,
    #[default]
    Unknown,
}

impl TargetKind {
    /// Map a CMake File API target `type` string.
    #[must_use]
    pub fn from_cmake_type(value: &str) -> Self {
        match value {
            "EXECUTABLE" => Self::Executable,
            "STATIC_LIBRARY" => Self::StaticLibrary,
            "SHARED_LIBRARY" => Self::SharedLibrary,
            "MODULE_LIBRARY" => Self::ModuleLibrary,
            "INTERFACE_LIBRARY" => Self::InterfaceLibrary,
            "OBJECT_LIBRARY" => Self::ObjectLibrary,
            "UTILITY" => Self::Utility,
            _ => Self::Unknown,
        }
    }
}

/// Provenance record: where a fact was observed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRef {
    /// Observing system, e.g. `cmake`, `link-token`, `vcpkg`
    pub system: String,
    /// File path, object id, or token
    pub reference: String,
    /// Optional line number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl SourceRef {
    #[must_use]
    pub fn new(system: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            reference: reference.into(),
            line: None,
        }
    }

    #[must_use]
    pub const fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// Checksum of an artifact or component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum {
    /// Algorithm name, e.g. `SHA-256`
    pub algorithm: String,
    /// Hex encoded digest
    pub value: String,
}

impl Checksum {
    #[must_use]
    pub fn new(algorithm: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            value: value.into(),
        }
    }
}

/// License information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub spdx_id: Option<String>,
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}

impl LicenseInfo {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.spdx_id.is_none() && self.expression.is_none()
    }
}

/// Build output artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Slash-normalized path
    pub path: String,
    pub checksum: Option<Checksum>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}
