//! Core graph data structures: components, targets, edges.

use super::{
    Artifact, Checksum, ComponentId, ComponentOrigin, ComponentType, LicenseInfo, Linkage, Scope,
    SourceRef, TargetId, TargetKind, component_id_of,
};
use crate::utils::{content_hash, hex_u64};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A third-party, system, or project library observed in the build.
///
/// Owned by the graph's component table. Edges refer to it by id only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Identifier; equals the table key once the graph is normalized
    pub id: ComponentId,
    pub name: String,
    pub namespace: Option<String>,
    pub version: Option<String>,
    pub component_type: ComponentType,
    pub origin: ComponentOrigin,
    /// Package URL; when present it is the whole identity
    pub purl: Option<String>,
    pub cpe: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub supplier: Option<String>,
    pub license: LicenseInfo,
    pub checksums: Vec<Checksum>,
    pub linkage: Option<Linkage>,
    /// Tool-specific metadata, insertion ordered, unique keys
    pub properties: IndexMap<String, String>,
    /// Evidence trail
    pub sources: Vec<SourceRef>,
}

impl Component {
    /// Create a component with its canonical id already computed.
    #[must_use]
    pub fn new(name: impl Into<String>, component_type: ComponentType) -> Self {
        let mut component = Self {
            name: name.into(),
            component_type,
            ..Self::default()
        };
        component.refresh_id();
        component
    }

    /// Recompute `id` from the current identity fields.
    pub fn refresh_id(&mut self) {
        self.id = component_id_of(self);
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self.refresh_id();
        self
    }

    #[must_use]
    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = Some(purl.into());
        self.refresh_id();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.sources.push(source);
        self
    }

    #[must_use]
    pub const fn with_origin(mut self, origin: ComponentOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Get display name with version
    #[must_use]
    pub fn display_name(&self) -> String {
        self.version
            .as_ref()
            .map_or_else(|| self.name.clone(), |v| format!("{}@{}", self.name, v))
    }
}

/// A target defined by the build system (executable, library, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub id: TargetId,
    pub name: String,
    pub kind: TargetKind,
    pub configuration: Option<String>,
    pub toolchain: Option<String>,
    pub platform: Option<String>,
    pub include_dirs: Vec<String>,
    pub compile_definitions: Vec<String>,
    pub compile_options: Vec<String>,
    pub outputs: Vec<Artifact>,
    pub sources: Vec<SourceRef>,
}

impl BuildTarget {
    #[must_use]
    pub fn new(id: TargetId, name: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            ..Self::default()
        }
    }
}

/// A dependency of a target, either resolved or still carrying its raw token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Originating target
    pub from: TargetId,
    pub to_target: Option<TargetId>,
    pub to_component: Option<ComponentId>,
    pub scope: Scope,
    pub linkage: Linkage,
    /// Raw evidence, e.g. the linker token; kept after resolution
    pub raw: Option<String>,
    pub sources: Vec<SourceRef>,
}

impl DependencyEdge {
    /// Edge carrying only a raw token, to be resolved by normalization.
    #[must_use]
    pub fn raw(from: TargetId, token: impl Into<String>) -> Self {
        Self {
            from,
            raw: Some(token.into()),
            ..Self::default()
        }
    }

    /// Edge already resolved to a component.
    #[must_use]
    pub fn to_component(from: TargetId, component: ComponentId) -> Self {
        Self {
            from,
            to_component: Some(component),
            ..Self::default()
        }
    }

    /// Edge already resolved to another target.
    #[must_use]
    pub fn to_target(from: TargetId, target: TargetId) -> Self {
        Self {
            from,
            to_target: Some(target),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.to_component.is_some() || self.to_target.is_some()
    }
}

/// Where and how the graph was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionContext {
    pub run_id: String,
    pub root_directory: String,
    pub build_directory: String,
    pub generator: Option<String>,
    pub cmake_version: Option<String>,
    pub environment: BTreeMap<String, String>,
    pub sources: Vec<SourceRef>,
}

/// The whole build observation: targets, components, and edges between them.
///
/// Tables are ordered by key so that every traversal is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGraph {
    pub context: ResolutionContext,
    /// Key = `TargetId` value
    pub targets: BTreeMap<String, BuildTarget>,
    /// Key = `ComponentId` value
    pub components: BTreeMap<String, Component>,
    pub edges: Vec<DependencyEdge>,
    pub warnings: Vec<String>,
}

impl ProjectGraph {
    #[must_use]
    pub fn new(context: ResolutionContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Insert a target under its own id, returning any target it replaced.
    pub fn add_target(&mut self, target: BuildTarget) -> Option<BuildTarget> {
        self.targets.insert(target.id.value().to_string(), target)
    }

    /// Insert a component under its own id, returning any component it replaced.
    pub fn add_component(&mut self, component: Component) -> Option<Component> {
        self.components
            .insert(component.id.value().to_string(), component)
    }

    pub fn add_edge(&mut self, edge: DependencyEdge) {
        self.edges.push(edge);
    }

    /// Record and log a warning once; repeated runs of a pass do not
    /// duplicate it. Returns whether the warning was new.
    pub fn push_warning(&mut self, warning: impl Into<String>) -> bool {
        let warning = warning.into();
        if self.warnings.contains(&warning) {
            return false;
        }
        tracing::warn!("{warning}");
        self.warnings.push(warning);
        true
    }

    #[must_use]
    pub fn get_component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id.value())
    }

    /// First component with exactly this name, in key order.
    #[must_use]
    pub fn find_component_by_name(&self, name: &str) -> Option<&Component> {
        self.components.values().find(|c| c.name == name)
    }

    /// Edges pointing at a component
    #[must_use]
    pub fn edges_to_component(&self, id: &ComponentId) -> Vec<&DependencyEdge> {
        self.edges
            .iter()
            .filter(|e| e.to_component.as_ref() == Some(id))
            .collect()
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn unresolved_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !e.is_resolved()).count()
    }

    /// List violations of self-consistency and referential integrity.
    ///
    /// Empty for every graph that went through `normalize_graph`.
    #[must_use]
    pub fn consistency_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (key, component) in &self.components {
            let expected = component_id_of(component);
            if expected.value() != key {
                violations.push(format!(
                    "component '{}' stored under {key} but hashes to {expected}",
                    component.name
                ));
            }
            if component.id.value() != key {
                violations.push(format!(
                    "component '{}' carries id {} but is stored under {key}",
                    component.name, component.id
                ));
            }
        }

        for (index, edge) in self.edges.iter().enumerate() {
            if let Some(id) = &edge.to_component
                && !self.components.contains_key(id.value())
            {
                violations.push(format!("edge #{index} points at missing component {id}"));
            }
            if let Some(id) = &edge.to_target
                && !self.targets.contains_key(id.value())
            {
                violations.push(format!("edge #{index} points at missing target {id}"));
            }
        }

        violations
    }

    /// Distinct target names, used by project-local classification.
    #[must_use]
    pub fn target_names(&self) -> HashSet<&str> {
        self.targets
            .values()
            .map(|t| t.name.as_str())
            .filter(|n| !n.is_empty())
            .collect()
    }

    /// Content fingerprint of the identity-relevant parts of the graph.
    ///
    /// Enrichment overlays record it so they can be matched to the graph they
    /// were computed from.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut input = String::new();

        for (id, c) in &self.components {
            push_line(&mut input, "C", id);
            push_line(&mut input, "N", &c.name);
            push_line(&mut input, "T", c.component_type.as_str());
            push_line(&mut input, "O", c.origin.as_str());
            if let Some(v) = &c.version {
                push_line(&mut input, "V", v);
            }
        }

        for (id, t) in &self.targets {
            push_line(&mut input, "TGT", id);
            push_line(&mut input, "K", &format!("{:?}", t.kind));
            for (tag, value) in [
                ("CFG", &t.configuration),
                ("TC", &t.toolchain),
                ("PLAT", &t.platform),
            ] {
                if let Some(v) = value {
                    push_line(&mut input, tag, v);
                }
            }
        }

        for e in &self.edges {
            push_line(&mut input, "E", e.from.value());
            if let Some(t) = &e.to_target {
                push_line(&mut input, "ET", t.value());
            }
            if let Some(c) = &e.to_component {
                push_line(&mut input, "EC", c.value());
            }
            push_line(&mut input, "S", &format!("{:?}", e.scope));
            push_line(&mut input, "L", &format!("{:?}", e.linkage));
        }

        hex_u64(content_hash(input.as_bytes()))
    }
}

fn push_line(buf: &mut String, tag: &str, value: &str) {
    buf.push_str(tag);
    buf.push(':');
    buf.push_str(value);
    buf.push('\n');
}
