//! Collapse build-variant duplicates of the same library.
//!
//! A debug artifact (`.../debug/lib/fmtd.lib`) and its release counterpart
//! (`fmt.lib`) are one logical dependency. Components whose evidence points
//! into a debug tree are tagged, MSVC's trailing `d` is stripped, and the
//! table is re-keyed so the two observations merge. Every decision is kept
//! in accumulating properties.
//!
//! The `d` is only stripped while the name still equals the stem of a
//! `.lib` artifact in the evidence (optionally `lib`-prefixed). A name that
//! merely ends in `d` is left alone, so running the pass again never strips
//! a second character.

use super::merge_component;
use super::rekey::{RekeyStats, rekey_components};
use crate::model::{Component, ProjectGraph};
use crate::utils::{ends_with_ignore_ascii_case, normalize_slashes};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Variant tag property (`debug`)
pub const VARIANT_PROPERTY: &str = "linksbom:variant";
/// Evidence behind the variant tag
pub const VARIANT_EVIDENCE_PROPERTY: &str = "linksbom:variant.evidence";
/// Name before the debug suffix was stripped
pub const VARIANT_ORIGINAL_NAME_PROPERTY: &str = "linksbom:variant.original-name";

const ACCUMULATING_PROPERTIES: [&str; 3] = [
    VARIANT_PROPERTY,
    VARIANT_EVIDENCE_PROPERTY,
    VARIANT_ORIGINAL_NAME_PROPERTY,
];

const DEBUG_PATH_MARKER: &str = "/debug/";
const LIB_EXTENSION: &str = ".lib";

/// Variant normalization switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VariantNormalizeOptions {
    /// Run the pass at all
    pub enable: bool,
    /// Treat evidence under a `/debug/` directory as a debug build
    pub infer_debug_from_paths: bool,
    /// Strip MSVC's `d` suffix from debug `.lib` artifacts
    pub msvc_strip_debug_suffix_d: bool,
    /// Record tags and evidence as component properties
    pub record_evidence_in_properties: bool,
}

impl Default for VariantNormalizeOptions {
    fn default() -> Self {
        Self {
            enable: true,
            infer_debug_from_paths: true,
            msvc_strip_debug_suffix_d: true,
            record_evidence_in_properties: true,
        }
    }
}

/// Append `value` to a `;`-separated property, skipping duplicates.
pub fn prop_append(properties: &mut IndexMap<String, String>, key: &str, value: &str) {
    match properties.get_mut(key) {
        Some(current) if !current.is_empty() => {
            if !current.split(';').any(|existing| existing == value) {
                current.push(';');
                current.push_str(value);
            }
        }
        Some(current) => value.clone_into(current),
        None => {
            properties.insert(key.to_string(), value.to_string());
        }
    }
}

/// Tag debug variants, strip MSVC debug suffixes, and merge the results.
pub fn normalize_build_variants(
    graph: &mut ProjectGraph,
    options: &VariantNormalizeOptions,
) -> RekeyStats {
    if !options.enable {
        return RekeyStats::default();
    }

    let stats = rekey_components(
        graph,
        |component| canonicalize_variant(component, options),
        merge_variant,
    );

    tracing::info!(
        "Variant normalization: {} components re-keyed, {} merged",
        stats.rekeyed,
        stats.merged
    );
    stats
}

fn canonicalize_variant(component: &mut Component, options: &VariantNormalizeOptions) {
    let debug = options.infer_debug_from_paths && has_debug_evidence(component);
    if !debug {
        return;
    }
    if options.record_evidence_in_properties {
        prop_append(&mut component.properties, VARIANT_PROPERTY, "debug");
        prop_append(
            &mut component.properties,
            VARIANT_EVIDENCE_PROPERTY,
            "path:/debug/",
        );
    }

    if options.msvc_strip_debug_suffix_d && names_msvc_debug_lib(component) {
        if options.record_evidence_in_properties {
            prop_append(
                &mut component.properties,
                VARIANT_EVIDENCE_PROPERTY,
                "msvc-suffix-d",
            );
            prop_append(
                &mut component.properties,
                VARIANT_ORIGINAL_NAME_PROPERTY,
                &component.name,
            );
        }
        tracing::debug!("stripping debug suffix from '{}'", component.name);
        component.name.pop();
    }
}

fn has_debug_evidence(component: &Component) -> bool {
    component.sources.iter().any(|s| {
        normalize_slashes(&s.reference)
            .to_ascii_lowercase()
            .contains(DEBUG_PATH_MARKER)
    })
}

/// Whether the current name still is the stem of a `.lib` artifact ending
/// in `d`. Once stripped, the name no longer matches, so a second pass leaves
/// it alone.
fn names_msvc_debug_lib(component: &Component) -> bool {
    let name = &component.name;
    if name.len() <= 1 || !name.ends_with('d') {
        return false;
    }
    component.sources.iter().any(|s| {
        let path = normalize_slashes(s.reference.trim());
        let file = path.rsplit('/').next().unwrap_or_default();
        if file.len() <= LIB_EXTENSION.len() || !ends_with_ignore_ascii_case(file, LIB_EXTENSION) {
            return false;
        }
        let stem = &file[..file.len() - LIB_EXTENSION.len()];
        stem.eq_ignore_ascii_case(name)
            || stem
                .strip_prefix("lib")
                .is_some_and(|rest| rest.eq_ignore_ascii_case(name))
    })
}

fn merge_variant(dst: &mut Component, incoming: &Component) {
    merge_component(dst, incoming);
    for key in ACCUMULATING_PROPERTIES {
        if let Some(values) = incoming.properties.get(key) {
            for value in values.split(';').filter(|v| !v.is_empty()) {
                prop_append(&mut dst.properties, key, value);
            }
        }
    }
}
