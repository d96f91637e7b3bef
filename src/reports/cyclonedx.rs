//! CycloneDX 1.5 JSON writer.

use super::SbomWriter;
use crate::enrichment::EnrichmentOverlay;
use crate::error::{LinkSbomError, ReportErrorKind, Result};
use crate::model::{Component, ComponentType, ProjectGraph};
use serde::Serialize;

const SPEC_VERSION: &str = "1.5";
/// Property carrying the classified origin
pub const ORIGIN_PROPERTY: &str = "linksbom:origin";

/// Writes a graph as a CycloneDX JSON document.
///
/// Components are emitted in id order, and nothing time- or host-dependent
/// is included, so the same graph always produces the same bytes.
#[derive(Debug, Clone, Copy)]
pub struct CycloneDxWriter {
    pretty: bool,
}

impl CycloneDxWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for CycloneDxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomWriter for CycloneDxWriter {
    fn format_name(&self) -> &'static str {
        "CycloneDX"
    }

    fn render(&self, graph: &ProjectGraph, overlay: Option<&EnrichmentOverlay>) -> Result<String> {
        let mut components: Vec<&Component> = graph.components.values().collect();
        components.sort_by(|a, b| a.id.cmp(&b.id));

        let bom = CdxBom {
            bom_format: "CycloneDX",
            spec_version: SPEC_VERSION,
            version: 1,
            metadata: CdxMetadata {
                tools: vec![CdxTool {
                    vendor: env!("CARGO_PKG_NAME"),
                    name: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                }],
            },
            components: components
                .into_iter()
                .map(|c| CdxComponent::from_component(c, overlay))
                .collect(),
        };

        let mut json = if self.pretty {
            serde_json::to_string_pretty(&bom)
        } else {
            serde_json::to_string(&bom)
        }
        .map_err(|e| {
            LinkSbomError::report(
                "serializing CycloneDX document",
                ReportErrorKind::JsonSerializationError(e.to_string()),
            )
        })?;
        json.push('\n');
        Ok(json)
    }
}

/// CycloneDX component type for a component
#[must_use]
pub const fn cyclonedx_type(component_type: ComponentType) -> &'static str {
    match component_type {
        ComponentType::Executable => "application",
        ComponentType::System => "operating-system",
        ComponentType::Framework => "framework",
        ComponentType::Tool => "tool",
        ComponentType::Library | ComponentType::HeaderOnly | ComponentType::Unknown => "library",
    }
}

// ============================================================================
// Output structures
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CdxBom<'a> {
    bom_format: &'static str,
    spec_version: &'static str,
    version: u32,
    metadata: CdxMetadata,
    components: Vec<CdxComponent<'a>>,
}

#[derive(Serialize)]
struct CdxMetadata {
    tools: Vec<CdxTool>,
}

#[derive(Serialize)]
struct CdxTool {
    vendor: &'static str,
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct CdxComponent<'a> {
    #[serde(rename = "type")]
    component_type: &'static str,
    #[serde(rename = "bom-ref")]
    bom_ref: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supplier: Option<CdxSupplier<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpe: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<CdxLicenseChoice<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<CdxHash<'a>>,
    properties: Vec<CdxProperty>,
}

impl<'a> CdxComponent<'a> {
    fn from_component(c: &'a Component, overlay: Option<&EnrichmentOverlay>) -> Self {
        let mut properties = vec![CdxProperty {
            name: ORIGIN_PROPERTY.to_string(),
            value: c.origin.to_string(),
        }];
        properties.extend(c.properties.iter().map(|(k, v)| CdxProperty {
            name: k.clone(),
            value: v.clone(),
        }));
        if let Some(overlay) = overlay {
            properties.extend(overlay.fields_for(c.id.value()).iter().map(|f| CdxProperty {
                name: f.key.clone(),
                value: f.value.to_string(),
            }));
        }

        let mut licenses = Vec::new();
        if let Some(expression) = c.license.expression.as_deref() {
            licenses.push(CdxLicenseChoice::Expression { expression });
        } else if let Some(id) = c.license.spdx_id.as_deref() {
            licenses.push(CdxLicenseChoice::License {
                license: CdxLicense { id },
            });
        }

        Self {
            component_type: cyclonedx_type(c.component_type),
            bom_ref: c.id.value(),
            name: &c.name,
            group: c.namespace.as_deref(),
            version: c.version.as_deref(),
            description: c.description.as_deref(),
            supplier: c.supplier.as_deref().map(|name| CdxSupplier { name }),
            purl: c.purl.as_deref(),
            cpe: c.cpe.as_deref(),
            licenses,
            hashes: c
                .checksums
                .iter()
                .map(|h| CdxHash {
                    alg: &h.algorithm,
                    content: &h.value,
                })
                .collect(),
            properties,
        }
    }
}

#[derive(Serialize)]
struct CdxSupplier<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum CdxLicenseChoice<'a> {
    License { license: CdxLicense<'a> },
    Expression { expression: &'a str },
}

#[derive(Serialize)]
struct CdxLicense<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct CdxHash<'a> {
    alg: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CdxProperty {
    name: String,
    value: String,
}
