//! Configuration types.

use crate::classify::{ClassifyConfig, FilterOptions, Platform};
use crate::enrichment::EnrichmentConfig;
use crate::ingest::IngestOptions;
use crate::normalize::{NormalizeOptions, VariantNormalizeOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration, one section per pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Link-token normalization
    pub normalize: NormalizeOptions,
    /// Debug/release variant collapsing
    pub variants: VariantNormalizeOptions,
    /// Origin classification
    pub classify: ClassifyConfig,
    /// Which origins end up in the SBOM
    pub filter: FilterOptions,
    /// Enrichment providers
    pub enrichment: EnrichmentConfig,
    /// Build metadata ingestion
    pub ingest: IngestOptions,
    /// Output settings
    pub output: OutputConfig,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the SBOM here instead of stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: None,
            pretty: true,
        }
    }
}

/// Values given on the command line.
///
/// `None` and `false` mean "not given", so the file value stays in effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub include_system: bool,
    pub include_project_local: bool,
    pub enrich: bool,
    pub platform: Option<Platform>,
    pub output: Option<PathBuf>,
    pub compact: bool,
}

impl AppConfig {
    /// Layer command-line values over this configuration.
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if overrides.include_system {
            self.filter.include_system = true;
        }
        if overrides.include_project_local {
            self.filter.include_project_local = true;
        }
        if overrides.enrich {
            self.enrichment.enabled = true;
        }
        if overrides.platform.is_some() {
            self.classify.platform = overrides.platform;
        }
        if overrides.output.is_some() {
            self.output.file.clone_from(&overrides.output);
        }
        if overrides.compact {
            self.output.pretty = false;
        }
    }

    /// Platform used for system-library classification.
    #[must_use]
    pub fn effective_platform(&self) -> Platform {
        self.classify.platform.unwrap_or_else(Platform::host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.output.pretty);
        assert!(config.output.file.is_none());
        assert!(!config.filter.include_system);
        assert!(!config.enrichment.enabled);
        assert!(config.variants.enable);
    }

    #[test]
    fn test_overrides_only_touch_given_values() {
        let mut config = AppConfig::default();
        config.enrichment.enabled = true;
        config.classify.platform = Some(Platform::Linux);

        config.apply_overrides(&CliOverrides {
            include_system: true,
            compact: true,
            ..CliOverrides::default()
        });

        assert!(config.filter.include_system);
        assert!(!config.filter.include_project_local);
        assert!(config.enrichment.enabled);
        assert!(!config.output.pretty);
        assert_eq!(config.effective_platform(), Platform::Linux);
    }

    #[test]
    fn test_platform_override() {
        let mut config = AppConfig::default();
        config.apply_overrides(&CliOverrides {
            platform: Some(Platform::Windows),
            output: Some(PathBuf::from("sbom.json")),
            ..CliOverrides::default()
        });
        assert_eq!(config.effective_platform(), Platform::Windows);
        assert_eq!(config.output.file, Some(PathBuf::from("sbom.json")));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "filter:\n  include_system: true\noutput:\n  pretty: false\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.filter.include_system);
        assert!(!config.output.pretty);
        assert_eq!(config.normalize, NormalizeOptions::default());
        assert_eq!(config.classify, ClassifyConfig::default());
    }
}
