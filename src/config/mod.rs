//! Configuration for linksbom.
//!
//! Settings come from an optional YAML file, found by
//! [`discover_config_file`], with command-line flags layered on top through
//! [`AppConfig::apply_overrides`].
//!
//! # Configuration File
//!
//! Place a `.linksbom.yaml` file in the working directory or in
//! `~/.config/linksbom/`:
//!
//! ```yaml
//! classify:
//!   platform: windows
//!   extra_system_libraries: [dbghelp, version]
//! filter:
//!   include_system: true
//! enrichment:
//!   enabled: true
//! ```

pub mod file;
mod types;
mod validation;

pub use file::{
    CONFIG_FILE_NAMES, ConfigFileError, discover_config_file, generate_example_config,
    load_config_file, load_or_default,
};
pub use types::{AppConfig, CliOverrides, OutputConfig};
pub use validation::{ConfigError, Validatable};

/// Generate a JSON Schema for the configuration file format.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_sections() {
        let schema: serde_json::Value = serde_json::from_str(&generate_json_schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for section in [
            "normalize",
            "variants",
            "classify",
            "filter",
            "enrichment",
            "ingest",
            "output",
        ] {
            assert!(properties.contains_key(section), "missing {section}");
        }
    }
}
