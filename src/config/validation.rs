//! Configuration validation.

use super::types::{AppConfig, OutputConfig};
use crate::classify::ClassifyConfig;

// ============================================================================
// Configuration Error
// ============================================================================

/// A single invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// Dotted path of the offending field
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.classify.validate();
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ClassifyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (i, name) in self.third_party_systems.iter().enumerate() {
            if name.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("classify.third_party_systems[{i}]"),
                    "system name must not be empty",
                ));
            }
        }
        for (i, name) in self.extra_system_libraries.iter().enumerate() {
            if name.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("classify.extra_system_libraries[{i}]"),
                    "library name must not be empty",
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(file) = &self.file {
            if file.is_dir() {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("{} is a directory", file.display()),
                ));
            } else if let Some(parent) = file.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                errors.push(ConfigError::new(
                    "output.file",
                    format!("parent directory {} does not exist", parent.display()),
                ));
            }
        }
        errors
    }
}
