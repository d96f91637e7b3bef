//! Configuration file loading and discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Config file names searched in each directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".linksbom.yaml",
    ".linksbom.yml",
    "linksbom.yaml",
    "linksbom.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (`~/.config/linksbom/` on Linux)
/// 4. Home directory
///
/// An explicit path is returned even when it does not exist, so that
/// loading it reports the missing file instead of silently falling back.
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir()
        && let Some(path) = find_config_in_dir(&config_dir.join("linksbom"))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
#[must_use]
pub fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.is_file() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse YAML text. An empty document yields the defaults.
pub fn parse_config(content: &str) -> Result<AppConfig, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(content)
}

/// Load the discovered config, or the defaults when there is none.
///
/// Returns the path the configuration came from. A file that exists but
/// cannot be read or parsed is an error, not a silent fallback.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    match discover_config_file(explicit_path) {
        Some(path) => {
            let config = load_config_file(&path)?;
            tracing::debug!("Loaded configuration from {}", path.display());
            Ok((config, Some(path)))
        }
        None => Ok((AppConfig::default(), None)),
    }
}

/// Example configuration file with every default spelled out.
#[must_use]
pub fn generate_example_config() -> String {
    let body = serde_yaml::to_string(&AppConfig::default()).unwrap_or_default();
    format!(
        "# linksbom configuration\n\
         # Place as .linksbom.yaml in the working directory or in the user config directory.\n\
         \n{body}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir_order() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_in_dir(dir.path()).is_none());

        std::fs::write(dir.path().join("linksbom.yml"), "").unwrap();
        std::fs::write(dir.path().join(".linksbom.yaml"), "").unwrap();

        let found = find_config_in_dir(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), ".linksbom.yaml");
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = PathBuf::from("/nonexistent/custom.yaml");
        assert_eq!(discover_config_file(Some(&path)), Some(path));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_or_default(Some(Path::new("/nonexistent/custom.yaml")));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linksbom.yaml");
        std::fs::write(
            &path,
            "classify:\n  platform: windows\n  extra_system_libraries: [dbghelp]\nenrichment:\n  enabled: true\n",
        )
        .unwrap();

        let (config, from) = load_or_default(Some(&path)).unwrap();
        assert_eq!(from.as_deref(), Some(path.as_path()));
        assert_eq!(config.classify.platform, Some(crate::classify::Platform::Windows));
        assert_eq!(config.classify.extra_system_libraries, vec!["dbghelp"]);
        assert!(config.enrichment.enabled);
        assert!(config.enrichment.build_context);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linksbom.yaml");
        std::fs::write(&path, "filter: [not, a, map]\n").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse { .. }));
        assert!(err.to_string().contains("linksbom.yaml"));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_example_config_round_trips() {
        let example = generate_example_config();
        assert!(example.starts_with("# linksbom configuration"));
        assert_eq!(parse_config(&example).unwrap(), AppConfig::default());
    }
}
