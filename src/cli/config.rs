//! Configuration command handlers.

use crate::config::{
    CONFIG_FILE_NAMES, discover_config_file, generate_example_config, generate_json_schema,
    load_or_default,
};
use crate::pipeline::{PipelineError, exit_codes};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Print or write the JSON Schema of the config file format.
pub fn run_config_schema(output: Option<&Path>) -> Result<i32> {
    let schema = generate_json_schema();
    match output {
        Some(path) => {
            std::fs::write(path, &schema)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Schema written to {}", path.display());
        }
        None => println!("{schema}"),
    }
    Ok(exit_codes::SUCCESS)
}

/// Print the effective configuration as YAML.
pub fn run_config_show(explicit: Option<&Path>) -> Result<i32> {
    let (config, loaded_from) = load_or_default(explicit).map_err(|e| PipelineError::Usage {
        reason: e.to_string(),
    })?;
    match &loaded_from {
        Some(path) => eprintln!("# Loaded from: {}", path.display()),
        None => eprintln!("# No config file found; showing defaults"),
    }
    let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
    print!("{yaml}");
    Ok(exit_codes::SUCCESS)
}

/// Directories searched for a config file, in order.
#[must_use]
pub fn config_search_dirs() -> Vec<PathBuf> {
    [
        std::env::current_dir().ok(),
        dirs::config_dir().map(|p| p.join("linksbom")),
        dirs::home_dir(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Print search locations and the config file that would be used.
pub fn run_config_path(explicit: Option<&Path>) -> Result<i32> {
    eprintln!("Config file search paths (in order):");
    for dir in config_search_dirs() {
        eprintln!("  {}", dir.display());
    }
    eprintln!();
    eprintln!("Recognized file names:");
    for name in CONFIG_FILE_NAMES {
        eprintln!("  {name}");
    }
    eprintln!();
    match discover_config_file(explicit) {
        Some(path) => eprintln!("Active config file: {}", path.display()),
        None => eprintln!("No config file found."),
    }
    Ok(exit_codes::SUCCESS)
}

/// Write an example `.linksbom.yaml` into `dir`.
pub fn run_config_init(dir: &Path) -> Result<i32> {
    let target = dir.join(CONFIG_FILE_NAMES[0]);
    if target.exists() {
        return Err(PipelineError::Usage {
            reason: format!(
                "{} already exists. Remove it first to re-initialize.",
                target.display()
            ),
        }
        .into());
    }
    std::fs::write(&target, generate_example_config())
        .with_context(|| format!("failed to write {}", target.display()))?;
    eprintln!("Created {}", target.display());
    Ok(exit_codes::SUCCESS)
}
