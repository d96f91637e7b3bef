//! CLI command handlers.
//!
//! Handlers are invoked by main.rs and return the process exit status, so
//! they can be tested without spawning the binary.

mod config;
mod scan;

pub use config::{
    config_search_dirs, run_config_init, run_config_path, run_config_schema, run_config_show,
};
pub use scan::{ScanConfig, exit_code_for, resolve_config, run_scan};
