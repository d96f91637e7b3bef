//! linksbom: CycloneDX SBOMs from what a build actually links.

use clap::{Parser, Subcommand};
use linksbom::classify::Platform;
use linksbom::cli::{self, ScanConfig};
use linksbom::config::CliOverrides;
use linksbom::pipeline::exit_codes;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "linksbom")]
#[command(version)]
#[command(about = "Generate a CycloneDX SBOM from build-system link data", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  SBOM written
    1  Usage error (bad arguments, invalid configuration)
    2  Ingestion or other fatal error

EXAMPLES:
    # SBOM for a configured CMake build tree
    linksbom scan build/ -O sbom.cdx.json

    # Keep system libraries, classify for Windows
    linksbom scan build/ --include-system --platform windows")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `scan` subcommand
#[derive(Parser)]
struct ScanArgs {
    /// Build directory containing CMake File API replies
    build_dir: PathBuf,

    /// Keep system libraries in the SBOM
    #[arg(long)]
    include_system: bool,

    /// Keep components built by the project itself
    #[arg(long)]
    include_project_local: bool,

    /// Add build-context enrichment properties
    #[arg(long)]
    enrich: bool,

    /// Platform whose system libraries are recognized (defaults to the host)
    #[arg(long, value_enum)]
    platform: Option<Platform>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an SBOM for a build directory
    Scan(ScanArgs),

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (defaults merged with the file)
    Show,
    /// Print config file search paths and the discovered config file
    Path,
    /// Generate an example .linksbom.yaml in the current directory
    Init,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                exit_codes::USAGE
            } else {
                exit_codes::SUCCESS
            };
            std::process::exit(code);
        }
    };

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match cli.command {
        Commands::Scan(args) => cli::run_scan(&ScanConfig {
            build_dir: args.build_dir,
            config_path: cli.config,
            overrides: CliOverrides {
                include_system: args.include_system,
                include_project_local: args.include_project_local,
                enrich: args.enrich,
                platform: args.platform,
                output: args.output,
                compact: args.compact,
            },
        }),
        Commands::ConfigSchema { output } => cli::run_config_schema(output.as_deref()),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(cli.config.as_deref()),
            ConfigAction::Path => cli::run_config_path(cli.config.as_deref()),
            ConfigAction::Init => std::env::current_dir()
                .map_err(anyhow::Error::from)
                .and_then(|dir| cli::run_config_init(&dir)),
        },
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            cli::exit_code_for(&e)
        }
    };
    std::process::exit(code);
}
