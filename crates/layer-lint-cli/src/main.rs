//! layer-lint CLI tool.
//!
//! Usage:
//! ```bash
//! layer-lint check [OPTIONS] [PATH]
//! layer-lint list-rules
//! layer-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Layer boundary linter for app / features / shared source trees
#[derive(Parser)]
#[command(name = "layer-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run boundary checks
    Check {
        /// Project directory to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules and the boundary table
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// Source snippets rendered through miette.
    Rich,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            exclude,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let clean = commands::check::run(&path, format, exclude, &source)?;
            if !clean {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => {
            let source = config_resolver::resolve(Path::new("."), cli.config.as_deref());
            commands::list_rules::run(&source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
