//! aerodex CLI - adx command

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cmd;
mod util;

/// aerodex - Index of aerial imagery datasets
#[derive(Parser)]
#[command(name = "adx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run as if adx was started in DIR
    #[arg(short = 'C', global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty index
    Init {
        /// Directory to track (default: current directory)
        directory: Option<PathBuf>,
    },
    /// Add files and directories to the index
    #[command(visible_alias = "a")]
    Add {
        /// Files or directories to add
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove files and directories from the index
    #[command(visible_aliases = ["rm", "r"])]
    Remove {
        /// Files or directories to remove
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Refresh every indexed entry against the filesystem
    #[command(visible_alias = "s")]
    Sync,
    /// List indexed entries
    #[command(visible_alias = "ls")]
    List {
        /// Only entries at or below this indexed path
        prefix: Option<String>,

        /// Maximum entry depth (0 = top level only)
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// Show or change index configuration
    Config {
        /// Configuration key (e.g. scan.max_depth)
        key: Option<String>,

        /// New value for KEY
        value: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Cannot change directory to {}", dir.display()))?;
    }

    aerodex_index::initialize();

    let result = match cli.command {
        Commands::Init { directory } => cmd::init::run(directory),
        Commands::Add { paths } => cmd::add::run(&paths),
        Commands::Remove { paths } => cmd::remove::run(&paths),
        Commands::Sync => cmd::sync::run(),
        Commands::List { prefix, depth } => cmd::list::run(prefix.as_deref(), depth),
        Commands::Config { key, value } => match (key, value) {
            (None, _) => cmd::config::run_list(),
            (Some(key), None) => cmd::config::run_get(&key),
            (Some(key), Some(value)) => cmd::config::run_set(&key, &value),
        },
    };

    aerodex_index::shutdown();
    result
}
