//! SYLVA CLI
//!
//! A symbolic, metaphor-driven container for emotional expression. SYLVA
//! answers in archetypes and ritual closures; it never gives advice.
//!
//! # Commands
//!
//! - `chat` (default): Interactive session
//! - `memory`: Show recent interactions with subsystem activity
//! - `stats`: Summary statistics for the interaction log
//! - `patterns`: Subsystem sequence per day
//! - `export`: Copy the log, with export metadata, to another file
//! - `clear`: Empty the log after confirmation
//! - `info`: Subsystem descriptions and archetypes
//! - `diagnose`: Offline drift simulation

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sylva_rules::{MetaphorCatalog, SylvaConfig};

mod commands;
mod display;

/// SYLVA - Symbolic Emotional Wellness Assistant
#[derive(Parser)]
#[command(name = "sylva")]
#[command(version)]
#[command(about = "Symbolic Emotional Wellness Assistant - a trauma-safe, metaphor-driven CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Minimal output: no welcome or farewell banners
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Custom memory file path
    #[arg(short, long, env = "SYLVA_MEMORY", global = true)]
    memory: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "SYLVA_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Metaphor data file (JSON)
    #[arg(long, env = "SYLVA_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Chat,
    /// Show recent interactions
    Memory {
        /// Number of interactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show interaction log statistics
    Stats,
    /// Show the subsystem sequence for each recent day
    Patterns {
        /// Days to look back
        #[arg(short, long, default_value = "7")]
        days: u32,
    },
    /// Export the interaction log to a file
    Export {
        /// Destination file
        path: PathBuf,
    },
    /// Clear the interaction log
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Describe the subsystems and list archetypes
    Info,
    /// Run the drift simulation without touching the log
    Diagnose {
        /// Seed for reproducible responses
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        2 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.format_timestamp(None).init();
}

/// File settings first, then command-line overrides. A config file that
/// cannot be used is reported and replaced by the defaults.
fn load_config(cli: &Cli) -> SylvaConfig {
    let mut config = match &cli.config {
        Some(path) => SylvaConfig::load(path).unwrap_or_else(|e| {
            log::warn!("[sylva] ignoring config {}: {}", path.display(), e);
            SylvaConfig::default()
        }),
        None => SylvaConfig::default(),
    };

    if let Some(memory) = &cli.memory {
        config.memory_file = memory.clone();
    }
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = Some(catalog.clone());
    }
    config
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli);
    let catalog = MetaphorCatalog::load_or_fallback(config.catalog_path.as_deref());
    log::debug!(
        "[sylva] catalog from {:?}, memory at {}",
        catalog.source(),
        config.memory_file.display()
    );

    let exit_code = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::handle_chat(&config, catalog, cli.quiet),
        Commands::Memory { limit } => commands::memory::handle_memory(&config, limit),
        Commands::Stats => commands::memory::handle_stats(&config),
        Commands::Patterns { days } => commands::memory::handle_patterns(&config, days),
        Commands::Export { path } => commands::memory::handle_export(&config, &path),
        Commands::Clear { yes } => commands::memory::handle_clear(&config, yes),
        Commands::Info => commands::info::handle_info(&catalog),
        Commands::Diagnose { seed, json } => {
            commands::diagnose::handle_diagnose(&config, &catalog, seed, json)
        }
    };

    std::process::exit(exit_code);
}
