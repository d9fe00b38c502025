//! ZUC-MB CLI
//!
//! Multi-buffer EEA3 / EIA3 command-line tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{encrypt_files, mac_files, run_kat, select_engine, show_backend, BackendChoice, KeyArgs};
use std::path::PathBuf;

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "zucmb")]
#[command(about = "Multi-buffer ZUC: 128-EEA3, 128-EIA3 and ZUC-256 MAC", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keystream backend for the 8-lane path
    #[arg(short, long, value_enum, default_value_t = BackendChoice::Auto, global = true)]
    backend: BackendChoice,

    /// Log filter (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the selected backend and detected CPU features
    Backend,
    /// Run the built-in known-answer tests
    Kat,
    /// Encrypt or decrypt files (EEA3 is its own inverse), one buffer per file
    Encrypt {
        #[command(flatten)]
        key: KeyArgs,

        /// Directory for the output files (default: next to the input)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Compute a MAC per file, all files in one batch
    Mac {
        #[command(flatten)]
        key: KeyArgs,

        /// Tag size in bytes for 256-bit keys (4, 8, 16 or 32)
        #[arg(short, long, default_value_t = 4)]
        tag_size: usize,

        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let engine = select_engine(cli.backend)?;
    log::info!("using backend {}", engine.backend().name());

    match &cli.command {
        Commands::Backend => show_backend(&engine),
        Commands::Kat => run_kat(&engine)?,
        Commands::Encrypt { key, output_dir, files } => {
            encrypt_files(&engine, key, files, output_dir.as_deref())?;
        }
        Commands::Mac { key, tag_size, files } => mac_files(&engine, key, *tag_size, files)?,
    }

    Ok(())
}
