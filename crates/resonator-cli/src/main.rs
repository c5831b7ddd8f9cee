//! resonator: design, preview and export resonator assemblies.
//!
//! # Logging
//!
//! `RUST_LOG` takes precedence; otherwise `-v` enables info for the
//! designer crates and `-vv` debug.
//!
//! ```bash
//! resonator --shape star --star-tips 7 areas
//! resonator --params design.json export out/resonator.stl
//! RUST_LOG=debug resonator preview --scene-out scene.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod output;
mod params;

use commands::{areas, export, form, preview, session};
use params::ParamArgs;

/// resonator - parametric resonator designer.
///
/// Builds a hollow tube, a profiled inner insert, a cap and an
/// equivalent cylinder from a handful of dimensions.
#[derive(Parser)]
#[command(name = "resonator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    params: ParamArgs,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cross-section area readout
    Areas,

    /// Recompute the assembly and build the preview scene
    Preview {
        /// Write the scene as JSON to this file
        #[arg(long)]
        scene_out: Option<PathBuf>,
    },

    /// Export every part as STL next to PATH
    Export {
        /// Chosen file name; its extension is replaced by each part's suffix
        path: PathBuf,

        /// Write ASCII STL instead of binary
        #[arg(long)]
        ascii: bool,
    },

    /// Print the form schema
    Form,

    /// Read UI messages as JSON lines on stdin and answer on stdout
    Session,
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "resonator_ops=info,mesh_export=info,app_bridge=info",
            2 => "resonator_ops=debug,mesh_export=debug,app_bridge=debug,resonator_geometry=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = params::load_form(&cli.params).and_then(|state| match &cli.command {
        Commands::Areas => areas::run(&state, &cli),
        Commands::Preview { scene_out } => preview::run(state, scene_out.as_deref(), &cli),
        Commands::Export { path, ascii } => export::run(state, path, *ascii, &cli),
        Commands::Form => form::run(&state, &cli),
        Commands::Session => session::run(state),
    });

    if let Err(e) = &result {
        if !cli.quiet {
            eprintln!("{}: {}", "Error".red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  {}: {}", "Caused by".yellow(), cause);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
