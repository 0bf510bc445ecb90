//! Pagewright CLI - static site generator.
//!
//! Provides commands for:
//! - `build`: Generate the static site for every language
//! - `route`: Show which template a page path resolves to
//! - `page`: Create, delete, update and inspect pages

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, PageCommand, RouteArgs};
use output::Output;

/// Pagewright - static site generator.
#[derive(Parser)]
#[command(name = "pw", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover pw.toml).
    #[arg(short, long, global = true, env = "PW_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the static site.
    Build(BuildArgs),
    /// Print the template a page path resolves to.
    Route(RouteArgs),
    /// Page management commands.
    #[command(subcommand)]
    Page(PageCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Build(args) => args.execute(config),
        Commands::Route(args) => args.execute(config),
        Commands::Page(cmd) => cmd.execute(config),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
