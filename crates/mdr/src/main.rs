//! mdr CLI - Markdown to HTML, PDF, DOCX and XLSX.
//!
//! Provides commands for:
//! - `render`: Render a markdown file to disk
//! - `server`: Start the HTTP rendering API

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RenderArgs, ServerArgs};
use error::CliError;
use output::Output;

/// mdr - Markdown document renderer.
#[derive(Parser)]
#[command(name = "mdr", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file.
    Render(RenderArgs),
    /// Start the rendering server.
    Server(ServerArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --debug forces DEBUG level, otherwise use RUST_LOG
    let debug = matches!(&cli.command, Commands::Server(args) if args.debug);
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Server(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
    };

    if let Err(err) = result {
        output.error(&err.to_string());
        std::process::exit(1);
    }
}
