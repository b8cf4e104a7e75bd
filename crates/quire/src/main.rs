//! Quire CLI - Markdown posts to a single-page viewer and a printable export.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Markdown posts to a single-page viewer and a printable export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to quire.toml config file
    #[arg(short, long, default_value = "quire.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create quire.toml and sample content in the current directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Start development server with live reload
    Dev {
        /// Port to listen on (defaults to config or 7777)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Build the viewer, data module and printable export
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Write the printable export document only
    Export {
        /// Document title (defaults to config)
        #[arg(short, long)]
        title: Option<String>,

        /// Document subtitle (defaults to config or the post count)
        #[arg(short, long)]
        subtitle: Option<String>,

        /// Output file (defaults to a name derived from the title)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Combine Markdown files and images into one standalone HTML page
    Convert {
        /// Markdown and image files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, default_value = "converted.html")]
        output: PathBuf,
    },

    /// Preview a build
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Dev { port, no_open } => {
            let config = Config::load(&cli.config)?;
            commands::dev::run(&config, port, !no_open).await?;
        }
        Commands::Build { output, no_minify } => {
            let config = Config::load(&cli.config)?;
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&config, output, minify).await?;
        }
        Commands::Export {
            title,
            subtitle,
            output,
        } => {
            let config = Config::load(&cli.config)?;
            commands::export::run(&config, title, subtitle, output).await?;
        }
        Commands::Convert { files, output } => {
            commands::convert::run(&files, &output).await?;
        }
        Commands::Serve { port, dir } => {
            commands::serve::run(port, dir).await?;
        }
    }

    Ok(())
}
