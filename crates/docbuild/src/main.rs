//! docbuild CLI - prepares documentation checkouts for hosted builds.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "docbuild")]
#[command(about = "Injects platform configuration into Sphinx and Mkdocs projects")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docbuild.toml config file
    #[arg(short, long, default_value = "docbuild.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Documentation tool whose config should be injected.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Builder {
    Sphinx,
    Mkdocs,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter docbuild.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },

    /// Write the platform configuration into the checkout's conf.py or mkdocs.yml
    Inject {
        /// Override the documentation type from docbuild.toml
        #[arg(short, long, value_enum)]
        builder: Option<Builder>,

        /// Override the checkout path from docbuild.toml
        #[arg(long)]
        checkout: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
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
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Inject { builder, checkout } => {
            commands::inject::run(&cli.config, builder, checkout)?;
        }
    }

    Ok(())
}
