// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # tfinspect CLI
//!
//! The `tfinspect` binary loads a single Terraform-style module directory and
//! reports what it declares.
//!
//! ## Commands
//!
//! - `tfinspect inspect <DIR>` - Print the module as a summary or JSON
//! - `tfinspect check <DIR>` - Print diagnostics, exit non-zero on failure
//! - `tfinspect config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use tfinspect_cli::commands::{self, CheckArgs, ConfigCommand, InspectArgs};

/// tfinspect - Inspect Terraform-style module directories
#[derive(Parser)]
#[command(name = "tfinspect")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "TFINSPECT_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "TFINSPECT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a module and print what it declares
    #[command(name = "inspect")]
    Inspect(InspectArgs),

    /// Load a module and report its diagnostics
    #[command(name = "check")]
    Check(CheckArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Inspect(args)) => commands::inspect::handle_command(args, cli.config),
        Some(Commands::Check(args)) => {
            let report = commands::check::handle_command(args, cli.config)?;
            if report.failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config)
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging. Logs go to stderr so they
/// never mix with JSON on stdout.
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
