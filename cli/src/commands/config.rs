// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use tfinspect_core::domain::inspect_config::{CONFIG_PATH_ENV, FAIL_ON_ENV, FORMAT_ENV};
use tfinspect_core::InspectConfig;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./tfinspect.yaml)
        #[arg(short, long, default_value = "./tfinspect.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate {
            output,
            examples,
            force,
        } => generate(output, examples, force),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./tfinspect.yaml");
        println!("  4. ~/.tfinspect/config.yaml");
        println!();
    }

    let config = InspectConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Output:".bold());
    println!("  Format: {:?}", config.output.format);
    println!("  Pretty JSON: {}", config.output.pretty);
    println!();

    println!("{}", "Check:".bold());
    println!("  Fail on: {:?}", config.check.fail_on);
    println!();

    println!("{}", "Loader:".bold());
    println!("  Include overrides: {}", config.loader.include_overrides);
    if config.loader.ignore.is_empty() {
        println!("  Ignore: {}", "(none)".dimmed());
    } else {
        println!("  Ignore:");
        for name in &config.loader.ignore {
            println!("    - {}", name);
        }
    }
    println!();

    println!("{}", "Environment overrides:".bold());
    for var in [FORMAT_ENV, FAIL_ON_ENV] {
        println!(
            "  {}: {}",
            var,
            std::env::var(var)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
    }

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = InspectConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

/// Sample configuration file content
pub fn sample_config(with_examples: bool) -> &'static str {
    if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    }
}

fn generate(output: PathBuf, with_examples: bool, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to replace it",
            output.display()
        );
    }

    std::fs::write(&output, sample_config(with_examples))
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_configs_are_valid() {
        for with_examples in [false, true] {
            let config = InspectConfig::from_yaml_str(sample_config(with_examples)).unwrap();
            config.validate().unwrap();
            assert_eq!(config, InspectConfig::default());
        }
    }

    #[test]
    fn test_generate_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tfinspect.yaml");
        std::fs::write(&path, "output:\n  format: json\n").unwrap();

        assert!(generate(path.clone(), false, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "output:\n  format: json\n");

        generate(path.clone(), true, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), sample_config(true));
    }
}
