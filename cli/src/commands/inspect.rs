// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Module inspection command
//!
//! Loads one module directory and prints it either as a human-readable
//! summary or as the stable JSON encoding.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

use tfinspect_core::infrastructure::ModuleLoader;
use tfinspect_core::presentation::to_json;
use tfinspect_core::{Diagnostic, InspectConfig, Module, OutputFormat, Severity};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Module directory (default: current directory)
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Output format: summary or json (default: from configuration)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Write JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

pub fn handle_command(args: InspectArgs, config_override: Option<PathBuf>) -> Result<()> {
    let config = InspectConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;

    let format = args.format.unwrap_or(config.output.format);
    let pretty = config.output.pretty && !args.compact;

    let module = ModuleLoader::from_config(&config.loader).load_module(&args.dir);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(&module, format, pretty, &mut out)?;
    out.flush().context("Failed to write output")?;
    Ok(())
}

/// Write `module` in the requested format
pub fn render<W: Write>(module: &Module, format: OutputFormat, pretty: bool, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = to_json(module, pretty)?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Summary => render_summary(module, out)?,
    }
    Ok(())
}

pub fn render_summary<W: Write>(module: &Module, out: &mut W) -> Result<()> {
    writeln!(out, "{} {}", "Module:".bold(), module.path())?;
    if !module.required_core.is_empty() {
        writeln!(out, "  Core version: {}", module.required_core.join(", "))?;
    }
    writeln!(out)?;

    // Providers
    section(out, "Providers", module.required_providers.len())?;
    for (name, requirement) in &module.required_providers {
        let mut line = format!("  {}", name.bold());
        if !requirement.source.is_empty() {
            line.push_str(&format!(" ({})", requirement.source));
        }
        if !requirement.version_constraints.is_empty() {
            line.push_str(&format!(" {}", requirement.version_constraints.join(", ")));
        }
        if let Some(aliases) = module.provider_aliases.get(name) {
            line.push_str(&format!(" aliases: {}", aliases.join(", ")));
        }
        writeln!(out, "{}", line)?;
    }
    writeln!(out)?;

    // Variables
    section(out, "Variables", module.variables.len())?;
    for (name, variable) in &module.variables {
        let mut tags = Vec::new();
        if let Some(type_expr) = &variable.type_expr {
            tags.push(type_expr.clone());
        }
        if variable.required {
            tags.push("required".to_string());
        }
        if variable.sensitive {
            tags.push("sensitive".to_string());
        }
        write_entry(out, name, &tags, &variable.description)?;
    }
    writeln!(out)?;

    // Outputs
    section(out, "Outputs", module.outputs.len())?;
    for (name, output) in &module.outputs {
        let tags = if output.sensitive { vec!["sensitive".to_string()] } else { Vec::new() };
        write_entry(out, name, &tags, &output.description)?;
    }
    writeln!(out)?;

    // Resources
    section(out, "Managed resources", module.managed_resources.len())?;
    for (address, resource) in &module.managed_resources {
        writeln!(out, "  {} → {}", address.bold(), resource.provider)?;
    }
    writeln!(out)?;

    section(out, "Data resources", module.data_resources.len())?;
    for (address, resource) in &module.data_resources {
        writeln!(out, "  {} → {}", address.bold(), resource.provider)?;
    }
    writeln!(out)?;

    // Module calls
    section(out, "Module calls", module.module_calls.len())?;
    for (name, call) in &module.module_calls {
        if call.version.is_empty() {
            writeln!(out, "  {} → {}", name.bold(), call.source)?;
        } else {
            writeln!(out, "  {} → {} ({})", name.bold(), call.source, call.version)?;
        }
    }

    if !module.diagnostics.is_empty() {
        writeln!(out)?;
        section(out, "Diagnostics", module.diagnostics.len())?;
        for diagnostic in &module.diagnostics {
            writeln!(out, "  {}", format_diagnostic(diagnostic))?;
        }
    }

    Ok(())
}

/// One-line, colored rendering of a diagnostic
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let label = match diagnostic.severity {
        Severity::Error => "Error:".red().bold(),
        Severity::Warning => "Warning:".yellow().bold(),
    };
    let mut line = format!("{} {}", label, diagnostic.summary);
    if !diagnostic.detail.is_empty() {
        line.push_str(&format!("; {}", diagnostic.detail));
    }
    if let Some(pos) = &diagnostic.pos {
        line.push_str(&format!(" {}", format!("({})", pos).dimmed()));
    }
    line
}

fn section<W: Write>(out: &mut W, title: &str, count: usize) -> Result<()> {
    writeln!(out, "{}", format!("{} ({}):", title, count).bold())?;
    if count == 0 {
        writeln!(out, "  {}", "(none)".dimmed())?;
    }
    Ok(())
}

fn write_entry<W: Write>(out: &mut W, name: &str, tags: &[String], description: &str) -> Result<()> {
    let mut line = format!("  {}", name.bold());
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    if !description.is_empty() {
        line.push_str(&format!(" - {}", description.dimmed()));
    }
    writeln!(out, "{}", line)?;
    Ok(())
}
