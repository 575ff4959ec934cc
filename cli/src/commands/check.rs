// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Module check command
//!
//! Prints the diagnostics collected while loading a module and decides
//! whether they should fail the run.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use tfinspect_core::infrastructure::ModuleLoader;
use tfinspect_core::{Diagnostics, FailOn, InspectConfig};

use super::inspect::format_diagnostic;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Module directory (default: current directory)
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Lowest severity that fails the check: error, warning or never
    /// (default: from configuration)
    #[arg(long)]
    pub fail_on: Option<FailOn>,
}

/// Outcome of checking one module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    pub errors: usize,
    pub warnings: usize,
    pub failed: bool,
}

impl CheckReport {
    pub fn evaluate(diagnostics: &Diagnostics, fail_on: FailOn) -> Self {
        let errors = diagnostics.errors().count();
        let warnings = diagnostics.warnings().count();
        let failed = match fail_on {
            FailOn::Error => errors > 0,
            FailOn::Warning => errors > 0 || warnings > 0,
            FailOn::Never => false,
        };
        Self {
            errors,
            warnings,
            failed,
        }
    }
}

pub fn handle_command(args: CheckArgs, config_override: Option<PathBuf>) -> Result<CheckReport> {
    let config = InspectConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;
    let fail_on = args.fail_on.unwrap_or(config.check.fail_on);
    debug!(?fail_on, dir = %args.dir.display(), "Checking module");

    let module = ModuleLoader::from_config(&config.loader).load_module(&args.dir);
    let report = CheckReport::evaluate(&module.diagnostics, fail_on);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&module.diagnostics, &report, &mut out)?;
    out.flush().context("Failed to write output")?;
    Ok(report)
}

pub fn write_report<W: Write>(diagnostics: &Diagnostics, report: &CheckReport, out: &mut W) -> Result<()> {
    for diagnostic in diagnostics {
        writeln!(out, "{}", format_diagnostic(diagnostic))?;
    }

    if diagnostics.is_empty() {
        writeln!(out, "{}", "✓ No problems found".green())?;
        return Ok(());
    }

    let totals = format!("{} error(s), {} warning(s)", report.errors, report.warnings);
    if report.failed {
        writeln!(out, "{}", format!("✗ {}", totals).red())?;
    } else {
        writeln!(out, "{}", format!("✓ {}", totals).yellow())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfinspect_core::Diagnostic;

    fn mixed() -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::warning("w", ""));
        diagnostics.push(Diagnostic::error("e", ""));
        diagnostics.push(Diagnostic::warning("w2", ""));
        diagnostics
    }

    #[test]
    fn test_evaluate_counts() {
        let report = CheckReport::evaluate(&mixed(), FailOn::Error);
        assert_eq!(report.errors, 1);
        assert_eq!(report.warnings, 2);
        assert!(report.failed);
    }

    #[test]
    fn test_evaluate_thresholds() {
        let mut warnings_only = Diagnostics::new();
        warnings_only.push(Diagnostic::warning("w", ""));

        assert!(!CheckReport::evaluate(&warnings_only, FailOn::Error).failed);
        assert!(CheckReport::evaluate(&warnings_only, FailOn::Warning).failed);
        assert!(!CheckReport::evaluate(&mixed(), FailOn::Never).failed);
        assert!(!CheckReport::evaluate(&Diagnostics::new(), FailOn::Warning).failed);
    }
}
