// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::fs;
use tempfile::TempDir;
use tfinspect_cli::commands::check::{write_report, CheckReport};
use tfinspect_cli::commands::inspect::{render, render_summary};
use tfinspect_core::infrastructure::load_module;
use tfinspect_core::{FailOn, Module, OutputFormat};

fn plain() {
    colored::control::set_override(false);
}

fn module_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn render_to_string(module: &Module, format: OutputFormat, pretty: bool) -> String {
    let mut out = Vec::new();
    render(module, format, pretty, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// ── Summary ──

#[test]
fn test_summary_lists_declarations() {
    plain();
    let dir = module_dir(&[(
        "main.tf",
        r#"variable "region" {
  type        = string
  description = "AWS region"
}

output "id" {
  value     = aws_instance.web.id
  sensitive = true
}

provider "aws" {
  alias = "west"
}

resource "aws_instance" "web" {
  provider = aws.west
}

module "vpc" {
  source  = "./vpc"
}
"#,
    )]);
    let module = load_module(dir.path());

    let mut out = Vec::new();
    render_summary(&module, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with(&format!("Module: {}", dir.path().display())));
    assert!(text.contains("Variables (1):"));
    assert!(text.contains("  region [string, required] - AWS region"));
    assert!(text.contains("  id [sensitive]"));
    assert!(text.contains("  aws aliases: west"));
    assert!(text.contains("  aws_instance.web → aws.west"));
    assert!(text.contains("Data resources (0):\n  (none)"));
    assert!(text.contains("  vpc → ./vpc"));
    assert!(!text.contains("Diagnostics"));
}

#[test]
fn test_summary_shows_diagnostics() {
    plain();
    let dir = module_dir(&[("main.tf", "module \"vpc\" {\n}\n")]);
    let module = load_module(dir.path());

    let text = render_to_string(&module, OutputFormat::Summary, true);
    assert!(text.contains("Diagnostics (1):"));
    assert!(text.contains("Error: Missing source for module call"));
}

// ── JSON ──

#[test]
fn test_json_output_compact_and_pretty() {
    let module = Module::new("./mod");

    let compact = render_to_string(&module, OutputFormat::Json, false);
    assert_eq!(compact.lines().count(), 1);
    let value: serde_json::Value = serde_json::from_str(&compact).unwrap();
    assert_eq!(value["path"], "./mod");

    let pretty = render_to_string(&module, OutputFormat::Json, true);
    assert!(pretty.lines().count() > 1);
    assert_eq!(serde_json::from_str::<serde_json::Value>(&pretty).unwrap(), value);
}

// ── Check ──

#[test]
fn test_check_clean_module() {
    plain();
    let dir = module_dir(&[("main.tf", "variable \"x\" {}\n")]);
    let module = load_module(dir.path());
    let report = CheckReport::evaluate(&module.diagnostics, FailOn::Warning);
    assert!(!report.failed);

    let mut out = Vec::new();
    write_report(&module.diagnostics, &report, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "✓ No problems found\n");
}

#[test]
fn test_check_reports_parse_failure() {
    plain();
    let dir = module_dir(&[("broken.tf.json", "{"), ("main.tf", "variable \"x\" {}\n")]);
    let module = load_module(dir.path());

    let report = CheckReport::evaluate(&module.diagnostics, FailOn::Error);
    assert_eq!(report.errors, 1);
    assert!(report.failed);

    let mut out = Vec::new();
    write_report(&module.diagnostics, &report, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Error: Failed to parse configuration file"));
    assert!(text.contains("broken.tf.json:1"));
    assert!(text.trim_end().ends_with("✗ 1 error(s), 0 warning(s)"));

    let lenient = CheckReport::evaluate(&module.diagnostics, FailOn::Never);
    assert!(!lenient.failed);
}

#[test]
fn test_check_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let module = load_module(dir.path().join("nope"));
    assert!(CheckReport::evaluate(&module.diagnostics, FailOn::Error).failed);
}
