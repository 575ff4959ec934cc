// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Module Directory Loader
//!
//! Reads every configuration file directly inside a module directory and
//! builds a [`Module`] from the declarations it finds.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Filesystem → Domain aggregate
//! - **Integration:** Parses files, delegates declarations to `ConfigDecoder`
//!
//! # File Selection
//!
//! - `*.tf` (native syntax) and `*.tf.json` (JSON syntax); no recursion
//! - names starting with `.` or `#`, or ending with `~`, are editor/hidden
//!   files and skipped, as is anything in the configured ignore list
//! - `override.tf` and `*_override.tf` (and JSON equivalents) load after all
//!   primary files; their declarations are merged into the existing ones
//!
//! Loading never fails. Unreadable directories and files, and files that do
//! not parse, are recorded as error diagnostics on the returned module.

use crate::domain::diagnostics::Diagnostic;
use crate::domain::inspect_config::LoaderConfig;
use crate::domain::module::Module;
use crate::domain::source_pos::SourcePos;
use crate::infrastructure::config_decoder::{ConfigDecoder, FileRole};
use crate::infrastructure::source_index::{SourceIndex, Syntax};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigFile {
    path: PathBuf,
    syntax: Syntax,
    role: FileRole,
}

/// Configuration files of one directory, split by role and sorted by name
#[derive(Debug, Default)]
struct ConfigFiles {
    primary: Vec<ConfigFile>,
    overrides: Vec<ConfigFile>,
}

// ============================================================================
// Loader
// ============================================================================

#[derive(Debug, Clone)]
pub struct ModuleLoader {
    include_overrides: bool,
    ignore: Vec<String>,
}

impl Default for ModuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleLoader {
    /// Loader with default file selection (overrides included, nothing ignored)
    pub fn new() -> Self {
        Self {
            include_overrides: true,
            ignore: Vec::new(),
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            include_overrides: config.include_overrides,
            ignore: config.ignore.clone(),
        }
    }

    /// Load the module in `dir`. Problems are reported through the module's
    /// diagnostics.
    pub fn load_module<P: AsRef<Path>>(&self, dir: P) -> Module {
        let dir = dir.as_ref();
        let mut module = Module::new(dir.display().to_string());
        info!(path = %dir.display(), "Loading module");

        let files = match self.config_files(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Failed to read module directory");
                module.push_diagnostic(Diagnostic::error(
                    "Failed to read module directory",
                    format!("Module directory {} does not exist or cannot be read: {}", dir.display(), e),
                ));
                return module;
            }
        };

        for file in files.primary.iter().chain(files.overrides.iter()) {
            self.load_file(&mut module, file);
        }

        info!(
            path = %dir.display(),
            variables = module.variables.len(),
            outputs = module.outputs.len(),
            managed_resources = module.managed_resources.len(),
            data_resources = module.data_resources.len(),
            module_calls = module.module_calls.len(),
            diagnostics = module.diagnostics.len(),
            "Module loaded"
        );
        module
    }

    /// True if `dir` contains at least one primary or override configuration file
    pub fn is_module_dir<P: AsRef<Path>>(&self, dir: P) -> bool {
        match self.config_files(dir.as_ref()) {
            Ok(files) => !files.primary.is_empty() || !files.overrides.is_empty(),
            Err(_) => false,
        }
    }

    fn config_files(&self, dir: &Path) -> Result<ConfigFiles, walkdir::Error> {
        let mut files = ConfigFiles::default();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // A missing directory surfaces as an error on the root itself
                Err(e) if e.depth() == 0 => return Err(e),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.is_ignored(&name) {
                debug!(file = %name, "Ignoring file");
                continue;
            }
            let Some((syntax, role)) = classify(&name) else {
                continue;
            };

            let file = ConfigFile {
                path: entry.into_path(),
                syntax,
                role,
            };
            match role {
                FileRole::Primary => files.primary.push(file),
                FileRole::Override if self.include_overrides => files.overrides.push(file),
                FileRole::Override => debug!(file = %file.path.display(), "Skipping override file"),
            }
        }

        Ok(files)
    }

    fn is_ignored(&self, name: &str) -> bool {
        name.starts_with('.')
            || name.starts_with('#')
            || name.ends_with('~')
            || self.ignore.iter().any(|ignored| ignored == name)
    }

    fn load_file(&self, module: &mut Module, file: &ConfigFile) {
        let filename = file.path.display().to_string();
        debug!(file = %filename, "Parsing configuration file");

        let text = match std::fs::read_to_string(&file.path) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %filename, error = %e, "Failed to read configuration file");
                module.push_diagnostic(
                    Diagnostic::error("Failed to read file", format!("The configuration file {} could not be read: {}", filename, e))
                        .at(SourcePos::new(filename.as_str(), 1)),
                );
                return;
            }
        };

        let body = match parse(&text, file.syntax) {
            Ok(body) => body,
            Err((detail, line)) => {
                warn!(file = %filename, error = %detail, "Failed to parse configuration file");
                module.push_diagnostic(
                    Diagnostic::error("Failed to parse configuration file", detail)
                        .at(SourcePos::new(filename.as_str(), line)),
                );
                return;
            }
        };

        let mut index = SourceIndex::scan(&filename, &text, file.syntax);
        ConfigDecoder::new(module, &mut index, file.role).decode(&body);
    }
}

/// Parse file text into the JSON-syntax body shape. Errors carry a message
/// and the best known line.
fn parse(text: &str, syntax: Syntax) -> Result<Value, (String, usize)> {
    match syntax {
        Syntax::Native => hcl::from_str::<Value>(text).map_err(|e| (e.to_string(), 1)),
        Syntax::Json => serde_json::from_str::<Value>(text).map_err(|e| (e.to_string(), e.line().max(1))),
    }
}

/// Syntax and role of a configuration file name, `None` for other files
fn classify(name: &str) -> Option<(Syntax, FileRole)> {
    let (stem, syntax) = if let Some(stem) = name.strip_suffix(".tf.json") {
        (stem, Syntax::Json)
    } else if let Some(stem) = name.strip_suffix(".tf") {
        (stem, Syntax::Native)
    } else {
        return None;
    };

    let role = if stem == "override" || stem.ends_with("_override") {
        FileRole::Override
    } else {
        FileRole::Primary
    };
    Some((syntax, role))
}

// ============================================================================
// Convenience
// ============================================================================

/// Load `dir` with default loader settings
pub fn load_module<P: AsRef<Path>>(dir: P) -> Module {
    ModuleLoader::new().load_module(dir)
}

/// Check `dir` with default loader settings
pub fn is_module_dir<P: AsRef<Path>>(dir: P) -> bool {
    ModuleLoader::new().is_module_dir(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("main.tf"), Some((Syntax::Native, FileRole::Primary)));
        assert_eq!(classify("main.tf.json"), Some((Syntax::Json, FileRole::Primary)));
        assert_eq!(classify("override.tf"), Some((Syntax::Native, FileRole::Override)));
        assert_eq!(classify("dev_override.tf.json"), Some((Syntax::Json, FileRole::Override)));
        assert_eq!(classify("overrides.tf"), Some((Syntax::Native, FileRole::Primary)));
        assert_eq!(classify("terraform.tfvars"), None);
        assert_eq!(classify("README.md"), None);
        assert_eq!(classify("main.json"), None);
    }

    #[test]
    fn test_is_ignored() {
        let loader = ModuleLoader::from_config(&LoaderConfig {
            include_overrides: true,
            ignore: vec!["scratch.tf".to_string()],
        });
        assert!(loader.is_ignored(".hidden.tf"));
        assert!(loader.is_ignored("#main.tf#"));
        assert!(loader.is_ignored("main.tf~"));
        assert!(loader.is_ignored("scratch.tf"));
        assert!(!loader.is_ignored("main.tf"));
    }

    #[test]
    fn test_parse_json_error_reports_line() {
        let err = parse("{\n  \"variable\": {\n    oops\n}", Syntax::Json).unwrap_err();
        assert_eq!(err.1, 3);
    }

    #[test]
    fn test_parse_native_into_json_shape() {
        let body = parse(
            r#"
variable "region" {
  default = "us-east-1"
}
"#,
            Syntax::Native,
        )
        .unwrap();
        assert_eq!(body["variable"]["region"]["default"], serde_json::json!("us-east-1"));
    }
}
