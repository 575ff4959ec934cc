// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Inspector Configuration
//
// Settings shared by the CLI commands:
// - output rendering (summary vs JSON)
// - the diagnostic severity that makes `check` fail
// - loader file selection (override files, ignore list)
//
// Discovery order mirrors the other tooling: explicit path, environment
// variable, working directory, user home, then built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "TFINSPECT_CONFIG_PATH";
pub const FORMAT_ENV: &str = "TFINSPECT_FORMAT";
pub const FAIL_ON_ENV: &str = "TFINSPECT_FAIL_ON";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid output format: '{0}'. Expected 'summary' or 'json'")]
    InvalidFormat(String),
    #[error("Invalid fail_on level: '{0}'. Expected 'error', 'warning' or 'never'")]
    InvalidFailOn(String),
    #[error("loader.ignore entries cannot be empty")]
    EmptyIgnoreEntry,
    #[error("loader.ignore entry '{0}' must be a file name, not a path")]
    IgnoreEntryIsPath(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub check: CheckConfig,

    #[serde(default)]
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            pretty: true,
        }
    }
}

/// Lowest diagnostic severity that makes `check` fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    #[default]
    Error,
    Warning,
    Never,
}

impl FromStr for FailOn {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(FailOn::Error),
            "warning" => Ok(FailOn::Warning),
            "never" => Ok(FailOn::Never),
            _ => Err(ConfigError::InvalidFailOn(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub fail_on: FailOn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Load `override.tf` / `*_override.tf` files after the primary files
    #[serde(default = "default_true")]
    pub include_overrides: bool,

    /// File names to skip in addition to the editor/hidden-file rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            include_overrides: true,
            ignore: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl InspectConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. TFINSPECT_CONFIG_PATH environment variable
    /// 2. ./tfinspect.yaml (working directory)
    /// 3. ~/.tfinspect/config.yaml (user home)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./tfinspect.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".tfinspect").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        let mut config = match Self::discover_config() {
            Some(config_path) => {
                tracing::info!("Loading configuration from discovered path: {:?}", config_path);
                Self::from_yaml_file(config_path)?
            }
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides. Invalid values are logged and
    /// ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(FORMAT_ENV) {
            self.apply_format_override(&val);
        }
        if let Ok(val) = std::env::var(FAIL_ON_ENV) {
            self.apply_fail_on_override(&val);
        }
    }

    fn apply_format_override(&mut self, val: &str) {
        match val.parse::<OutputFormat>() {
            Ok(format) => {
                tracing::info!("Environment override: {}={}", FORMAT_ENV, val);
                self.output.format = format;
            }
            Err(e) => tracing::warn!("Ignoring {}: {}", FORMAT_ENV, e),
        }
    }

    fn apply_fail_on_override(&mut self, val: &str) {
        match val.parse::<FailOn>() {
            Ok(fail_on) => {
                tracing::info!("Environment override: {}={}", FAIL_ON_ENV, val);
                self.check.fail_on = fail_on;
            }
            Err(e) => tracing::warn!("Ignoring {}: {}", FAIL_ON_ENV, e),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.loader.ignore {
            if entry.trim().is_empty() {
                return Err(ConfigError::EmptyIgnoreEntry);
            }
            if entry.contains('/') || entry.contains('\\') {
                return Err(ConfigError::IgnoreEntryIsPath(entry.clone()));
            }
        }
        Ok(())
    }
}
