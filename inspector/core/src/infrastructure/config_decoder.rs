// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration Body Decoder
//!
//! Translates one parsed configuration file into declarations on a
//! [`Module`]. Both syntaxes arrive in the same shape: native files are
//! converted by the HCL parser following the JSON-syntax mapping, so a single
//! decoder handles them.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Parsed body → Domain objects
//! - **Anti-Corruption:** Malformed input becomes diagnostics, never failures
//!
//! # Body Shape
//!
//! ```json
//! {
//!   "terraform": {"required_version": ">= 1.5", "required_providers": {"aws": {"source": "hashicorp/aws"}}},
//!   "variable": {"region": {"type": "string", "default": "us-east-1"}},
//!   "provider": {"aws": [{"alias": "west"}, {"alias": "east"}]},
//!   "resource": {"aws_instance": {"web": {"provider": "aws.west"}}},
//!   "module": {"vpc": {"source": "./vpc"}}
//! }
//! ```
//!
//! Any block value may be an object or an array of objects. Expressions from
//! native files appear as `${...}` templates.
//!
//! # Override Files
//!
//! Declarations from an override file are merged into the existing
//! declaration of the same name: only the attributes the override sets are
//! replaced, and no duplicate is reported. Constraints set by an override
//! (`required_version`, provider `version`) replace earlier ones.

use crate::domain::diagnostics::Diagnostic;
use crate::domain::module::Module;
use crate::domain::module_call::ModuleCall;
use crate::domain::provider::ProviderRef;
use crate::domain::resource::{Resource, ResourceMode};
use crate::domain::source_pos::SourcePos;
use crate::domain::variable::{Output, Variable};
use crate::infrastructure::source_index::SourceIndex;
use serde_json::{Map, Value};

type Body = Map<String, Value>;

/// Whether a file declares things or overrides earlier declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Primary,
    Override,
}

/// A block body together with the labels that led to it
struct LabeledBlock<'v> {
    labels: Vec<&'v str>,
    body: &'v Body,
}

pub struct ConfigDecoder<'m, 'i, 's> {
    module: &'m mut Module,
    index: &'i mut SourceIndex<'s>,
    role: FileRole,
}

impl<'m, 'i, 's> ConfigDecoder<'m, 'i, 's> {
    pub fn new(module: &'m mut Module, index: &'i mut SourceIndex<'s>, role: FileRole) -> Self {
        Self { module, index, role }
    }

    fn overriding(&self) -> bool {
        self.role == FileRole::Override
    }

    /// Decode a whole file body
    pub fn decode(mut self, root: &Value) {
        let Some(root) = root.as_object() else {
            let pos = self.index.file_pos();
            self.error(
                "Invalid configuration file",
                "The root of a configuration file must be an object.",
                pos,
            );
            return;
        };

        for (block_type, value) in root {
            match block_type.as_str() {
                "terraform" => self.each_block(block_type, value, 0, Self::decode_terraform),
                "variable" => self.each_block(block_type, value, 1, Self::decode_variable),
                "output" => self.each_block(block_type, value, 1, Self::decode_output),
                "provider" => self.each_block(block_type, value, 1, Self::decode_provider),
                "resource" => self.each_block(block_type, value, 2, |d, block| {
                    d.decode_resource(ResourceMode::Managed, block)
                }),
                "data" => self.each_block(block_type, value, 2, |d, block| {
                    d.decode_resource(ResourceMode::Data, block)
                }),
                "module" => self.each_block(block_type, value, 1, Self::decode_module_call),
                other => tracing::trace!(block_type = other, "Skipping block type"),
            }
        }
    }

    // ========================================================================
    // Block walking
    // ========================================================================

    fn each_block<F>(&mut self, block_type: &str, value: &Value, label_count: usize, mut decode: F)
    where
        F: FnMut(&mut Self, &LabeledBlock<'_>),
    {
        let mut blocks = Vec::new();
        if let Err(detail) = collect_blocks(value, label_count, &mut Vec::new(), &mut blocks) {
            let pos = self.index.pos(block_type, &[]);
            self.error(format!("Invalid {} block", block_type), detail, pos);
            return;
        }
        for block in &blocks {
            decode(&mut *self, block);
        }
    }

    // ========================================================================
    // terraform
    // ========================================================================

    fn decode_terraform(&mut self, block: &LabeledBlock<'_>) {
        let pos = self.index.pos("terraform", &[]);

        match string_attr(block.body, "required_version") {
            Ok(Some(constraint)) if self.overriding() => self.module.required_core = vec![constraint],
            Ok(Some(constraint)) => self.module.required_core.push(constraint),
            Ok(None) => {}
            Err(detail) => self.invalid_attr("terraform", "required_version", &detail, pos.clone()),
        }

        let Some(required) = block.body.get("required_providers") else {
            return;
        };
        let mut entries = Vec::new();
        if let Err(detail) = collect_blocks(required, 0, &mut Vec::new(), &mut entries) {
            self.error("Invalid required_providers block", detail, pos);
            return;
        }
        for entry in &entries {
            for (name, requirement) in entry.body {
                self.decode_required_provider(name, requirement, &pos);
            }
        }
    }

    fn decode_required_provider(&mut self, name: &str, requirement: &Value, pos: &SourcePos) {
        match requirement {
            // Legacy form: `aws = "~> 4.0"`
            Value::String(constraint) => self.add_version_constraint(name, constraint.clone()),
            Value::Object(attrs) => {
                let source = string_attr(attrs, "source");
                let version = string_attr(attrs, "version");
                let aliases = string_list_attr(attrs, "configuration_aliases");

                match source {
                    Ok(Some(source)) => self.set_provider_source(name, source, pos),
                    Ok(None) => {
                        self.module.require_provider(name);
                    }
                    Err(detail) => self.invalid_attr(&format!("required_providers.{}", name), "source", &detail, pos.clone()),
                }

                match version {
                    Ok(Some(constraint)) => self.add_version_constraint(name, constraint),
                    Ok(None) => {}
                    Err(detail) => self.invalid_attr(&format!("required_providers.{}", name), "version", &detail, pos.clone()),
                }

                match aliases {
                    Ok(aliases) => {
                        for alias in aliases {
                            self.add_configuration_alias(name, &alias);
                        }
                    }
                    Err(detail) => self.invalid_attr(
                        &format!("required_providers.{}", name),
                        "configuration_aliases",
                        &detail,
                        pos.clone(),
                    ),
                }
            }
            _ => self.error(
                "Invalid required_providers entry",
                format!("Requirement for provider \"{}\" must be a version string or an object.", name),
                pos.clone(),
            ),
        }
    }

    fn set_provider_source(&mut self, name: &str, source: String, pos: &SourcePos) {
        let overriding = self.overriding();
        let requirement = self.module.require_provider(name);
        if requirement.source.is_empty() || overriding {
            requirement.source = source;
        } else if requirement.source != source {
            let existing = requirement.source.clone();
            self.error(
                "Multiple provider source attributes",
                format!(
                    "Found multiple source attributes for provider {}: \"{}\", \"{}\"",
                    name, existing, source
                ),
                pos.clone(),
            );
        }
    }

    fn add_version_constraint(&mut self, name: &str, constraint: String) {
        let overriding = self.overriding();
        let constraints = &mut self.module.require_provider(name).version_constraints;
        if overriding {
            constraints.clear();
        }
        constraints.push(constraint);
    }

    fn add_configuration_alias(&mut self, name: &str, alias: &str) {
        let reference = ProviderRef::parse(&unwrap_template(alias));
        if reference.has_alias() {
            self.module.provider_aliases.add(&reference.name, &reference.alias);
        }
        let requirement = self.module.require_provider(name);
        if !requirement.configuration_aliases.contains(&reference) {
            requirement.configuration_aliases.push(reference);
        }
    }

    // ========================================================================
    // provider
    // ========================================================================

    fn decode_provider(&mut self, block: &LabeledBlock<'_>) {
        let name = block.labels[0];
        let pos = self.index.pos("provider", &block.labels);
        self.module.require_provider(name);

        match string_attr(block.body, "version") {
            Ok(Some(constraint)) => self.add_version_constraint(name, constraint),
            Ok(None) => {}
            Err(detail) => self.invalid_attr(&format!("provider \"{}\"", name), "version", &detail, pos.clone()),
        }

        match string_attr(block.body, "alias") {
            Ok(Some(alias)) => self.module.provider_aliases.add(name, &unwrap_template(&alias)),
            Ok(None) => {}
            Err(detail) => self.invalid_attr(&format!("provider \"{}\"", name), "alias", &detail, pos),
        }
    }

    // ========================================================================
    // variable / output
    // ========================================================================

    fn decode_variable(&mut self, block: &LabeledBlock<'_>) {
        let name = block.labels[0];
        let pos = self.index.pos("variable", &block.labels);
        let context = format!("variable \"{}\"", name);
        let mut variable = Variable::new(name, pos.clone());

        match string_attr(block.body, "type") {
            Ok(type_expr) => variable.type_expr = type_expr.map(|t| unwrap_template(&t)),
            Err(detail) => self.invalid_attr(&context, "type", &detail, pos.clone()),
        }
        match string_attr(block.body, "description") {
            Ok(description) => variable.description = description.unwrap_or_default(),
            Err(detail) => self.invalid_attr(&context, "description", &detail, pos.clone()),
        }
        match bool_attr(block.body, "sensitive") {
            Ok(sensitive) => variable.sensitive = sensitive.unwrap_or(false),
            Err(detail) => self.invalid_attr(&context, "sensitive", &detail, pos.clone()),
        }
        if let Some(default) = block.body.get("default") {
            variable.set_default(default.clone());
        }

        if self.overriding() {
            if let Some(base) = self.module.variables.get_mut(name) {
                let body = block.body;
                if body.contains_key("type") {
                    base.type_expr = variable.type_expr;
                }
                if body.contains_key("description") {
                    base.description = variable.description;
                }
                if body.contains_key("sensitive") {
                    base.sensitive = variable.sensitive;
                }
                if let Some(default) = variable.default {
                    base.set_default(default);
                }
                return;
            }
            self.missing_base("variable", name, pos.clone());
        }

        if let Some(previous) = self.module.variables.insert(name.to_string(), variable) {
            self.duplicate("variable", name, &previous.pos, pos);
        }
    }

    fn decode_output(&mut self, block: &LabeledBlock<'_>) {
        let name = block.labels[0];
        let pos = self.index.pos("output", &block.labels);
        let context = format!("output \"{}\"", name);
        let mut output = Output::new(name, pos.clone());

        match string_attr(block.body, "description") {
            Ok(description) => output.description = description.unwrap_or_default(),
            Err(detail) => self.invalid_attr(&context, "description", &detail, pos.clone()),
        }
        match bool_attr(block.body, "sensitive") {
            Ok(sensitive) => output.sensitive = sensitive.unwrap_or(false),
            Err(detail) => self.invalid_attr(&context, "sensitive", &detail, pos.clone()),
        }

        if self.overriding() {
            if let Some(base) = self.module.outputs.get_mut(name) {
                if block.body.contains_key("description") {
                    base.description = output.description;
                }
                if block.body.contains_key("sensitive") {
                    base.sensitive = output.sensitive;
                }
                return;
            }
            self.missing_base("output", name, pos.clone());
        }

        if let Some(previous) = self.module.outputs.insert(name.to_string(), output) {
            self.duplicate("output", name, &previous.pos, pos);
        }
    }

    // ========================================================================
    // resource / data
    // ========================================================================

    fn decode_resource(&mut self, mode: ResourceMode, block: &LabeledBlock<'_>) {
        let (block_type, kind) = match mode {
            ResourceMode::Managed => ("resource", "resource"),
            ResourceMode::Data => ("data", "data resource"),
        };
        let pos = self.index.pos(block_type, &block.labels);
        let mut resource = Resource::new(mode, block.labels[0], block.labels[1], pos.clone());

        match string_attr(block.body, "provider") {
            Ok(Some(reference)) => {
                resource.provider = ProviderRef::parse(&unwrap_template(&reference));
                if resource.provider.has_alias() {
                    self.module
                        .provider_aliases
                        .add(&resource.provider.name, &resource.provider.alias);
                }
            }
            Ok(None) => {}
            Err(detail) => self.invalid_attr(
                &format!("{} \"{}\" \"{}\"", block_type, block.labels[0], block.labels[1]),
                "provider",
                &detail,
                pos.clone(),
            ),
        }

        self.module.require_provider(&resource.provider.name);

        let address = resource.address();
        if self.overriding() {
            let base = match mode {
                ResourceMode::Managed => self.module.managed_resources.get_mut(&address),
                ResourceMode::Data => self.module.data_resources.get_mut(&address),
            };
            if let Some(base) = base {
                if block.body.contains_key("provider") {
                    base.provider = resource.provider;
                }
                return;
            }
            self.missing_base(kind, &address, pos.clone());
        }

        if let Some(previous) = self.module.insert_resource(resource) {
            self.duplicate(kind, &address, &previous.pos, pos);
        }
    }

    // ========================================================================
    // module
    // ========================================================================

    fn decode_module_call(&mut self, block: &LabeledBlock<'_>) {
        let name = block.labels[0];
        let pos = self.index.pos("module", &block.labels);
        let context = format!("module \"{}\"", name);

        let source = match string_attr(block.body, "source") {
            Ok(Some(source)) => source,
            Ok(None) if self.overriding() => String::new(),
            Ok(None) => {
                self.error(
                    "Missing source for module call",
                    format!("The module call \"{}\" has no source argument.", name),
                    pos.clone(),
                );
                String::new()
            }
            Err(detail) => {
                self.invalid_attr(&context, "source", &detail, pos.clone());
                String::new()
            }
        };

        let mut call = ModuleCall::new(name, source, pos.clone());
        match string_attr(block.body, "version") {
            Ok(version) => call.version = version.unwrap_or_default(),
            Err(detail) => self.invalid_attr(&context, "version", &detail, pos.clone()),
        }

        if self.overriding() {
            if let Some(base) = self.module.module_calls.get_mut(name) {
                if block.body.contains_key("source") {
                    base.source = call.source;
                }
                if block.body.contains_key("version") {
                    base.version = call.version;
                }
                return;
            }
            if call.source.is_empty() {
                self.error(
                    "Missing source for module call",
                    format!("The module call \"{}\" has no source argument.", name),
                    pos.clone(),
                );
            }
            self.missing_base("module call", name, pos.clone());
        }

        if let Some(previous) = self.module.module_calls.insert(name.to_string(), call) {
            self.duplicate("module call", name, &previous.pos, pos);
        }
    }

    // ========================================================================
    // Diagnostics helpers
    // ========================================================================

    fn error(&mut self, summary: impl Into<String>, detail: impl Into<String>, pos: SourcePos) {
        self.module.push_diagnostic(Diagnostic::error(summary, detail).at(pos));
    }

    fn invalid_attr(&mut self, context: &str, attr: &str, detail: &str, pos: SourcePos) {
        self.error(
            "Invalid attribute value",
            format!("{}: {} {}.", context, attr, detail),
            pos,
        );
    }

    fn missing_base(&mut self, kind: &str, name: &str, pos: SourcePos) {
        self.error(
            format!("Missing base {} declaration to override", kind),
            format!(
                "There is no {} named \"{}\". An override file can only override an existing declaration.",
                kind, name
            ),
            pos,
        );
    }

    fn duplicate(&mut self, kind: &str, name: &str, previous: &SourcePos, pos: SourcePos) {
        self.error(
            format!("Duplicate {} declaration", kind),
            format!(
                "A {} named \"{}\" was already declared at {}. Names must be unique within a module.",
                kind, name, previous
            ),
            pos,
        );
    }
}

// ============================================================================
// Value helpers
// ============================================================================

/// Walk `label_count` levels of labels below `value`, collecting every body.
/// Each level may be an object or an array of objects.
fn collect_blocks<'v>(
    value: &'v Value,
    label_count: usize,
    labels: &mut Vec<&'v str>,
    out: &mut Vec<LabeledBlock<'v>>,
) -> Result<(), String> {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_blocks(item, label_count, labels, out)?;
            }
            Ok(())
        }
        Value::Object(body) if label_count == 0 => {
            out.push(LabeledBlock {
                labels: labels.clone(),
                body,
            });
            Ok(())
        }
        Value::Object(children) => {
            for (label, child) in children {
                labels.push(label.as_str());
                let result = collect_blocks(child, label_count - 1, labels, out);
                labels.pop();
                result?;
            }
            Ok(())
        }
        other => Err(format!(
            "expected an object{}, found {}",
            if labels.is_empty() {
                String::new()
            } else {
                format!(" for \"{}\"", labels.join("."))
            },
            value_kind(other)
        )),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strings pass through; numbers and bools are converted; null is absent
fn string_attr(body: &Body, key: &str) -> Result<Option<String>, String> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(format!("must be a string, found {}", value_kind(other))),
    }
}

fn bool_attr(body: &Body, key: &str) -> Result<Option<bool>, String> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) => match unwrap_template(s).as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(format!("must be a bool, found \"{}\"", s)),
        },
        Some(other) => Err(format!("must be a bool, found {}", value_kind(other))),
    }
}

fn string_list_attr(body: &Body, key: &str) -> Result<Vec<String>, String> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!("must be a list of strings, found {} element", value_kind(other))),
            })
            .collect(),
        Some(other) => Err(format!("must be a list of strings, found {}", value_kind(other))),
    }
}

/// `${aws.west}` → `aws.west`. Strings that are not a single interpolation
/// are returned unchanged.
pub fn unwrap_template(s: &str) -> String {
    let trimmed = s.trim();
    match trimmed.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(inner) if !inner.contains("${") => inner.trim().to_string(),
        _ => s.to_string(),
    }
}
