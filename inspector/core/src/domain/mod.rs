// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! The module model: the `Module` aggregate, its entity types, provider alias
//! bookkeeping, diagnostics and inspector configuration.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure in-memory model, no I/O

pub mod diagnostics;
pub mod inspect_config;
pub mod module;
pub mod module_call;
pub mod provider;
pub mod resource;
pub mod source_pos;
pub mod variable;

pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsError, Severity};
pub use inspect_config::{FailOn, InspectConfig, OutputFormat};
pub use module::Module;
pub use module_call::ModuleCall;
pub use provider::{ProviderAliases, ProviderRef, ProviderRequirement};
pub use resource::{Resource, ResourceMode};
pub use source_pos::SourcePos;
pub use variable::{Output, Variable};
