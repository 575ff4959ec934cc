// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! tfinspect core
//!
//! In-memory model of a single Terraform-style module (variables, outputs,
//! provider requirements and aliases, resources, module calls and loading
//! diagnostics), plus the loader that builds it from a directory and the
//! JSON encoder for its stable external form.
//!
//! # Architecture
//!
//! - **domain:** the `Module` aggregate and its entities, configuration
//! - **infrastructure:** directory loader, parsers, declaration decoder
//! - **presentation:** JSON encoding
//!
//! ```no_run
//! use tfinspect_core::infrastructure::load_module;
//!
//! let module = load_module("./modules/network");
//! for (name, variable) in &module.variables {
//!     println!("{} required={}", name, variable.required);
//! }
//! if let Err(e) = module.diagnostics.err() {
//!     eprintln!("{}", e);
//! }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
