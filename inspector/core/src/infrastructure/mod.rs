// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod config_decoder;
pub mod module_loader;
pub mod source_index;

pub use module_loader::{is_module_dir, load_module, ModuleLoader};
