// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for tfinspect CLI

pub mod check;
pub mod config;
pub mod inspect;

pub use self::check::CheckArgs;
pub use self::config::ConfigCommand;
pub use self::inspect::InspectArgs;
