// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod json;

pub use json::{from_json, to_json, EncodeError};
