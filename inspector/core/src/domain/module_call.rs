// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::source_pos::SourcePos;
use serde::{Deserialize, Serialize};

/// Invocation of a child module (`module "<name>" { ... }`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCall {
    pub name: String,

    /// Source address as written; empty if the declaration omitted it
    pub source: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    pub pos: SourcePos,
}

impl ModuleCall {
    pub fn new(name: impl Into<String>, source: impl Into<String>, pos: SourcePos) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            version: String::new(),
            pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_keys() {
        let mut call = ModuleCall::new("vpc", "terraform-aws-modules/vpc/aws", SourcePos::new("main.tf", 20));
        let value = serde_json::to_value(&call).unwrap();
        assert!(value.get("version").is_none());

        call.version = "~> 5.0".to_string();
        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "vpc",
                "source": "terraform-aws-modules/vpc/aws",
                "version": "~> 5.0",
                "pos": {"filename": "main.tf", "line": 20}
            })
        );
    }
}
