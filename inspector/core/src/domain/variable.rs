// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::source_pos::SourcePos;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared input variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,

    /// Type constraint as written (e.g. `list(string)`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_expr: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Default value; `None` when the declaration has no default at all
    #[serde(default)]
    pub default: Option<Value>,

    /// True when no default was declared
    pub required: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,

    pub pos: SourcePos,
}

impl Variable {
    /// A required variable with no type, description or default
    pub fn new(name: impl Into<String>, pos: SourcePos) -> Self {
        Self {
            name: name.into(),
            type_expr: None,
            description: String::new(),
            default: None,
            required: true,
            sensitive: false,
            pos,
        }
    }

    /// Set the default value and mark the variable optional
    pub fn set_default(&mut self, value: Value) {
        self.default = Some(value);
        self.required = false;
    }
}

/// Declared output value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,

    pub pos: SourcePos,
}

impl Output {
    pub fn new(name: impl Into<String>, pos: SourcePos) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            sensitive: false,
            pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_variable_is_required() {
        let var = Variable::new("region", SourcePos::new("variables.tf", 1));
        assert!(var.required);
        assert!(var.default.is_none());
    }

    #[test]
    fn test_set_default_makes_optional() {
        let mut var = Variable::new("region", SourcePos::new("variables.tf", 1));
        var.set_default(json!("us-east-1"));
        assert!(!var.required);
        assert_eq!(var.default, Some(json!("us-east-1")));
    }

    #[test]
    fn test_variable_serialization_keys() {
        let mut var = Variable::new("tags", SourcePos::new("variables.tf", 7));
        var.type_expr = Some("map(string)".to_string());
        var.description = "Common tags".to_string();
        var.set_default(json!({}));

        let value = serde_json::to_value(&var).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "tags",
                "type": "map(string)",
                "description": "Common tags",
                "default": {},
                "required": false,
                "pos": {"filename": "variables.tf", "line": 7}
            })
        );
    }

    #[test]
    fn test_required_variable_emits_null_default() {
        let mut var = Variable::new("password", SourcePos::new("main.tf", 2));
        var.sensitive = true;

        let value = serde_json::to_value(&var).unwrap();
        assert_eq!(value["default"], Value::Null);
        assert_eq!(value["required"], json!(true));
        assert_eq!(value["sensitive"], json!(true));
        assert!(value.get("type").is_none());
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_output_serialization_keys() {
        let mut out = Output::new("id", SourcePos::new("outputs.tf", 1));
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value, json!({"name": "id", "pos": {"filename": "outputs.tf", "line": 1}}));

        out.sensitive = true;
        out.description = "Instance ID".to_string();
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["sensitive"], json!(true));
        assert_eq!(value["description"], json!("Instance ID"));
    }
}
