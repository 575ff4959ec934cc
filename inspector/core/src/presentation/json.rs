// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! JSON encoding of a loaded [`Module`].
//!
//! Key names and omission rules are fixed for compatibility with existing
//! consumers: `required_core`, `provider_aliases` and `diagnostics` are left
//! out when empty, every other collection is always written (as `{}` when
//! empty). Decoding accepts the same form and fills omitted collections with
//! empty ones.

use crate::domain::module::Module;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to encode module as JSON: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Failed to decode module from JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn to_json(module: &Module, pretty: bool) -> Result<String, EncodeError> {
    let encoded = if pretty {
        serde_json::to_string_pretty(module)
    } else {
        serde_json::to_string(module)
    };
    encoded.map_err(EncodeError::Encode)
}

pub fn from_json(json: &str) -> Result<Module, EncodeError> {
    serde_json::from_str(json).map_err(EncodeError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Diagnostic, ModuleCall, Resource, ResourceMode, SourcePos, Variable};
    use serde_json::{json, Value};

    #[test]
    fn test_compact_empty_module() {
        let encoded = to_json(&Module::new("./mod"), false).unwrap();
        assert_eq!(
            encoded,
            r#"{"path":"./mod","variables":{},"outputs":{},"required_providers":{},"managed_resources":{},"data_resources":{},"module_calls":{}}"#
        );
    }

    #[test]
    fn test_key_order_and_presence_when_populated() {
        let mut module = Module::new("mod");
        module.variables.insert("region".to_string(), Variable::new("region", SourcePos::new("v.tf", 1)));
        module.required_core.push(">= 1.0".to_string());
        module.provider_aliases.add("aws", "west");
        module.insert_resource(Resource::new(ResourceMode::Managed, "aws_instance", "web", SourcePos::new("m.tf", 2)));
        module.module_calls.insert(
            "vpc".to_string(),
            ModuleCall::new("vpc", "./vpc", SourcePos::new("m.tf", 9)),
        );
        module.push_diagnostic(Diagnostic::warning("w", ""));

        let encoded = to_json(&module, true).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for key in [
            "path",
            "variables",
            "outputs",
            "required_core",
            "required_providers",
            "provider_aliases",
            "managed_resources",
            "data_resources",
            "module_calls",
            "diagnostics",
        ] {
            assert!(keys.contains(&key), "missing key {}", key);
        }
        assert_eq!(value["managed_resources"]["aws_instance.web"]["provider"], json!({"name": "aws"}));
        assert_eq!(value["data_resources"], json!({}));
    }

    #[test]
    fn test_decode_roundtrip() {
        let mut module = Module::new("mod");
        module.provider_aliases.add("aws", "west");
        module.provider_aliases.add("aws", "east");
        module.push_diagnostic(Diagnostic::error("e", "d").at(SourcePos::new("main.tf", 4)));

        let decoded = from_json(&to_json(&module, false).unwrap()).unwrap();
        assert_eq!(decoded, module);
        assert_eq!(decoded.provider_aliases.get("aws").unwrap(), ["west", "east"]);
    }

    #[test]
    fn test_decode_error() {
        let err = from_json("{not json").unwrap_err();
        assert!(matches!(err, EncodeError::Decode(_)));
        assert!(err.to_string().starts_with("Failed to decode module"));
    }
}
