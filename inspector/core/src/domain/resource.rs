// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::provider::ProviderRef;
use crate::domain::source_pos::SourcePos;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// `resource` blocks
    Managed,
    /// `data` blocks
    Data,
}

impl fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceMode::Managed => write!(f, "managed"),
            ResourceMode::Data => write!(f, "data"),
        }
    }
}

/// A managed resource or data source declared by the module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub mode: ResourceMode,

    #[serde(rename = "type")]
    pub resource_type: String,

    pub name: String,

    pub provider: ProviderRef,

    pub pos: SourcePos,
}

impl Resource {
    /// Build a resource whose provider is implied by its type
    pub fn new(mode: ResourceMode, resource_type: impl Into<String>, name: impl Into<String>, pos: SourcePos) -> Self {
        let resource_type = resource_type.into();
        let provider = ProviderRef::new(implied_provider(&resource_type));
        Self {
            mode,
            resource_type,
            name: name.into(),
            provider,
            pos,
        }
    }

    /// Unique address used as the key in the module's resource maps:
    /// `type.name` for managed resources, `data.type.name` for data sources.
    pub fn address(&self) -> String {
        match self.mode {
            ResourceMode::Managed => format!("{}.{}", self.resource_type, self.name),
            ResourceMode::Data => format!("data.{}.{}", self.resource_type, self.name),
        }
    }
}

/// Provider local name implied by a resource type: the prefix before the
/// first underscore, or the whole type when it has none.
pub fn implied_provider(resource_type: &str) -> &str {
    match resource_type.split_once('_') {
        Some((prefix, _)) => prefix,
        None => resource_type,
    }
}
