// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Module Aggregate
//!
//! `Module` is the aggregate root for one inspected configuration directory.
//! The loader creates it empty with [`Module::new`] and fills it in a single
//! pass; downstream consumers then treat it as a read-only snapshot.
//!
//! Every collection is always present, possibly empty, so consumers can
//! iterate any of them without presence checks. The encoded form keeps the
//! historical key names and omits only `required_core`, `provider_aliases`
//! and `diagnostics` when they are empty; every other map is always emitted.
//!
//! Maps are keyed by natural name/address. Inserting under an existing key
//! replaces the previous entry; the loader is responsible for flagging
//! duplicates.
//!
//! The type has no internal synchronization. Mutating one instance from
//! several threads requires external locking; sharing a finished module for
//! reading is fine.

use crate::domain::diagnostics::{Diagnostic, Diagnostics};
use crate::domain::module_call::ModuleCall;
use crate::domain::provider::{ProviderAliases, ProviderRequirement};
use crate::domain::resource::{Resource, ResourceMode};
use crate::domain::variable::{Output, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Where the module was loaded from (opaque to the model)
    path: String,

    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,

    #[serde(default)]
    pub outputs: BTreeMap<String, Output>,

    /// Core version constraints (`terraform { required_version = ... }`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_core: Vec<String>,

    #[serde(default)]
    pub required_providers: BTreeMap<String, ProviderRequirement>,

    #[serde(default, skip_serializing_if = "ProviderAliases::is_empty")]
    pub provider_aliases: ProviderAliases,

    #[serde(default)]
    pub managed_resources: BTreeMap<String, Resource>,

    #[serde(default)]
    pub data_resources: BTreeMap<String, Resource>,

    #[serde(default)]
    pub module_calls: BTreeMap<String, ModuleCall>,

    /// Errors and warnings recorded while loading
    #[serde(default, skip_serializing_if = "Diagnostics::is_empty")]
    pub diagnostics: Diagnostics,
}

impl Module {
    /// Create an empty module for `path`. Any string is accepted.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            variables: BTreeMap::new(),
            outputs: BTreeMap::new(),
            required_core: Vec::new(),
            required_providers: BTreeMap::new(),
            provider_aliases: ProviderAliases::new(),
            managed_resources: BTreeMap::new(),
            data_resources: BTreeMap::new(),
            module_calls: BTreeMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Insert a resource into the map matching its mode, keyed by address.
    /// Returns the resource previously stored under that address.
    pub fn insert_resource(&mut self, resource: Resource) -> Option<Resource> {
        let address = resource.address();
        match resource.mode {
            ResourceMode::Managed => self.managed_resources.insert(address, resource),
            ResourceMode::Data => self.data_resources.insert(address, resource),
        }
    }

    /// Requirement entry for `provider`, created empty if missing
    pub fn require_provider(&mut self, provider: &str) -> &mut ProviderRequirement {
        self.required_providers.entry(provider.to_string()).or_default()
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// All resources, managed first, each group in address order
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.managed_resources.values().chain(self.data_resources.values())
    }
}
