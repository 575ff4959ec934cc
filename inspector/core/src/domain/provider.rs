// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Provider requirements, references and alias bookkeeping.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reference to a provider configuration, e.g. `aws` or `aws.west`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProviderRef {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
}

impl ProviderRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: String::new(),
        }
    }

    pub fn with_alias(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    /// Parse the traversal form `name` or `name.alias`.
    /// Everything after the first dot is taken as the alias.
    pub fn parse(reference: &str) -> Self {
        match reference.split_once('.') {
            Some((name, alias)) => Self::with_alias(name, alias),
            None => Self::new(reference),
        }
    }

    pub fn has_alias(&self) -> bool {
        !self.alias.is_empty()
    }
}

impl fmt::Display for ProviderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alias.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.name, self.alias)
        }
    }
}

/// What a module declares it needs from a provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderRequirement {
    /// Registry source address (e.g. `hashicorp/aws`)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub version_constraints: Vec<String>,

    /// Configuration aliases the module expects its caller to pass in
    #[serde(rename = "aliases", default, skip_serializing_if = "Vec::is_empty")]
    pub configuration_aliases: Vec<ProviderRef>,
}

/// Alias names per provider.
///
/// The representation is sparse: a provider only has an entry once at least
/// one alias was added for it, so a provider without aliases is *absent*
/// rather than mapped to an empty list. Within a provider the aliases are
/// unique and kept in first-seen order.
///
/// There is no internal locking. The loader owns the collection while it is
/// being filled; afterwards it is only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProviderAliases(BTreeMap<String, Vec<String>>);

impl ProviderAliases {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record that `provider` is referenced under `alias`.
    ///
    /// Adding an alias that is already known for the provider is a no-op, so
    /// the loader can call this once per occurrence it discovers.
    pub fn add(&mut self, provider: &str, alias: &str) {
        match self.0.get_mut(provider) {
            None => {
                self.0.insert(provider.to_string(), vec![alias.to_string()]);
            }
            Some(aliases) => {
                if !aliases.iter().any(|a| a == alias) {
                    aliases.push(alias.to_string());
                }
            }
        }
    }

    /// Aliases for `provider`, or `None` if none were ever added.
    pub fn get(&self, provider: &str) -> Option<&[String]> {
        self.0.get(provider).map(Vec::as_slice)
    }

    pub fn contains(&self, provider: &str) -> bool {
        self.0.contains_key(provider)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of providers that have at least one alias
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Built through `add` so decoded values keep the sparse/unique invariants.
impl From<BTreeMap<String, Vec<String>>> for ProviderAliases {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        let mut aliases = Self::new();
        for (provider, names) in raw {
            for alias in names {
                aliases.add(&provider, &alias);
            }
        }
        aliases
    }
}

impl<'de> Deserialize<'de> for ProviderAliases {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        Ok(Self::from(raw))
    }
}
