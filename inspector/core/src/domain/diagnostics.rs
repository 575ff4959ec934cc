// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Diagnostics
//!
//! Problems found while loading a module are recorded here instead of being
//! returned as failures. The module model is a sink for problems, never a
//! source of them: callers inspect the collection and decide whether any
//! error-kind entry should stop further processing.
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | `Severity` | `error` or `warning` |
//! | `Diagnostic` | Severity + summary + optional detail and position |
//! | `Diagnostics` | Append-only ordered list, no deduplication |

use crate::domain::source_pos::SourcePos;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
        }
    }
}

/// A single error or warning produced during module loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,

    /// Short, human-readable description of the problem
    pub summary: String,

    /// Longer explanation (may be empty)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,

    /// Where the problem was found, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<SourcePos>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            pos: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            pos: None,
        }
    }

    /// Attach a source position to this diagnostic
    pub fn at(mut self, pos: SourcePos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.summary)?;
        if !self.detail.is_empty() {
            write!(f, "; {}", self.detail)?;
        }
        if let Some(pos) = &self.pos {
            write!(f, " ({})", pos)?;
        }
        Ok(())
    }
}

/// Returned by [`Diagnostics::err`] when at least one error is present.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{count} error(s) while loading module; first: {first}")]
pub struct DiagnosticsError {
    pub count: usize,
    pub first: String,
}

/// Ordered sequence of diagnostics. Append order is preserved and identical
/// entries are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    /// Append every diagnostic from `other`, keeping its order
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Collapse the collection into a `Result`: `Err` iff any error-kind
    /// diagnostic is present. Warnings alone never produce an error.
    pub fn err(&self) -> Result<(), DiagnosticsError> {
        let mut errors = self.errors();
        match errors.next() {
            None => Ok(()),
            Some(first) => Err(DiagnosticsError {
                count: 1 + errors.count(),
                first: first.to_string(),
            }),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Diagnostic ────────────────────────────────────────────────────────────

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("Unsupported block type", "Blocks of type \"foo\" are not expected here.")
            .at(SourcePos::new("main.tf", 4));
        assert_eq!(
            diag.to_string(),
            "Error: Unsupported block type; Blocks of type \"foo\" are not expected here. (main.tf:4)"
        );

        let warn = Diagnostic::warning("Deprecated attribute", "");
        assert_eq!(warn.to_string(), "Warning: Deprecated attribute");
    }

    #[test]
    fn test_diagnostic_serialization_omits_empty_fields() {
        let diag = Diagnostic::warning("Something odd", "");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json, serde_json::json!({"severity": "warning", "summary": "Something odd"}));

        let diag = Diagnostic::error("Bad", "very bad").at(SourcePos::new("a.tf", 1));
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "severity": "error",
                "summary": "Bad",
                "detail": "very bad",
                "pos": {"filename": "a.tf", "line": 1}
            })
        );
    }

    // ── Diagnostics ───────────────────────────────────────────────────────────

    #[test]
    fn test_append_order_preserved_without_dedup() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::warning("first", ""));
        diags.push(Diagnostic::error("second", ""));
        diags.push(Diagnostic::warning("first", ""));

        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, vec!["first", "second", "first"]);
        assert_eq!(diags.len(), 3);
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut a = Diagnostics::from(vec![Diagnostic::error("a", "")]);
        let b = Diagnostics::from(vec![Diagnostic::warning("b", ""), Diagnostic::error("c", "")]);
        a.extend(b);

        let summaries: Vec<_> = a.iter().map(|d| d.summary.clone()).collect();
        assert_eq!(summaries, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_has_errors_and_err() {
        let mut diags = Diagnostics::new();
        assert!(!diags.has_errors());
        assert!(diags.err().is_ok());

        diags.push(Diagnostic::warning("just a warning", ""));
        assert!(diags.has_warnings());
        assert!(!diags.has_errors());
        assert!(diags.err().is_ok());

        diags.push(Diagnostic::error("broken", "detail"));
        diags.push(Diagnostic::error("also broken", ""));
        let err = diags.err().unwrap_err();
        assert_eq!(err.count, 2);
        assert!(err.to_string().contains("broken"));
        assert_eq!(diags.errors().count(), 2);
        assert_eq!(diags.warnings().count(), 1);
    }

    #[test]
    fn test_display_one_line_per_diagnostic() {
        let diags = Diagnostics::from(vec![
            Diagnostic::error("one", ""),
            Diagnostic::warning("two", ""),
        ]);
        assert_eq!(diags.to_string(), "Error: one\nWarning: two");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let diags = Diagnostics::from(vec![Diagnostic::error("x", "")]);
        let json = serde_json::to_value(&diags).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["summary"], "x");
    }
}
