// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a declaration within a module's configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourcePos {
    /// File path as it was discovered by the loader
    pub filename: String,

    /// 1-based line number
    pub line: usize,
}

impl SourcePos {
    pub fn new(filename: impl Into<String>, line: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let pos = SourcePos::new("main.tf", 12);
        assert_eq!(pos.to_string(), "main.tf:12");
    }

    #[test]
    fn test_serialization_keys() {
        let pos = SourcePos::new("variables.tf", 3);
        let json = serde_json::to_value(&pos).unwrap();
        assert_eq!(json, serde_json::json!({"filename": "variables.tf", "line": 3}));
    }
}
