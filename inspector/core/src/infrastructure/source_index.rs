// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Block header → line lookup
//!
//! Neither parser used by the loader keeps source spans, so positions are
//! recovered from the raw file text. Native files are scanned once for block
//! headers (`resource "aws_instance" "web" {`). JSON files are searched on
//! demand for the block-type key followed by each label key in order.
//! Anything that cannot be located reports line 1 of the file.

use crate::domain::source_pos::SourcePos;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// `*.tf`
    Native,
    /// `*.tf.json`
    Json,
}

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_-]*)((?:\s+(?:"[^"]*"|[A-Za-z_][A-Za-z0-9_-]*))*)\s*\{"#)
            .expect("block header pattern is valid")
    })
}

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""([^"]*)"|([A-Za-z_][A-Za-z0-9_-]*)"#)
            .expect("block label pattern is valid")
    })
}

#[derive(Debug)]
pub struct SourceIndex<'a> {
    filename: &'a str,
    text: &'a str,
    syntax: Syntax,
    /// Native header key → lines of every occurrence, in file order
    headers: HashMap<String, Vec<usize>>,
    /// Occurrences of each key already handed out by `pos`
    cursors: HashMap<String, usize>,
}

impl<'a> SourceIndex<'a> {
    pub fn scan(filename: &'a str, text: &'a str, syntax: Syntax) -> Self {
        let mut headers: HashMap<String, Vec<usize>> = HashMap::new();
        if syntax == Syntax::Native {
            for (i, line) in text.lines().enumerate() {
                let Some(caps) = header_regex().captures(line) else {
                    continue;
                };
                let mut key = caps[1].to_string();
                if let Some(labels) = caps.get(2) {
                    for label in label_regex().captures_iter(labels.as_str()) {
                        let text = label.get(1).or_else(|| label.get(2)).map_or("", |m| m.as_str());
                        key.push(' ');
                        key.push_str(text);
                    }
                }
                headers.entry(key).or_default().push(i + 1);
            }
        }

        Self {
            filename,
            text,
            syntax,
            headers,
            cursors: HashMap::new(),
        }
    }

    pub fn filename(&self) -> &str {
        self.filename
    }

    /// Position of the file itself (line 1)
    pub fn file_pos(&self) -> SourcePos {
        SourcePos::new(self.filename, 1)
    }

    /// Position of the next `kind "label"...` block. Repeated calls for the
    /// same key walk its occurrences in file order and stay on the last one
    /// once they run out. Line 1 if the block is not found at all.
    pub fn pos(&mut self, kind: &str, labels: &[&str]) -> SourcePos {
        let mut key = kind.to_string();
        for label in labels {
            key.push(' ');
            key.push_str(label);
        }
        let seen = self.cursors.get(&key).copied().unwrap_or(0);

        let line = match self.syntax {
            Syntax::Native => self
                .headers
                .get(&key)
                .and_then(|lines| lines.get(seen).or_else(|| lines.last()))
                .copied(),
            Syntax::Json => self.json_line(kind, labels, seen),
        };

        *self.cursors.entry(key).or_insert(0) += 1;
        SourcePos::new(self.filename, line.unwrap_or(1))
    }

    /// Walk the key path, taking the first match for each enclosing key and
    /// the `occurrence`-th match for the innermost one.
    fn json_line(&self, kind: &str, labels: &[&str], occurrence: usize) -> Option<usize> {
        let (last, enclosing) = match labels.split_last() {
            Some((last, rest)) => (*last, std::iter::once(kind).chain(rest.iter().copied()).collect()),
            None => (kind, Vec::new()),
        };

        let mut offset = 0;
        for key in enclosing {
            offset = find_key(self.text, key, offset)?;
        }

        let mut found = find_key(self.text, last, offset)?;
        for _ in 0..occurrence {
            match find_key(self.text, last, found + 1) {
                Some(next) => found = next,
                None => break,
            }
        }
        Some(line_of(self.text, found))
    }
}

/// Byte offset of the next `"key"` at or after `from` that is followed by a
/// colon (an object key, not a string value)
fn find_key(text: &str, key: &str, from: usize) -> Option<usize> {
    let quoted = format!("\"{}\"", key);
    let mut start = from;
    while let Some(found) = text.get(start..)?.find(&quoted) {
        let at = start + found;
        let end = at + quoted.len();
        if text[end..].trim_start().starts_with(':') {
            return Some(at);
        }
        start = end;
    }
    None
}

/// 1-based line containing byte `offset`
fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE: &str = r#"variable "region" {
  type = string
}

resource "aws_instance" "web" {
  ami = "ami-123"
  lifecycle {
    create_before_destroy = true
  }
}

  data aws_ami "ubuntu" {
}
"#;

    #[test]
    fn test_native_headers() {
        let mut index = SourceIndex::scan("main.tf", NATIVE, Syntax::Native);
        assert_eq!(index.pos("variable", &["region"]), SourcePos::new("main.tf", 1));
        assert_eq!(index.pos("resource", &["aws_instance", "web"]).line, 5);
        assert_eq!(index.pos("data", &["aws_ami", "ubuntu"]).line, 12);
    }

    #[test]
    fn test_native_unknown_falls_back_to_line_one() {
        let mut index = SourceIndex::scan("main.tf", NATIVE, Syntax::Native);
        assert_eq!(index.pos("output", &["missing"]).line, 1);
    }

    #[test]
    fn test_json_labels_found_in_order() {
        let text = r#"{
  "output": {
    "web": {"value": "x"}
  },
  "resource": {
    "aws_instance": {
      "web": {
        "ami": "ami-123"
      }
    }
  }
}"#;
        let mut index = SourceIndex::scan("main.tf.json", text, Syntax::Json);
        assert_eq!(index.pos("output", &["web"]).line, 3);
        assert_eq!(index.pos("resource", &["aws_instance", "web"]).line, 7);
        assert_eq!(index.pos("module", &["nope"]).line, 1);
    }

    #[test]
    fn test_repeated_native_headers_resolve_in_order() {
        let text = "variable \"a\" {}\n\nvariable \"b\" {}\nvariable \"a\" {\n  default = 1\n}\n";
        let mut index = SourceIndex::scan("main.tf", text, Syntax::Native);
        assert_eq!(index.pos("variable", &["a"]).line, 1);
        assert_eq!(index.pos("variable", &["b"]).line, 3);
        assert_eq!(index.pos("variable", &["a"]).line, 4);
        // Out of occurrences: stays on the last one
        assert_eq!(index.pos("variable", &["a"]).line, 4);
    }

    #[test]
    fn test_repeated_json_keys_resolve_in_order() {
        let text = r#"{
  "variable": [
    {"a": {}},
    {"b": {"default": "a"}},
    {"a": {"default": 1}}
  ]
}"#;
        let mut index = SourceIndex::scan("main.tf.json", text, Syntax::Json);
        assert_eq!(index.pos("variable", &["a"]).line, 3);
        assert_eq!(index.pos("variable", &["a"]).line, 5);
        assert_eq!(index.pos("variable", &["b"]).line, 4);
    }

    #[test]
    fn test_find_key_skips_string_values() {
        let text = r#"{"x": "web", "web" : {}}"#;
        assert_eq!(find_key(text, "web", 0), Some(13));
        assert_eq!(find_key(text, "web", 14), None);
        assert_eq!(find_key(text, "x", 0), Some(1));
    }

    #[test]
    fn test_line_of() {
        assert_eq!(line_of("a\nb\nc", 0), 1);
        assert_eq!(line_of("a\nb\nc", 2), 2);
        assert_eq!(line_of("a\nb\nc", 4), 3);
    }
}
