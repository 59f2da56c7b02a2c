//! Indented source buffer for generated C and C++ files.
//!
//! Includes are collected separately from the body so generators can add
//! them while emitting declarations; [`SourceWriter::finish`] places them at
//! the top, deduplicated, in first-request order.

use rustc_hash::FxHashSet;

const INDENT: &str = "    ";

pub struct SourceWriter {
    pragma_once: bool,
    includes: Vec<String>,
    seen_includes: FxHashSet<String>,
    /// Current indentation level.
    indent: usize,
    body: String,
}

impl SourceWriter {
    /// A header file (`#pragma once`).
    pub fn header() -> Self {
        Self::new(true)
    }

    /// A source file.
    pub fn source() -> Self {
        Self::new(false)
    }

    fn new(pragma_once: bool) -> Self {
        Self {
            pragma_once,
            includes: Vec::new(),
            seen_includes: FxHashSet::default(),
            indent: 0,
            body: String::with_capacity(4096),
        }
    }

    /// Add `#include "header"` unless already present.
    pub fn include(&mut self, header: &str) {
        if self.seen_includes.insert(header.to_string()) {
            self.includes.push(header.to_string());
        }
    }

    pub fn include_all<S: AsRef<str>>(&mut self, headers: impl IntoIterator<Item = S>) {
        for header in headers {
            self.include(header.as_ref());
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a line with indentation and newline.
    pub fn writeln(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.body.push_str(INDENT);
        }
        self.body.push_str(line);
        self.body.push('\n');
    }

    pub fn newline(&mut self) {
        self.body.push('\n');
    }

    /// Blank line between top-level items; nothing at the start of the body
    /// or after another blank line.
    pub fn separator(&mut self) {
        if !self.body.is_empty() && !self.body.ends_with("\n\n") {
            self.body.push('\n');
        }
    }

    /// `open`, indented contents, `close`.
    pub fn block(&mut self, open: &str, close: &str, contents: impl FnOnce(&mut Self)) {
        self.writeln(open);
        self.indent();
        contents(self);
        self.dedent();
        self.writeln(close);
    }

    /// Assemble the file: pragma, includes, blank line, body.
    pub fn finish(self) -> String {
        let mut out = String::with_capacity(self.body.len() + 64 * self.includes.len() + 16);
        if self.pragma_once {
            out.push_str("#pragma once\n");
        }
        for header in &self.includes {
            out.push_str("#include \"");
            out.push_str(header);
            out.push_str("\"\n");
        }
        if !self.body.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&self.body);
        }
        out
    }
}
