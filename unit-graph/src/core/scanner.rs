//! Regex line classifier for Fortran sources.
//!
//! Recognises unit starts (`module`, `program`, `submodule`), unit ends,
//! `use` and `include` lines, case-insensitively. Anything else, comments
//! included, yields nothing. The classifier is stateless; which statements
//! matter in which context is decided by the graph builder.

use crate::{
    core::traits::LineClassifier,
    model::statement::{Statement, UnitKind},
};
use regex::Regex;

/// Words that follow `module` in a procedure prefix rather than a unit name.
const MODULE_PREFIX_WORDS: &[&str] = &[
    "procedure",
    "subroutine",
    "function",
    "pure",
    "impure",
    "elemental",
    "recursive",
    "non_recursive",
];

pub struct FortranScanner {
    unit_start: Regex,
    unit_end: Regex,
    use_stmt: Regex,
    include: Regex,
    cpp_include: Regex,
}

impl FortranScanner {
    pub fn new() -> Self {
        Self {
            unit_start: Regex::new(
                r"(?i)^\s*(module\s+|program\s+|submodule\s*\(\s*([a-z][a-z0-9_]*)\s*(?::\s*([a-z][a-z0-9_]*)\s*)?\)\s*)([a-z][a-z0-9_]*)",
            )
            .expect("valid unit start regex"),
            unit_end: Regex::new(r"(?i)^\s*end\s*(module|submodule|program)\b")
                .expect("valid unit end regex"),
            use_stmt: Regex::new(
                r"(?i)^\s*use\b\s*(?:,\s*(intrinsic|non_intrinsic)\s*)?(?:::)?\s*([a-z][a-z0-9_]*)",
            )
            .expect("valid use regex"),
            include: Regex::new(r#"(?i)^\s*include\s*["']([^"']+)["']"#)
                .expect("valid include regex"),
            cpp_include: Regex::new(r#"^\s*#\s*include\s*"([^"]+)""#)
                .expect("valid cpp include regex"),
        }
    }

    fn unit_start(&self, line: &str) -> Option<Statement> {
        let caps = self.unit_start.captures(line)?;
        let keyword = caps.get(1)?.as_str().trim_end().to_ascii_lowercase();
        let name = caps.get(4)?.as_str().to_string();

        if keyword.starts_with("submodule") {
            // `(ancestor:parent)` names the direct parent last
            let parent = caps.get(3).or_else(|| caps.get(2))?.as_str().to_string();
            return Some(Statement::UnitStart {
                kind: UnitKind::Submodule,
                name,
                parent: Some(parent),
            });
        }
        if keyword == "program" {
            return Some(Statement::program(name));
        }
        if MODULE_PREFIX_WORDS.contains(&name.to_ascii_lowercase().as_str()) {
            return None;
        }
        Some(Statement::module(name))
    }

    fn use_stmt(&self, line: &str) -> Option<Statement> {
        let caps = self.use_stmt.captures(line)?;
        let nature = caps.get(1).map(|m| m.as_str().to_ascii_lowercase());
        if nature.as_deref() == Some("intrinsic") {
            return None;
        }
        Some(Statement::uses(caps.get(2)?.as_str()))
    }

    fn include(&self, line: &str) -> Option<Statement> {
        let caps = self
            .include
            .captures(line)
            .or_else(|| self.cpp_include.captures(line))?;
        Some(Statement::include(caps.get(1)?.as_str()))
    }
}

impl Default for FortranScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier for FortranScanner {
    fn classify(&self, line: &str) -> Option<Statement> {
        if self.unit_end.is_match(line) {
            return Some(Statement::UnitEnd);
        }
        self.unit_start(line)
            .or_else(|| self.use_stmt(line))
            .or_else(|| self.include(line))
    }
}
