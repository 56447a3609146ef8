//! Classified source statements handed from the scanner to the graph builder.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// What kind of unit a `unit-start` statement opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Module,
    Program,
    Submodule,
}

impl Display for UnitKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UnitKind::Module => "module",
            UnitKind::Program => "program",
            UnitKind::Submodule => "submodule",
        })
    }
}

/// One classified line of source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `module NAME`, `program NAME` or `submodule (PARENT) NAME`.
    UnitStart {
        kind: UnitKind,
        name: String,
        parent: Option<String>,
    },
    /// `end module|submodule|program`.
    UnitEnd,
    /// `use NAME`.
    Use { name: String },
    /// `include 'PATH'`.
    Include { path: String },
}

impl Statement {
    pub fn module(name: impl Into<String>) -> Self {
        Self::UnitStart {
            kind: UnitKind::Module,
            name: name.into(),
            parent: None,
        }
    }

    pub fn program(name: impl Into<String>) -> Self {
        Self::UnitStart {
            kind: UnitKind::Program,
            name: name.into(),
            parent: None,
        }
    }

    pub fn submodule(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::UnitStart {
            kind: UnitKind::Submodule,
            name: name.into(),
            parent: Some(parent.into()),
        }
    }

    pub fn uses(name: impl Into<String>) -> Self {
        Self::Use { name: name.into() }
    }

    pub fn include(path: impl Into<String>) -> Self {
        Self::Include { path: path.into() }
    }
}
