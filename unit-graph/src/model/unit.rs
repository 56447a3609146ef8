//! Named compilation units and the edges between them.

use crate::model::{object_file::ObjectFile, statement::UnitKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A module, program or submodule known to the registry.
///
/// The object file is set at most once; forward references created by a
/// `use` statement start without one and may never receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Case-folded name, the registry key.
    pub name: String,
    pub kind: UnitKind,
    pub(crate) object: Option<ObjectFile>,
    /// File names pulled in textually; not unit dependencies.
    pub includes: BTreeSet<String>,
}

impl Unit {
    pub(crate) fn placeholder(name: &str, kind: UnitKind) -> Self {
        Self {
            name: fold_name(name),
            kind,
            object: None,
            includes: BTreeSet::new(),
        }
    }

    pub fn object(&self) -> Option<&ObjectFile> {
        self.object.as_ref()
    }

    /// `true` while no source file has declared this unit.
    pub fn is_placeholder(&self) -> bool {
        self.object.is_none()
    }

    pub fn is_program(&self) -> bool {
        self.kind == UnitKind::Program
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)?;
        if let Some(obj) = &self.object {
            write!(f, " /{}/", obj.source)?;
        }
        Ok(())
    }
}

/// Label of a unit → unit dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepEdge {
    /// `use` statement.
    Uses,
    /// Submodule → its parent module.
    Parent,
}

impl Display for DepEdge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DepEdge::Uses => "uses",
            DepEdge::Parent => "parent",
        })
    }
}

/// A dropped edge whose target was never defined in any scanned file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DanglingReference {
    pub from: String,
    pub to: String,
}

/// Registry key for a unit name: names are case-insensitive.
pub fn fold_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
