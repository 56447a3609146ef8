//! Dependency graph builder.
//!
//! Consumes the statement stream of one source file at a time and records
//! declarations, `use` edges and includes in the [`UnitRegistry`].
//!
//! Statements are interpreted against a single "open unit":
//! - outside a unit only `UnitStart` matters, everything else is ignored;
//! - inside a unit `UnitEnd` closes it, `Use` and `Include` attach to it and a
//!   nested `UnitStart` is ignored.

use crate::{
    errors::Result,
    graph::registry::{UnitId, UnitRegistry},
    model::{
        object_file::ObjectFile,
        statement::{Statement, UnitKind},
    },
};
use tracing::{debug, trace};

/// What one file contributed to the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOutcome {
    /// Units declared by the file.
    pub units: usize,
    pub uses: usize,
    pub includes: usize,
}

impl FileOutcome {
    /// A file without any unit is legacy code and contributes nothing.
    pub fn is_legacy(&self) -> bool {
        self.units == 0
    }
}

pub struct GraphBuilder<'r> {
    registry: &'r mut UnitRegistry,
}

impl<'r> GraphBuilder<'r> {
    pub fn new(registry: &'r mut UnitRegistry) -> Self {
        Self { registry }
    }

    /// Feed the statements of one source file.
    ///
    /// Fails only on a duplicate definition; nothing else in a statement
    /// stream is an error.
    pub fn ingest<I>(&mut self, file: &ObjectFile, statements: I) -> Result<FileOutcome>
    where
        I: IntoIterator<Item = Statement>,
    {
        let mut outcome = FileOutcome::default();
        let mut current: Option<UnitId> = None;

        for stmt in statements {
            match (current, stmt) {
                (None, Statement::UnitStart { kind, name, parent }) => {
                    let id = self.declare(kind, &name, parent.as_deref(), file)?;
                    current = Some(id);
                    outcome.units += 1;
                }
                (None, other) => {
                    trace!(file = %file.source, statement = ?other, "ignored outside unit");
                }
                (Some(_), Statement::UnitEnd) => current = None,
                (Some(id), Statement::Use { name }) => {
                    if self.registry.add_use(id, &name).is_some() {
                        outcome.uses += 1;
                    }
                }
                (Some(id), Statement::Include { path }) => {
                    self.registry.add_include(id, &path);
                    outcome.includes += 1;
                }
                (Some(_), Statement::UnitStart { name, .. }) => {
                    trace!(file = %file.source, name = %name, "nested unit start ignored");
                }
            }
        }

        if outcome.is_legacy() {
            debug!(file = %file.source, "no unit declared; skipped");
        }
        Ok(outcome)
    }

    fn declare(
        &mut self,
        kind: UnitKind,
        name: &str,
        parent: Option<&str>,
        file: &ObjectFile,
    ) -> Result<UnitId> {
        match (kind, parent) {
            (UnitKind::Program, _) => self.registry.declare_program(name, file),
            (UnitKind::Submodule, Some(parent)) => {
                self.registry.declare_submodule(name, parent, file)
            }
            // A submodule without a parent carries no extra edge.
            (UnitKind::Module | UnitKind::Submodule, _) => self.registry.declare_module(name, file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DepError;

    fn obj(name: &str) -> ObjectFile {
        ObjectFile::from_source_name(name).unwrap()
    }

    #[test]
    fn records_uses_and_includes_of_open_unit() {
        let mut reg = UnitRegistry::new();
        let outcome = GraphBuilder::new(&mut reg)
            .ingest(
                &obj("b.f90"),
                [
                    Statement::uses("stray"),
                    Statement::module("b"),
                    Statement::uses("a"),
                    Statement::include("b.inc"),
                    Statement::UnitEnd,
                    Statement::uses("after_end"),
                ],
            )
            .unwrap();
        assert_eq!(
            outcome,
            FileOutcome {
                units: 1,
                uses: 1,
                includes: 1
            }
        );

        let b = reg.find("b").unwrap();
        assert_eq!(reg.names(reg.dependencies(b)), vec!["a".to_string()]);
        assert!(reg.unit(b).includes.contains("b.inc"));
        assert!(reg.find("stray").is_none());
        assert!(reg.find("after_end").is_none());
    }

    #[test]
    fn several_units_share_one_object_file() {
        let mut reg = UnitRegistry::new();
        GraphBuilder::new(&mut reg)
            .ingest(
                &obj("both.f90"),
                [
                    Statement::module("x"),
                    Statement::UnitEnd,
                    Statement::program("main"),
                    Statement::uses("x"),
                    Statement::UnitEnd,
                ],
            )
            .unwrap();
        let x = reg.find("x").unwrap();
        let main = reg.find("main").unwrap();
        assert_eq!(reg.unit(x).object(), reg.unit(main).object());
        assert!(reg.unit(main).is_program());
    }

    #[test]
    fn nested_start_is_ignored() {
        let mut reg = UnitRegistry::new();
        let outcome = GraphBuilder::new(&mut reg)
            .ingest(
                &obj("m.f90"),
                [Statement::module("m"), Statement::module("inner")],
            )
            .unwrap();
        assert_eq!(outcome.units, 1);
        assert!(reg.find("inner").is_none());
    }

    #[test]
    fn file_without_units_is_legacy() {
        let mut reg = UnitRegistry::new();
        let outcome = GraphBuilder::new(&mut reg)
            .ingest(&obj("old.f"), [Statement::include("common.inc")])
            .unwrap();
        assert!(outcome.is_legacy());
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_across_files_aborts() {
        let mut reg = UnitRegistry::new();
        let mut builder = GraphBuilder::new(&mut reg);
        builder
            .ingest(&obj("a.f90"), [Statement::module("m")])
            .unwrap();
        let err = builder
            .ingest(&obj("b.f90"), [Statement::submodule("m", "p")])
            .unwrap_err();
        assert!(matches!(err, DepError::DuplicateDefinition { .. }));
    }
}
