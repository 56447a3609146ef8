//! Unit registry: the single owner of every unit and dependency edge.
//!
//! Units live as nodes of a `petgraph` directed graph; an edge `a → b` means
//! "unit `a` requires unit `b` to be built first". Names are case-insensitive
//! and map to exactly one node. The object file of a unit is assigned at most
//! once; a second assignment is a [`DepError::DuplicateDefinition`].

use crate::{
    errors::{DepError, Result},
    model::{
        object_file::ObjectFile,
        statement::UnitKind,
        unit::{DanglingReference, DepEdge, Unit, fold_name},
    },
};
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Handle of a unit inside a [`UnitRegistry`].
pub type UnitId = NodeIndex;

#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    graph: DiGraph<Unit, DepEdge>,
    by_name: HashMap<String, UnitId>,
    intrinsic: HashSet<String>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that silently skips `use` of the given standard units.
    pub fn with_intrinsics<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            intrinsic: names.into_iter().map(|n| fold_name(n.as_ref())).collect(),
            ..Self::default()
        }
    }

    /// Return the unit called `name`, creating a placeholder of `kind` if
    /// none exists yet. An existing unit is returned whatever its kind.
    pub fn resolve_or_create(&mut self, name: &str, kind: UnitKind) -> UnitId {
        let key = fold_name(name);
        if let Some(&id) = self.by_name.get(&key) {
            return id;
        }
        let id = self.graph.add_node(Unit::placeholder(&key, kind));
        self.by_name.insert(key, id);
        id
    }

    pub fn find(&self, name: &str) -> Option<UnitId> {
        self.by_name.get(&fold_name(name)).copied()
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.graph[id]
    }

    /// Associate `file` with the unit. Never overwrites an existing association.
    pub fn assign_object_file(&mut self, id: UnitId, file: &ObjectFile) -> Result<()> {
        let unit = &mut self.graph[id];
        if let Some(existing) = &unit.object {
            return Err(DepError::DuplicateDefinition {
                unit: unit.name.clone(),
                existing: existing.source.clone(),
                incoming: file.source.clone(),
            });
        }
        unit.object = Some(file.clone());
        Ok(())
    }

    /// `module NAME` found in `file`.
    pub fn declare_module(&mut self, name: &str, file: &ObjectFile) -> Result<UnitId> {
        let id = self.resolve_or_create(name, UnitKind::Module);
        self.assign_object_file(id, file)?;
        debug!(unit = %self.graph[id].name, file = %file.source, "+ module");
        Ok(id)
    }

    /// `program NAME` found in `file`.
    ///
    /// A placeholder of the same name (only created by a `use` of the program
    /// name) is converted in place.
    pub fn declare_program(&mut self, name: &str, file: &ObjectFile) -> Result<UnitId> {
        let id = self.resolve_or_create(name, UnitKind::Program);
        self.assign_object_file(id, file)?;
        self.graph[id].kind = UnitKind::Program;
        debug!(unit = %self.graph[id].name, file = %file.source, "+ program");
        Ok(id)
    }

    /// `submodule (PARENT) NAME` found in `file`.
    ///
    /// The parent is resolved first (it may still be a forward reference),
    /// then the submodule gets its object file and a `Parent` edge.
    pub fn declare_submodule(
        &mut self,
        name: &str,
        parent: &str,
        file: &ObjectFile,
    ) -> Result<UnitId> {
        let parent_id = self.resolve_or_create(parent, UnitKind::Module);
        let id = self.resolve_or_create(name, UnitKind::Submodule);
        self.assign_object_file(id, file)?;
        self.graph[id].kind = UnitKind::Submodule;
        if id != parent_id {
            self.link(id, parent_id, DepEdge::Parent);
        }
        debug!(
            unit = %self.graph[id].name,
            parent = %self.graph[parent_id].name,
            file = %file.source,
            "+ submodule"
        );
        Ok(id)
    }

    /// `use NAME` inside `unit`. Returns the used unit, or `None` when the
    /// name is an intrinsic unit and nothing was recorded.
    pub fn add_use(&mut self, unit: UnitId, used: &str) -> Option<UnitId> {
        if self.is_intrinsic(used) {
            debug!(unit = %self.graph[unit].name, used, "skip intrinsic use");
            return None;
        }
        let dep = self.resolve_or_create(used, UnitKind::Module);
        if dep != unit {
            self.link(unit, dep, DepEdge::Uses);
        }
        debug!(unit = %self.graph[unit].name, used = %self.graph[dep].name, "* uses");
        Some(dep)
    }

    /// `include 'PATH'` inside `unit`.
    pub fn add_include(&mut self, unit: UnitId, path: &str) {
        debug!(unit = %self.graph[unit].name, path, "* includes");
        self.graph[unit].includes.insert(path.to_string());
    }

    pub fn is_intrinsic(&self, name: &str) -> bool {
        self.intrinsic.contains(&fold_name(name))
    }

    /// Units this unit requires, through `use` or its parent.
    pub fn dependencies(&self, id: UnitId) -> impl Iterator<Item = UnitId> + '_ {
        self.graph.neighbors_directed(id, Direction::Outgoing)
    }

    /// Submodules registered under this unit.
    pub fn children(&self, id: UnitId) -> impl Iterator<Item = UnitId> + '_ {
        self.graph
            .edges_directed(id, Direction::Incoming)
            .filter(|e| *e.weight() == DepEdge::Parent)
            .map(|e| e.source())
    }

    /// Drop every edge pointing at a unit that never received an object file.
    ///
    /// Returns the dropped edges (sorted) and logs a warning for each one.
    pub fn prune_dangling(&mut self) -> Vec<DanglingReference> {
        let mut doomed: Vec<EdgeIndex> = Vec::new();
        let mut dropped: Vec<DanglingReference> = Vec::new();
        for e in self.graph.edge_references() {
            let target = &self.graph[e.target()];
            if target.is_placeholder() {
                doomed.push(e.id());
                dropped.push(DanglingReference {
                    from: self.graph[e.source()].name.clone(),
                    to: target.name.clone(),
                });
            }
        }

        // Removal swaps the last edge into the hole, so go from the back.
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        for e in doomed {
            self.graph.remove_edge(e);
        }

        dropped.sort();
        for d in &dropped {
            warn!(
                from = %d.from,
                unit = %d.to,
                "unit was not found in any file; dependency dropped"
            );
        }
        dropped
    }

    /// Every unit id, ordered by unit name.
    pub fn sorted_ids(&self) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self.graph.node_indices().collect();
        ids.sort_by(|a, b| self.graph[*a].name.cmp(&self.graph[*b].name));
        ids
    }

    /// Programs that were declared in some file, ordered by name.
    pub fn programs(&self) -> Vec<UnitId> {
        self.sorted_ids()
            .into_iter()
            .filter(|&id| {
                let u = &self.graph[id];
                u.is_program() && !u.is_placeholder()
            })
            .collect()
    }

    /// Multi-line human summary of one unit, for verbose diagnostics.
    pub fn describe(&self, id: UnitId) -> String {
        let mut s = self.graph[id].to_string();
        let deps = self.names(self.dependencies(id));
        if !deps.is_empty() {
            s.push_str(&format!("\n  depends on {}", deps.join(", ")));
        }
        let includes = &self.graph[id].includes;
        if !includes.is_empty() {
            let inc: Vec<&str> = includes.iter().map(String::as_str).collect();
            s.push_str(&format!("\n  includes   {}", inc.join(", ")));
        }
        let children = self.names(self.children(id));
        if !children.is_empty() {
            s.push_str(&format!("\n  has submds {}", children.join(", ")));
        }
        s
    }

    pub fn names(&self, ids: impl Iterator<Item = UnitId>) -> Vec<String> {
        let mut v: Vec<String> = ids.map(|id| self.graph[id].name.clone()).collect();
        v.sort();
        v.dedup();
        v
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add `from → to`, keeping one edge per pair. A `Parent` label wins
    /// over `Uses` so the child relation survives a redundant `use`.
    fn link(&mut self, from: UnitId, to: UnitId, label: DepEdge) {
        match self.graph.find_edge(from, to) {
            Some(e) => {
                if label == DepEdge::Parent {
                    self.graph[e] = DepEdge::Parent;
                }
            }
            None => {
                self.graph.add_edge(from, to, label);
            }
        }
    }
}
