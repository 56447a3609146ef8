//! Transitive link closure.
//!
//! The link line of a program needs the object file of every unit reachable
//! from it: `use` targets, parents of submodules, and the submodules of every
//! reached module (they implement its procedures). Traversal uses an explicit
//! worklist and a visited set, so cyclic graphs terminate with the set of all
//! reachable object files.

use crate::graph::registry::{UnitId, UnitRegistry};
use std::collections::{BTreeSet, HashSet};

/// Units reachable from `root`, `root` included, skipping placeholders.
pub fn reachable_units(registry: &UnitRegistry, root: UnitId) -> Vec<UnitId> {
    let mut visited: HashSet<UnitId> = HashSet::from([root]);
    let mut order: Vec<UnitId> = Vec::new();
    let mut stack: Vec<UnitId> = vec![root];

    while let Some(id) = stack.pop() {
        order.push(id);
        let next = registry
            .dependencies(id)
            .chain(registry.children(id))
            .filter(|&n| !registry.unit(n).is_placeholder());
        for n in next {
            if visited.insert(n) {
                stack.push(n);
            }
        }
    }
    order
}

/// Object files needed to link `root`, `root`'s own object included.
///
/// The set is ordered by name so printed link lines are reproducible.
pub fn link_closure(registry: &UnitRegistry, root: UnitId) -> BTreeSet<String> {
    reachable_units(registry, root)
        .into_iter()
        .filter_map(|id| registry.unit(id).object())
        .map(|obj| obj.object.clone())
        .collect()
}
