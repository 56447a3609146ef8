//! Turn the resolved unit graph into per-object-file compile rules.

use crate::{graph::registry::UnitRegistry, model::rule::DependencyRule};
use std::collections::{BTreeMap, BTreeSet};

/// One singleton-target rule per object file that has prerequisites.
///
/// Prerequisites are the object files of the units it depends on, plus its
/// include file names when `include_deps` is set. An object never depends on
/// itself (several units may share one source file). Run after
/// [`UnitRegistry::prune_dangling`] so no rule names a missing object.
pub fn collect_rules(registry: &UnitRegistry, include_deps: bool) -> Vec<DependencyRule<String>> {
    let mut by_object: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for id in registry.sorted_ids() {
        let unit = registry.unit(id);
        let Some(own) = unit.object() else {
            continue;
        };
        let prereqs = by_object.entry(own.object.clone()).or_default();
        for dep in registry.dependencies(id) {
            if let Some(obj) = registry.unit(dep).object() {
                prereqs.insert(obj.object.clone());
            }
        }
        if include_deps {
            prereqs.extend(unit.includes.iter().cloned());
        }
        prereqs.remove(&own.object);
    }

    by_object
        .into_iter()
        .filter(|(_, prereqs)| !prereqs.is_empty())
        .map(|(target, prereqs)| DependencyRule::new([target], prereqs))
        .collect()
}

/// Object files of every declared unit, sorted and deduplicated.
pub fn object_files(registry: &UnitRegistry) -> BTreeSet<String> {
    registry
        .sorted_ids()
        .into_iter()
        .filter_map(|id| registry.unit(id).object())
        .map(|obj| obj.object.clone())
        .collect()
}
