//! Grouped `targets: prerequisites` relation used by rule compaction.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Every target depends on every prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRule<T: Ord> {
    pub targets: BTreeSet<T>,
    pub prerequisites: BTreeSet<T>,
}

impl<T: Ord + Clone> DependencyRule<T> {
    pub fn new(
        targets: impl IntoIterator<Item = T>,
        prerequisites: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            prerequisites: prerequisites.into_iter().collect(),
        }
    }

    /// `true` if the rule no longer relates anything.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() || self.prerequisites.is_empty()
    }

    /// Number of identifiers printed for this rule.
    pub fn token_count(&self) -> usize {
        self.targets.len() + self.prerequisites.len()
    }

    /// Expand into the `(target, prerequisite)` pairs the rule stands for.
    pub fn pairs(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.targets.iter().flat_map(move |t| {
            self.prerequisites
                .iter()
                .map(move |p| (t.clone(), p.clone()))
        })
    }
}

/// Union of pairs across a rule list.
pub fn expand_pairs<T: Ord + Clone>(rules: &[DependencyRule<T>]) -> BTreeSet<(T, T)> {
    rules.iter().flat_map(|r| r.pairs()).collect()
}

impl<T: Ord + Display> Display for DependencyRule<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_joined(f, &self.targets)?;
        f.write_str(":")?;
        for p in &self.prerequisites {
            write!(f, " {p}")?;
        }
        Ok(())
    }
}

fn write_joined<T: Display>(f: &mut Formatter<'_>, items: &BTreeSet<T>) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
