//! Rule compaction: lossless re-grouping of `targets: prerequisites` rules.
//!
//! One rule per object file repeats the same prerequisite lists over and over
//! when many units share dependencies. Each pass scores every pair of rules,
//! applies the best non-overlapping merges greedily and drops rules that
//! became empty. The set of `(target, prerequisite)` pairs never changes.
//!
//! Two merge shapes exist, each with an "equal" and a "superset" flavour:
//!
//! - [`MergeKind::Targets`]: the donor's targets contain the receiver's. The
//!   shared targets leave the donor and the donor's prerequisites are added to
//!   the receiver.
//! - [`MergeKind::Prerequisites`]: the donor's prerequisites contain the
//!   receiver's. The shared prerequisites leave the donor and the donor's
//!   targets are added to the receiver.

use crate::{
    errors::{DepError, Result},
    model::rule::DependencyRule,
};
use std::cmp::Reverse;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    Targets,
    Prerequisites,
}

/// A scored merge candidate between two rule indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    pub kind: MergeKind,
    /// Rule whose set is the superset; it loses the shared part.
    pub donor: usize,
    /// Rule that absorbs the donor's other side.
    pub receiver: usize,
    /// Tokens saved, always > 0.
    pub benefit: usize,
}

/// Score every unordered pair of rules, in pair order.
///
/// Target-side shapes are tried first; the prerequisite side is only
/// considered when the targets give no positive merge.
pub fn find_merges<T: Ord>(rules: &[DependencyRule<T>]) -> Vec<Merge> {
    let mut merges = Vec::new();
    for i0 in 0..rules.len() {
        for i1 in (i0 + 1)..rules.len() {
            let found = classify(rules, i0, i1, MergeKind::Targets)
                .or_else(|| classify(rules, i0, i1, MergeKind::Prerequisites));
            if let Some(m) = found {
                trace!(?m, "merge candidate");
                merges.push(m);
            }
        }
    }
    merges
}

/// Classify one side of a pair. Equality is checked before containment.
fn classify<T: Ord>(
    rules: &[DependencyRule<T>],
    i0: usize,
    i1: usize,
    kind: MergeKind,
) -> Option<Merge> {
    let (a, b) = (&rules[i0], &rules[i1]);
    let (a_key, a_other, b_key, b_other) = match kind {
        MergeKind::Targets => (&a.targets, &a.prerequisites, &b.targets, &b.prerequisites),
        MergeKind::Prerequisites => (&a.prerequisites, &a.targets, &b.prerequisites, &b.targets),
    };

    let (donor, receiver, benefit) = if a_key == b_key {
        (i0, i1, a_key.len())
    } else if a_key.is_superset(b_key) {
        (i0, i1, b_key.len().saturating_sub(a_other.len()))
    } else if b_key.is_superset(a_key) {
        (i1, i0, a_key.len().saturating_sub(b_other.len()))
    } else {
        return None;
    };

    (benefit > 0).then_some(Merge {
        kind,
        donor,
        receiver,
        benefit,
    })
}

/// Apply one merge to a donor/receiver pair, returning their replacements.
///
/// Fails with [`DepError::InternalConsistency`] if the donor does not actually
/// contain the receiver on the merged side.
pub fn apply_merge<T: Ord + Clone>(
    donor: &DependencyRule<T>,
    receiver: &DependencyRule<T>,
    kind: MergeKind,
) -> Result<(DependencyRule<T>, DependencyRule<T>)> {
    match kind {
        MergeKind::Targets => {
            if !donor.targets.is_superset(&receiver.targets) {
                return Err(DepError::InternalConsistency(
                    "target merge on rules whose targets are not nested".into(),
                ));
            }
            let donor_next = DependencyRule {
                targets: &donor.targets - &receiver.targets,
                prerequisites: donor.prerequisites.clone(),
            };
            let receiver_next = DependencyRule {
                targets: receiver.targets.clone(),
                prerequisites: &receiver.prerequisites | &donor.prerequisites,
            };
            Ok((donor_next, receiver_next))
        }
        MergeKind::Prerequisites => {
            if !donor.prerequisites.is_superset(&receiver.prerequisites) {
                return Err(DepError::InternalConsistency(
                    "prerequisite merge on rules whose prerequisites are not nested".into(),
                ));
            }
            let donor_next = DependencyRule {
                targets: donor.targets.clone(),
                prerequisites: &donor.prerequisites - &receiver.prerequisites,
            };
            let receiver_next = DependencyRule {
                targets: &receiver.targets | &donor.targets,
                prerequisites: receiver.prerequisites.clone(),
            };
            Ok((donor_next, receiver_next))
        }
    }
}

/// One optimization pass. Returns `None` when no pair has a positive benefit.
pub fn compact_pass<T: Ord + Clone>(
    rules: &[DependencyRule<T>],
) -> Result<Option<Vec<DependencyRule<T>>>> {
    let mut merges = find_merges(rules);
    if merges.is_empty() {
        return Ok(None);
    }
    // stable: ties keep pair order
    merges.sort_by_key(|m| Reverse(m.benefit));

    let mut next: Vec<DependencyRule<T>> = rules.to_vec();
    let mut consumed = vec![false; rules.len()];
    let mut applied = 0usize;

    for m in merges {
        if consumed[m.donor] || consumed[m.receiver] {
            continue;
        }
        let (donor, receiver) = apply_merge(&rules[m.donor], &rules[m.receiver], m.kind)?;
        next[m.donor] = donor;
        next[m.receiver] = receiver;
        consumed[m.donor] = true;
        consumed[m.receiver] = true;
        applied += 1;
        trace!(?m, "merge applied");
    }

    let before = next.len();
    next.retain(|r| !r.is_empty());
    debug!(applied, deleted = before - next.len(), "compaction pass");
    Ok(Some(next))
}

/// Run up to `iterations` passes, stopping early once nothing improves.
///
/// `iterations == 0` returns the input unchanged.
#[tracing::instrument(level = "debug", skip_all, fields(rules = rules.len(), iterations = iterations))]
pub fn compact<T: Ord + Clone>(
    rules: &[DependencyRule<T>],
    iterations: usize,
) -> Result<Vec<DependencyRule<T>>> {
    let mut current = rules.to_vec();
    for it in 0..iterations {
        match compact_pass(&current)? {
            Some(next) => current = next,
            None => {
                debug!("cannot optimize further: stopped after {} iterations", it);
                break;
            }
        }
    }
    Ok(current)
}

/// Total identifiers printed for a rule list.
pub fn token_count<T: Ord + Clone>(rules: &[DependencyRule<T>]) -> usize {
    rules.iter().map(DependencyRule::token_count).sum()
}
