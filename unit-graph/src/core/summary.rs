//! Run summary: counters collected while generating rules.
//!
//! Serializable so it can be logged as a whole or written next to the
//! graph export; field names are stable.

use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Source files read.
    pub files_scanned: usize,
    /// Source files without any unit (legacy code).
    pub legacy_files: usize,
    /// Units in the registry, placeholders included.
    pub units: usize,
    /// Programs that receive a link rule.
    pub programs: usize,
    /// Dependency edges dropped because their target was never defined.
    pub dangling: usize,
    /// Compile rules before and after compaction.
    pub rules_before: usize,
    pub rules_after: usize,
    /// Identifiers printed in compile rules before and after compaction.
    pub tokens_before: usize,
    pub tokens_after: usize,
}

impl RunSummary {
    pub fn log(&self) {
        info!(
            files = self.files_scanned,
            legacy = self.legacy_files,
            units = self.units,
            programs = self.programs,
            dangling = self.dangling,
            rules = self.rules_after,
            "Dependency rules generated"
        );
        if self.rules_before != self.rules_after {
            info!(
                "compaction: {} -> {} rules, {} -> {} tokens",
                self.rules_before, self.rules_after, self.tokens_before, self.tokens_after
            );
        }
    }
}
