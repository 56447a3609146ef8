//! Seams between the line scanner, the build-tool lookup and the graph.
//!
//! These traits decouple statement recognition and search-path discovery
//! from graph building, so either side can be replaced in tests.

use crate::model::statement::Statement;
use std::path::PathBuf;

/// Turns one source line into at most one classified statement.
pub trait LineClassifier {
    fn classify(&self, line: &str) -> Option<Statement>;

    /// Classify every line of a source text, keeping only recognised ones.
    fn classify_source(&self, text: &str) -> Vec<Statement> {
        text.lines().filter_map(|l| self.classify(l)).collect()
    }
}

/// Source directories configured in an existing build setup, if any.
pub trait SearchPathSource {
    fn search_path(&self) -> Option<Vec<PathBuf>>;
}
