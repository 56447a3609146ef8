//! Compile-rule generation and compaction.

pub mod collect;
pub mod compaction;
