//! Data types shared by the scanner, graph, compaction and exporters.

pub mod object_file;
pub mod rule;
pub mod statement;
pub mod unit;
