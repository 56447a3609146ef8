//! Output writers: makefile text and the JSONL graph dump.

pub mod fold;
pub mod jsonl;
pub mod makefile;
