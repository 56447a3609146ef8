//! Compilation-unit dependency graph for Fortran sources.
//!
//! Scans source files for module, submodule and program declarations, builds
//! a graph of `use` relations, and turns it into makefile rules: per-object
//! compile prerequisites (optionally compacted) and per-program link lines.
//!
//! Entry point: [`run::generate`].

pub mod config;
pub mod core;
pub mod errors;
pub mod export;
pub mod graph;
pub mod model;
pub mod rules;
pub mod run;

pub use config::model::DepConfig;
pub use errors::{DepError, Result};
pub use graph::registry::{UnitId, UnitRegistry};
pub use model::rule::DependencyRule;
pub use run::{RunOutput, generate};
