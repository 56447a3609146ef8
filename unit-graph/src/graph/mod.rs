//! Unit dependency graph: registry, statement-driven builder, link closure.

pub mod builder;
pub mod closure;
pub mod registry;
