//! Unified error types for the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for dependency discovery and rule generation.
#[derive(Debug, Error)]
pub enum DepError {
    /// Two source files define a unit of the same (case-folded) name.
    #[error("unit `{unit}` is defined in both {existing} and {incoming}")]
    DuplicateDefinition {
        unit: String,
        existing: String,
        incoming: String,
    },

    /// A rule merge was attempted on sets that do not have the claimed shape.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    /// Unreadable source file, unlistable directory, or unwritable output.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("cannot parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

impl DepError {
    /// Wrap an I/O error together with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DepError>;
