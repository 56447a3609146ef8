//! Configuration loader and validator.
//!
//! Responsibilities:
//! - Read an optional YAML file to populate [`DepConfig`]
//! - Apply defaults when values are missing
//! - Validate constraints (e.g., optimize_level must be <= 3)

pub mod model;

use crate::config::model::DepConfig;
use crate::errors::{DepError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = ".fortdep.yml";

/// Load [`DepConfig`] from `explicit`, else from [`DEFAULT_CONFIG_FILE`] in
/// `cwd` if it exists, else defaults.
///
/// An explicitly named file that cannot be read is an error; the implicit one
/// is only consulted when present.
pub fn load_or_default(explicit: Option<&Path>, cwd: &Path) -> Result<DepConfig> {
    let path: Option<PathBuf> = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            candidate.is_file().then_some(candidate)
        }
    };

    let cfg = match path {
        Some(p) => {
            let cfg = load_file(&p)?;
            info!(path = %p.display(), "Configuration loaded from file");
            cfg
        }
        None => DepConfig::default(),
    };

    cfg.validate()?;
    Ok(cfg)
}

/// Parse one YAML config file. Missing fields take their defaults.
pub fn load_file(path: &Path) -> Result<DepConfig> {
    let text = fs::read_to_string(path).map_err(|e| DepError::io(path, e))?;
    parse_str(&text).map_err(|source| DepError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_str(text: &str) -> std::result::Result<DepConfig, serde_yml::Error> {
    if text.trim().is_empty() {
        return Ok(DepConfig::default());
    }
    serde_yml::from_str(text)
}
