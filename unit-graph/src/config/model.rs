//! Configuration data structures for dependency discovery and rule emission.
//!
//! Groups:
//! - [`DepConfig`]     : top-level container for all config groups
//! - [`Filters`]       : which files to skip during a recursive scan
//! - [`ScanConfig`]    : intrinsic units, source encoding and file size cap
//! - [`EmitConfig`]    : which makefile sections to produce
//! - [`ScaffoldConfig`]: default build variables for a full makefile
//!
//! All structs are `serde`-friendly so they can be loaded from YAML.

use crate::errors::{DepError, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

/// Highest accepted compaction level; each level is three optimizer passes.
pub const MAX_OPTIMIZE_LEVEL: u8 = 3;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepConfig {
    pub filters: Filters,
    pub scan: ScanConfig,
    pub emit: EmitConfig,
    pub scaffold: ScaffoldConfig,
}

impl DepConfig {
    /// Validate config sanity (no degenerate values).
    pub fn validate(&self) -> Result<()> {
        if self.emit.optimize_level > MAX_OPTIMIZE_LEVEL {
            return Err(DepError::Config(format!(
                "`optimize_level` must be within 0..={MAX_OPTIMIZE_LEVEL}, got {}",
                self.emit.optimize_level
            )));
        }
        self.scan.source_encoding()?;
        if self.scan.max_file_bytes == 0 {
            return Err(DepError::Config(
                "`max_file_bytes` must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Include prerequisites are always on for a full makefile.
    pub fn include_deps(&self) -> bool {
        self.emit.include_deps || self.emit.scaffold
    }

    /// Program link rules are always on for a full makefile.
    pub fn program_rules(&self) -> bool {
        self.emit.programs || self.emit.scaffold
    }

    /// Optimizer passes derived from the level.
    pub fn optimize_iterations(&self) -> usize {
        usize::from(self.emit.optimize_level) * 3
    }
}

/// File filtering rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Glob patterns for files to ignore during the recursive fallback scan.
    pub ignore_globs: Vec<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            ignore_globs: vec![
                "**/.git/**".into(),
                "**/build/**".into(),
                "**/target/**".into(),
            ],
        }
    }
}

/// Scanner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Standard units provided by the compiler; never emitted as prerequisites.
    pub intrinsic_modules: Vec<String>,
    /// Maximum source file size to read (bytes).
    pub max_file_bytes: u64,
    /// Encoding label of sources without a byte order mark (WHATWG names,
    /// e.g. `utf-8`, `latin1`, `shift_jis`).
    pub encoding: String,
}

impl ScanConfig {
    /// Resolve [`ScanConfig::encoding`]; unknown labels are a config error.
    pub fn source_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            DepError::Config(format!("unknown source encoding `{}`", self.encoding))
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            intrinsic_modules: [
                "iso_fortran_env",
                "iso_c_binding",
                "ieee_arithmetic",
                "ieee_exceptions",
                "ieee_features",
                "omp_lib",
                "omp_lib_kinds",
                "mpi",
                "mpi_f08",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_file_bytes: 16 * 1024 * 1024, // 16 MB
            encoding: "utf-8".into(),
        }
    }
}

/// Output sections and formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Emit `include` file names as prerequisites.
    pub include_deps: bool,
    /// Emit `OBJECTS = ...`.
    pub objects: bool,
    /// Emit `VPATH = ...`.
    pub vpath: bool,
    /// Emit `.INTERMEDIATE: ...`.
    pub intermediate: bool,
    /// Emit a link rule per program.
    pub programs: bool,
    /// Emit a complete makefile.
    pub scaffold: bool,
    /// Rule compaction level, 0 disables it.
    pub optimize_level: u8,
    /// Fold long lines at this column, 0 disables folding.
    pub fold_width: usize,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            include_deps: true,
            objects: false,
            vpath: false,
            intermediate: false,
            programs: false,
            scaffold: false,
            optimize_level: 0,
            fold_width: 80,
        }
    }
}

/// Variables written at the top of a full makefile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub prefix: String,
    pub fc: String,
    pub fflags: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            prefix: "/usr/local".into(),
            fc: "f95".into(),
            fflags: "-g -O2".into(),
        }
    }
}
