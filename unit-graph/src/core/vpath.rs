//! Read the source search path (`VPATH`) of an existing makefile.
//!
//! `make` is asked to evaluate an extra rule that echoes `$(VPATH)`. A missing
//! `make`, a failing makefile or an empty value all mean "no search path".

use crate::core::traits::SearchPathSource;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

const PRINT_RULE: &str = "print_vpath";

/// Lookup that runs `make` in the working directory.
#[derive(Debug, Clone)]
pub struct MakeVpath {
    program: String,
}

impl MakeVpath {
    pub fn new() -> Self {
        Self {
            program: "make".into(),
        }
    }

    /// Use another `make` executable (e.g. `gmake`).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MakeVpath {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPathSource for MakeVpath {
    fn search_path(&self) -> Option<Vec<PathBuf>> {
        let output = Command::new(&self.program)
            .arg("--no-print-directory")
            .arg(format!("--eval={PRINT_RULE}:\n\t@echo $(VPATH)"))
            .arg(PRINT_RULE)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        let output = match output {
            Ok(o) if o.status.success() => o,
            Ok(o) => {
                debug!(status = %o.status, "make exited with failure; no VPATH");
                return None;
            }
            Err(err) => {
                debug!(error = %err, program = %self.program, "cannot run make; no VPATH");
                return None;
            }
        };

        let dirs = parse_vpath(&String::from_utf8_lossy(&output.stdout));
        if dirs.is_empty() {
            None
        } else {
            Some(dirs.into_iter().map(PathBuf::from).collect())
        }
    }
}

/// Split a `VPATH` value on colons and whitespace.
pub fn parse_vpath(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ':' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
