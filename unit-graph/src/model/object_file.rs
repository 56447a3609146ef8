//! Source file → build artifact naming.
//!
//! The suffix table is fixed: any of `.f`, `.f90`, `.f95`, `.f03`, `.f08`,
//! `.f15`, `.f18` (with a lower- or upper-case `f`) is a Fortran source.
//! The object name replaces the suffix with `.o`, the executable name drops it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::LazyLock;

static SOURCE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.[fF](90|95|03|08|15|18)?$").expect("valid source suffix regex")
});

/// Immutable mapping from one scanned source file to its artifact names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectFile {
    /// Source file name as found on disk (no directory).
    pub source: String,
    /// Object file name, e.g. `solver.o`.
    pub object: String,
    /// Executable name, e.g. `solver`.
    pub executable: String,
}

impl ObjectFile {
    /// Build the mapping for a source file name.
    ///
    /// Returns `None` when the name does not carry a Fortran suffix.
    ///
    /// # Example
    /// ```
    /// use unit_graph::model::object_file::ObjectFile;
    ///
    /// let f = ObjectFile::from_source_name("solver.F90").unwrap();
    /// assert_eq!(f.object, "solver.o");
    /// assert_eq!(f.executable, "solver");
    /// assert!(ObjectFile::from_source_name("notes.txt").is_none());
    /// ```
    pub fn from_source_name(source: &str) -> Option<Self> {
        if !is_source_name(source) {
            return None;
        }
        let executable = SOURCE_SUFFIX.replace(source, "").into_owned();
        if executable.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            object: SOURCE_SUFFIX.replace(source, ".o").into_owned(),
            executable,
        })
    }

    /// Build the mapping from a path, using its file name only.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_source_name(path.file_name()?.to_str()?)
    }
}

impl Display for ObjectFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.object)
    }
}

/// `true` if the file name ends with one of the recognised source suffixes.
pub fn is_source_name(name: &str) -> bool {
    SOURCE_SUFFIX.is_match(name)
}
