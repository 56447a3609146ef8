//! Normalization helpers for paths and glob handling.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Replace OS-specific separators with `/`.
///
/// # Example
/// ```
/// use unit_graph::core::normalize::to_unix_sep;
///
/// assert_eq!(to_unix_sep(r"src\io\reader.f90"), "src/io/reader.f90");
/// ```
pub fn to_unix_sep<S: AsRef<str>>(s: S) -> String {
    s.as_ref().replace('\\', "/")
}

/// Directory of `path` relative to `root`, `/`-separated, `.` for the root itself.
///
/// # Example
/// ```
/// use std::path::Path;
/// use unit_graph::core::normalize::relative_dir;
///
/// let root = Path::new("/work/proj");
/// assert_eq!(relative_dir(root, Path::new("/work/proj/src/a.f90")), "src");
/// assert_eq!(relative_dir(root, Path::new("/work/proj/b.f90")), ".");
/// ```
pub fn relative_dir(root: &Path, path: &Path) -> String {
    let parent = path.parent().unwrap_or(path);
    let rel = parent.strip_prefix(root).unwrap_or(parent);
    let s = to_unix_sep(rel.to_string_lossy());
    if s.is_empty() { ".".to_string() } else { s }
}

/// Build a [`GlobSet`] from patterns, skipping invalid or empty ones.
///
/// Returns `None` if the input list is empty or all patterns are invalid.
///
/// # Example
/// ```
/// use unit_graph::core::normalize::build_globset;
///
/// let gs = build_globset(&vec!["**/legacy/**".to_string()]).unwrap();
/// assert!(gs.is_match("src/legacy/old.f"));
/// ```
pub fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        if let Ok(g) = Glob::new(pat) {
            builder.add(g);
        }
    }
    builder.build().ok()
}

/// Return `true` if a path matches the ignore glob set.
pub fn is_ignored_by(path: &Path, set: Option<&GlobSet>) -> bool {
    set.is_some_and(|gs| gs.is_match(to_unix_sep(path.to_string_lossy())))
}
