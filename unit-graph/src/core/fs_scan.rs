//! Source discovery: explicit directories, a makefile search path, or a
//! recursive walk of the working directory.

use crate::{
    config::model::DepConfig,
    core::normalize::{build_globset, is_ignored_by, relative_dir, to_unix_sep},
    errors::{DepError, Result},
    model::object_file::ObjectFile,
};
use encoding_rs::Encoding;
use globset::GlobSet;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path used to read the file.
    pub path: PathBuf,
    /// Directory as it should appear in `VPATH`.
    pub dir: String,
    pub object: ObjectFile,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Sources sorted by path.
    pub files: Vec<SourceFile>,
    pub skipped_too_big: usize,
}

impl ScanResult {
    /// Directories holding at least one source, in first-seen order.
    pub fn dirs(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for f in &self.files {
            if !out.contains(&f.dir) {
                out.push(f.dir.clone());
            }
        }
        out
    }

    fn finish(mut self) -> Self {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
        self.files.dedup_by(|a, b| a.path == b.path);

        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for f in &self.files {
            if let Some(prev) = seen.insert(f.object.object.as_str(), f.path.as_path()) {
                warn!(
                    object = %f.object.object,
                    first = %prev.display(),
                    second = %f.path.display(),
                    "two sources map to the same object file"
                );
            }
        }
        self
    }
}

/// Split every argument on `:` into individual paths.
///
/// # Example
/// ```
/// use std::path::PathBuf;
/// use unit_graph::core::fs_scan::split_path_args;
///
/// let dirs = split_path_args(&["src:src/io".to_string(), "lib".to_string()]);
/// assert_eq!(dirs, vec![PathBuf::from("src"), PathBuf::from("src/io"), PathBuf::from("lib")]);
/// ```
pub fn split_path_args(args: &[String]) -> Vec<PathBuf> {
    args.iter()
        .flat_map(|a| a.split(':'))
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Scan the given entries: directories are listed without recursion, files
/// are taken as they are. An unlistable directory is an error.
pub fn scan_listed(entries: &[PathBuf], cfg: &DepConfig) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    for entry in entries {
        if entry.is_file() {
            let dir = entry
                .parent()
                .map(|p| to_unix_sep(p.to_string_lossy()))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| ".".to_string());
            push_candidate(entry, dir, cfg, &mut result);
            continue;
        }

        let dir = to_unix_sep(entry.to_string_lossy());
        let listing = fs::read_dir(entry).map_err(|e| DepError::io(entry, e))?;
        for item in listing {
            let item = item.map_err(|e| DepError::io(entry, e))?;
            let path = item.path();
            if path.is_file() {
                push_candidate(&path, dir.clone(), cfg, &mut result);
            }
        }
        debug!(dir = %dir, "fs_scan: listed");
    }

    let result = result.finish();
    info!(
        files = result.files.len(),
        too_big = result.skipped_too_big,
        "fs_scan: listed directories"
    );
    Ok(result)
}

/// Walk `root` recursively, skipping ignored paths and heavy folders.
#[tracing::instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn scan_recursive(root: &Path, cfg: &DepConfig) -> Result<ScanResult> {
    let root = dunce::canonicalize(root).map_err(|e| DepError::io(root, e))?;
    let ignore_globs: Option<GlobSet> = build_globset(&cfg.filters.ignore_globs);

    let mut result = ScanResult::default();
    let mut skipped_ignored = 0usize;

    let walker = WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_entry(keep_entry);

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("fs_scan: walk error: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let rel = path.strip_prefix(&root).unwrap_or(path);
        if is_ignored_by(rel, ignore_globs.as_ref()) {
            skipped_ignored += 1;
            debug!("fs_scan: ignore (glob) {}", rel.display());
            continue;
        }
        push_candidate(path, relative_dir(&root, path), cfg, &mut result);
    }

    let result = result.finish();
    info!(
        "fs_scan: done, total={} (ignored={}, too_big={})",
        result.files.len(),
        skipped_ignored,
        result.skipped_too_big
    );
    Ok(result)
}

/// Read a source file in `encoding`. A byte order mark overrides the given
/// encoding; malformed sequences are replaced.
pub fn read_source(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| DepError::io(path, e))?;
    let (text, used, replaced) = encoding.decode(&bytes);
    if replaced {
        warn!(
            path = %path.display(),
            encoding = used.name(),
            "malformed bytes replaced while decoding"
        );
    }
    Ok(text.into_owned())
}

fn push_candidate(path: &Path, dir: String, cfg: &DepConfig, result: &mut ScanResult) {
    let Some(object) = ObjectFile::from_path(path) else {
        return;
    };
    let size = match fs::metadata(path) {
        Ok(m) => m.len(),
        Err(err) => {
            warn!("fs_scan: metadata failed for {}: {}", path.display(), err);
            return;
        }
    };
    if size > cfg.scan.max_file_bytes {
        result.skipped_too_big += 1;
        warn!(
            "fs_scan: skip (size {} > max {}) {}",
            size,
            cfg.scan.max_file_bytes,
            path.display()
        );
        return;
    }
    debug!("fs_scan: {} -> {}", object.object, path.display());
    result.files.push(SourceFile {
        path: path.to_path_buf(),
        dir,
        object,
        size,
    });
}

/// Coarse directory filter to avoid descending into tool folders early.
fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() > 0 && entry.file_type().is_dir() {
        if let Some(name) = entry.file_name().to_str() {
            return !matches!(name, ".git" | ".svn" | ".hg" | ".idea" | ".vscode");
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn touch(path: &Path, text: &str) {
        let mut f = File::create(path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
    }

    #[test]
    fn listing_is_flat_and_filtered() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("b.f90"), "module b\nend module b\n");
        touch(&root.join("a.F90"), "module a\nend module a\n");
        touch(&root.join("notes.txt"), "");
        fs::create_dir(root.join("sub")).unwrap();
        touch(&root.join("sub/c.f90"), "");

        let result = scan_listed(&[root.to_path_buf()], &DepConfig::default()).unwrap();
        let objects: Vec<&str> = result.files.iter().map(|f| f.object.object.as_str()).collect();
        assert_eq!(objects, vec!["a.o", "b.o"]);
        assert_eq!(result.dirs().len(), 1);
    }

    #[test]
    fn recursive_walk_respects_ignore_globs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("main.f90"), "");
        fs::create_dir_all(root.join("src/io")).unwrap();
        touch(&root.join("src/io/reader.f90"), "");
        fs::create_dir_all(root.join("build")).unwrap();
        touch(&root.join("build/gen.f90"), "");

        let result = scan_recursive(root, &DepConfig::default()).unwrap();
        let objects: Vec<&str> = result.files.iter().map(|f| f.object.object.as_str()).collect();
        assert_eq!(objects, vec!["main.o", "reader.o"]);
        let mut dirs = result.dirs();
        dirs.sort();
        assert_eq!(dirs, vec![".".to_string(), "src/io".to_string()]);
    }

    #[test]
    fn oversized_files_are_skipped() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("big.f90"), "module big\nend module big\n");
        let mut cfg = DepConfig::default();
        cfg.scan.max_file_bytes = 4;

        let result = scan_listed(&[dir.path().to_path_buf()], &cfg).unwrap();
        assert!(result.files.is_empty());
        assert_eq!(result.skipped_too_big, 1);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let err = scan_listed(&[PathBuf::from("/no/such/dir/anywhere")], &DepConfig::default())
            .unwrap_err();
        assert!(matches!(err, DepError::Io { .. }));
    }

    #[test]
    fn lossy_read_keeps_ascii_statements() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.f90");
        fs::write(&path, b"! caf\xe9\nmodule m\n").unwrap();
        let text = read_source(&path, encoding_rs::UTF_8).unwrap();
        assert!(text.contains("module m"));

        let text = read_source(&path, encoding_rs::WINDOWS_1252).unwrap();
        assert!(text.starts_with("! caf\u{e9}\n"));
    }

    #[test]
    fn byte_order_mark_overrides_configured_encoding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.f90");
        let mut bytes: Vec<u8> = vec![0xFE, 0xFF];
        for unit in "module w\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        fs::write(&path, bytes).unwrap();

        let text = read_source(&path, encoding_rs::UTF_8).unwrap();
        assert_eq!(text, "module w\n");
    }
}
