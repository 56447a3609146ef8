//! High-level orchestration: from source directories to makefile text.
//!
//! The single entry point is [`generate`] (or [`generate_with`] to swap the
//! line classifier and the search-path lookup). Nothing is written here; the
//! caller decides where the rendered makefile goes once the run succeeded.

use crate::{
    config::model::DepConfig,
    core::{
        fs_scan::{self, ScanResult, read_source, split_path_args},
        scanner::FortranScanner,
        summary::RunSummary,
        traits::{LineClassifier, SearchPathSource},
        vpath::MakeVpath,
    },
    export::makefile::{MakefileModel, ProgramLink, render},
    graph::{builder::GraphBuilder, closure::link_closure, registry::UnitRegistry},
    model::unit::DanglingReference,
    rules::{
        collect::{collect_rules, object_files},
        compaction::{compact, token_count},
    },
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a run produced.
#[derive(Debug)]
pub struct RunOutput {
    /// Rendered makefile text.
    pub makefile: String,
    pub summary: RunSummary,
    /// Resolved graph, dangling edges already removed.
    pub registry: UnitRegistry,
    pub dangling: Vec<DanglingReference>,
}

/// Generate rules with the regex scanner and the `make` search-path lookup.
///
/// `paths` are directory or file arguments, each possibly `:`-separated.
/// When empty, the search path of the makefile in the working directory is
/// used, and failing that `root` is scanned recursively.
pub fn generate(paths: &[String], root: &Path, cfg: &DepConfig) -> Result<RunOutput> {
    generate_with(paths, root, cfg, &FortranScanner::new(), &MakeVpath::new())
}

/// Same as [`generate`] with explicit seams.
///
/// # Steps
/// 1. **Discover** source files.
/// 2. **Scan** each file into statements and **ingest** them into the registry.
/// 3. **Prune** edges to units that were never defined.
/// 4. **Collect** compile rules and **compact** them.
/// 5. **Resolve** link closures of every program.
/// 6. **Render** the makefile in memory.
#[tracing::instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn generate_with<C, P>(
    paths: &[String],
    root: &Path,
    cfg: &DepConfig,
    classifier: &C,
    lookup: &P,
) -> Result<RunOutput>
where
    C: LineClassifier,
    P: SearchPathSource,
{
    let mut summary = RunSummary::default();

    // 1. Discover
    let scan = discover_sources(paths, root, cfg, lookup)?;
    summary.files_scanned = scan.files.len();

    // 2. Scan & ingest
    let encoding = cfg.scan.source_encoding()?;
    let mut registry = UnitRegistry::with_intrinsics(&cfg.scan.intrinsic_modules);
    {
        let mut builder = GraphBuilder::new(&mut registry);
        for file in &scan.files {
            let text = read_source(&file.path, encoding)?;
            let statements = classifier.classify_source(&text);
            let outcome = builder
                .ingest(&file.object, statements)
                .with_context(|| format!("while reading {}", file.path.display()))?;
            if outcome.is_legacy() {
                summary.legacy_files += 1;
            }
        }
    }
    debug!(
        units = registry.len(),
        edges = registry.edge_count(),
        "Built unit graph"
    );

    // 3. Prune
    let dangling = registry.prune_dangling();
    summary.dangling = dangling.len();
    summary.units = registry.len();
    for id in registry.sorted_ids() {
        debug!("{}", registry.describe(id));
    }

    // 4. Collect & compact
    let rules = collect_rules(&registry, cfg.include_deps());
    summary.rules_before = rules.len();
    summary.tokens_before = token_count(&rules);
    let rules = compact(&rules, cfg.optimize_iterations()).context("rule compaction failed")?;
    summary.rules_after = rules.len();
    summary.tokens_after = token_count(&rules);

    // 5. Link closures
    let programs: Vec<ProgramLink> = registry
        .programs()
        .into_iter()
        .filter_map(|id| {
            let obj = registry.unit(id).object()?;
            Some(ProgramLink {
                executable: obj.executable.clone(),
                objects: link_closure(&registry, id),
            })
        })
        .collect();
    summary.programs = programs.len();

    // 6. Render
    let model = MakefileModel {
        rules,
        objects: object_files(&registry),
        vpath: scan.dirs(),
        programs,
    };
    let makefile = render(&model, cfg);

    summary.log();
    Ok(RunOutput {
        makefile,
        summary,
        registry,
        dangling,
    })
}

/// Pick the source files: explicit paths, else the makefile search path,
/// else a recursive walk of `root`.
pub fn discover_sources<P: SearchPathSource>(
    paths: &[String],
    root: &Path,
    cfg: &DepConfig,
    lookup: &P,
) -> Result<ScanResult> {
    let explicit: Vec<PathBuf> = split_path_args(paths);
    if !explicit.is_empty() {
        debug!(entries = explicit.len(), "Scanning paths from the command line");
        return Ok(fs_scan::scan_listed(&explicit, cfg)?);
    }

    if let Some(dirs) = lookup.search_path() {
        info!(entries = dirs.len(), "Scanning VPATH of the existing makefile");
        return Ok(fs_scan::scan_listed(&dirs, cfg)?);
    }

    info!("No search path given; scanning recursively");
    fs_scan::scan_recursive(root, cfg)
        .with_context(|| format!("cannot scan {}", root.display()))
}
