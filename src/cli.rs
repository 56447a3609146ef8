use clap::Parser;
use std::path::PathBuf;
use unit_graph::DepConfig;

/// Generate makefile dependency rules for Fortran sources.
///
/// Without PATH arguments the `VPATH` of the makefile in the current
/// directory is scanned, falling back to a recursive scan of the current
/// directory.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directories or files to scan; `:`-separated lists are accepted.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Output file, `-` for stdout.
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    pub output: String,

    /// Do not emit include-derived prerequisites.
    #[arg(short = 'i', long)]
    pub no_includes: bool,

    /// Emit a link rule for every program.
    #[arg(short, long)]
    pub programs: bool,

    /// Emit a complete makefile (implies --programs, ignores --no-includes).
    #[arg(short, long)]
    pub scaffold: bool,

    /// Rule compaction level; each level runs up to three merge passes, and a
    /// pass at most halves a group of rules sharing a prerequisite list.
    #[arg(short = 'O', long, value_name = "LEVEL",
          value_parser = clap::value_parser!(u8).range(0..=3))]
    pub optimize: Option<u8>,

    /// Input encoding of sources without a byte order mark (default: utf-8).
    #[arg(short, long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Emit `OBJECTS = ...` listing every object file.
    #[arg(long)]
    pub objects: bool,

    /// Emit `VPATH = ...` listing the scanned directories.
    #[arg(long)]
    pub vpath: bool,

    /// Emit `.INTERMEDIATE: ...` for all object files.
    #[arg(long)]
    pub intermediate: bool,

    /// Also write the resolved unit graph as JSON Lines.
    #[arg(long, value_name = "FILE")]
    pub graph_json: Option<PathBuf>,

    /// YAML configuration file (default: `.fortdep.yml` if present).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug-level diagnostics on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags override values from the config file; absent flags keep them.
    pub fn apply_to(&self, cfg: &mut DepConfig) {
        let emit = &mut cfg.emit;
        if self.no_includes {
            emit.include_deps = false;
        }
        emit.programs |= self.programs;
        emit.scaffold |= self.scaffold;
        emit.objects |= self.objects;
        emit.vpath |= self.vpath;
        emit.intermediate |= self.intermediate;
        if let Some(level) = self.optimize {
            emit.optimize_level = level;
        }
        if let Some(label) = &self.encoding {
            cfg.scan.encoding = label.clone();
        }
    }

    /// `None` means stdout.
    pub fn output_path(&self) -> Option<PathBuf> {
        (self.output != "-").then(|| PathBuf::from(&self.output))
    }
}
