//! Makefile rendering.
//!
//! Layout, each section optional except the compile rules:
//!
//! ```text
//! # generated by fortdep          <- scaffold header and variables
//! OBJECTS = ...                   <- --objects
//! VPATH = src:lib                 <- --vpath
//! b.o c.o: a.o                    <- compile rules
//! %.o: %.f90                      <- scaffold pattern rules
//! .INTERMEDIATE: ...              <- --intermediate
//! main: a.o b.o main.o            <- program link rules
//! install: / clean:               <- scaffold targets
//! ```
//!
//! Output is built in memory; the caller writes it once the run succeeded.

use crate::{
    config::model::{DepConfig, ScaffoldConfig},
    export::fold::fold,
    model::rule::DependencyRule,
};
use serde::Serialize;
use std::collections::BTreeSet;

const LINK_RECIPE: &str = "$(FC) $(INCLUDE) $(FFLAGS) $(LDFLAGS) $^ $(LDLIBS) -o $@";

/// Link requirements of one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramLink {
    pub executable: String,
    pub objects: BTreeSet<String>,
}

/// Everything the renderer needs, already resolved and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MakefileModel {
    pub rules: Vec<DependencyRule<String>>,
    pub objects: BTreeSet<String>,
    pub vpath: Vec<String>,
    pub programs: Vec<ProgramLink>,
}

/// Render the model according to the `emit` settings of `cfg`.
pub fn render(model: &MakefileModel, cfg: &DepConfig) -> String {
    let emit = &cfg.emit;
    let mut w = MakefileWriter::new(emit.fold_width);

    if emit.scaffold {
        write_header(&mut w, &cfg.scaffold, &model.programs);
    }
    if emit.objects {
        w.line(&format!("OBJECTS = {}", join(&model.objects)));
    }
    if emit.vpath && !model.vpath.is_empty() {
        w.line(&format!("VPATH = {}", model.vpath.join(":")));
    }

    for rule in &model.rules {
        w.line(&rule.to_string());
    }

    if emit.scaffold {
        w.blank();
        w.line("%.o: %.f90");
        w.recipe("$(FC) $(INCLUDE) $(FFLAGS) -c $< -o $@");
        w.line("%.o: %.F90");
        w.recipe("$(FC) $(INCLUDE) $(CPPFLAGS) $(FFLAGS) -c $< -o $@");
    }
    if emit.intermediate && !model.objects.is_empty() {
        w.line(&format!(".INTERMEDIATE: {}", join(&model.objects)));
    }

    if cfg.program_rules() && !model.programs.is_empty() {
        w.blank();
        for p in &model.programs {
            w.line(&format!("{}: {}", p.executable, join(&p.objects)));
            w.recipe(LINK_RECIPE);
        }
    }

    if emit.scaffold {
        w.blank();
        w.line("install:");
        w.recipe("install -d $(prefix)/bin");
        w.recipe("install $(programs) $(prefix)/bin");
        w.line("clean:");
        w.recipe("$(RM) *.o *.mod *.smod $(programs)");
    }

    w.finish()
}

fn write_header(w: &mut MakefileWriter, scaffold: &ScaffoldConfig, programs: &[ProgramLink]) {
    let executables: Vec<&str> = programs.iter().map(|p| p.executable.as_str()).collect();
    w.line("# generated by fortdep");
    w.blank();
    w.line(&format!("prefix = {}", scaffold.prefix));
    w.line(&format!("FC = {}", scaffold.fc));
    w.line(&format!("FFLAGS ?= {}", scaffold.fflags));
    w.line(&format!("programs = {}", executables.join(" ")));
    w.blank();
    w.line("all: $(programs)");
    w.line(".PHONY: all install clean");
    w.blank();
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

struct MakefileWriter {
    out: String,
    fold_width: usize,
}

impl MakefileWriter {
    fn new(fold_width: usize) -> Self {
        Self {
            out: String::new(),
            fold_width,
        }
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(&fold(text, self.fold_width));
        self.out.push('\n');
    }

    /// Recipe lines start with a tab and are never folded.
    fn recipe(&mut self, text: &str) {
        self.out.push('\t');
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}
