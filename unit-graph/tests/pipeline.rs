//! End-to-end runs over small source trees in temporary directories.

use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};
use unit_graph::{DepConfig, DepError, RunOutput, generate};

fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, text) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, text).unwrap();
    }
    dir
}

fn run_in(dir: &Path, cfg: &DepConfig) -> anyhow::Result<RunOutput> {
    generate(&[dir.to_string_lossy().into_owned()], dir, cfg)
}

#[test]
fn simple_use_yields_one_rule() {
    let dir = tree(&[
        ("a.f90", "module a\n  implicit none\nend module a\n"),
        ("b.f90", "module b\n  use a\nend module b\n"),
    ]);
    let out = run_in(dir.path(), &DepConfig::default()).unwrap();
    assert_eq!(out.makefile, "b.o: a.o\n");
    assert!(out.dangling.is_empty());
}

#[test]
fn names_are_case_insensitive() {
    let dir = tree(&[
        ("kinds.F90", "MODULE Kinds\nEND MODULE Kinds\n"),
        ("solver.f90", "module solver\n  USE KINDS, only: dp\nend module\n"),
    ]);
    let out = run_in(dir.path(), &DepConfig::default()).unwrap();
    assert_eq!(out.makefile, "solver.o: kinds.o\n");
}

#[test]
fn program_links_its_whole_closure() {
    let dir = tree(&[
        ("a.f90", "module a\nend module a\n"),
        ("b.f90", "module b\n  use a\nend module b\n"),
        ("c.f90", "module c\nend module c\n"),
        ("main.f90", "program main\n  use b\nend program main\n"),
    ]);
    let mut cfg = DepConfig::default();
    cfg.emit.programs = true;
    let out = run_in(dir.path(), &cfg).unwrap();

    assert!(out.makefile.starts_with("b.o: a.o\nmain.o: b.o\n"));
    assert!(out.makefile.contains(
        "main: a.o b.o main.o\n\t$(FC) $(INCLUDE) $(FFLAGS) $(LDFLAGS) $^ $(LDLIBS) -o $@\n"
    ));
    assert_eq!(out.summary.programs, 1);
}

#[test]
fn submodules_depend_on_their_parent_and_are_linked() {
    let dir = tree(&[
        ("shapes.f90", "module shapes\n  interface\n  end interface\nend module shapes\n"),
        (
            "shapes_impl.f90",
            "submodule (shapes) shapes_impl\ncontains\n  module procedure area\n  end procedure\nend submodule shapes_impl\n",
        ),
        ("app.f90", "program app\n  use shapes\nend program app\n"),
    ]);
    let mut cfg = DepConfig::default();
    cfg.emit.programs = true;
    let out = run_in(dir.path(), &cfg).unwrap();

    assert!(out.makefile.contains("shapes_impl.o: shapes.o\n"));
    assert!(out.makefile.contains("app: app.o shapes.o shapes_impl.o\n"));
}

#[test]
fn many_users_of_one_module_collapse_into_one_rule() {
    let mut files: Vec<(String, String)> =
        vec![("common.f90".into(), "module common\nend module common\n".into())];
    for i in 0..10 {
        files.push((
            format!("m{i}.f90"),
            format!("module m{i}\n  use common\nend module m{i}\n"),
        ));
    }
    let refs: Vec<(&str, &str)> = files.iter().map(|(n, t)| (n.as_str(), t.as_str())).collect();
    let dir = tree(&refs);

    let plain = run_in(dir.path(), &DepConfig::default()).unwrap();
    assert_eq!(plain.makefile.lines().count(), 10);

    let mut cfg = DepConfig::default();
    cfg.emit.optimize_level = 3;
    let out = run_in(dir.path(), &cfg).unwrap();
    assert_eq!(
        out.makefile,
        "m0.o m1.o m2.o m3.o m4.o m5.o m6.o m7.o m8.o m9.o: common.o\n"
    );
    assert_eq!(out.summary.rules_before, 10);
    assert_eq!(out.summary.rules_after, 1);
    assert!(out.summary.tokens_after < out.summary.tokens_before);

    // three passes halve the ten rules only down to two
    cfg.emit.optimize_level = 1;
    let out = run_in(dir.path(), &cfg).unwrap();
    assert_eq!(
        out.makefile,
        "m0.o m1.o m2.o m3.o m4.o m5.o m6.o m7.o: common.o\nm8.o m9.o: common.o\n"
    );

    cfg.emit.optimize_level = 2;
    let out = run_in(dir.path(), &cfg).unwrap();
    assert_eq!(out.summary.rules_after, 1);
}

#[test]
fn duplicate_definition_is_fatal() {
    let dir = tree(&[
        ("one.f90", "module shared\nend module shared\n"),
        ("two.f90", "module shared\nend module shared\n"),
    ]);
    let err = run_in(dir.path(), &DepConfig::default()).unwrap_err();
    let dep = err.chain().find_map(|e| e.downcast_ref::<DepError>());
    match dep {
        Some(DepError::DuplicateDefinition {
            unit,
            existing,
            incoming,
        }) => {
            assert_eq!(unit, "shared");
            assert_eq!(existing, "one.f90");
            assert_eq!(incoming, "two.f90");
        }
        other => panic!("expected a duplicate definition, got {other:?}"),
    }
}

#[test]
fn undefined_units_are_dropped_with_a_report() {
    let dir = tree(&[
        ("a.f90", "module a\nend module a\n"),
        ("b.f90", "module b\n  use a\n  use netcdf\n  use iso_fortran_env\nend module b\n"),
    ]);
    let out = run_in(dir.path(), &DepConfig::default()).unwrap();
    assert_eq!(out.makefile, "b.o: a.o\n");
    assert_eq!(out.dangling.len(), 1);
    assert_eq!(out.dangling[0].from, "b");
    assert_eq!(out.dangling[0].to, "netcdf");
    assert_eq!(out.summary.dangling, 1);
}

#[test]
fn submodule_of_undefined_parent_is_kept_as_a_plain_unit() {
    let dir = tree(&[
        (
            "impl.f90",
            "submodule (ghost) impl_m\ncontains\nend submodule impl_m\n",
        ),
        ("u.f90", "module u\n  use impl_m\nend module u\n"),
    ]);
    let out = run_in(dir.path(), &DepConfig::default()).unwrap();

    assert_eq!(out.dangling.len(), 1);
    assert_eq!(out.dangling[0].from, "impl_m");
    assert_eq!(out.dangling[0].to, "ghost");
    assert!(!out.makefile.contains("ghost"));
    assert_eq!(out.makefile, "u.o: impl.o\n");
}

#[test]
fn submodule_without_space_after_parent_is_recognised() {
    let dir = tree(&[
        ("p.f90", "module p\nend module p\n"),
        ("s.f90", "submodule(p)s\nend submodule s\n"),
    ]);
    let out = run_in(dir.path(), &DepConfig::default()).unwrap();
    assert_eq!(out.makefile, "s.o: p.o\n");
    assert_eq!(out.summary.legacy_files, 0);
}

#[test]
fn latin1_sources_decode_with_the_configured_encoding() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.f90"), b"module a\nend module a\n").unwrap();
    fs::write(
        dir.path().join("b.f90"),
        b"! r\xe9sum\xe9 des d\xe9pendances\nmodule b\n  use a\nend module b\n",
    )
    .unwrap();

    let mut cfg = DepConfig::default();
    cfg.scan.encoding = "latin1".into();
    let out = run_in(dir.path(), &cfg).unwrap();
    assert_eq!(out.makefile, "b.o: a.o\n");
}

#[test]
fn utf16_sources_with_bom_are_read() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.f90"), b"module a\nend module a\n").unwrap();
    let mut bytes: Vec<u8> = vec![0xFF, 0xFE];
    for unit in "module b\n  use a\nend module b\n".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(dir.path().join("b.f90"), bytes).unwrap();

    let out = run_in(dir.path(), &DepConfig::default()).unwrap();
    assert_eq!(out.makefile, "b.o: a.o\n");
}

#[test]
fn includes_follow_the_include_switch() {
    let dir = tree(&[(
        "consts.f90",
        "module consts\n  include 'consts.inc'\nend module consts\n",
    )]);
    let out = run_in(dir.path(), &DepConfig::default()).unwrap();
    assert_eq!(out.makefile, "consts.o: consts.inc\n");

    let mut cfg = DepConfig::default();
    cfg.emit.include_deps = false;
    let out = run_in(dir.path(), &cfg).unwrap();
    assert_eq!(out.makefile, "");
}

#[test]
fn legacy_files_contribute_nothing() {
    let dir = tree(&[
        ("old.f", "      subroutine old\n      end\n"),
        ("a.f90", "module a\nend module a\n"),
    ]);
    let out = run_in(dir.path(), &DepConfig::default()).unwrap();
    assert_eq!(out.makefile, "");
    assert_eq!(out.summary.files_scanned, 2);
    assert_eq!(out.summary.legacy_files, 1);
}

#[test]
fn cyclic_uses_still_produce_rules_and_closures() {
    let dir = tree(&[
        ("x.f90", "module x\n  use y\nend module x\n"),
        ("y.f90", "module y\n  use x\nend module y\n"),
        ("p.f90", "program p\n  use x\nend program p\n"),
    ]);
    let mut cfg = DepConfig::default();
    cfg.emit.programs = true;
    let out = run_in(dir.path(), &cfg).unwrap();
    assert!(out.makefile.contains("x.o: y.o\n"));
    assert!(out.makefile.contains("y.o: x.o\n"));
    assert!(out.makefile.contains("p: p.o x.o y.o\n"));
}

#[test]
fn scaffold_produces_a_complete_makefile() {
    let dir = tree(&[
        ("a.f90", "module a\n  include 'a.inc'\nend module a\n"),
        ("main.f90", "program main\n  use a\nend program main\n"),
    ]);
    let mut cfg = DepConfig::default();
    cfg.emit.scaffold = true;
    cfg.emit.include_deps = false;
    let out = run_in(dir.path(), &cfg).unwrap();
    let text = &out.makefile;

    assert!(text.starts_with("# generated by fortdep\n"));
    assert!(text.contains("programs = main\n"));
    // scaffold forces include prerequisites back on
    assert!(text.contains("a.o: a.inc\n"));
    assert!(text.contains("main.o: a.o\n"));
    assert!(text.contains("main: a.o main.o\n"));
    assert!(text.contains("install:\n"));
    assert!(text.contains("clean:\n"));
}

#[test]
fn vpath_lists_scanned_directories() {
    let dir = tree(&[("src/a.f90", "module a\nend module a\n")]);
    let src = dir.path().join("src");
    let mut cfg = DepConfig::default();
    cfg.emit.vpath = true;
    cfg.emit.objects = true;

    let out = generate(&[src.to_string_lossy().into_owned()], dir.path(), &cfg).unwrap();
    let expected_dir = src.to_string_lossy().replace('\\', "/");
    assert_eq!(
        out.makefile,
        format!("OBJECTS = a.o\nVPATH = {expected_dir}\n")
    );
}
