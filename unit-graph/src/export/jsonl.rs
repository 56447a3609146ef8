//! JSONL dump of the unit graph.
//!
//! One compact JSON object per unit, ordered by unit name:
//! ```json
//! { "name": "io", "kind": "module", "source": "io.f90", "object": "io.o",
//!   "deps": ["kinds"], "includes": ["io.inc"], "children": ["io_impl"] }
//! ```
//! Placeholders carry `null` for `source` and `object`.

use crate::graph::registry::UnitRegistry;
use anyhow::{Context, Result};
use serde_json::json;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

/// Write every unit of `registry` to `w`.
pub fn write_units_jsonl<W: Write>(w: &mut W, registry: &UnitRegistry) -> Result<()> {
    for id in registry.sorted_ids() {
        let unit = registry.unit(id);
        let rec = json!({
            "name": unit.name,
            "kind": unit.kind,
            "source": unit.object().map(|o| o.source.as_str()),
            "object": unit.object().map(|o| o.object.as_str()),
            "deps": registry.names(registry.dependencies(id)),
            "includes": unit.includes,
            "children": registry.names(registry.children(id)),
        });
        serde_json::to_writer(&mut *w, &rec)?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// Same as [`write_units_jsonl`], into a freshly created file.
pub fn write_units_jsonl_file(path: &Path, registry: &UnitRegistry) -> Result<()> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    write_units_jsonl(&mut w, registry)?;
    w.flush()?;
    info!("jsonl: wrote {} units -> {}", registry.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::object_file::ObjectFile;
    use serde_json::Value;

    #[test]
    fn one_line_per_unit_sorted_by_name() {
        let mut reg = UnitRegistry::new();
        let b = ObjectFile::from_source_name("b.f90").unwrap();
        let id = reg.declare_module("b", &b).unwrap();
        reg.add_use(id, "a");
        reg.add_include(id, "b.inc");

        let mut buf: Vec<u8> = Vec::new();
        write_units_jsonl(&mut buf, &reg).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["name"], "a");
        assert!(lines[0]["object"].is_null());
        assert_eq!(lines[1]["name"], "b");
        assert_eq!(lines[1]["kind"], "module");
        assert_eq!(lines[1]["object"], "b.o");
        assert_eq!(lines[1]["deps"], serde_json::json!(["a"]));
        assert_eq!(lines[1]["includes"], serde_json::json!(["b.inc"]));
    }
}
