mod cli;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use std::{
    fs,
    io::{self, Write},
};
use tracing::info;
use unit_graph::{config, export::jsonl::write_units_jsonl_file, run};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let mut cfg = config::load_or_default(cli.config.as_deref(), &cwd)?;
    cli.apply_to(&mut cfg);
    cfg.validate()?;

    let out = run::generate(&cli.paths, &cwd, &cfg)?;

    match cli.output_path() {
        Some(path) => {
            fs::write(&path, &out.makefile)
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!(path = %path.display(), "Rules written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(out.makefile.as_bytes())
                .and_then(|()| stdout.flush())
                .context("cannot write to stdout")?;
        }
    }

    if let Some(path) = &cli.graph_json {
        write_units_jsonl_file(path, &out.registry)?;
    }

    Ok(())
}
