//! `kubectl-mutated` binary

use anyhow::{Context, Result};
use mutated_cli::{command, read_resources, Driver, Settings};
use mutated_render::printer_for;
use std::io::{self, BufWriter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::from_matches(&command().get_matches());
    let resolver = settings.resolver()?;

    let mut resources = Vec::new();
    for source in &settings.sources {
        resources.extend(read_resources(source)?);
    }

    let mut driver = Driver::new(resolver).with_selector(settings.selector.clone());
    if let Some(namespace) = &settings.namespace {
        driver = driver.with_namespace(namespace.as_str());
    }

    let out = BufWriter::new(io::stdout());
    let mut printer =
        printer_for(settings.format, settings.options, out).context("cannot start output")?;
    let stats = driver
        .run(&resources, &mut *printer)
        .context("cannot write output")?;

    if stats.failed > 0 {
        tracing::warn!("{} of {} resources could not be processed", stats.failed, resources.len());
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
