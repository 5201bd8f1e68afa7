//! Command execution
//!
//! Output streams are passed in so runs can be captured in tests.

use crate::cli::{AnnotateArgs, ReportFormat};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tintmark_engine::{AnnotationConfig, Annotator};
use tintmark_xml::DocumentLayer;

/// Load a TOML configuration, or the defaults when no path is given
///
/// # Errors
/// Fails when the file cannot be read or is not a valid configuration
pub fn load_config(path: Option<&Path>) -> Result<AnnotationConfig> {
    let Some(path) = path else {
        return Ok(AnnotationConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    AnnotationConfig::from_toml_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))
}

/// Read, annotate, render and optionally write one document
///
/// The rendered document goes to `stdout` (unless quiet) and the report to
/// `stderr` even when writing the target fails; that failure is returned
/// afterwards. Mutations are never rolled back.
///
/// # Errors
/// Fails on configuration, read, parse, annotation, render or write errors
pub fn run_annotate<O, E>(args: &AnnotateArgs, stdout: &mut O, stderr: &mut E) -> Result<()>
where
    O: Write,
    E: Write,
{
    let config = args.overrides.apply(load_config(args.config.as_deref())?);
    let annotator = Annotator::new(config).context("invalid annotation configuration")?;
    let layer = DocumentLayer::with_options(args.output);

    tracing::info!(source = %args.source.display(), "annotating document");
    let mut doc = layer
        .read_document(&args.source)
        .with_context(|| format!("failed to load {}", args.source.display()))?;
    let report = annotator.annotate(&mut doc).context("annotation failed")?;
    if !report.has_mutations() {
        tracing::info!(candidates = report.total(), "no candidate changed; document is unchanged");
    }
    let rendered = layer.render(&doc).context("failed to render document")?;

    let written = match &args.target {
        Some(target) => layer
            .persist(target, &rendered)
            .with_context(|| format!("failed to write {}", target.display())),
        None => Ok(()),
    };

    if !args.quiet {
        stdout.write_all(&rendered)?;
        if !rendered.ends_with(b"\n") {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
    }

    match args.report {
        ReportFormat::Text => writeln!(stderr, "{report}")?,
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
            writeln!(stderr, "{json}")?;
        }
    }

    written
}

/// Print the effective configuration as TOML
///
/// # Errors
/// Fails when the configuration cannot be loaded or rendered
pub fn run_show_config<O: Write>(config: Option<&Path>, stdout: &mut O) -> Result<()> {
    let config = load_config(config)?;
    config.validate().context("invalid annotation configuration")?;
    let toml = config.to_toml_string()?;
    stdout.write_all(toml.as_bytes())?;
    Ok(())
}
