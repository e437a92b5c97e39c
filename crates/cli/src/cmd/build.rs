//! Implementation of the `relbuild build` command.
//!
//! Loads the manifest, prepares the output directory, and runs the release
//! pipeline once with real external commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use relbuild_lib::exec::SystemRunner;
use relbuild_lib::manifest::Manifest;
use relbuild_lib::pipeline::{build, provenance_files};
use relbuild_lib::step::StepId;

use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success, symbols};

pub fn cmd_build(manifest_path: &Path, directory: Option<&Path>, format: OutputFormat) -> Result<()> {
  let mut manifest =
    Manifest::load(manifest_path).with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;
  if let Some(dir) = directory {
    // Builders run from the working tree with OUT_DIR exported, so it must not depend on the cwd.
    let dir = std::path::absolute(dir).with_context(|| format!("Failed to resolve directory: {}", dir.display()))?;
    manifest = manifest.with_directory(dir);
  }

  let out_dir = manifest.out_dir();
  fs::create_dir_all(&out_dir)
    .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
  debug!(manifest = ?manifest_path, out_dir = ?out_dir, "output directory ready");

  if !format.is_json() {
    print_info(&format!(
      "Building release {} in {}",
      manifest.version,
      manifest.directory.display()
    ));
  }

  // Child stdout would corrupt the JSON document, so progress goes to stderr instead.
  let runner = if format.is_json() {
    SystemRunner::with_progress_on_stderr()
  } else {
    SystemRunner::new()
  };
  let report = build(&manifest, runner)?;
  let provenance = provenance_files(&manifest);

  if format.is_json() {
    let json_output = serde_json::json!({
      "version": manifest.version,
      "executed": report.executed,
      "skipped": report.skipped,
      "elapsed_ms": report.elapsed.as_millis() as u64,
      "provenance": provenance,
    });
    print_json(&json_output)?;
    return Ok(());
  }

  print_success(&format!(
    "Release {} built in {}",
    manifest.version,
    format_duration(report.elapsed)
  ));
  print_stat("Steps", &join_steps(&report.executed));
  if !report.skipped.is_empty() {
    print_stat("Skipped", &join_steps(&report.skipped));
  }
  println!();
  println!("Provenance:");
  for path in &provenance {
    println!("  {} {}", symbols::ARROW, path.display());
  }

  Ok(())
}

pub(crate) fn join_steps(steps: &[StepId]) -> String {
  steps.iter().map(StepId::as_str).collect::<Vec<_>>().join(", ")
}
