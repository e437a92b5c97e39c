//! Implementation of the `relbuild plan` command.

use std::path::Path;

use anyhow::{Context, Result};

use relbuild_lib::manifest::Manifest;
use relbuild_lib::pipeline::{PIPELINE, plan};

use super::build::join_steps;
use crate::output::{OutputFormat, print_json, print_stat, symbols};

pub fn cmd_plan(manifest_path: &Path, format: OutputFormat) -> Result<()> {
  let manifest =
    Manifest::load(manifest_path).with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

  let steps = plan(&manifest.outputs);
  let skipped: Vec<_> = PIPELINE.into_iter().filter(|id| !steps.contains(id)).collect();

  if format.is_json() {
    let json_output = serde_json::json!({
      "version": manifest.version,
      "directory": manifest.directory,
      "steps": steps,
      "skipped": skipped,
    });
    return print_json(&json_output);
  }

  println!("Plan: release {}", manifest.version);
  print_stat("Directory", &manifest.directory.display().to_string());
  print_stat("Output", &manifest.out_dir().display().to_string());
  println!();
  for (idx, step) in steps.iter().enumerate() {
    println!("  {}. {:<16} {} {}", idx + 1, step.as_str(), symbols::ARROW, step.description());
  }
  if !skipped.is_empty() {
    println!();
    print_stat("Skipped", &join_steps(&skipped));
  }

  Ok(())
}
