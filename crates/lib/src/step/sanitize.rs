//! Chart metadata normalization.
//!
//! Packaging assumes every chart under the source tree already carries the
//! release version (and, for values files with a `global` block, the release
//! tag and registry). Sanitizing rewrites only files whose values differ, so
//! running it over an already sanitized tree changes nothing.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::consts::{CHART_FILE, CHART_VALUES_FILE};
use crate::manifest::Manifest;

use super::{Step, StepError};

/// Stamp `version` (and optionally `hub`) into every chart below `root`.
///
/// Returns the files that were rewritten.
pub fn sanitize_charts(root: &Path, version: &str, hub: Option<&str>) -> Result<Vec<PathBuf>, StepError> {
  let mut rewritten = Vec::new();

  for entry in WalkDir::new(root).sort_by_file_name() {
    let entry = entry.map_err(|e| {
      let path = e.path().unwrap_or(root).to_path_buf();
      StepError::io(path, e.into())
    })?;

    if !entry.file_type().is_file() || entry.file_name() != CHART_FILE {
      continue;
    }

    let chart = entry.path();
    if update_yaml(chart, |doc| stamp_chart(doc, version))? {
      rewritten.push(chart.to_path_buf());
    }

    let values = chart.with_file_name(CHART_VALUES_FILE);
    if values.is_file() && update_yaml(&values, |doc| stamp_values(doc, version, hub))? {
      rewritten.push(values);
    }
  }

  Ok(rewritten)
}

fn stamp_chart(doc: &mut Mapping, version: &str) -> bool {
  let a = set_string(doc, "version", version);
  let b = set_string(doc, "appVersion", version);
  a || b
}

fn stamp_values(doc: &mut Mapping, version: &str, hub: Option<&str>) -> bool {
  let Some(global) = doc.get_mut("global").and_then(Value::as_mapping_mut) else {
    return false;
  };
  let mut changed = set_string(global, "tag", version);
  if let Some(hub) = hub {
    changed |= set_string(global, "hub", hub);
  }
  changed
}

fn set_string(map: &mut Mapping, key: &str, value: &str) -> bool {
  if map.get(key).and_then(Value::as_str) == Some(value) {
    return false;
  }
  map.insert(Value::String(key.to_string()), Value::String(value.to_string()));
  true
}

/// Parse `path`, apply `edit`, and write back if it reported a change.
fn update_yaml(path: &Path, edit: impl FnOnce(&mut Mapping) -> bool) -> Result<bool, StepError> {
  let content = fs::read_to_string(path).map_err(|e| StepError::io(path, e))?;
  let invalid = |message: String| StepError::InvalidChart {
    path: path.to_path_buf(),
    message,
  };

  let mut doc = match serde_yaml::from_str::<Value>(&content).map_err(|e| invalid(e.to_string()))? {
    Value::Mapping(map) => map,
    Value::Null => Mapping::new(),
    _ => return Err(invalid("expected a mapping at the document root".to_string())),
  };

  if !edit(&mut doc) {
    debug!(path = ?path, "already sanitized");
    return Ok(false);
  }

  let updated = serde_yaml::to_string(&doc).map_err(|e| invalid(e.to_string()))?;
  fs::write(path, updated).map_err(|e| StepError::io(path, e))?;
  debug!(path = ?path, "sanitized");
  Ok(true)
}

/// Sanitizes every chart in the manifest's source tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartSanitizer;

impl Step for ChartSanitizer {
  fn run(&self, manifest: &Manifest) -> Result<(), StepError> {
    let root = manifest.sources_dir();
    if !root.is_dir() {
      debug!(path = ?root, "no sources to sanitize");
      return Ok(());
    }

    let rewritten = sanitize_charts(&root, &manifest.version, manifest.docker_hub.as_deref())?;
    info!(count = rewritten.len(), "charts sanitized");
    Ok(())
  }
}
