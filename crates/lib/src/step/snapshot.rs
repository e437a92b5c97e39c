//! Manifest snapshot.
//!
//! Records the configuration that produced a release next to its artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::MANIFEST_FILE;
use crate::manifest::Manifest;

use super::{Step, StepError};

/// Serialize `manifest` to YAML and write it to `<dir>/manifest.yaml`.
///
/// Output is deterministic for equal manifests.
pub fn write_manifest(manifest: &Manifest, dir: &Path) -> Result<PathBuf, StepError> {
  let yaml = serde_yaml::to_string(manifest)?;
  let path = dir.join(MANIFEST_FILE);

  fs::write(&path, yaml).map_err(|e| StepError::io(&path, e))?;

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).map_err(|e| StepError::io(&path, e))?;
  }

  info!(path = ?path, "manifest written");
  Ok(path)
}

/// Writes the manifest snapshot into the output directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestWriter;

impl Step for ManifestWriter {
  fn run(&self, manifest: &Manifest) -> Result<(), StepError> {
    write_manifest(manifest, &manifest.out_dir()).map(|_| ())
  }
}
