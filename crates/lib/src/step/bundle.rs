//! Source tree archive.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::{OUT_DIR, SOURCES_ARCHIVE, SOURCES_DIR};
use crate::exec::{CommandRunner, CommandSpec};
use crate::manifest::Manifest;

use super::{Step, StepError};

/// Archive `<directory>/sources` into `<directory>/out/sources.tar.gz`.
///
/// The whole staged tree is included; nothing is filtered.
pub fn bundle_sources(directory: &Path, runner: &impl CommandRunner) -> Result<PathBuf, StepError> {
  let archive = Path::new(OUT_DIR).join(SOURCES_ARCHIVE);
  let spec = CommandSpec::new("tar")
    .arg("-czf")
    .arg(archive.to_string_lossy())
    .arg(SOURCES_DIR)
    .cwd(directory);

  info!(directory = ?directory, "bundling sources");
  runner.run(&spec)?;

  Ok(directory.join(archive))
}

/// Step wrapper around [`bundle_sources`].
#[derive(Debug, Clone)]
pub struct SourceBundler<R> {
  runner: R,
}

impl<R: CommandRunner> SourceBundler<R> {
  pub fn new(runner: R) -> Self {
    Self { runner }
  }
}

impl<R: CommandRunner> Step for SourceBundler<R> {
  fn run(&self, manifest: &Manifest) -> Result<(), StepError> {
    bundle_sources(&manifest.directory, &self.runner).map(|_| ())
  }
}
