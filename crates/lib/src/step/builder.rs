//! Artifact builders.
//!
//! Producing an image, chart repository, OS package or archive is delegated to
//! an external command configured per output kind in the manifest. The builder
//! runs it from the working tree root with the release coordinates exported.

use tracing::info;

use crate::exec::{CommandRunner, CommandSpec};
use crate::manifest::{Manifest, OutputKind};

use super::{Step, StepError};

/// Runs the configured command for one output kind.
#[derive(Debug, Clone)]
pub struct CommandBuilder<R> {
  kind: OutputKind,
  runner: R,
}

impl<R: CommandRunner> CommandBuilder<R> {
  pub fn new(kind: OutputKind, runner: R) -> Self {
    Self { kind, runner }
  }

  /// Resolve the command for this builder, or fail if none is configured.
  pub fn command(&self, manifest: &Manifest) -> Result<CommandSpec, StepError> {
    let argv = manifest.builders.get(&self.kind).ok_or(StepError::NoBuilder(self.kind))?;
    let mut spec = CommandSpec::from_argv(argv)
      .ok_or(StepError::NoBuilder(self.kind))?
      .cwd(&manifest.directory)
      .env("VERSION", &manifest.version)
      .env("OUT_DIR", manifest.out_dir().to_string_lossy());
    if let Some(hub) = &manifest.docker_hub {
      spec = spec.env("HUB", hub);
    }
    Ok(spec)
  }
}

impl<R: CommandRunner> Step for CommandBuilder<R> {
  fn run(&self, manifest: &Manifest) -> Result<(), StepError> {
    let spec = self.command(manifest)?;
    info!(kind = %self.kind, version = %manifest.version, "building artifact");
    self.runner.run(&spec)?;
    Ok(())
  }
}
