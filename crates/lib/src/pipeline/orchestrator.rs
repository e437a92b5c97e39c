//! Single-pass, fail-fast pipeline execution.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::exec::CommandRunner;
use crate::manifest::Manifest;

use super::Pipeline;
use super::types::{BuildError, RunReport, RunState};

/// Drives a [`Pipeline`] through exactly one run.
///
/// Steps run sequentially. The first failure stops the run; files written by
/// earlier steps are not cleaned up.
pub struct Orchestrator {
  pipeline: Pipeline,
  state: RunState,
}

impl Orchestrator {
  pub fn new(pipeline: Pipeline) -> Self {
    Self {
      pipeline,
      state: RunState::NotStarted,
    }
  }

  pub fn state(&self) -> &RunState {
    &self.state
  }

  /// Run every step whose condition holds for `manifest.outputs`.
  pub fn run(&mut self, manifest: &Manifest) -> Result<RunReport, BuildError> {
    if self.state != RunState::NotStarted {
      return Err(BuildError::AlreadyRun);
    }

    let started = Instant::now();
    let mut report = RunReport::default();

    info!(version = %manifest.version, directory = ?manifest.directory, "starting release build");

    for stage in self.pipeline.stages() {
      if !stage.id.condition().is_met(&manifest.outputs) {
        debug!(step = stage.id.as_str(), "skipping step");
        report.skipped.push(stage.id);
        continue;
      }

      self.state = RunState::Running(stage.id);
      info!(step = stage.id.as_str(), "running step");

      if let Err(source) = stage.step.run(manifest) {
        warn!(step = stage.id.as_str(), error = %source, "step failed");
        self.state = RunState::Failed {
          step: stage.id,
          cause: source.to_string(),
        };
        return Err(BuildError::Step { step: stage.id, source });
      }

      report.executed.push(stage.id);
    }

    self.state = RunState::Succeeded;
    report.elapsed = started.elapsed();
    info!(steps = report.executed.len(), elapsed = ?report.elapsed, "release build complete");

    Ok(report)
  }
}

/// Run the standard pipeline once over `manifest`.
///
/// This assumes the working directory has been set up, sources resolved and
/// `manifest.out_dir()` created.
pub fn build<R>(manifest: &Manifest, runner: R) -> Result<RunReport, BuildError>
where
  R: CommandRunner + Clone + 'static,
{
  Orchestrator::new(Pipeline::standard(runner)).run(manifest)
}
