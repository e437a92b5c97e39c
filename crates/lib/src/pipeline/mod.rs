//! Release pipeline definition and orchestration.
//!
//! The pipeline is a fixed, ordered list of steps. Which of them run on a
//! given pass depends only on the requested outputs: builder steps are gated
//! by their output kind, the sanitizer and the provenance steps always run.
//!
//! ```text
//! image? -> sanitizer -> package-repo? -> os-package? -> archive?
//!        -> source-bundler -> manifest-writer -> license-reporter
//! ```

mod orchestrator;
mod types;

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::consts::{LICENSES_FILE, MANIFEST_FILE, SOURCES_ARCHIVE};
use crate::exec::CommandRunner;
use crate::manifest::{Manifest, OutputKind};
use crate::step::{ChartSanitizer, CommandBuilder, LicenseReporter, ManifestWriter, SourceBundler, Step, StepId};

pub use orchestrator::{Orchestrator, build};
pub use types::*;

/// Every step, in execution order.
pub const PIPELINE: [StepId; 8] = [
  StepId::Image,
  StepId::Sanitizer,
  StepId::PackageRepo,
  StepId::OsPackage,
  StepId::Archive,
  StepId::SourceBundler,
  StepId::ManifestWriter,
  StepId::LicenseReporter,
];

/// The steps that would run for `outputs`, in order.
pub fn plan(outputs: &BTreeSet<OutputKind>) -> Vec<StepId> {
  PIPELINE.into_iter().filter(|id| id.condition().is_met(outputs)).collect()
}

/// Files every successful run leaves in the output directory.
pub fn provenance_files(manifest: &Manifest) -> [PathBuf; 3] {
  let out = manifest.out_dir();
  [out.join(SOURCES_ARCHIVE), out.join(MANIFEST_FILE), out.join(LICENSES_FILE)]
}

pub(crate) struct Stage {
  pub(crate) id: StepId,
  pub(crate) step: Box<dyn Step>,
}

/// [`PIPELINE`] with an implementation bound to each step.
pub struct Pipeline {
  stages: Vec<Stage>,
}

impl Pipeline {
  /// Bind each step id to the step returned by `make`.
  pub fn from_fn(mut make: impl FnMut(StepId) -> Box<dyn Step>) -> Self {
    let stages = PIPELINE.into_iter().map(|id| Stage { id, step: make(id) }).collect();
    Self { stages }
  }

  /// The production pipeline: command-backed builders, chart sanitizer, and
  /// provenance steps, all sharing `runner`.
  pub fn standard<R>(runner: R) -> Self
  where
    R: CommandRunner + Clone + 'static,
  {
    Self::from_fn(|id| -> Box<dyn Step> {
      match id {
        StepId::Image => Box::new(CommandBuilder::new(OutputKind::Image, runner.clone())),
        StepId::Sanitizer => Box::new(ChartSanitizer),
        StepId::PackageRepo => Box::new(CommandBuilder::new(OutputKind::PackageRepo, runner.clone())),
        StepId::OsPackage => Box::new(CommandBuilder::new(OutputKind::OsPackage, runner.clone())),
        StepId::Archive => Box::new(CommandBuilder::new(OutputKind::Archive, runner.clone())),
        StepId::SourceBundler => Box::new(SourceBundler::new(runner.clone())),
        StepId::ManifestWriter => Box::new(ManifestWriter),
        StepId::LicenseReporter => Box::new(LicenseReporter::new(runner.clone())),
      }
    })
  }

  pub fn steps(&self) -> impl Iterator<Item = StepId> + '_ {
    self.stages.iter().map(|stage| stage.id)
  }

  pub(crate) fn stages(&self) -> &[Stage] {
    &self.stages
  }
}
