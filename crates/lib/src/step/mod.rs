//! Pipeline steps.
//!
//! A step is one unit of release work with a success/failure contract. Each
//! step reads the manifest and touches only the files it owns.
//!
//! # Submodules
//!
//! - [`builder`] - artifact builders backed by external commands
//! - [`sanitize`] - chart metadata normalization
//! - [`bundle`] - source tree archive
//! - [`snapshot`] - manifest snapshot
//! - [`license`] - dependency license report

pub mod builder;
pub mod bundle;
pub mod license;
pub mod sanitize;
pub mod snapshot;

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::exec::ExecError;
use crate::manifest::{Manifest, OutputKind};

pub use builder::CommandBuilder;
pub use bundle::{SourceBundler, bundle_sources};
pub use license::{LicenseReporter, write_license_report};
pub use sanitize::{ChartSanitizer, sanitize_charts};
pub use snapshot::{ManifestWriter, write_manifest};

/// Identifies a pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
  Image,
  Sanitizer,
  PackageRepo,
  OsPackage,
  Archive,
  SourceBundler,
  ManifestWriter,
  LicenseReporter,
}

impl StepId {
  /// Short machine-friendly name.
  pub fn as_str(&self) -> &'static str {
    match self {
      StepId::Image => "image",
      StepId::Sanitizer => "sanitizer",
      StepId::PackageRepo => "package-repo",
      StepId::OsPackage => "os-package",
      StepId::Archive => "archive",
      StepId::SourceBundler => "source-bundler",
      StepId::ManifestWriter => "manifest-writer",
      StepId::LicenseReporter => "license-reporter",
    }
  }

  /// What the step does, phrased to follow "failed to".
  pub fn description(&self) -> &'static str {
    match self {
      StepId::Image => "build image",
      StepId::Sanitizer => "sanitize charts",
      StepId::PackageRepo => "build package repo",
      StepId::OsPackage => "build OS package",
      StepId::Archive => "build archive",
      StepId::SourceBundler => "bundle sources",
      StepId::ManifestWriter => "write manifest",
      StepId::LicenseReporter => "package license file",
    }
  }

  /// When the step runs.
  pub fn condition(&self) -> Condition {
    match self {
      StepId::Image => Condition::Requested(OutputKind::Image),
      StepId::PackageRepo => Condition::Requested(OutputKind::PackageRepo),
      StepId::OsPackage => Condition::Requested(OutputKind::OsPackage),
      StepId::Archive => Condition::Requested(OutputKind::Archive),
      StepId::Sanitizer | StepId::SourceBundler | StepId::ManifestWriter | StepId::LicenseReporter => {
        Condition::Always
      }
    }
  }
}

impl fmt::Display for StepId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.description())
  }
}

/// Gate deciding whether a step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
  /// Runs on every pass, regardless of requested outputs.
  Always,
  /// Runs only when the output kind was requested.
  Requested(OutputKind),
}

impl Condition {
  pub fn is_met(&self, outputs: &BTreeSet<OutputKind>) -> bool {
    match self {
      Condition::Always => true,
      Condition::Requested(kind) => outputs.contains(kind),
    }
  }
}

/// Errors a step can fail with.
#[derive(Debug, Error)]
pub enum StepError {
  #[error(transparent)]
  Exec(#[from] ExecError),

  #[error("io error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to marshal manifest: {0}")]
  Serialize(#[from] serde_yaml::Error),

  #[error("no builder configured for {0}")]
  NoBuilder(OutputKind),

  #[error("{0} command is empty")]
  EmptyCommand(&'static str),

  #[error("invalid chart metadata in {path}: {message}")]
  InvalidChart { path: PathBuf, message: String },

  #[error("unable to generate license report for the {repo} repo: {source}")]
  LicenseScan {
    repo: String,
    #[source]
    source: ExecError,
  },

  #[error("{0}")]
  Other(String),
}

impl StepError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    StepError::Io {
      path: path.into(),
      source,
    }
  }
}

/// A unit of pipeline work.
pub trait Step {
  fn run(&self, manifest: &Manifest) -> Result<(), StepError>;
}

impl<F> Step for F
where
  F: Fn(&Manifest) -> Result<(), StepError>,
{
  fn run(&self, manifest: &Manifest) -> Result<(), StepError> {
    self(manifest)
  }
}
