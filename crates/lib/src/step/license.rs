//! Dependency license report.
//!
//! Two phases against one repository: materialize every declared dependency,
//! then run the license scanner and capture its stdout as `LICENSES`. The
//! fetch always precedes the scan, and the report file is only created once
//! the fetch has succeeded. A report left over from an earlier run in the same
//! output directory is removed before the fetch.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::consts::LICENSES_FILE;
use crate::exec::{CommandRunner, CommandSpec};
use crate::manifest::{LicenseConfig, Manifest};

use super::{Step, StepError};

/// Produce `<out_dir>/LICENSES` for the repository checked out at `repo_dir`.
pub fn write_license_report(
  repo: &str,
  repo_dir: &Path,
  out_dir: &Path,
  config: &LicenseConfig,
  runner: &impl CommandRunner,
) -> Result<PathBuf, StepError> {
  let fetch = CommandSpec::from_argv(&config.fetch)
    .ok_or(StepError::EmptyCommand("license fetch"))?
    .cwd(repo_dir);

  let report = out_dir.join(LICENSES_FILE);
  if report.exists() {
    warn!(report = ?report, "removing stale license report");
    fs::remove_file(&report).map_err(|e| StepError::io(report.clone(), e))?;
  }

  info!(repo = %repo, "fetching dependencies");
  runner.run(&fetch)?;

  let scan = CommandSpec::new(config.scan.as_str())
    .args(["--config", config.config.as_str(), "--report"])
    .cwd(repo_dir)
    .stdout_to(&report);

  info!(repo = %repo, report = ?report, "generating license report");
  runner.run(&scan).map_err(|source| StepError::LicenseScan {
    repo: repo.to_string(),
    source,
  })?;

  Ok(report)
}

/// Step wrapper around [`write_license_report`] using the manifest's license settings.
#[derive(Debug, Clone)]
pub struct LicenseReporter<R> {
  runner: R,
}

impl<R: CommandRunner> LicenseReporter<R> {
  pub fn new(runner: R) -> Self {
    Self { runner }
  }
}

impl<R: CommandRunner> Step for LicenseReporter<R> {
  fn run(&self, manifest: &Manifest) -> Result<(), StepError> {
    let repo = &manifest.license.repository;
    write_license_report(
      repo,
      &manifest.repo_dir(repo),
      &manifest.out_dir(),
      &manifest.license,
      &self.runner,
    )
    .map(|_| ())
  }
}
