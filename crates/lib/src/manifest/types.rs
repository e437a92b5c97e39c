//! Manifest types for relbuild.
//!
//! # Structure
//!
//! ```yaml
//! version: 1.22.0
//! directory: /work
//! outputs: [image, archive]
//! repositories:
//!   istio: sources/istio
//! builders:
//!   image: [make, docker]
//!   archive: [make, istioctl-all]
//! license:
//!   repository: istio
//! ```
//!
//! # Ordering
//!
//! All collections are ordered ([`BTreeSet`], [`BTreeMap`]) so that serializing
//! the same manifest twice yields byte-identical output.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_LICENSE_CONFIG, DEFAULT_LICENSE_REPO, DEFAULT_LICENSE_TOOL, OUT_DIR, SOURCES_DIR};

/// One kind of distributable artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
  /// Container image.
  Image,
  /// Package-repository bundle (e.g. Helm charts).
  PackageRepo,
  /// OS package (e.g. Debian).
  OsPackage,
  /// Release archive.
  Archive,
}

impl OutputKind {
  pub const ALL: [OutputKind; 4] = [
    OutputKind::Image,
    OutputKind::PackageRepo,
    OutputKind::OsPackage,
    OutputKind::Archive,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OutputKind::Image => "image",
      OutputKind::PackageRepo => "package-repo",
      OutputKind::OsPackage => "os-package",
      OutputKind::Archive => "archive",
    }
  }
}

impl fmt::Display for OutputKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How the license report is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseConfig {
  /// Logical repository whose dependencies are reported.
  pub repository: String,
  /// Scanner configuration, relative to the repository.
  pub config: String,
  /// Command that materializes all dependencies locally.
  pub fetch: Vec<String>,
  /// License-scan program.
  pub scan: String,
}

impl Default for LicenseConfig {
  fn default() -> Self {
    Self {
      repository: DEFAULT_LICENSE_REPO.to_string(),
      config: DEFAULT_LICENSE_CONFIG.to_string(),
      fetch: vec!["go".to_string(), "mod".to_string(), "download".to_string()],
      scan: DEFAULT_LICENSE_TOOL.to_string(),
    }
  }
}

/// The immutable input of a release run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  /// Release version, stamped into chart metadata.
  pub version: String,
  /// Root of the prepared working tree.
  pub directory: PathBuf,
  /// Requested output kinds. Membership decides which builder steps run.
  #[serde(default)]
  pub outputs: BTreeSet<OutputKind>,
  /// Logical repository name to path, relative to `directory`.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub repositories: BTreeMap<String, PathBuf>,
  /// External command producing each output kind.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub builders: BTreeMap<OutputKind, Vec<String>>,
  #[serde(default)]
  pub license: LicenseConfig,
  /// Image registry stamped into chart values.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub docker_hub: Option<String>,
}

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read manifest {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse manifest {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },
}

impl Manifest {
  /// Create a manifest with no outputs requested and default tooling.
  pub fn new(version: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
    Self {
      version: version.into(),
      directory: directory.into(),
      outputs: BTreeSet::new(),
      repositories: BTreeMap::new(),
      builders: BTreeMap::new(),
      license: LicenseConfig::default(),
      docker_hub: None,
    }
  }

  /// Load a manifest from a YAML file.
  ///
  /// A relative `directory` is resolved against the manifest file's parent.
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let base = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    let base = dunce::canonicalize(&base).unwrap_or(base);

    Self::from_yaml(&content, &base).map_err(|source| ManifestError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Parse a manifest from YAML text, resolving a relative `directory` against `base`.
  pub fn from_yaml(content: &str, base: &Path) -> Result<Self, serde_yaml::Error> {
    let mut manifest: Manifest = serde_yaml::from_str(content)?;
    if manifest.directory.is_relative() {
      manifest.directory = base.join(&manifest.directory);
    }
    Ok(manifest)
  }

  /// Replace the working tree root.
  pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
    self.directory = directory.into();
    self
  }

  /// Request an additional output kind.
  pub fn with_output(mut self, kind: OutputKind) -> Self {
    self.outputs.insert(kind);
    self
  }

  /// Configure the command producing an output kind.
  pub fn with_builder<I, S>(mut self, kind: OutputKind, argv: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.builders.insert(kind, argv.into_iter().map(Into::into).collect());
    self
  }

  /// Whether an output kind was requested.
  pub fn wants(&self, kind: OutputKind) -> bool {
    self.outputs.contains(&kind)
  }

  /// Destination for all artifacts and provenance files.
  pub fn out_dir(&self) -> PathBuf {
    self.directory.join(OUT_DIR)
  }

  /// Root of the resolved source checkouts.
  pub fn sources_dir(&self) -> PathBuf {
    self.directory.join(SOURCES_DIR)
  }

  /// On-disk location of a logical repository.
  ///
  /// Unlisted repositories live at `<directory>/sources/<name>`.
  pub fn repo_dir(&self, name: &str) -> PathBuf {
    match self.repositories.get(name) {
      Some(path) => self.directory.join(path),
      None => self.sources_dir().join(name),
    }
  }
}
