//! Shared helpers for pipeline integration tests.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use relbuild_lib::exec::{CommandRunner, CommandSpec, ExecError, StdoutTarget};
use relbuild_lib::manifest::{Manifest, OutputKind};
use tempfile::TempDir;

/// Stands in for every external tool.
///
/// `tar` drops a fake archive, the license scanner writes a one-line report,
/// everything else succeeds silently. Clones share one call log.
#[derive(Clone, Default)]
pub struct FakeRunner {
  calls: Rc<RefCell<Vec<CommandSpec>>>,
  failing: Option<String>,
}

impl FakeRunner {
  pub fn failing_on(program: &str) -> Self {
    Self {
      calls: Rc::default(),
      failing: Some(program.to_string()),
    }
  }

  /// Programs invoked so far, in order.
  pub fn programs(&self) -> Vec<String> {
    self.calls.borrow().iter().map(|c| c.program.clone()).collect()
  }
}

impl CommandRunner for FakeRunner {
  fn run(&self, spec: &CommandSpec) -> Result<(), ExecError> {
    self.calls.borrow_mut().push(spec.clone());

    if let StdoutTarget::File(path) = &spec.stdout {
      fs::File::create(path).map_err(|source| ExecError::Output {
        path: path.clone(),
        source,
      })?;
    }

    if self.failing.as_deref() == Some(spec.program.as_str()) {
      return Err(ExecError::Failed {
        cmd: spec.to_string(),
        code: Some(2),
      });
    }

    match (spec.program.as_str(), &spec.stdout) {
      ("tar", _) => {
        let cwd = spec.cwd.clone().unwrap_or_default();
        fs::write(cwd.join(&spec.args[1]), b"fake tarball").unwrap();
      }
      ("license-lint", StdoutTarget::File(path)) => {
        fs::write(path, "Apache-2.0\n").unwrap();
      }
      _ => {}
    }

    Ok(())
  }
}

/// A prepared working tree with `sources/` and `out/`.
pub struct TestWorkspace {
  pub temp: TempDir,
}

impl TestWorkspace {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("sources").join("istio")).unwrap();
    fs::create_dir_all(temp.path().join("out")).unwrap();
    Self { temp }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn out(&self) -> PathBuf {
    self.root().join("out")
  }

  /// Write a file relative to the workspace root.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.root().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
  }

  /// Sorted file names in the output directory.
  pub fn out_files(&self) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(self.out())
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
      .collect();
    names.sort();
    names
  }

  /// Manifest rooted here with one `make <kind>` builder per output kind.
  pub fn manifest(&self, outputs: &[OutputKind]) -> Manifest {
    let mut manifest = Manifest::new("1.22.0", self.root());
    for kind in OutputKind::ALL {
      manifest = manifest.with_builder(kind, ["make", kind.as_str()]);
    }
    for kind in outputs {
      manifest = manifest.with_output(*kind);
    }
    manifest
  }
}
