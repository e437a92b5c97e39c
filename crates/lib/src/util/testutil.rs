//! Test utilities for relbuild-lib.

use std::cell::RefCell;
use std::fs::File;

use crate::exec::{CommandRunner, CommandSpec, ExecError, StdoutTarget};

/// Records commands instead of running them.
///
/// Mirrors the observable side effects of [`crate::exec::SystemRunner`] that
/// steps rely on: a stdout capture file is created before the command "runs".
#[derive(Debug, Default)]
pub struct RecordingRunner {
  calls: RefCell<Vec<CommandSpec>>,
  failing: Option<String>,
}

impl RecordingRunner {
  /// A runner whose commands fail when the program matches `program`.
  pub fn failing_on(program: &str) -> Self {
    Self {
      calls: RefCell::default(),
      failing: Some(program.to_string()),
    }
  }

  pub fn calls(&self) -> Vec<CommandSpec> {
    self.calls.borrow().clone()
  }
}

impl CommandRunner for RecordingRunner {
  fn run(&self, spec: &CommandSpec) -> Result<(), ExecError> {
    self.calls.borrow_mut().push(spec.clone());

    if let StdoutTarget::File(path) = &spec.stdout {
      File::create(path).map_err(|source| ExecError::Output {
        path: path.clone(),
        source,
      })?;
    }

    if self.failing.as_deref() == Some(spec.program.as_str()) {
      return Err(ExecError::Failed {
        cmd: spec.to_string(),
        code: Some(1),
      });
    }

    Ok(())
  }
}
