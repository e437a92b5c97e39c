//! Process-backed command runner.

use std::fs::File;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::types::{CommandRunner, CommandSpec, ExecError, StdoutTarget};

/// Runs commands as child processes of the current one.
///
/// Stderr is always inherited. Stdout is inherited unless the spec captures
/// it into a file, or the runner was told to keep the caller's stdout clean,
/// in which case uncaptured child stdout goes to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
  progress_on_stderr: bool,
}

impl SystemRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Route uncaptured child stdout to stderr.
  pub fn with_progress_on_stderr() -> Self {
    Self {
      progress_on_stderr: true,
    }
  }

  fn inherited_stdout(&self) -> Stdio {
    if self.progress_on_stderr {
      Stdio::from(std::io::stderr())
    } else {
      Stdio::inherit()
    }
  }
}

impl CommandRunner for SystemRunner {
  fn run(&self, spec: &CommandSpec) -> Result<(), ExecError> {
    info!(cmd = %spec, "executing command");

    let mut command = Command::new(&spec.program);
    command
      .args(&spec.args)
      .envs(&spec.env)
      .stdin(Stdio::null())
      .stderr(Stdio::inherit());

    if let Some(cwd) = &spec.cwd {
      command.current_dir(cwd);
    }

    match &spec.stdout {
      StdoutTarget::Inherit => {
        command.stdout(self.inherited_stdout());
      }
      StdoutTarget::File(path) => {
        let file = File::create(path).map_err(|source| ExecError::Output {
          path: path.clone(),
          source,
        })?;
        command.stdout(file);
      }
    }

    debug!(program = %spec.program, working_dir = ?spec.cwd, "spawning process");

    let status = command.status().map_err(|source| ExecError::Spawn {
      program: spec.program.clone(),
      source,
    })?;

    if !status.success() {
      return Err(ExecError::Failed {
        cmd: spec.to_string(),
        code: status.code(),
      });
    }

    Ok(())
  }
}
