//! Command descriptions and execution errors.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Where a command's standard output goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StdoutTarget {
  /// Stream to the caller's stdout for live progress.
  #[default]
  Inherit,
  /// Capture verbatim into a file, created when the command is spawned.
  File(PathBuf),
}

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  /// Variables added on top of the inherited environment.
  pub env: BTreeMap<String, String>,
  pub stdout: StdoutTarget,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: BTreeMap::new(),
      stdout: StdoutTarget::Inherit,
    }
  }

  /// Build a spec from an argv list. Returns `None` for an empty list.
  pub fn from_argv(argv: &[String]) -> Option<Self> {
    let (program, args) = argv.split_first()?;
    Some(Self::new(program.as_str()).args(args.iter().cloned()))
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
    self.stdout = StdoutTarget::File(path.into());
    self
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.program)?;
    for arg in &self.args {
      write!(f, " {}", arg)?;
    }
    Ok(())
  }
}

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The process ran and exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  Failed { cmd: String, code: Option<i32> },

  /// The process could not be started.
  #[error("failed to spawn {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The stdout capture file could not be created.
  #[error("failed to create {path}: {source}")]
  Output {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Runs one external command to completion.
///
/// Implementations block until the process exits. There is no timeout.
pub trait CommandRunner {
  fn run(&self, spec: &CommandSpec) -> Result<(), ExecError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
  fn run(&self, spec: &CommandSpec) -> Result<(), ExecError> {
    (**self).run(spec)
  }
}

impl<R: CommandRunner + ?Sized> CommandRunner for std::rc::Rc<R> {
  fn run(&self, spec: &CommandSpec) -> Result<(), ExecError> {
    (**self).run(spec)
  }
}
