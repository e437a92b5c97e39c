//! Run state, reports and errors for the orchestrator.

use std::time::Duration;

use thiserror::Error;

use crate::step::{StepError, StepId};

/// Where an orchestrator is in its single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RunState {
  #[default]
  NotStarted,
  Running(StepId),
  Succeeded,
  Failed { step: StepId, cause: String },
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
  /// Steps that ran, in order.
  pub executed: Vec<StepId>,
  /// Steps skipped because their output kind was not requested.
  pub skipped: Vec<StepId>,
  pub elapsed: Duration,
}

/// Errors returned by a pipeline run.
#[derive(Debug, Error)]
pub enum BuildError {
  /// A step failed; every later step was skipped and earlier output is left in place.
  #[error("failed to {step}: {source}")]
  Step {
    step: StepId,
    #[source]
    source: StepError,
  },

  #[error("pipeline has already run")]
  AlreadyRun,
}

impl BuildError {
  /// The step that failed, if any.
  pub fn step(&self) -> Option<StepId> {
    match self {
      BuildError::Step { step, .. } => Some(*step),
      BuildError::AlreadyRun => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn step_error_message_names_step_and_cause() {
    let err = BuildError::Step {
      step: StepId::Sanitizer,
      source: StepError::Other("bad chart".to_string()),
    };
    assert_eq!(err.to_string(), "failed to sanitize charts: bad chart");
    assert_eq!(err.step(), Some(StepId::Sanitizer));
  }
}
