// relay/src/core/control.rs

//! Per-run control state shared between the engine and the operations it invokes,
//! and the outcome of a run's operation loop.

use crate::core::erased::AnyValue;
use crate::error::{RelayError, RelayResult};
use std::sync::Arc;

/// A result factory with its result type erased. Produces the run's final value.
pub type ErasedResultFactory = Arc<dyn Fn() -> Option<AnyValue> + Send + Sync + 'static>;

/// Mutable state of a single run: the early-exit flag and the installed result factory.
///
/// A fresh `RunControl` is created for every run, so nothing here outlives the run
/// that created it.
pub struct RunControl {
  pipeline_name: String,
  early_exit: bool,
  result_factory: Option<ErasedResultFactory>,
}

impl RunControl {
  pub(crate) fn new(pipeline_name: &str, result_factory: Option<ErasedResultFactory>) -> Self {
    Self {
      pipeline_name: pipeline_name.to_string(),
      early_exit: false,
      result_factory,
    }
  }

  /// Stops the run once the currently executing operation has finished.
  pub fn request_exit(&mut self) {
    self.early_exit = true;
  }

  pub fn exit_requested(&self) -> bool {
    self.early_exit
  }

  /// Installs the factory that materializes this run's result.
  ///
  /// Fails with a configuration error if a factory is already installed for this run,
  /// whether it came from the pipeline definition or from another operation.
  pub fn set_result(&mut self, factory: ErasedResultFactory) -> RelayResult<()> {
    if self.result_factory.is_some() {
      return Err(RelayError::configuration(
        &self.pipeline_name,
        "the result can only be set once per run",
      ));
    }
    self.result_factory = Some(factory);
    Ok(())
  }

  pub fn has_result(&self) -> bool {
    self.result_factory.is_some()
  }

  pub(crate) fn take_result_factory(&mut self) -> Option<ErasedResultFactory> {
    self.result_factory.take()
  }
}

impl std::fmt::Debug for RunControl {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RunControl")
      .field("pipeline_name", &self.pipeline_name)
      .field("early_exit", &self.early_exit)
      .field("result_factory_present", &self.result_factory.is_some())
      .finish()
  }
}

/// How the operation loop of a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunOutcome {
  /// Every eligible operation ran.
  Completed,
  /// An operation requested an early exit; later operations were never evaluated.
  ExitedEarly,
}
