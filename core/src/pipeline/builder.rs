// relay/src/pipeline/builder.rs

//! Contains the fluent methods appending operations to a `Pipeline<P, R>`
//! and configuring how its result is materialized.

use tracing::{event, Level};

use crate::core::control::{ErasedResultFactory, RunControl};
use crate::core::erased::{AnyValue, ErasedOperation, ErasedRecovery};
use crate::core::operation::{CanExecute, Operation};
use crate::error::{RelayError, RelayResult};
use crate::pipeline::definition::Pipeline;
use std::sync::Arc;

pub const DEFAULT_EXIT_NAME: &str = "Conditional_Exit";

impl<P, R> Pipeline<P, R>
where
  P: Send + 'static,
  R: Send + 'static,
{
  /// Appends a fully-formed operation.
  ///
  /// Use the `Operation` decorators (`named`, `when`, `on_completion`, `on_exception`, ...)
  /// to configure hooks before adding it.
  pub fn add_operation<I, O>(&mut self, operation: Operation<I, O>) -> &mut Self
  where
    I: Send + 'static,
    O: Send + 'static,
  {
    self.add_erased(Arc::new(operation))
  }

  /// Appends an operation wrapping a fallible execution function.
  pub fn add_fn<I, O, E, F>(&mut self, execution: F) -> &mut Self
  where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
    E: Into<anyhow::Error>,
  {
    self.add_operation(Operation::new(execution))
  }

  /// Appends an operation wrapping an execution function that cannot fail.
  pub fn add_map<I, O, F>(&mut self, f: F) -> &mut Self
  where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> O + Send + Sync + 'static,
  {
    self.add_operation(Operation::from_fn(f))
  }

  /// Appends `operation`, replacing its executability predicate with `predicate`.
  pub fn add_conditional_operation<I, O>(
    &mut self,
    predicate: impl Fn() -> bool + Send + Sync + 'static,
    operation: Operation<I, O>,
  ) -> &mut Self
  where
    I: Send + 'static,
    O: Send + 'static,
  {
    self.add_operation(operation.when(predicate))
  }

  pub fn add_conditional_fn<I, O, E, F>(
    &mut self,
    predicate: impl Fn() -> bool + Send + Sync + 'static,
    execution: F,
  ) -> &mut Self
  where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
    E: Into<anyhow::Error>,
  {
    self.add_operation(Operation::new(execution).when(predicate))
  }

  /// Appends an exit point. When `predicate` holds at this position, the run stops right
  /// after it and its result is produced by `result_factory`.
  pub fn add_conditional_exit(
    &mut self,
    predicate: impl Fn() -> bool + Send + Sync + 'static,
    result_factory: impl Fn() -> Option<R> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add_named_conditional_exit(DEFAULT_EXIT_NAME, predicate, result_factory)
  }

  pub fn add_named_conditional_exit(
    &mut self,
    name: impl Into<String>,
    predicate: impl Fn() -> bool + Send + Sync + 'static,
    result_factory: impl Fn() -> Option<R> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add_erased(Arc::new(ConditionalExit {
      name: name.into(),
      predicate: Arc::new(predicate),
      result_factory: erase_result_factory(result_factory),
    }))
  }

  /// Appends any implementation of the erased capability set.
  pub fn add_erased(&mut self, operation: Arc<dyn ErasedOperation>) -> &mut Self {
    event!(
      Level::DEBUG,
      pipeline_name = %self.name,
      operation_name = %operation.name(),
      position = self.operations.len(),
      "Operation added."
    );
    self.operations.push(operation);
    self
  }

  /// Sets the factory materializing the next run's result, replacing the default of returning
  /// the last captured output.
  ///
  /// The factory applies to one run only: the next run to start takes it, whether that run
  /// succeeds or fails, and later runs fall back to the default unless it is set again.
  ///
  /// Fails with a configuration error if a result factory is already waiting for a run.
  pub fn set_result(&mut self, result_factory: impl Fn() -> Option<R> + Send + Sync + 'static) -> RelayResult<&mut Self> {
    let pending = self.result_factory.get_mut();
    if pending.is_some() {
      event!(Level::ERROR, pipeline_name = %self.name, "Result factory set twice.");
      return Err(RelayError::configuration(&self.name, "the result can only be set once"));
    }
    *pending = Some(erase_result_factory(result_factory));
    Ok(self)
  }

  /// Removes a pending result factory, restoring the default result rule.
  pub fn clear_result(&mut self) -> &mut Self {
    *self.result_factory.get_mut() = None;
    self
  }
}

pub(crate) fn erase_result_factory<R: Send + 'static>(
  factory: impl Fn() -> Option<R> + Send + Sync + 'static,
) -> ErasedResultFactory {
  Arc::new(move || -> Option<AnyValue> { factory().map(|value| Box::new(value) as AnyValue) })
}

/// Synthetic operation installed by `add_conditional_exit`.
struct ConditionalExit {
  name: String,
  predicate: CanExecute,
  result_factory: ErasedResultFactory,
}

impl ErasedOperation for ConditionalExit {
  fn name(&self) -> &str {
    &self.name
  }

  fn can_execute(&self) -> bool {
    (self.predicate)()
  }

  // The incoming value is discarded; the run ends here.
  fn invoke(&self, _input: &mut Option<AnyValue>, control: &mut RunControl) -> anyhow::Result<Option<AnyValue>> {
    control.request_exit();
    control.set_result(Arc::clone(&self.result_factory))?;
    event!(Level::DEBUG, operation_name = %self.name, "Early exit requested.");
    Ok(None)
  }

  fn complete(&self, _output: &AnyValue) -> anyhow::Result<()> {
    Ok(())
  }

  fn recover(&self, _error: &anyhow::Error) -> ErasedRecovery {
    ErasedRecovery::Propagate
  }
}
