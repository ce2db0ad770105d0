// relay/src/pipeline/execution.rs

//! Contains the execution engine shared by `Pipeline::run()` and `Pipeline::run_async()`.
//!
//! Each run works on an `Execution`: a snapshot of the pipeline's operations plus the
//! per-run `RunControl`. Nothing a run mutates lives on the `Pipeline` itself.

use crate::core::control::{ErasedResultFactory, RunControl, RunOutcome};
use crate::core::erased::{downcast_value, AnyValue, ErasedOperation, ErasedRecovery};
use crate::core::instrument::ScopeTimer;
use crate::core::logger::PipelineLogger;
use crate::error::{RelayError, RelayResult};
use crate::pipeline::definition::Pipeline;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{event, instrument, Level};

/// One run of a pipeline, detached from the `Pipeline` it was prepared from.
pub(crate) struct Execution<R> {
  pipeline_id: String,
  pipeline_name: String,
  operations: Vec<Arc<dyn ErasedOperation>>,
  result_factory: Option<ErasedResultFactory>,
  logger: Option<Arc<dyn PipelineLogger>>,
  _result: PhantomData<fn() -> R>,
}

impl<P, R> Pipeline<P, R>
where
  P: Send + 'static,
  R: Send + 'static,
{
  /// Executes the pipeline on the calling thread.
  ///
  /// `parameter` becomes the input of the first eligible operation; each later operation
  /// receives the raw output of the previous one. Returns the materialized result, which is
  /// `None` when the producing step yielded no value.
  ///
  /// Fails with a configuration error when no operations are configured, and with the
  /// failing operation's error when an error is not recovered by its exception handler.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            pipeline_id = %self.id,
            pipeline_name = %self.name,
            num_operations = self.operations.len(),
        ),
        err(Display)
    )]
  pub fn run(&self, parameter: P) -> RelayResult<Option<R>> {
    let execution = self.prepare_execution()?;
    execution.run(Box::new(parameter), None)
  }

  /// Validates the configuration and snapshots everything a run needs.
  ///
  /// A pending result factory moves into the snapshot, so it serves exactly one run.
  pub(crate) fn prepare_execution(&self) -> RelayResult<Execution<R>> {
    if self.operations.is_empty() {
      event!(Level::ERROR, pipeline_name = %self.name, "Pipeline has no operations configured.");
      return Err(RelayError::configuration(
        &self.name,
        "must have 1 or more operations configured",
      ));
    }

    Ok(Execution {
      pipeline_id: self.id.clone(),
      pipeline_name: self.name.clone(),
      operations: self.operations.clone(),
      result_factory: self.result_factory.lock().take(),
      logger: self.logger.clone(),
      _result: PhantomData,
    })
  }
}

impl<R: Send + 'static> Execution<R> {
  /// Runs the operation loop and materializes the result.
  ///
  /// `cancellation` is checked once before the first operation and again before each eligible
  /// operation starts, never while one is running.
  pub(crate) fn run(self, parameter: AnyValue, cancellation: Option<&CancellationToken>) -> RelayResult<Option<R>> {
    let _pipeline_timer = ScopeTimer::with_start(
      |at| {
        if let Some(logger) = &self.logger {
          logger.pipeline_started(&self.pipeline_id, &self.pipeline_name, at);
        }
      },
      |elapsed| {
        if let Some(logger) = &self.logger {
          logger.pipeline_finished(&self.pipeline_id, &self.pipeline_name, elapsed);
        }
      },
    );
    event!(Level::DEBUG, pipeline_id = %self.pipeline_id, "Pipeline execution starting.");

    let mut control = RunControl::new(&self.pipeline_name, self.result_factory.clone());
    let (outcome, last_output) = self.run_operations(parameter, &mut control, cancellation)?;

    event!(Level::DEBUG, pipeline_id = %self.pipeline_id, ?outcome, "Operation loop finished.");
    self.materialize(&mut control, last_output)
  }

  fn run_operations(
    &self,
    parameter: AnyValue,
    control: &mut RunControl,
    cancellation: Option<&CancellationToken>,
  ) -> RelayResult<(RunOutcome, Option<AnyValue>)> {
    if cancellation.is_some_and(CancellationToken::is_cancelled) {
      event!(Level::WARN, pipeline_id = %self.pipeline_id, "Cancellation observed before the run started.");
      return Err(self.cancelled());
    }

    // Raw output of the previous eligible operation; the parameter until one has run.
    let mut carried: Option<AnyValue> = Some(parameter);
    // Whether `carried` holds an operation's output rather than the parameter.
    let mut captured = false;

    for (index, operation) in self.operations.iter().enumerate() {
      let operation_name = operation.name();

      if !operation.can_execute() {
        event!(Level::DEBUG, %operation_name, operation_index = index, "Operation skipped: predicate is false.");
        continue;
      }

      if cancellation.is_some_and(CancellationToken::is_cancelled) {
        event!(Level::WARN, pipeline_id = %self.pipeline_id, %operation_name, "Cancellation observed before operation.");
        return Err(self.cancelled());
      }

      let _operation_timer = ScopeTimer::with_start(
        |at| {
          if let Some(logger) = &self.logger {
            logger.operation_started(&self.pipeline_id, operation_name, at);
          }
        },
        |elapsed| {
          if let Some(logger) = &self.logger {
            logger.operation_finished(&self.pipeline_id, operation_name, elapsed);
          }
        },
      );

      // On failure `carried` still holds whatever the operation left in place.
      let step = match operation.invoke(&mut carried, control) {
        Ok(output) => {
          carried = output;
          captured = true;
          match &carried {
            Some(value) => operation.complete(value),
            None => Ok(()),
          }
        }
        Err(err) => Err(err),
      };

      if let Err(err) = step {
        match operation.recover(&err) {
          ErasedRecovery::Recovered => {
            event!(Level::DEBUG, %operation_name, error = %err, "Operation error recovered by its exception handler.");
            // The last captured output carries on. The parameter is input only, never an output.
            if !captured {
              carried = None;
            }
          }
          ErasedRecovery::RecoveredWith(value) => {
            event!(Level::DEBUG, %operation_name, error = %err, "Operation error recovered with a replacement output.");
            carried = Some(value);
            captured = true;
          }
          ErasedRecovery::Propagate => {
            event!(Level::ERROR, %operation_name, error = %err, "Operation failed.");
            return Err(RelayError::from_operation_failure(operation_name, err));
          }
        }
      }

      if control.exit_requested() {
        event!(Level::INFO, pipeline_id = %self.pipeline_id, %operation_name, "Pipeline exited early.");
        return Ok((RunOutcome::ExitedEarly, carried));
      }
    }

    Ok((RunOutcome::Completed, carried))
  }

  fn cancelled(&self) -> RelayError {
    RelayError::Cancelled {
      pipeline: self.pipeline_name.clone(),
    }
  }

  /// Invokes the installed result factory exactly once, or falls back to the last output.
  fn materialize(&self, control: &mut RunControl, last_output: Option<AnyValue>) -> RelayResult<Option<R>> {
    let raw = match control.take_result_factory() {
      Some(factory) => factory(),
      None => last_output,
    };
    raw
      .map(|value| downcast_value::<R>(value, &format!("result of `{}`", self.pipeline_name)))
      .transpose()
  }
}
