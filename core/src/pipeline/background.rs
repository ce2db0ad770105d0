// relay/src/pipeline/background.rs

//! Contains `Pipeline::run_async()`, which executes a run on tokio's blocking pool
//! and observes a cooperative cancellation signal.

use crate::error::{RelayError, RelayResult};
use crate::pipeline::definition::Pipeline;
use tokio_util::sync::CancellationToken;
use tracing::{event, instrument, Level};

impl<P, R> Pipeline<P, R>
where
  P: Send + 'static,
  R: Send + 'static,
{
  /// Executes the pipeline off the caller's task.
  ///
  /// Validation, instrumentation and result semantics are those of [`Pipeline::run`]; the run
  /// itself happens on a blocking worker since operations are synchronous.
  ///
  /// `cancellation` is polled before each eligible operation. Once it is observed the run
  /// fails with `RelayError::Cancelled`; an operation already in progress is never interrupted
  /// and side effects of completed operations are not undone.
  ///
  /// Must be called from within a tokio runtime.
  #[instrument(
        name = "Pipeline::run_async",
        skip_all,
        fields(
            pipeline_id = %self.id,
            pipeline_name = %self.name,
            num_operations = self.operations.len(),
            cancellable = cancellation.is_some(),
        ),
        err(Display)
    )]
  pub async fn run_async(&self, parameter: P, cancellation: Option<CancellationToken>) -> RelayResult<Option<R>> {
    let execution = self.prepare_execution()?;
    let pipeline_name = self.name.clone();

    let handle = tokio::task::spawn_blocking(move || execution.run(Box::new(parameter), cancellation.as_ref()));

    match handle.await {
      Ok(result) => result,
      // A panicking operation unwinds into the caller, as it would with `run`.
      Err(join_err) if join_err.is_panic() => std::panic::resume_unwind(join_err.into_panic()),
      Err(join_err) => {
        event!(Level::ERROR, %pipeline_name, error = %join_err, "Background run was aborted by the runtime.");
        Err(RelayError::Internal(format!(
          "background run of pipeline '{}' was aborted: {}",
          pipeline_name, join_err
        )))
      }
    }
  }
}
