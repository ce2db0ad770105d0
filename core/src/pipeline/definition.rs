// relay/src/pipeline/definition.rs

//! Contains the `Pipeline<P, R>` struct definition and methods for its
//! construction, identity, and structural modification.

use crate::core::control::ErasedResultFactory;
use crate::core::erased::ErasedOperation;
use crate::core::logger::PipelineLogger;
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

pub const DEFAULT_PIPELINE_NAME: &str = "Unnamed_Pipeline";

/// An ordered sequence of type-erased operations executed as one run.
///
/// `P` is the parameter handed to the first eligible operation and `R` the type the run's
/// result is materialized as. Operations in between may have any input/output types as long
/// as each one accepts what its predecessor produced; mismatches surface at run time as
/// `RelayError::TypeMismatch`.
///
/// The pipeline holds build-time structure plus at most one pending result factory. Everything
/// that changes during a run (the parameter, the early-exit flag, the installed result factory)
/// lives in a per-run context, so one pipeline may be run concurrently from several threads or
/// tasks.
pub struct Pipeline<P, R> {
  pub(crate) id: String,
  pub(crate) name: String,

  /// Execution order. A run works on a snapshot of this list.
  pub(crate) operations: Vec<Arc<dyn ErasedOperation>>,

  /// Result factory set through `set_result`, handed to the next run that starts. When absent,
  /// a run's result is the last captured output.
  pub(crate) result_factory: Mutex<Option<ErasedResultFactory>>,

  pub(crate) logger: Option<Arc<dyn PipelineLogger>>,
  _types: PhantomData<fn(P) -> R>,
}

impl<P, R> Pipeline<P, R>
where
  P: Send + 'static,
  R: Send + 'static,
{
  /// Creates an empty pipeline without a logger. Lifecycle events are not emitted.
  pub fn new() -> Self {
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      name: DEFAULT_PIPELINE_NAME.to_string(),
      operations: Vec::new(),
      result_factory: Mutex::new(None),
      logger: None,
      _types: PhantomData,
    }
  }

  /// Creates an empty pipeline reporting its lifecycle events to `logger`.
  pub fn with_logger(logger: Arc<dyn PipelineLogger>) -> Self {
    let mut pipeline = Self::new();
    pipeline.logger = Some(logger);
    pipeline
  }

  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
    self.name = name.into();
    self
  }

  /// Process-unique identifier used to correlate the lifecycle events of this pipeline.
  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn len(&self) -> usize {
    self.operations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.operations.is_empty()
  }

  pub fn operation_names(&self) -> Vec<&str> {
    self.operations.iter().map(|op| op.name()).collect()
  }

  /// Whether an explicit result factory is waiting for the next run.
  pub fn has_result(&self) -> bool {
    self.result_factory.lock().is_some()
  }

  // --- Structural Mutators ---

  /// Removes every operation with the given name. Removing an unknown name is a no-op.
  pub fn remove_operations_by_name(&mut self, operation_name: &str) -> &mut Self {
    let before = self.operations.len();
    self.operations.retain(|op| op.name() != operation_name);
    event!(
      Level::DEBUG,
      pipeline_name = %self.name,
      %operation_name,
      removed = before - self.operations.len(),
      "Operations removed by name."
    );
    self
  }

  pub fn remove_all_operations(&mut self) -> &mut Self {
    self.operations.clear();
    self
  }

  /// Removes the last operation. No-op on an empty pipeline.
  pub fn remove_last(&mut self) -> &mut Self {
    self.operations.pop();
    self
  }
}

impl<P, R> Default for Pipeline<P, R>
where
  P: Send + 'static,
  R: Send + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<P, R> std::fmt::Debug for Pipeline<P, R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("id", &self.id)
      .field("name", &self.name)
      .field("operations", &self.operations.iter().map(|op| op.name()).collect::<Vec<_>>())
      .field("result_factory_present", &self.result_factory.lock().is_some())
      .field("logger_present", &self.logger.is_some())
      .finish()
  }
}
