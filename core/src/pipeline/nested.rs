// relay/src/pipeline/nested.rs

//! Composition of pipelines: a whole sub-pipeline run used as one operation of its parent.

use crate::core::operation::Operation;
use crate::pipeline::definition::Pipeline;
use std::sync::Arc;

impl<I, O> Operation<I, O>
where
  I: Send + 'static,
  O: Send + 'static,
{
  /// Wraps the blocking run of `pipeline` as an operation named ``Pipeline `<name>` ``.
  ///
  /// The sub-pipeline keeps its own per-step completion and exception handling. Hooks set on
  /// the returned operation apply to the sub-pipeline's overall result or failure. A failure
  /// that escapes the sub-pipeline reaches the parent as the original `RelayError`.
  pub fn from_pipeline(pipeline: Arc<Pipeline<I, O>>) -> Self {
    let name = format!("Pipeline `{}`", pipeline.name());
    Operation::from_execution(Arc::new(move |input: I| -> anyhow::Result<Option<O>> {
      pipeline.run(input).map_err(anyhow::Error::from)
    }))
    .named(name)
  }
}

impl<P, R> Pipeline<P, R>
where
  P: Send + 'static,
  R: Send + 'static,
{
  /// Appends `pipeline` as a single operation. Its output feeds the next step.
  pub fn add_pipeline<I, O>(&mut self, pipeline: Arc<Pipeline<I, O>>) -> &mut Self
  where
    I: Send + 'static,
    O: Send + 'static,
  {
    self.add_operation(Operation::from_pipeline(pipeline))
  }

  pub fn add_conditional_pipeline<I, O>(
    &mut self,
    predicate: impl Fn() -> bool + Send + Sync + 'static,
    pipeline: Arc<Pipeline<I, O>>,
  ) -> &mut Self
  where
    I: Send + 'static,
    O: Send + 'static,
  {
    self.add_operation(Operation::from_pipeline(pipeline).when(predicate))
  }
}
