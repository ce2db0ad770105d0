// relay/src/core/operation.rs

//! Defines `Operation<I, O>`, a named, typed unit of work, and the hook types it carries.

use std::sync::Arc;

pub const DEFAULT_OPERATION_NAME: &str = "Unnamed_Operation";

pub type Execution<I, O> = Arc<dyn Fn(I) -> anyhow::Result<Option<O>> + Send + Sync + 'static>;

/// Evaluated once per run, right before the engine decides whether to run the operation.
pub type CanExecute = Arc<dyn Fn() -> bool + Send + Sync + 'static>;

pub type OnCompletion<O> = Arc<dyn Fn(&O) -> anyhow::Result<()> + Send + Sync + 'static>;

pub type OnException<O> = Arc<dyn Fn(&anyhow::Error) -> Recovery<O> + Send + Sync + 'static>;

/// Decision returned by an operation's exception handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery<O> {
  /// The error is handled. The run continues with the last captured output: the operation's
  /// own output if only its completion callback failed, otherwise the output of the operation
  /// before it (nothing when the failing operation received the pipeline parameter).
  Recovered,
  /// The error is handled and `O` is carried forward as this operation's output.
  RecoveredWith(O),
  /// The error is not handled and aborts the run.
  Propagate,
}

impl<O> From<bool> for Recovery<O> {
  fn from(handled: bool) -> Self {
    if handled {
      Recovery::Recovered
    } else {
      Recovery::Propagate
    }
  }
}

/// A named unit of work turning an `I` into an optional `O`.
///
/// Only the execution function is required. Every hook has a default:
/// - `can_execute`: always true
/// - `on_completion`: no-op
/// - `on_exception`: never handles the error
///
/// Operations are immutable once added to a pipeline; the decorators below consume `self`.
pub struct Operation<I, O> {
  pub(crate) name: String,
  pub(crate) execution: Execution<I, O>,
  pub(crate) can_execute: CanExecute,
  pub(crate) on_completion: Option<OnCompletion<O>>,
  pub(crate) on_exception: Option<OnException<O>>,
  /// Set together with an exception handler. The execution function then gets a copy of its
  /// input so the original is still there to carry forward after a recovered failure.
  pub(crate) retain_input: Option<fn(&I) -> I>,
}

impl<I, O> Operation<I, O>
where
  I: Send + 'static,
  O: Send + 'static,
{
  /// Creates an operation from a fallible execution function.
  pub fn new<F, E>(execution: F) -> Self
  where
    F: Fn(I) -> Result<O, E> + Send + Sync + 'static,
    E: Into<anyhow::Error>,
  {
    Self::from_execution(Arc::new(move |input: I| -> anyhow::Result<Option<O>> {
      execution(input).map(Some).map_err(Into::into)
    }))
  }

  /// Creates an operation from an execution function that cannot fail.
  pub fn from_fn<F>(f: F) -> Self
  where
    F: Fn(I) -> O + Send + Sync + 'static,
  {
    Self::from_execution(Arc::new(move |input: I| -> anyhow::Result<Option<O>> { Ok(Some(f(input))) }))
  }

  /// Creates an operation whose execution may legitimately produce no output.
  pub fn optional<F, E>(execution: F) -> Self
  where
    F: Fn(I) -> Result<Option<O>, E> + Send + Sync + 'static,
    E: Into<anyhow::Error>,
  {
    Self::from_execution(Arc::new(move |input: I| -> anyhow::Result<Option<O>> {
      execution(input).map_err(Into::into)
    }))
  }

  pub(crate) fn from_execution(execution: Execution<I, O>) -> Self {
    Self {
      name: DEFAULT_OPERATION_NAME.to_string(),
      execution,
      can_execute: Arc::new(|| true),
      on_completion: None,
      on_exception: None,
      retain_input: None,
    }
  }

  pub fn named(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Sets the executability predicate. The operation is skipped entirely while it returns false.
  pub fn when(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
    self.can_execute = Arc::new(predicate);
    self
  }

  pub fn on_completion(mut self, callback: impl Fn(&O) + Send + Sync + 'static) -> Self {
    self.on_completion = Some(Arc::new(move |output: &O| -> anyhow::Result<()> {
      callback(output);
      Ok(())
    }));
    self
  }

  /// Completion callback that may itself fail. Its failure is handled like an execution failure.
  pub fn try_on_completion<F, E>(mut self, callback: F) -> Self
  where
    F: Fn(&O) -> Result<(), E> + Send + Sync + 'static,
    E: Into<anyhow::Error>,
  {
    self.on_completion = Some(Arc::new(move |output: &O| -> anyhow::Result<()> {
      callback(output).map_err(Into::into)
    }));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl<I, O> Operation<I, O>
where
  I: Clone + Send + 'static,
  O: Send + 'static,
{
  /// Registers a handler deciding whether an error raised by this operation is recovered (`true`)
  /// or propagated (`false`).
  ///
  /// A recovered execution failure carries the previous operation's output forward unchanged,
  /// so the execution function receives a clone of its input and handled operations need a
  /// `Clone` input.
  pub fn on_exception(self, handler: impl Fn(&anyhow::Error) -> bool + Send + Sync + 'static) -> Self {
    self.recover_with(move |err: &anyhow::Error| -> Recovery<O> { Recovery::from(handler(err)) })
  }

  /// Registers a handler that can also supply the value carried forward after recovery.
  pub fn recover_with(mut self, handler: impl Fn(&anyhow::Error) -> Recovery<O> + Send + Sync + 'static) -> Self {
    self.on_exception = Some(Arc::new(handler));
    self.retain_input = Some(I::clone);
    self
  }
}

impl<I, O> Clone for Operation<I, O> {
  fn clone(&self) -> Self {
    Self {
      name: self.name.clone(),
      execution: Arc::clone(&self.execution),
      can_execute: Arc::clone(&self.can_execute),
      on_completion: self.on_completion.clone(),
      on_exception: self.on_exception.clone(),
      retain_input: self.retain_input,
    }
  }
}

// Closures don't implement Debug, so only report which hooks are present.
impl<I, O> std::fmt::Debug for Operation<I, O> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Operation")
      .field("name", &self.name)
      .field("input_type", &std::any::type_name::<I>())
      .field("output_type", &std::any::type_name::<O>())
      .field("on_completion_present", &self.on_completion.is_some())
      .field("on_exception_present", &self.on_exception.is_some())
      .finish()
  }
}
