// relay/src/core/erased.rs

//! The type-erasure boundary: `ErasedOperation` lets operations of unrelated
//! input/output types sit in one ordered collection. Values cross the boundary as
//! `AnyValue` and are downcast back to the concrete type at each hop.

use crate::core::control::RunControl;
use crate::core::operation::{Operation, Recovery};
use crate::error::{RelayError, RelayResult};
use std::any::Any;

/// An input or output value with its concrete type erased.
pub type AnyValue = Box<dyn Any + Send>;

/// Type-erased form of [`Recovery`].
pub enum ErasedRecovery {
  Recovered,
  RecoveredWith(AnyValue),
  Propagate,
}

/// The capability set the engine needs from an operation, with its types erased.
///
/// Every `Operation<I, O>` implements this trait. Custom implementations may be added to a
/// pipeline with `Pipeline::add_erased`.
pub trait ErasedOperation: Send + Sync {
  fn name(&self) -> &str;

  fn can_execute(&self) -> bool;

  /// Runs the operation on the previous step's raw output (or the pipeline parameter).
  ///
  /// `input` is the engine's carried value. An implementation may take it, or leave it in place
  /// to be carried forward should the operation fail and be recovered. On success the engine
  /// replaces it with the returned output.
  ///
  /// Implementations must fail with `RelayError::TypeMismatch` when the input is not of the
  /// expected type. `control` exposes the run's early-exit flag and result factory.
  fn invoke(&self, input: &mut Option<AnyValue>, control: &mut RunControl) -> anyhow::Result<Option<AnyValue>>;

  /// Invoked with the raw output after a successful `invoke`.
  fn complete(&self, output: &AnyValue) -> anyhow::Result<()>;

  /// Decides what happens to an error raised by `invoke` or `complete`.
  fn recover(&self, error: &anyhow::Error) -> ErasedRecovery;
}

impl<I, O> ErasedOperation for Operation<I, O>
where
  I: Send + 'static,
  O: Send + 'static,
{
  fn name(&self) -> &str {
    &self.name
  }

  fn can_execute(&self) -> bool {
    (self.can_execute)()
  }

  fn invoke(&self, input: &mut Option<AnyValue>, _control: &mut RunControl) -> anyhow::Result<Option<AnyValue>> {
    let typed_input = match self.retain_input {
      // Leave the carried value in place; the execution works on a copy.
      Some(copy) => {
        let value = input.as_ref().ok_or_else(|| self.missing_input())?;
        let typed = (**value).downcast_ref::<I>().ok_or_else(|| type_mismatch::<I>(&self.name))?;
        copy(typed)
      }
      None => {
        let value = input.take().ok_or_else(|| self.missing_input())?;
        downcast_value::<I>(value, &self.name)?
      }
    };
    let output = (self.execution)(typed_input)?;
    Ok(output.map(|value| Box::new(value) as AnyValue))
  }

  fn complete(&self, output: &AnyValue) -> anyhow::Result<()> {
    let Some(on_completion) = &self.on_completion else {
      return Ok(());
    };
    let typed_output = (**output).downcast_ref::<O>().ok_or_else(|| type_mismatch::<O>(&self.name))?;
    on_completion(typed_output)
  }

  fn recover(&self, error: &anyhow::Error) -> ErasedRecovery {
    match &self.on_exception {
      None => ErasedRecovery::Propagate,
      Some(handler) => match handler(error) {
        Recovery::Recovered => ErasedRecovery::Recovered,
        Recovery::RecoveredWith(value) => ErasedRecovery::RecoveredWith(Box::new(value)),
        Recovery::Propagate => ErasedRecovery::Propagate,
      },
    }
  }
}

impl<I, O> Operation<I, O> {
  fn missing_input(&self) -> RelayError {
    RelayError::MissingInput {
      operation: self.name.clone(),
    }
  }
}

/// Downcasts an erased value back to `T`, reporting the operation that expected it on failure.
pub(crate) fn downcast_value<T: 'static>(value: AnyValue, operation: &str) -> RelayResult<T> {
  match value.downcast::<T>() {
    Ok(boxed) => Ok(*boxed),
    Err(_) => Err(type_mismatch::<T>(operation)),
  }
}

fn type_mismatch<T: 'static>(operation: &str) -> RelayError {
  RelayError::TypeMismatch {
    operation: operation.to_string(),
    expected_type: std::any::type_name::<T>().to_string(),
  }
}
