// relay/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
  /// An operation was handed no input value, e.g. because the previous step produced none.
  #[error("Operation '{operation}' received no input value")]
  MissingInput { operation: String },

  #[error("Configuration error for pipeline '{pipeline}': {message}")]
  Configuration { pipeline: String, message: String },

  #[error("Type mismatch in operation '{operation}' (expected {expected_type})")]
  TypeMismatch { operation: String, expected_type: String },

  #[error("Operation '{operation}' failed. Source: {source}")]
  Operation {
    operation: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Pipeline '{pipeline}' was cancelled")]
  Cancelled { pipeline: String },

  #[error("Internal relay error: {0}")]
  Internal(String),
}

impl RelayError {
  /// Converts a failure raised while running `operation` into a `RelayError`.
  ///
  /// Failures that already are a `RelayError` (a nested pipeline's error, a type mismatch,
  /// a missing input) are returned unchanged so they surface to the caller as raised.
  pub fn from_operation_failure(operation: &str, err: AnyhowError) -> Self {
    match err.downcast::<RelayError>() {
      Ok(relay_err) => relay_err,
      Err(source) => RelayError::Operation {
        operation: operation.to_string(),
        source,
      },
    }
  }

  pub(crate) fn configuration(pipeline: &str, message: impl Into<String>) -> Self {
    RelayError::Configuration {
      pipeline: pipeline.to_string(),
      message: message.into(),
    }
  }

  /// The original error raised by user code, for `Operation` failures.
  pub fn operation_source(&self) -> Option<&AnyhowError> {
    match self {
      RelayError::Operation { source, .. } => Some(source),
      _ => None,
    }
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(self, RelayError::Cancelled { .. })
  }

  pub fn is_configuration(&self) -> bool {
    matches!(self, RelayError::Configuration { .. })
  }
}

pub type RelayResult<T, E = RelayError> = std::result::Result<T, E>;
