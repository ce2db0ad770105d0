// relay/examples/error_handling.rs

use relay::{Operation, Pipeline, Recovery, RelayError};
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum CalcError {
  #[error("attempted to divide by zero")]
  DivideByZero,
}

fn divide_by(divisor: i32) -> impl Fn(i32) -> Result<i32, CalcError> + Send + Sync + 'static {
  move |x: i32| x.checked_div(divisor).ok_or(CalcError::DivideByZero)
}

fn is_divide_by_zero(err: &anyhow::Error) -> bool {
  matches!(err.downcast_ref::<CalcError>(), Some(CalcError::DivideByZero))
}

fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Error Handling Example ---");

  // Scenario 1: the handler recognises the error, so the run succeeds without a value.
  let mut handled = Pipeline::<i32, i32>::new().named("handled");
  handled.add_operation(
    Operation::new(divide_by(0))
      .named("divide")
      .on_exception(|err: &anyhow::Error| {
        warn!("divide failed: {}", err);
        is_divide_by_zero(err)
      }),
  );
  match handled.run(10) {
    Ok(result) => info!("Handled run finished with {:?}", result),
    Err(e) => error!("Unexpected failure: {}", e),
  }

  // Scenario 2: the handler supplies a fallback value carried to the next operation.
  let mut fallback = Pipeline::<i32, i32>::new().named("fallback");
  fallback
    .add_operation(Operation::new(divide_by(0)).named("divide").recover_with(
      |err: &anyhow::Error| {
        if is_divide_by_zero(err) {
          Recovery::RecoveredWith(0)
        } else {
          Recovery::Propagate
        }
      },
    ))
    .add_map(|x: i32| x + 1);
  match fallback.run(10) {
    Ok(result) => info!("Fallback run finished with {:?}", result),
    Err(e) => error!("Unexpected failure: {}", e),
  }

  // Scenario 3: nobody handles the error, the run fails with the original error.
  let mut unhandled = Pipeline::<i32, i32>::new().named("unhandled");
  unhandled.add_operation(Operation::new(divide_by(0)).named("divide"));
  match unhandled.run(10) {
    Ok(result) => warn!("Expected a failure, got {:?}", result),
    Err(RelayError::Operation { operation, source }) => {
      info!("Operation '{}' failed as expected: {}", operation, source);
      if let Some(calc_err) = source.downcast_ref::<CalcError>() {
        info!("Original error recovered by downcast: {:?}", calc_err);
      }
    }
    Err(e) => error!("Unexpected error kind: {}", e),
  }

  info!("--- Error Handling Example Finished ---");
}
