// relay/examples/nested_pipeline.rs

use relay::{Operation, Pipeline, RelayResult, TracingLogger};
use std::sync::Arc;
use tracing::info;

fn main() -> RelayResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Nested Pipeline Example ---");

  let logger = Arc::new(TracingLogger);

  // Inner pipeline B: adds 5.
  let mut add_five = Pipeline::<i32, i32>::with_logger(logger.clone()).named("B");
  add_five.add_operation(Operation::from_fn(|x: i32| x + 5).named("add_five"));
  let add_five = Arc::new(add_five);

  // Outer pipeline A: parses text, then delegates to B as a single step.
  let mut outer = Pipeline::<String, i32>::with_logger(logger).named("A");
  outer
    .add_operation(Operation::new(|input: String| input.parse::<i32>()).named("convert"))
    .add_pipeline(add_five.clone());

  info!("Outer operations: {:?}", outer.operation_names());

  let result = outer.run("50".to_string())?;
  info!("Nested result: {:?}", result);
  assert_eq!(result, Some(55));

  // B stays usable on its own.
  info!("Inner alone: {:?}", add_five.run(1)?);

  info!("--- Nested Pipeline Example Finished ---");
  Ok(())
}
