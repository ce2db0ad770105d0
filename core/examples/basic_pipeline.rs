// relay/examples/basic_pipeline.rs

use relay::{Operation, Pipeline, RelayResult, TracingLogger};
use std::sync::{
  atomic::{AtomicI32, Ordering},
  Arc,
};
use tracing::info;

fn main() -> RelayResult<()> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 1. Create a pipeline taking a String and producing an i32.
  //    TracingLogger reports start/end of the run and of each operation.
  let mut pipeline = Pipeline::<String, i32>::with_logger(Arc::new(TracingLogger)).named("parse_and_add");

  // 2. Add operations. Each one receives the previous one's output.
  pipeline
    .add_operation(Operation::new(|input: String| input.trim().parse::<i32>()).named("parse"))
    .add_operation(
      Operation::from_fn(|x: i32| x + 5)
        .named("add_five")
        .on_completion(|out: &i32| info!(output = out, "add_five completed")),
    );

  // 3. Run it. The result is the last operation's output.
  let result = pipeline.run(" 50 ".to_string())?;
  info!("Implicit result: {:?}", result);
  assert_eq!(result, Some(55));

  // 4. A second pipeline whose result comes from an explicit factory.
  let total = Arc::new(AtomicI32::new(0));
  let sink = total.clone();
  let source = total.clone();

  let mut explicit = Pipeline::<String, i32>::new().named("explicit_result");
  explicit
    .add_fn(|input: String| input.parse::<i32>())
    .add_map(move |x: i32| {
      sink.store(x + 5, Ordering::SeqCst);
      x
    });
  explicit.set_result(move || Some(source.load(Ordering::SeqCst)))?;

  let result = explicit.run("50".to_string())?;
  info!("Explicit result: {:?}", result);
  assert_eq!(result, Some(55));

  info!("--- Basic Pipeline Example Finished ---");
  Ok(())
}
