// relay/examples/pipeline_stop.rs

use relay::{Operation, Pipeline, RelayResult};
use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};
use tracing::info;

fn main() -> RelayResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Pipeline Early Exit Example ---");

  let over_limit = Arc::new(AtomicBool::new(false));
  let flag = over_limit.clone();
  let check = over_limit.clone();

  let mut pipeline = Pipeline::<u32, String>::new().named("order_total");
  pipeline
    .add_operation(
      Operation::from_fn(move |quantity: u32| {
        let total = quantity * 25;
        flag.store(total > 1_000, Ordering::SeqCst);
        total
      })
      .named("compute_total"),
    )
    // Predicates are evaluated when the run reaches them, so this sees the flag just set.
    .add_named_conditional_exit(
      "reject_large_orders",
      move || check.load(Ordering::SeqCst),
      || Some("rejected: order too large".to_string()),
    )
    .add_operation(Operation::from_fn(|total: u32| format!("accepted: {} EUR", total)).named("format"));

  let small = pipeline.run(4)?;
  info!("Small order: {:?}", small);
  assert_eq!(small.as_deref(), Some("accepted: 100 EUR"));

  let large = pipeline.run(100)?;
  info!("Large order: {:?}", large);
  assert_eq!(large.as_deref(), Some("rejected: order too large"));

  info!("--- Pipeline Early Exit Example Finished ---");
  Ok(())
}
