// relay/examples/cancellation.rs

use relay::{CancellationToken, Operation, Pipeline, RelayError};
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), RelayError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Cancellation Example ---");

  let mut pipeline = Pipeline::<u64, u64>::new().named("slow_steps");
  for i in 0..5 {
    pipeline.add_operation(
      Operation::from_fn(move |x: u64| {
        info!("step {} working on {}", i, x);
        std::thread::sleep(Duration::from_millis(100));
        x + 1
      })
      .named(format!("step_{}", i)),
    );
  }

  // Uncancelled background run.
  let result = pipeline.run_async(0, None).await?;
  info!("Background run finished with {:?}", result);

  // Cancel while the second step is running. That step finishes, the third never starts.
  let token = CancellationToken::new();
  let trigger = token.clone();
  tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(150)).await;
    trigger.cancel();
  });

  match pipeline.run_async(0, Some(token)).await {
    Err(e) if e.is_cancelled() => warn!("Run cancelled: {}", e),
    other => info!("Run ended without observing cancellation: {:?}", other),
  }

  info!("--- Cancellation Example Finished ---");
  Ok(())
}
