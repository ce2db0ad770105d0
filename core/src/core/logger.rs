// relay/src/core/logger.rs

//! The logging collaborator that receives pipeline lifecycle events.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{event, Level};

/// Receives lifecycle events of pipeline runs.
///
/// All methods default to doing nothing, so an implementation only overrides the events it
/// cares about. Events are correlated through the pipeline id, which is stable for the
/// pipeline's lifetime.
pub trait PipelineLogger: Send + Sync {
  fn pipeline_started(&self, _pipeline_id: &str, _pipeline_name: &str, _at: DateTime<Utc>) {}

  fn pipeline_finished(&self, _pipeline_id: &str, _pipeline_name: &str, _elapsed: Duration) {}

  fn operation_started(&self, _pipeline_id: &str, _operation_name: &str, _at: DateTime<Utc>) {}

  fn operation_finished(&self, _pipeline_id: &str, _operation_name: &str, _elapsed: Duration) {}
}

/// Emits lifecycle events as `tracing` INFO events under the `relay::lifecycle` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl PipelineLogger for TracingLogger {
  fn pipeline_started(&self, pipeline_id: &str, pipeline_name: &str, at: DateTime<Utc>) {
    event!(target: "relay::lifecycle", Level::INFO, %pipeline_id, %pipeline_name, started_at = %at.to_rfc3339(), "Pipeline starting.");
  }

  fn pipeline_finished(&self, pipeline_id: &str, pipeline_name: &str, elapsed: Duration) {
    event!(target: "relay::lifecycle", Level::INFO, %pipeline_id, %pipeline_name, elapsed_ms = elapsed_ms(elapsed), "Pipeline ended.");
  }

  fn operation_started(&self, pipeline_id: &str, operation_name: &str, at: DateTime<Utc>) {
    event!(target: "relay::lifecycle", Level::INFO, %pipeline_id, %operation_name, started_at = %at.to_rfc3339(), "Operation starting.");
  }

  fn operation_finished(&self, pipeline_id: &str, operation_name: &str, elapsed: Duration) {
    event!(target: "relay::lifecycle", Level::INFO, %pipeline_id, %operation_name, elapsed_ms = elapsed_ms(elapsed), "Operation ended.");
  }
}

fn elapsed_ms(elapsed: Duration) -> f64 {
  elapsed.as_secs_f64() * 1000.0
}
