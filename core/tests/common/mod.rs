// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use relay::PipelineLogger;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("attempted to divide by zero")]
  DivideByZero,

  #[error("Test operation failed: {0}")]
  Operation(String),

  #[error("Test completion callback failed: {0}")]
  Completion(String),
}

pub fn divide(dividend: i32, divisor: i32) -> Result<i32, TestError> {
  dividend.checked_div(divisor).ok_or(TestError::DivideByZero)
}

/// Exception handler recognising divide-by-zero anywhere in the error chain.
pub fn is_divide_by_zero(err: &anyhow::Error) -> bool {
  err
    .chain()
    .any(|cause| cause.downcast_ref::<TestError>() == Some(&TestError::DivideByZero))
}

// --- Log capture ---
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
  PipelineStarted { pipeline_id: String, pipeline_name: String },
  PipelineFinished { pipeline_id: String, pipeline_name: String },
  OperationStarted { pipeline_id: String, operation_name: String },
  OperationFinished { pipeline_id: String, operation_name: String },
}

/// Logger that records every lifecycle event it receives.
#[derive(Debug, Default)]
pub struct RecordingLogger {
  events: Mutex<Vec<LogEvent>>,
}

impl RecordingLogger {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn events(&self) -> Vec<LogEvent> {
    self.events.lock().clone()
  }

  pub fn count(&self) -> usize {
    self.events.lock().len()
  }

  /// Names of the operations that started, in order.
  pub fn started_operations(&self) -> Vec<String> {
    self
      .events
      .lock()
      .iter()
      .filter_map(|event| match event {
        LogEvent::OperationStarted { operation_name, .. } => Some(operation_name.clone()),
        _ => None,
      })
      .collect()
  }

  pub fn finished_operations(&self) -> Vec<String> {
    self
      .events
      .lock()
      .iter()
      .filter_map(|event| match event {
        LogEvent::OperationFinished { operation_name, .. } => Some(operation_name.clone()),
        _ => None,
      })
      .collect()
  }
}

impl PipelineLogger for RecordingLogger {
  fn pipeline_started(&self, pipeline_id: &str, pipeline_name: &str, _at: DateTime<Utc>) {
    self.events.lock().push(LogEvent::PipelineStarted {
      pipeline_id: pipeline_id.to_string(),
      pipeline_name: pipeline_name.to_string(),
    });
  }

  fn pipeline_finished(&self, pipeline_id: &str, pipeline_name: &str, _elapsed: Duration) {
    self.events.lock().push(LogEvent::PipelineFinished {
      pipeline_id: pipeline_id.to_string(),
      pipeline_name: pipeline_name.to_string(),
    });
  }

  fn operation_started(&self, pipeline_id: &str, operation_name: &str, _at: DateTime<Utc>) {
    self.events.lock().push(LogEvent::OperationStarted {
      pipeline_id: pipeline_id.to_string(),
      operation_name: operation_name.to_string(),
    });
  }

  fn operation_finished(&self, pipeline_id: &str, operation_name: &str, _elapsed: Duration) {
    self.events.lock().push(LogEvent::OperationFinished {
      pipeline_id: pipeline_id.to_string(),
      operation_name: operation_name.to_string(),
    });
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Atomic counters for checking execution counts ---
pub static OPERATION_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));
pub static COMPLETION_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  OPERATION_EXEC_COUNTER.store(0, Ordering::SeqCst);
  COMPLETION_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

pub fn operation_count() -> usize {
  OPERATION_EXEC_COUNTER.load(Ordering::SeqCst)
}

pub fn completion_count() -> usize {
  COMPLETION_EXEC_COUNTER.load(Ordering::SeqCst)
}

/// Identity operation on `i32` that bumps the global operation counter.
pub fn counting_identity(x: i32) -> i32 {
  OPERATION_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
  x
}

/// Shared, ordered record of which operations ran.
pub type Trail = Arc<Mutex<Vec<String>>>;

pub fn new_trail() -> Trail {
  Arc::new(Mutex::new(Vec::new()))
}
