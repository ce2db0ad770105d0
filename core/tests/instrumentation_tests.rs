// tests/instrumentation_tests.rs
mod common;

use common::*;
use relay::{Pipeline, ScopeTimer, TracingLogger};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;

#[test]
fn test_scope_timer_reports_start_then_elapsed_once() {
  let starts = AtomicUsize::new(0);
  let ends = AtomicUsize::new(0);

  {
    let timer = ScopeTimer::with_start(
      |_| {
        starts.fetch_add(1, Ordering::SeqCst);
      },
      |_: Duration| {
        ends.fetch_add(1, Ordering::SeqCst);
      },
    );
    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert_eq!(ends.load(Ordering::SeqCst), 0);
    let _ = timer.elapsed();
  }

  assert_eq!(starts.load(Ordering::SeqCst), 1);
  assert_eq!(ends.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scope_timer_fires_on_early_return() {
  let ends = AtomicUsize::new(0);

  fn fallible(ends: &AtomicUsize) -> Result<(), TestError> {
    let _timer = ScopeTimer::new(|_: Duration| {
      ends.fetch_add(1, Ordering::SeqCst);
    });
    divide(1, 0)?;
    Ok(())
  }

  assert!(fallible(&ends).is_err());
  assert_eq!(ends.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scope_timer_measures_elapsed_time() {
  let measured = Arc::new(parking_lot::Mutex::new(Duration::ZERO));
  let sink = measured.clone();

  {
    let _timer = ScopeTimer::new(move |elapsed: Duration| *sink.lock() = elapsed);
    std::thread::sleep(Duration::from_millis(20));
  }

  assert!(*measured.lock() >= Duration::from_millis(20));
}

#[test]
fn test_tracing_logger_does_not_affect_results() {
  setup_tracing();
  let mut pipeline = Pipeline::<String, i32>::with_logger(Arc::new(TracingLogger)).named("traced");
  pipeline
    .add_fn(|input: String| input.parse::<i32>())
    .add_map(|x: i32| x + 5);

  assert_eq!(pipeline.run("50".to_string()).unwrap(), Some(55));
}
