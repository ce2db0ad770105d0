// relay/src/core/instrument.rs

//! Scoped elapsed-time instrumentation.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Measures the lifetime of a scope.
///
/// The optional start callback fires on construction with the current wall-clock time;
/// the elapsed callback fires exactly once when the timer is dropped, so it runs on every
/// exit path of the enclosing scope, including `?` returns and unwinding.
/// Callbacks are observational only and cannot influence the measured work.
pub struct ScopeTimer<F>
where
  F: FnOnce(Duration),
{
  started: Instant,
  on_elapsed: Option<F>,
}

impl<F> ScopeTimer<F>
where
  F: FnOnce(Duration),
{
  pub fn new(on_elapsed: F) -> Self {
    Self {
      started: Instant::now(),
      on_elapsed: Some(on_elapsed),
    }
  }

  pub fn with_start(on_start: impl FnOnce(DateTime<Utc>), on_elapsed: F) -> Self {
    on_start(Utc::now());
    Self::new(on_elapsed)
  }

  pub fn elapsed(&self) -> Duration {
    self.started.elapsed()
  }
}

impl<F> Drop for ScopeTimer<F>
where
  F: FnOnce(Duration),
{
  fn drop(&mut self) {
    if let Some(on_elapsed) = self.on_elapsed.take() {
      on_elapsed(self.started.elapsed());
    }
  }
}
