// src/lib.rs

//! Relay: composes independently-typed operations into ordered pipelines.
//!
//! Relay lets you sequence heterogeneous steps (parse -> validate -> transform -> persist)
//! without forcing them onto one static signature, with features like:
//!  - Operations of arbitrary input/output types stored in one ordered list.
//!  - Conditional skipping of operations through executability predicates.
//!  - Per-operation error recovery through exception handlers.
//!  - Early exit with an explicit result.
//!  - Nesting whole pipelines as single operations of another pipeline.
//!  - Blocking execution, or background execution with cooperative cancellation.
//!  - Start/elapsed instrumentation of runs and operations through a pluggable logger.

pub mod core;
pub mod error;
pub mod pipeline;

// --- Re-exports for the Public API ---

pub use crate::core::control::{ErasedResultFactory, RunControl};
pub use crate::core::erased::{AnyValue, ErasedOperation, ErasedRecovery};
pub use crate::core::instrument::ScopeTimer;
pub use crate::core::logger::{PipelineLogger, TracingLogger};
pub use crate::core::operation::{Operation, Recovery};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{RelayError, RelayResult};

// Cancellation signal accepted by `Pipeline::run_async`.
pub use tokio_util::sync::CancellationToken;

/*
    Core Workflow:
    1. Create a `Pipeline<P, R>`; `P` is what you pass to `run`, `R` what you get back.
    2. Append operations in execution order with `.add_fn()`, `.add_map()` or
       `.add_operation(Operation::new(..).named(..).on_exception(..))`.
       Each operation's input type must match the previous operation's output type.
    3. Optionally:
       - guard operations with predicates (`.add_conditional_fn()`, `Operation::when`),
       - add exit points (`.add_conditional_exit()`),
       - nest other pipelines (`.add_pipeline(Arc::new(sub))`),
       - override the next run's result (`.set_result()`).
    4. Call `pipeline.run(param)` or `pipeline.run_async(param, Some(token)).await`.
*/
