pub mod control;
pub mod erased;
pub mod instrument;
pub mod logger;
pub mod operation;

// Re-export key types for easier access from other relay modules (and lib.rs)
pub use control::RunControl;
pub use erased::{AnyValue, ErasedOperation};
pub use instrument::ScopeTimer;
pub use logger::{PipelineLogger, TracingLogger};
pub use operation::{Operation, Recovery};
