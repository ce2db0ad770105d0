// relay/src/pipeline/mod.rs

//! Defines the `Pipeline<P, R>` struct, its construction, builder surface, and execution logic.

pub mod background;
pub mod builder;
pub mod definition;
pub mod execution;
pub mod nested;

// Re-export the main Pipeline struct
pub use definition::Pipeline;
