//! Program loading and run orchestration.
//!
//! Provides the file loader that turns listings on disk into programs, and
//! the interpreter that drives a fresh machine through a program to
//! completion.

/// Run driver: fresh machine per run, step budget, statistics.
pub mod interpreter;

/// Listing file loader.
pub mod loader;

pub use interpreter::{ExecutionResult, Interpreter, RunReport};
