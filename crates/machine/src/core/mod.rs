//! Core machine implementation.
//!
//! This module contains the C-Machine proper: the run-time state with its
//! single-step executor, and the execution units it delegates operator
//! evaluation to.

/// Machine state, memory access, and instruction execution.
pub mod machine;

/// Execution units (ALU).
pub mod units;

pub use self::machine::{Machine, Status, StepOutcome};
