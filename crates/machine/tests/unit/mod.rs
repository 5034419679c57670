//! # Unit Components
//!
//! Organizes the per-module test suites: assembler, instruction set, machine
//! core, run driver, configuration, statistics, and cross-cutting properties.

/// Assembler tests: grammar, label resolution, and error reporting.
pub mod asm;






/// Execution statistics tests.
pub mod stats;
