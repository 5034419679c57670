//! Execution units.
//!
//! Functional components the machine delegates to while executing an
//! instruction.

/// Arithmetic Logic Unit for operator instructions.
pub mod alu;
