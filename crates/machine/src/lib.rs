//! C-Machine assembler and interpreter library.
//!
//! This crate implements the C-Machine, a stack-based abstract machine for
//! compiled C-like programs, with the following:
//! 1. **Assembler:** Two-pass translation of instruction listings with labels into programs.
//! 2. **ISA:** The closed opcode catalogue, resolved instructions, stack effects, and a disassembler.
//! 3. **Core:** Machine state (operand stack, heap, pc, fp) and the single-step executor.
//! 4. **Simulation:** File loader, run driver with a step budget, configuration, and statistics.
//!
//! # Example
//!
//! ```
//! use cmavm_core::{MachineConfig, run_source};
//!
//! let code = run_source("loadc 3\nloadc 4\nadd\nhalt\n", &MachineConfig::default()).unwrap();
//! assert_eq!(code, 7);
//! ```

/// Listing assembler (two-pass, label resolution, diagnostics).
pub mod asm;
/// Common types and constants (words, locations, errors, access types).
pub mod common;
/// Machine configuration (limits, step budget, tracing).
pub mod config;
/// Machine core (state, memory, execution, ALU).
pub mod core;
/// Instruction set (opcodes, instructions, programs, disassembler).
pub mod isa;
/// Listing loader and run driver.
pub mod sim;
/// Execution statistics collection and reporting.
pub mod stats;

/// Assembles a listing; see [`asm::assembler::assemble`].
pub use crate::asm::assemble;
/// Crate-wide error and the machine word type.
pub use crate::common::{Error, Word};
/// Machine configuration; use `MachineConfig::default()` or `MachineConfig::from_json`.
pub use crate::config::MachineConfig;
/// Machine state for manual stepping.
pub use crate::core::Machine;
/// An assembled program.
pub use crate::isa::Program;
/// Run driver; construct with `Interpreter::new(program, config)`.
pub use crate::sim::Interpreter;

/// Assembles `source` and runs it to completion.
///
/// # Errors
///
/// `Error::Config` if `config` is invalid, `Error::Parse` if the listing does
/// not assemble, `Error::Fault` if execution faults.
pub fn run_source(source: &str, config: &MachineConfig) -> Result<Word, Error> {
    config.validate()?;
    let program = assemble(source)?;
    let result = Interpreter::new(program, config.clone())?.run()?;
    Ok(result.exit_code)
}
