//! Instruction Set Definitions.
//!
//! Contains the closed opcode catalogue of the C-Machine, the resolved
//! instruction type with its stack-effect contract, the assembled program
//! container, and a disassembler.

/// Program disassembler for listings and diagnostics.
pub mod disasm;

/// Resolved instructions and the stack-effect table.
pub mod instruction;

/// Opcodes, mnemonics, operand signatures, and categories.
pub mod opcode;

/// Assembled program container.
pub mod program;

pub use instruction::{Instruction, StackEffect};
pub use opcode::{BinaryOp, Category, Opcode, OperandKind, OperandSpec, Presence, UnaryOp};
pub use program::Program;
