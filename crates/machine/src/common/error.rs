//! Error and fault definitions.
//!
//! This module defines the two disjoint error families of the machine, plus the
//! ambient errors around them. It provides:
//! 1. **Parse Errors:** Assembly-time failures; no program is produced.
//! 2. **Runtime Faults:** Execution-time failures; the run stops at the faulting instruction.
//! 3. **Loader and Config Errors:** I/O and configuration failures.
//! 4. **Crate Error:** A single type aggregating all of the above for callers.

use thiserror::Error;

use super::Word;
use super::data::AccessType;
use crate::isa::Instruction;

/// The reason an assembly failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A label was defined on more than one line.
    #[error("label `{0}` is defined more than once")]
    DuplicateLabel(String),

    /// An operand referenced a label that is never defined.
    #[error("label `{0}` is never defined")]
    UnresolvedLabel(String),

    /// The mnemonic does not name any opcode.
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),

    /// Wrong operand count, non-numeric literal, negative count, or an
    /// address outside the program.
    #[error("malformed operand for `{mnemonic}`: {reason}")]
    MalformedOperand {
        /// Mnemonic of the instruction being decoded.
        mnemonic: &'static str,
        /// Human-readable description of what is wrong.
        reason: String,
    },

    /// A label definition whose name is not a valid identifier.
    #[error("invalid label name `{0}`")]
    InvalidLabel(String),
}

/// An assembly failure, located at a 1-based line of the listing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based line number in the listing.
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a parse error for the given line.
    pub const fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// The class of a runtime fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FaultKind {
    /// The instruction needs more operand cells than the stack holds.
    #[error("stack underflow: needs {needed} cells, stack holds {available}")]
    StackUnderflow {
        /// Cells the instruction consumes.
        needed: usize,
        /// Cells on the stack before the instruction.
        available: usize,
    },

    /// The instruction would grow the stack past the configured limit.
    #[error("stack overflow: limit of {limit} cells exceeded")]
    StackOverflow {
        /// Configured maximum stack depth.
        limit: usize,
    },

    /// An address outside the live stack and heap was dereferenced.
    #[error("invalid memory {access} at address {address}")]
    InvalidMemoryAccess {
        /// The offending word address.
        address: Word,
        /// Whether the access was a read or a write.
        access: AccessType,
    },

    /// Division or modulo by zero.
    #[error("division by zero")]
    ArithmeticError,

    /// Control transferred (or fell) outside `[0, program length)`.
    #[error("jump target {target} outside program of {len} instructions")]
    InvalidJumpTarget {
        /// The computed target address.
        target: i64,
        /// Number of instructions in the program.
        len: usize,
    },

    /// `return` executed with no active call frame.
    #[error("return without an active call frame")]
    UnbalancedReturn,

    /// `new` requested more cells than the heap limit leaves.
    #[error("heap exhausted: requested {requested} cells, {available} available")]
    HeapExhausted {
        /// Cells requested.
        requested: usize,
        /// Cells still available under the heap limit.
        available: usize,
    },

    /// `new` was given a negative size.
    #[error("invalid heap allocation of {size} cells")]
    InvalidAllocation {
        /// The requested size.
        size: Word,
    },

    /// The run exceeded the caller's step budget.
    #[error("execution budget of {limit} steps exceeded")]
    ExecutionBudgetExceeded {
        /// The configured budget.
        limit: u64,
    },
}

/// A fatal runtime condition together with the context it occurred in.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at pc {pc}{} (stack depth {stack_depth})", describe(.instruction.as_ref()))]
pub struct RuntimeFault {
    /// What went wrong.
    pub kind: FaultKind,
    /// Address of the faulting instruction.
    pub pc: usize,
    /// The faulting instruction, if one could be fetched.
    pub instruction: Option<Instruction>,
    /// Operand stack depth when the instruction started.
    pub stack_depth: usize,
}

fn describe(instruction: Option<&Instruction>) -> String {
    instruction.map_or_else(String::new, |inst| format!(" `{inst}`"))
}

/// Failure to turn a listing file into a program.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read `{path}`: {source}")]
    Io {
        /// Path as given by the caller.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file was read but does not assemble.
    #[error("{path}: {error}")]
    Parse {
        /// Path as given by the caller.
        path: String,
        /// The assembly failure.
        #[source]
        error: ParseError,
    },
}

/// Invalid machine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be deserialised.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A zero stack limit leaves no room for any operand.
    #[error("stack limit must be at least one cell")]
    EmptyStack,

    /// The heap base lies inside the addressable stack region.
    #[error("heap base {heap_base} overlaps the stack region of {stack_limit} cells")]
    HeapOverlapsStack {
        /// Configured heap base.
        heap_base: Word,
        /// Configured stack limit.
        stack_limit: usize,
    },

    /// Heap addresses would not fit in a machine word.
    #[error("heap of {heap_limit} cells at base {heap_base} exceeds the word address space")]
    HeapOutOfRange {
        /// Configured heap base.
        heap_base: Word,
        /// Configured heap limit.
        heap_limit: usize,
    },
}

/// Any error the machine can report to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Assembly failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Execution faulted.
    #[error(transparent)]
    Fault(#[from] RuntimeFault),

    /// Reading a listing failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
