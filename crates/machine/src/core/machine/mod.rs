//! Machine State Definition.
//!
//! This module defines the `Machine` structure, which holds the complete
//! run-time state of one C-Machine execution. It coordinates the following:
//! 1. **Operand Stack:** The word cells below the stack limit, addressed from 0.
//! 2. **Heap:** Cells allocated by `new`, addressed from the configured heap base.
//! 3. **Control Registers:** Program counter, frame pointer, and call depth.
//! 4. **Status:** The `Ready → Running → {Halted, Faulted}` lifecycle.
//!
//! A `Machine` never outlives one run. The interpreter builds a fresh one for
//! every execution, which is what makes repeated runs deterministic.

/// Instruction dispatch and the single-step contract.
pub mod execution;

/// Stack and heap access with bounds checks.
pub mod memory;

use crate::common::constants::INITIAL_FP;
use crate::common::{ConfigError, FaultKind, RuntimeFault, Word};
use crate::config::MachineConfig;
use crate::isa::Program;
use crate::stats::ExecStats;

/// Lifecycle of a machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// Constructed, no instruction executed yet.
    Ready,
    /// At least one instruction executed, not yet terminated.
    Running,
    /// Stopped by `halt` with the given exit code.
    Halted(Word),
    /// Stopped by a runtime fault.
    Faulted(RuntimeFault),
}

impl Status {
    /// Returns `true` once the machine has halted or faulted.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Halted(_) | Self::Faulted(_))
    }
}

/// Outcome of a successful step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction executed and the machine can continue.
    Continue,
    /// The machine has halted with the given exit code.
    Halted(Word),
}

/// Complete run-time state of one execution.
#[derive(Debug)]
pub struct Machine {
    /// Operand stack; index 0 is the bottom cell.
    stack: Vec<Word>,
    /// Heap cells allocated so far; index 0 lives at `config.heap_base`.
    heap: Vec<Word>,
    /// Address of the next instruction.
    pc: usize,
    /// Stack address of the current frame's return-address cell.
    fp: Word,
    /// Number of active call frames.
    call_depth: usize,
    status: Status,
    config: MachineConfig,
    /// Execution statistics for this run.
    pub stats: ExecStats,
}

impl Machine {
    /// Creates a machine in the `Ready` state with an empty stack and heap.
    ///
    /// # Errors
    ///
    /// The `ConfigError` from [`MachineConfig::validate`]. Address resolution
    /// relies on the heap lying above every stack address.
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_validated(config))
    }

    /// Creates a machine from a configuration that has already been validated.
    pub(crate) fn with_validated(config: MachineConfig) -> Self {
        Self {
            stack: Vec::new(),
            heap: Vec::new(),
            pc: 0,
            fp: INITIAL_FP,
            call_depth: 0,
            status: Status::Ready,
            config,
            stats: ExecStats::default(),
        }
    }

    /// Address of the next instruction to execute.
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Current frame pointer.
    pub const fn fp(&self) -> Word {
        self.fp
    }

    /// Number of active call frames.
    pub const fn call_depth(&self) -> usize {
        self.call_depth
    }

    /// Current operand stack depth in cells.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[Word] {
        &self.stack
    }

    /// The allocated heap cells, lowest address first.
    pub fn heap(&self) -> &[Word] {
        &self.heap
    }

    /// The current lifecycle state.
    pub const fn status(&self) -> &Status {
        &self.status
    }

    /// The configuration this machine runs under.
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Stops the machine with a fault raised outside instruction execution,
    /// such as an exhausted step budget.
    ///
    /// The fault is attributed to the instruction at the current `pc`. A
    /// machine that has already faulted keeps its first fault and returns it.
    pub fn abort(&mut self, kind: FaultKind, program: &Program) -> RuntimeFault {
        if let Status::Faulted(existing) = &self.status {
            return existing.clone();
        }
        let fault = RuntimeFault {
            kind,
            pc: self.pc,
            instruction: program.fetch(self.pc),
            stack_depth: self.stack.len(),
        };
        self.status = Status::Faulted(fault.clone());
        fault
    }
}
