//! Interpreter: drives a fresh machine through a program.
//!
//! The interpreter owns an immutable program and a configuration. Every run
//! builds a new `Machine`, so running the same interpreter twice produces the
//! same exit code or the same fault.

use tracing::{debug, warn};

use crate::common::{ConfigError, FaultKind, RuntimeFault, Word};
use crate::config::MachineConfig;
use crate::core::{Machine, StepOutcome};
use crate::isa::Program;
use crate::stats::ExecStats;

/// Result of a run that halted.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    /// The exit code passed to (or found on top of the stack at) `halt`.
    pub exit_code: Word,
    /// Statistics collected during the run.
    pub stats: ExecStats,
}

/// Outcome of a run together with its statistics, whether it halted or faulted.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Exit code, or the fault that stopped the run.
    pub outcome: Result<Word, RuntimeFault>,
    /// Statistics collected up to the end of the run.
    pub stats: ExecStats,
}

/// Runs programs to completion under a fixed configuration.
#[derive(Clone, Debug)]
pub struct Interpreter {
    program: Program,
    config: MachineConfig,
}

impl Interpreter {
    /// Creates an interpreter for `program`.
    ///
    /// # Errors
    ///
    /// The `ConfigError` from [`MachineConfig::validate`]; no run can start
    /// under an invalid configuration.
    pub fn new(program: Program, config: MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { program, config })
    }

    /// The program this interpreter runs.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// The configuration every run uses.
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Builds a fresh machine for manual stepping.
    pub fn machine(&self) -> Machine {
        Machine::with_validated(self.config.clone())
    }

    /// Runs the program until it halts or faults.
    ///
    /// # Errors
    ///
    /// The `RuntimeFault` that stopped execution, including
    /// `ExecutionBudgetExceeded` when `max_steps` is set and reached.
    pub fn run(&self) -> Result<ExecutionResult, RuntimeFault> {
        let report = self.run_with_stats();
        report.outcome.map(|exit_code| ExecutionResult {
            exit_code,
            stats: report.stats,
        })
    }

    /// Runs the program and returns its statistics even if it faults.
    pub fn run_with_stats(&self) -> RunReport {
        let mut machine = self.machine();
        debug!(
            instructions = self.program.len(),
            stack_limit = self.config.stack_limit,
            heap_limit = self.config.heap_limit,
            "starting run"
        );

        let outcome = loop {
            if let Some(limit) = self.config.max_steps {
                if machine.stats.steps >= limit {
                    break Err(machine.abort(FaultKind::ExecutionBudgetExceeded { limit }, &self.program));
                }
            }
            match machine.step(&self.program) {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Halted(code)) => break Ok(code),
                Err(fault) => break Err(fault),
            }
        };

        match &outcome {
            Ok(code) => debug!(exit_code = code, steps = machine.stats.steps, "run halted"),
            Err(fault) => warn!(%fault, steps = machine.stats.steps, "run faulted"),
        }

        RunReport {
            outcome,
            stats: machine.stats,
        }
    }
}
