//! Instruction Execution.
//!
//! This module implements the single-step contract of the machine. Each call
//! to [`Machine::step`] performs the following:
//! 1. **Freeze Check:** A halted or faulted machine returns its outcome unchanged.
//! 2. **Fetch:** The instruction at `pc`; a `pc` outside the program is a fault.
//! 3. **Stack-Effect Check:** Underflow and overflow are detected before any state changes.
//! 4. **Execute:** `pc` advances, then the instruction's effect is applied.
//!    All checks precede the first write to the stack or heap; a faulting
//!    instruction changes nothing but the machine's status.
//! 5. **Accounting:** Statistics and optional per-instruction tracing.

use tracing::trace;

use super::{Machine, Status, StepOutcome};
use crate::common::constants::{FRAME_CELLS, SAVED_FP_OFFSET};
use crate::common::{AccessType, FaultKind, RuntimeFault, Word};
use crate::core::units::alu::Alu;
use crate::isa::{Instruction, Program};

impl Machine {
    /// Executes exactly one instruction of `program`.
    ///
    /// # Returns
    ///
    /// `StepOutcome::Continue` after an ordinary instruction,
    /// `StepOutcome::Halted(code)` once the machine has halted (including on
    /// every call after that).
    ///
    /// # Errors
    ///
    /// The `RuntimeFault` that stopped the machine. A faulted machine returns
    /// the same fault on every later call and executes nothing.
    pub fn step(&mut self, program: &Program) -> Result<StepOutcome, RuntimeFault> {
        match &self.status {
            Status::Halted(code) => return Ok(StepOutcome::Halted(*code)),
            Status::Faulted(fault) => return Err(fault.clone()),
            Status::Ready | Status::Running => self.status = Status::Running,
        }

        let pc = self.pc;
        let depth = self.stack.len();
        let Some(inst) = program.fetch(pc) else {
            return Err(self.fail(
                FaultKind::InvalidJumpTarget {
                    target: pc as i64,
                    len: program.len(),
                },
                None,
                depth,
            ));
        };

        if self.config.trace_instructions {
            trace!(pc, fp = self.fp, depth, "{inst}");
        }

        if let Err(kind) = self.check_stack_effect(inst) {
            return Err(self.fail(kind, Some(inst), depth));
        }

        self.pc = pc + 1;
        match self.execute(inst, program.len()) {
            Ok(outcome) => {
                self.stats.record(inst.opcode().category());
                self.stats.observe_depths(self.stack.len(), self.call_depth);
                if let StepOutcome::Halted(code) = outcome {
                    self.status = Status::Halted(code);
                }
                Ok(outcome)
            }
            Err(kind) => {
                self.pc = pc;
                Err(self.fail(kind, Some(inst), depth))
            }
        }
    }

    /// Freezes the machine with a fault raised by the instruction at `pc`.
    fn fail(&mut self, kind: FaultKind, instruction: Option<Instruction>, depth: usize) -> RuntimeFault {
        let fault = RuntimeFault {
            kind,
            pc: self.pc,
            instruction,
            stack_depth: depth,
        };
        self.status = Status::Faulted(fault.clone());
        fault
    }

    /// Consults the stack-effect table before anything is executed.
    fn check_stack_effect(&self, inst: Instruction) -> Result<(), FaultKind> {
        let Some(effect) = inst.stack_effect() else {
            return Ok(());
        };
        let depth = self.stack.len();
        if depth < effect.pops {
            return Err(FaultKind::StackUnderflow {
                needed: effect.pops,
                available: depth,
            });
        }
        let after = (depth - effect.pops).saturating_add(effect.pushes);
        if after > self.config.stack_limit {
            return Err(FaultKind::StackOverflow {
                limit: self.config.stack_limit,
            });
        }
        Ok(())
    }

    /// Transfers control to a computed target.
    fn jump_to(&mut self, target: i64, len: usize) -> Result<(), FaultKind> {
        match usize::try_from(target) {
            Ok(addr) if addr < len => {
                self.pc = addr;
                Ok(())
            }
            _ => Err(FaultKind::InvalidJumpTarget { target, len }),
        }
    }

    /// Address `fp + offset`.
    const fn frame_address(&self, offset: Word) -> Word {
        self.fp.wrapping_add(offset)
    }

    /// Applies the effect of `inst`. `self.pc` already points past it.
    fn execute(&mut self, inst: Instruction, len: usize) -> Result<StepOutcome, FaultKind> {
        match inst {
            Instruction::LoadC(q) => self.push(q),
            Instruction::Load(m) => {
                let base = self.peek()?;
                let live = self.stack.len() - 1;
                let cells = (0..m)
                    .map(|i| self.read_below(base.wrapping_add(i as Word), live))
                    .collect::<Result<Vec<_>, _>>()?;
                self.discard(1);
                self.stack.extend(cells);
            }
            Instruction::Store(m) => {
                let base = self.peek()?;
                let live = self.stack.len() - 1;
                let targets = (0..m)
                    .map(|i| self.resolve_below(base.wrapping_add(i as Word), AccessType::Write, live))
                    .collect::<Result<Vec<_>, _>>()?;
                let values = self.peek_many(m + 1)?[..m].to_vec();
                self.discard(1);
                for (location, value) in targets.into_iter().zip(values) {
                    self.write_at(location, value);
                }
            }
            Instruction::LoadA(addr) => {
                let value = self.read(addr)?;
                self.push(value);
            }
            Instruction::StoreA(addr) => {
                let value = self.peek()?;
                self.write(addr, value)?;
            }
            Instruction::LoadRc(offset) => self.push(self.frame_address(offset)),
            Instruction::LoadR(offset) => {
                let value = self.read(self.frame_address(offset))?;
                self.push(value);
            }
            Instruction::StoreR(offset) => {
                let value = self.peek()?;
                self.write(self.frame_address(offset), value)?;
            }
            Instruction::Pop(k) => self.drop_cells(k)?,
            Instruction::Dup => {
                let value = self.peek()?;
                self.push(value);
            }
            Instruction::Slide { drop, keep } => self.drop_below(drop, keep)?,
            Instruction::Alloc(k) => self.push_zeros(k),
            Instruction::New => {
                let size = self.peek()?;
                let base = self.allocate(size)?;
                self.replace_top(1, base);
            }
            Instruction::Binary(op) => {
                let operands = self.peek_many(2)?;
                let value = Alu::binary(op, operands[0], operands[1])?;
                self.replace_top(2, value);
            }
            Instruction::Unary(op) => {
                let a = self.peek()?;
                self.replace_top(1, Alu::unary(op, a));
            }
            Instruction::Jump(target) => self.jump_to(target as i64, len)?,
            Instruction::JumpZ(target) => {
                if self.peek()? == 0 {
                    self.jump_to(target as i64, len)?;
                }
                self.discard(1);
            }
            Instruction::JumpNz(target) => {
                if self.peek()? != 0 {
                    self.jump_to(target as i64, len)?;
                }
                self.discard(1);
            }
            Instruction::JumpI(base) => {
                let index = self.peek()?;
                self.jump_to(base as i64 + i64::from(index), len)?;
                self.discard(1);
            }
            Instruction::Nop => {}
            Instruction::Call(target) => self.call(target, len)?,
            Instruction::Enter(m) => {
                if self.stack.len().saturating_add(m) > self.config.stack_limit {
                    return Err(FaultKind::StackOverflow {
                        limit: self.config.stack_limit,
                    });
                }
            }
            Instruction::Return(n) => self.ret(n, len)?,
            Instruction::Halt(code) => {
                let code = match code {
                    Some(code) => code,
                    None => self.peek()?,
                };
                return Ok(StepOutcome::Halted(code));
            }
        }
        Ok(StepOutcome::Continue)
    }

    /// Pushes a frame (saved fp, return address) and enters the callee.
    fn call(&mut self, target: Option<usize>, len: usize) -> Result<(), FaultKind> {
        let return_addr = self.pc;
        let return_cell = Word::try_from(return_addr).map_err(|_| FaultKind::InvalidJumpTarget {
            target: return_addr as i64,
            len,
        })?;
        match target {
            Some(addr) => self.jump_to(addr as i64, len)?,
            None => {
                let target = self.peek()?;
                self.jump_to(i64::from(target), len)?;
                self.discard(1);
            }
        }

        self.push(self.fp);
        self.push(return_cell);
        self.fp = (self.stack.len() - 1) as Word;
        self.call_depth += 1;
        self.stats.calls += 1;
        Ok(())
    }

    /// Pops the current frame, keeping the top `keep` cells as the result.
    fn ret(&mut self, keep: usize, len: usize) -> Result<(), FaultKind> {
        if self.call_depth == 0 {
            return Err(FaultKind::UnbalancedReturn);
        }

        let depth = self.stack.len();
        let frame_top = usize::try_from(self.fp).map_or(depth + 1, |fp| fp + 1);
        let available = depth.saturating_sub(frame_top);
        if frame_top < FRAME_CELLS || depth < frame_top || available < keep {
            return Err(FaultKind::StackUnderflow {
                needed: keep,
                available,
            });
        }

        let return_cell = frame_top - 1;
        let return_addr = self.stack[return_cell];
        let saved_fp = self.read(self.frame_address(SAVED_FP_OFFSET))?;
        self.jump_to(i64::from(return_addr), len)?;

        let kept = self.pop_many(keep)?;
        self.truncate_stack(frame_top - FRAME_CELLS);
        self.stack.extend(kept);
        self.fp = saved_fp;
        self.call_depth -= 1;
        self.stats.returns += 1;
        Ok(())
    }
}
