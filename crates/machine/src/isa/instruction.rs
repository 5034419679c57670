//! Resolved instructions and their stack-effect contract.
//!
//! An `Instruction` is an opcode together with its operands, fully resolved:
//! labels have already been replaced by addresses. This module also holds the
//! stack-effect table the interpreter consults before executing anything.

use std::fmt;

use super::opcode::{BinaryOp, Opcode, UnaryOp};
use crate::common::Word;

/// A single decoded instruction. Immutable once assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `loadc q`: push the constant `q`.
    LoadC(Word),
    /// `load m`: pop an address, push the `m` cells starting there.
    Load(usize),
    /// `store m`: pop an address, write the `m` cells below it there. The cells stay.
    Store(usize),
    /// `loada a`: push the cell at absolute address `a`.
    LoadA(Word),
    /// `storea a`: write the top cell to absolute address `a`. The cell stays.
    StoreA(Word),
    /// `loadrc j`: push `fp + j`.
    LoadRc(Word),
    /// `loadr j`: push the cell at `fp + j`.
    LoadR(Word),
    /// `storer j`: write the top cell to `fp + j`. The cell stays.
    StoreR(Word),
    /// `pop k`: discard `k` cells.
    Pop(usize),
    /// `dup`: duplicate the top cell.
    Dup,
    /// `slide q m`: discard the `drop` cells lying below the top `keep` cells.
    Slide {
        /// Cells removed.
        drop: usize,
        /// Cells preserved on top.
        keep: usize,
    },
    /// `alloc k`: push `k` zero cells.
    Alloc(usize),
    /// `new`: pop a size, allocate that many heap cells, push their base address.
    New,
    /// Binary operator.
    Binary(BinaryOp),
    /// Unary operator.
    Unary(UnaryOp),
    /// `jump A`.
    Jump(usize),
    /// `jumpz A`: pop; jump if zero.
    JumpZ(usize),
    /// `jumpnz A`: pop; jump if non-zero.
    JumpNz(usize),
    /// `jumpi A`: pop `i`; jump to `A + i`.
    JumpI(usize),
    /// `nop`.
    Nop,
    /// `call A` jumps to `A`; a bare `call` pops its target from the stack.
    Call(Option<usize>),
    /// `enter m`: fail early unless `m` more cells fit on the stack.
    Enter(usize),
    /// `return n`: return to the caller keeping the top `n` cells.
    Return(usize),
    /// `halt c` exits with `c`; a bare `halt` exits with the top cell.
    Halt(Option<Word>),
}

/// Number of cells an instruction consumes and produces.
///
/// The interpreter requires `pops` cells before executing and checks that
/// `depth - pops + pushes` stays within the stack limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackEffect {
    /// Cells that must be present and are consumed.
    pub pops: usize,
    /// Cells produced.
    pub pushes: usize,
}

impl StackEffect {
    const fn new(pops: usize, pushes: usize) -> Self {
        Self { pops, pushes }
    }

    /// Net change in stack depth.
    pub const fn net(self) -> isize {
        self.pushes as isize - self.pops as isize
    }
}

impl Instruction {
    /// Returns the opcode of this instruction.
    pub const fn opcode(self) -> Opcode {
        match self {
            Self::LoadC(_) => Opcode::LoadC,
            Self::Load(_) => Opcode::Load,
            Self::Store(_) => Opcode::Store,
            Self::LoadA(_) => Opcode::LoadA,
            Self::StoreA(_) => Opcode::StoreA,
            Self::LoadRc(_) => Opcode::LoadRc,
            Self::LoadR(_) => Opcode::LoadR,
            Self::StoreR(_) => Opcode::StoreR,
            Self::Pop(_) => Opcode::Pop,
            Self::Dup => Opcode::Dup,
            Self::Slide { .. } => Opcode::Slide,
            Self::Alloc(_) => Opcode::Alloc,
            Self::New => Opcode::New,
            Self::Binary(op) => Opcode::Binary(op),
            Self::Unary(op) => Opcode::Unary(op),
            Self::Jump(_) => Opcode::Jump,
            Self::JumpZ(_) => Opcode::JumpZ,
            Self::JumpNz(_) => Opcode::JumpNz,
            Self::JumpI(_) => Opcode::JumpI,
            Self::Nop => Opcode::Nop,
            Self::Call(_) => Opcode::Call,
            Self::Enter(_) => Opcode::Enter,
            Self::Return(_) => Opcode::Return,
            Self::Halt(_) => Opcode::Halt,
        }
    }

    /// Returns the declared stack effect, or `None` when it depends on the
    /// current frame (`return`).
    pub const fn stack_effect(self) -> Option<StackEffect> {
        let effect = match self {
            Self::LoadC(_) | Self::LoadA(_) | Self::LoadRc(_) | Self::LoadR(_) => {
                StackEffect::new(0, 1)
            }
            Self::Load(m) => StackEffect::new(1, m),
            Self::Store(m) => StackEffect::new(m.saturating_add(1), m),
            Self::StoreA(_) | Self::StoreR(_) | Self::New | Self::Unary(_) => {
                StackEffect::new(1, 1)
            }
            Self::Pop(k) => StackEffect::new(k, 0),
            Self::Dup => StackEffect::new(1, 2),
            Self::Slide { drop, keep } => StackEffect::new(drop.saturating_add(keep), keep),
            Self::Alloc(k) => StackEffect::new(0, k),
            Self::Binary(_) => StackEffect::new(2, 1),
            Self::Jump(_) | Self::Nop | Self::Enter(_) | Self::Halt(Some(_)) => {
                StackEffect::new(0, 0)
            }
            Self::JumpZ(_) | Self::JumpNz(_) | Self::JumpI(_) => StackEffect::new(1, 0),
            Self::Call(Some(_)) => StackEffect::new(0, 2),
            Self::Call(None) => StackEffect::new(1, 2),
            Self::Halt(None) => StackEffect::new(1, 1),
            Self::Return(_) => return None,
        };
        Some(effect)
    }

    /// Returns the static control-flow target, if the instruction has one.
    pub const fn target(self) -> Option<usize> {
        match self {
            Self::Jump(a) | Self::JumpZ(a) | Self::JumpNz(a) | Self::JumpI(a) => Some(a),
            Self::Call(target) => target,
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match *self {
            Self::LoadC(v)
            | Self::LoadA(v)
            | Self::StoreA(v)
            | Self::LoadRc(v)
            | Self::LoadR(v)
            | Self::StoreR(v)
            | Self::Halt(Some(v)) => write!(f, "{mnemonic} {v}"),
            Self::Load(n)
            | Self::Store(n)
            | Self::Pop(n)
            | Self::Alloc(n)
            | Self::Jump(n)
            | Self::JumpZ(n)
            | Self::JumpNz(n)
            | Self::JumpI(n)
            | Self::Call(Some(n))
            | Self::Enter(n)
            | Self::Return(n) => write!(f, "{mnemonic} {n}"),
            Self::Slide { drop, keep } => write!(f, "{mnemonic} {drop} {keep}"),
            Self::Dup
            | Self::New
            | Self::Binary(_)
            | Self::Unary(_)
            | Self::Nop
            | Self::Call(None)
            | Self::Halt(None) => f.write_str(mnemonic),
        }
    }
}
