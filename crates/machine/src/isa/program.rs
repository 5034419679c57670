//! Assembled programs.
//!
//! A `Program` is an ordered sequence of resolved instructions; the index of
//! an instruction is its address. Programs produced by the assembler have every
//! static control-flow target inside `[0, len)`. Programs built directly from
//! instructions carry no such guarantee, which is why the interpreter checks
//! every transfer of control at run time.

use std::fmt;

use super::Instruction;

/// An executable program. Never mutated after construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Wraps an instruction sequence.
    pub const fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Fetches the instruction at `pc`, if it is in range.
    #[inline]
    pub fn fetch(&self, pc: usize) -> Option<Instruction> {
        self.instructions.get(pc).copied()
    }

    /// Returns the instructions as a slice.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterates over the instructions in address order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Writes the program as a listing with numeric targets, one instruction per
/// line. The output assembles back to an identical program.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.instructions {
            writeln!(f, "{inst}")?;
        }
        Ok(())
    }
}
