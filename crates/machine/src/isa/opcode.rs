//! Opcode catalogue.
//!
//! Every mnemonic the assembler accepts maps to exactly one `Opcode`. The
//! opcode fixes the operand signature used by the assembler and the category
//! used by execution statistics. Binary and unary operators are grouped the
//! way the interpreter dispatches them.

use std::fmt;

use crate::common::Word;

/// Binary operators: pop two operands, push one result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication.
    Mul,
    /// Division truncating toward zero.
    Div,
    /// Floored modulo (result has the sign of the divisor).
    Mod,
    /// Bitwise and.
    And,
    /// Bitwise or.
    Or,
    /// Bitwise exclusive or.
    Xor,
    /// Equal (1 or 0).
    Eq,
    /// Not equal.
    Neq,
    /// Less than.
    Le,
    /// Less than or equal.
    Leq,
    /// Greater than.
    Gr,
    /// Greater than or equal.
    Geq,
}

/// Unary operators: pop one operand, push one result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Wrapping negation.
    Neg,
    /// Logical not: 0 becomes 1, anything else becomes 0.
    Not,
}

/// Operation identifier of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Push a constant.
    LoadC,
    /// Replace an address with the cells it points to.
    Load,
    /// Write cells below the top to the address on top.
    Store,
    /// Push the cell at an absolute address.
    LoadA,
    /// Write the top cell to an absolute address.
    StoreA,
    /// Push a frame-relative address.
    LoadRc,
    /// Push the cell at a frame-relative address.
    LoadR,
    /// Write the top cell to a frame-relative address.
    StoreR,
    /// Discard cells.
    Pop,
    /// Duplicate the top cell.
    Dup,
    /// Discard cells below a preserved result.
    Slide,
    /// Reserve zeroed stack cells.
    Alloc,
    /// Allocate heap cells.
    New,
    /// Two-operand arithmetic, logic, or comparison.
    Binary(BinaryOp),
    /// One-operand arithmetic or logic.
    Unary(UnaryOp),
    /// Unconditional jump.
    Jump,
    /// Jump if the popped value is zero.
    JumpZ,
    /// Jump if the popped value is non-zero.
    JumpNz,
    /// Indexed jump through a table.
    JumpI,
    /// Do nothing.
    Nop,
    /// Push a frame and transfer control.
    Call,
    /// Check that a callee's locals fit on the stack.
    Enter,
    /// Pop the current frame and return to the caller.
    Return,
    /// Stop execution.
    Halt,
}

/// What an operand token may contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    /// Signed integer literal or label (resolved to its address).
    Value,
    /// Instruction address literal or label; must lie inside the program.
    Target,
    /// Signed integer literal.
    Offset,
    /// Non-negative integer literal.
    Count,
}

/// Whether an operand must be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    /// The operand must be present.
    Required,
    /// The operand may be omitted; its absence changes the behaviour.
    Optional,
    /// The operand may be omitted and then takes the given value.
    Defaulted(Word),
}

/// One operand slot of an opcode's signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperandSpec {
    /// Accepted token shape.
    pub kind: OperandKind,
    /// Whether the token may be omitted.
    pub presence: Presence,
}

impl OperandSpec {
    const fn required(kind: OperandKind) -> Self {
        Self {
            kind,
            presence: Presence::Required,
        }
    }

    const fn optional(kind: OperandKind) -> Self {
        Self {
            kind,
            presence: Presence::Optional,
        }
    }

    const fn defaulted(kind: OperandKind, value: Word) -> Self {
        Self {
            kind,
            presence: Presence::Defaulted(value),
        }
    }
}

const NO_OPERANDS: &[OperandSpec] = &[];
const VALUE: &[OperandSpec] = &[OperandSpec::required(OperandKind::Value)];
const OFFSET: &[OperandSpec] = &[OperandSpec::required(OperandKind::Offset)];
const TARGET: &[OperandSpec] = &[OperandSpec::required(OperandKind::Target)];
const COUNT: &[OperandSpec] = &[OperandSpec::required(OperandKind::Count)];
const COUNT_OR_ONE: &[OperandSpec] = &[OperandSpec::defaulted(OperandKind::Count, 1)];
const SLIDE: &[OperandSpec] = &[
    OperandSpec::required(OperandKind::Count),
    OperandSpec::defaulted(OperandKind::Count, 1),
];
const CALL: &[OperandSpec] = &[OperandSpec::optional(OperandKind::Target)];
const RETURN: &[OperandSpec] = &[OperandSpec::defaulted(OperandKind::Count, 0)];
const HALT: &[OperandSpec] = &[OperandSpec::optional(OperandKind::Value)];

/// Broad grouping of opcodes for execution statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Constants and memory traffic (`loadc`, `load*`, `store*`).
    LoadStore,
    /// Arithmetic, logic, comparison.
    Alu,
    /// Jumps.
    Branch,
    /// `call`, `enter`, `return`.
    Call,
    /// `new`.
    Heap,
    /// `pop`, `dup`, `slide`, `alloc`.
    Stack,
    /// `nop`, `halt`.
    Other,
}

impl Opcode {
    /// Every opcode, in listing-manual order.
    pub const ALL: [Self; 38] = [
        Self::LoadC,
        Self::Load,
        Self::Store,
        Self::LoadA,
        Self::StoreA,
        Self::LoadRc,
        Self::LoadR,
        Self::StoreR,
        Self::Pop,
        Self::Dup,
        Self::Slide,
        Self::Alloc,
        Self::New,
        Self::Binary(BinaryOp::Add),
        Self::Binary(BinaryOp::Sub),
        Self::Binary(BinaryOp::Mul),
        Self::Binary(BinaryOp::Div),
        Self::Binary(BinaryOp::Mod),
        Self::Binary(BinaryOp::And),
        Self::Binary(BinaryOp::Or),
        Self::Binary(BinaryOp::Xor),
        Self::Binary(BinaryOp::Eq),
        Self::Binary(BinaryOp::Neq),
        Self::Binary(BinaryOp::Le),
        Self::Binary(BinaryOp::Leq),
        Self::Binary(BinaryOp::Gr),
        Self::Binary(BinaryOp::Geq),
        Self::Unary(UnaryOp::Neg),
        Self::Unary(UnaryOp::Not),
        Self::Jump,
        Self::JumpZ,
        Self::JumpNz,
        Self::JumpI,
        Self::Nop,
        Self::Call,
        Self::Enter,
        Self::Return,
        Self::Halt,
    ];

    /// Returns the canonical (lower-case) mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::LoadC => "loadc",
            Self::Load => "load",
            Self::Store => "store",
            Self::LoadA => "loada",
            Self::StoreA => "storea",
            Self::LoadRc => "loadrc",
            Self::LoadR => "loadr",
            Self::StoreR => "storer",
            Self::Pop => "pop",
            Self::Dup => "dup",
            Self::Slide => "slide",
            Self::Alloc => "alloc",
            Self::New => "new",
            Self::Binary(op) => match op {
                BinaryOp::Add => "add",
                BinaryOp::Sub => "sub",
                BinaryOp::Mul => "mul",
                BinaryOp::Div => "div",
                BinaryOp::Mod => "mod",
                BinaryOp::And => "and",
                BinaryOp::Or => "or",
                BinaryOp::Xor => "xor",
                BinaryOp::Eq => "eq",
                BinaryOp::Neq => "neq",
                BinaryOp::Le => "le",
                BinaryOp::Leq => "leq",
                BinaryOp::Gr => "gr",
                BinaryOp::Geq => "geq",
            },
            Self::Unary(UnaryOp::Neg) => "neg",
            Self::Unary(UnaryOp::Not) => "not",
            Self::Jump => "jump",
            Self::JumpZ => "jumpz",
            Self::JumpNz => "jumpnz",
            Self::JumpI => "jumpi",
            Self::Nop => "nop",
            Self::Call => "call",
            Self::Enter => "enter",
            Self::Return => "return",
            Self::Halt => "halt",
        }
    }

    /// Looks up a mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(text))
    }

    /// Returns the operand signature checked by the assembler.
    pub const fn signature(self) -> &'static [OperandSpec] {
        match self {
            Self::LoadC | Self::LoadA | Self::StoreA => VALUE,
            Self::Load | Self::Store | Self::Pop => COUNT_OR_ONE,
            Self::LoadRc | Self::LoadR | Self::StoreR => OFFSET,
            Self::Slide => SLIDE,
            Self::Alloc | Self::Enter => COUNT,
            Self::Jump | Self::JumpZ | Self::JumpNz | Self::JumpI => TARGET,
            Self::Call => CALL,
            Self::Return => RETURN,
            Self::Halt => HALT,
            Self::Dup | Self::New | Self::Binary(_) | Self::Unary(_) | Self::Nop => NO_OPERANDS,
        }
    }

    /// Returns the statistics category.
    pub const fn category(self) -> Category {
        match self {
            Self::LoadC
            | Self::Load
            | Self::Store
            | Self::LoadA
            | Self::StoreA
            | Self::LoadRc
            | Self::LoadR
            | Self::StoreR => Category::LoadStore,
            Self::Binary(_) | Self::Unary(_) => Category::Alu,
            Self::Jump | Self::JumpZ | Self::JumpNz | Self::JumpI => Category::Branch,
            Self::Call | Self::Enter | Self::Return => Category::Call,
            Self::New => Category::Heap,
            Self::Pop | Self::Dup | Self::Slide | Self::Alloc => Category::Stack,
            Self::Nop | Self::Halt => Category::Other,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
