//! Arithmetic Logic Unit (ALU).
//!
//! Evaluates the C-Machine's binary and unary operators on words. All
//! arithmetic wraps on overflow; the only failing operations are division and
//! modulo by zero.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, Mul, Div, Mod, Neg
//! - [`logic`]:      And, Or, Xor, Not, and the comparisons

/// Integer arithmetic operations.
pub mod arithmetic;

/// Bitwise, logical and comparison operations.
pub mod logic;

use crate::common::{FaultKind, Word};
use crate::isa::{BinaryOp, UnaryOp};

/// Stateless evaluator for operator instructions.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Applies a binary operator.
    ///
    /// # Arguments
    ///
    /// * `op` - The operator.
    /// * `a`  - Left operand (the cell below the top).
    /// * `b`  - Right operand (the top cell).
    ///
    /// # Examples
    ///
    /// ```
    /// use cmavm_core::core::units::alu::Alu;
    /// use cmavm_core::isa::BinaryOp;
    ///
    /// assert_eq!(Alu::binary(BinaryOp::Sub, 10, 3), Ok(7));
    /// assert_eq!(Alu::binary(BinaryOp::Mod, -7, 3), Ok(2));
    /// assert_eq!(Alu::binary(BinaryOp::Leq, 3, 3), Ok(1));
    /// ```
    ///
    /// # Errors
    ///
    /// `FaultKind::ArithmeticError` when `Div` or `Mod` has a zero divisor.
    pub fn binary(op: BinaryOp, a: Word, b: Word) -> Result<Word, FaultKind> {
        let value = match op {
            BinaryOp::Add => arithmetic::add(a, b),
            BinaryOp::Sub => arithmetic::sub(a, b),
            BinaryOp::Mul => arithmetic::mul(a, b),
            BinaryOp::Div => arithmetic::div(a, b)?,
            BinaryOp::Mod => arithmetic::modulo(a, b)?,
            BinaryOp::And => logic::and(a, b),
            BinaryOp::Or => logic::or(a, b),
            BinaryOp::Xor => logic::xor(a, b),
            BinaryOp::Eq => logic::flag(a == b),
            BinaryOp::Neq => logic::flag(a != b),
            BinaryOp::Le => logic::flag(a < b),
            BinaryOp::Leq => logic::flag(a <= b),
            BinaryOp::Gr => logic::flag(a > b),
            BinaryOp::Geq => logic::flag(a >= b),
        };
        Ok(value)
    }

    /// Applies a unary operator. Never fails.
    pub const fn unary(op: UnaryOp, a: Word) -> Word {
        match op {
            UnaryOp::Neg => arithmetic::neg(a),
            UnaryOp::Not => logic::not(a),
        }
    }
}
