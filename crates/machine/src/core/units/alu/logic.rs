//! Bitwise, logical and comparison operations.

use crate::common::Word;

/// Bitwise and.
#[inline]
pub const fn and(a: Word, b: Word) -> Word {
    a & b
}

/// Bitwise or.
#[inline]
pub const fn or(a: Word, b: Word) -> Word {
    a | b
}

/// Bitwise exclusive or.
#[inline]
pub const fn xor(a: Word, b: Word) -> Word {
    a ^ b
}

/// Logical not: 0 becomes 1, anything else becomes 0.
#[inline]
pub const fn not(a: Word) -> Word {
    flag(a == 0)
}

/// Encodes a truth value as a word.
#[inline]
pub const fn flag(cond: bool) -> Word {
    cond as Word
}
