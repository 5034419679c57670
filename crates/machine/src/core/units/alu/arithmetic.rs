//! Integer arithmetic.
//!
//! Wrapping two's-complement semantics throughout. `div` truncates toward
//! zero; `modulo` is floored, so a non-zero result has the sign of the divisor.

use crate::common::{FaultKind, Word};

/// Wrapping addition.
#[inline]
pub const fn add(a: Word, b: Word) -> Word {
    a.wrapping_add(b)
}

/// Wrapping subtraction.
#[inline]
pub const fn sub(a: Word, b: Word) -> Word {
    a.wrapping_sub(b)
}

/// Wrapping multiplication.
#[inline]
pub const fn mul(a: Word, b: Word) -> Word {
    a.wrapping_mul(b)
}

/// Truncating division. `Word::MIN / -1` wraps to `Word::MIN`.
pub const fn div(a: Word, b: Word) -> Result<Word, FaultKind> {
    if b == 0 {
        return Err(FaultKind::ArithmeticError);
    }
    Ok(a.wrapping_div(b))
}

/// Floored modulo.
pub const fn modulo(a: Word, b: Word) -> Result<Word, FaultKind> {
    if b == 0 {
        return Err(FaultKind::ArithmeticError);
    }
    let r = a.wrapping_rem(b);
    if r != 0 && (r ^ b) < 0 {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

/// Wrapping negation.
#[inline]
pub const fn neg(a: Word) -> Word {
    a.wrapping_neg()
}
