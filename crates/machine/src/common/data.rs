//! Memory Access Types.
//!
//! This module defines the classification of memory accesses performed by
//! the interpreter. The access type is recorded in `InvalidMemoryAccess`
//! faults so a report says whether the program tried to read or write.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Data read (`load`, `loada`, `loadr`).
    Read,

    /// Data write (`store`, `storea`, `storer`).
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}
