//! Word address resolution.
//!
//! The machine has one signed address space split into two regions. Stack
//! addresses start at zero and cover the live stack; heap addresses start at
//! the configured heap base and cover the cells allocated so far. Everything
//! else is invalid. This module defines the resolved form of an address.

/// A word address resolved into the region that backs it.
///
/// Produced by the machine's bounds check; holding a `Location` means the
/// index was in range at the time it was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// Index into the operand stack (0 is the bottom cell).
    Stack(usize),
    /// Index into the heap (0 is the first allocated cell).
    Heap(usize),
}
