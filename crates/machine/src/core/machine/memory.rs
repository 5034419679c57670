//! Memory Access Helpers.
//!
//! This module provides the interface between instruction execution and the
//! machine's two storage regions. It performs the following:
//! 1. **Address Resolution:** Maps a word address to a live stack or heap cell.
//! 2. **Bounds Checking:** Rejects every address outside both regions.
//! 3. **Stack Primitives:** Push, pop and peek on the operand stack.
//! 4. **Heap Allocation:** Bump allocation of zeroed cells under the heap limit.

use super::Machine;
use crate::common::{AccessType, FaultKind, Location, Word};

impl Machine {
    /// Resolves a word address to the cell that backs it.
    ///
    /// Stack addresses are `0..depth`; heap addresses are
    /// `heap_base..heap_base + allocated`. Cells above the current stack top
    /// are not addressable.
    ///
    /// # Arguments
    ///
    /// * `addr` - The word address.
    /// * `access` - Whether the caller intends to read or write, for the fault report.
    pub fn resolve(&self, addr: Word, access: AccessType) -> Result<Location, FaultKind> {
        self.resolve_below(addr, access, self.stack.len())
    }

    /// Resolves `addr` as if only the bottom `live` stack cells existed.
    ///
    /// `load` and `store` resolve against the stack without their address
    /// operand, before that operand is popped.
    pub(crate) fn resolve_below(
        &self,
        addr: Word,
        access: AccessType,
        live: usize,
    ) -> Result<Location, FaultKind> {
        let invalid = FaultKind::InvalidMemoryAccess {
            address: addr,
            access,
        };

        if let Ok(idx) = usize::try_from(addr) {
            if idx < live.min(self.stack.len()) {
                return Ok(Location::Stack(idx));
            }
        }

        let offset = i64::from(addr) - i64::from(self.config.heap_base);
        match usize::try_from(offset) {
            Ok(idx) if idx < self.heap.len() => Ok(Location::Heap(idx)),
            _ => Err(invalid),
        }
    }

    /// Reads the cell at `addr`.
    pub fn read(&self, addr: Word) -> Result<Word, FaultKind> {
        self.read_below(addr, self.stack.len())
    }

    /// Reads the cell at `addr`, seeing only the bottom `live` stack cells.
    pub(crate) fn read_below(&self, addr: Word, live: usize) -> Result<Word, FaultKind> {
        let value = match self.resolve_below(addr, AccessType::Read, live)? {
            Location::Stack(idx) => self.stack[idx],
            Location::Heap(idx) => self.heap[idx],
        };
        Ok(value)
    }

    /// Writes `value` to the cell at `addr`.
    pub fn write(&mut self, addr: Word, value: Word) -> Result<(), FaultKind> {
        let location = self.resolve(addr, AccessType::Write)?;
        self.write_at(location, value);
        Ok(())
    }

    /// Writes `value` to a cell that has already been resolved.
    pub(crate) fn write_at(&mut self, location: Location, value: Word) {
        match location {
            Location::Stack(idx) => self.stack[idx] = value,
            Location::Heap(idx) => self.heap[idx] = value,
        }
    }

    /// Pushes a word. Capacity is checked against the stack limit before an
    /// instruction executes, not here.
    #[inline]
    pub(crate) fn push(&mut self, value: Word) {
        self.stack.push(value);
    }

    /// Returns the top word without removing it.
    #[inline]
    pub(crate) fn peek(&self) -> Result<Word, FaultKind> {
        self.stack.last().copied().ok_or(FaultKind::StackUnderflow {
            needed: 1,
            available: 0,
        })
    }

    /// Returns the top `n` cells, bottom first, without removing them.
    pub(crate) fn peek_many(&self, n: usize) -> Result<&[Word], FaultKind> {
        let depth = self.stack.len();
        depth
            .checked_sub(n)
            .map(|start| &self.stack[start..])
            .ok_or(FaultKind::StackUnderflow {
                needed: n,
                available: depth,
            })
    }

    /// Removes and returns the top `n` cells, bottom first.
    pub(crate) fn pop_many(&mut self, n: usize) -> Result<Vec<Word>, FaultKind> {
        let _ = self.peek_many(n)?;
        Ok(self.stack.split_off(self.stack.len() - n))
    }

    /// Drops the top `n` cells.
    pub(crate) fn drop_cells(&mut self, n: usize) -> Result<(), FaultKind> {
        let _ = self.peek_many(n)?;
        self.discard(n);
        Ok(())
    }

    /// Drops the `n` cells below the top `keep` cells.
    pub(crate) fn drop_below(&mut self, n: usize, keep: usize) -> Result<(), FaultKind> {
        let _ = self.peek_many(n + keep)?;
        let end = self.stack.len() - keep;
        self.stack.copy_within(end.., end - n);
        self.discard(n);
        Ok(())
    }

    /// Drops up to `n` cells from the top. Callers have already checked the depth.
    pub(crate) fn discard(&mut self, n: usize) {
        self.stack.truncate(self.stack.len().saturating_sub(n));
    }

    /// Replaces the top `n` cells with `value`.
    pub(crate) fn replace_top(&mut self, n: usize, value: Word) {
        self.discard(n);
        self.stack.push(value);
    }

    /// Pushes `n` zero cells.
    pub(crate) fn push_zeros(&mut self, n: usize) {
        self.stack.resize(self.stack.len() + n, 0);
    }

    /// Truncates the stack to `depth` cells.
    pub(crate) fn truncate_stack(&mut self, depth: usize) {
        self.stack.truncate(depth);
    }

    /// Allocates `size` zeroed heap cells and returns the address of the first.
    ///
    /// # Errors
    ///
    /// * `InvalidAllocation` if `size` is negative.
    /// * `HeapExhausted` if fewer than `size` cells remain under the heap limit.
    pub fn allocate(&mut self, size: Word) -> Result<Word, FaultKind> {
        let requested =
            usize::try_from(size).map_err(|_| FaultKind::InvalidAllocation { size })?;
        let available = self.config.heap_limit.saturating_sub(self.heap.len());
        let exhausted = FaultKind::HeapExhausted {
            requested,
            available,
        };
        if requested > available {
            return Err(exhausted);
        }

        let base = Word::try_from(self.heap.len())
            .ok()
            .and_then(|used| self.config.heap_base.checked_add(used))
            .ok_or(exhausted)?;
        self.heap.resize(self.heap.len() + requested, 0);
        self.stats.heap_cells += requested;
        Ok(base)
    }
}
