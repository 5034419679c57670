//! Global Machine Constants.
//!
//! This module defines constants used across the assembler and interpreter. It includes:
//! 1. **Listing Syntax:** Comment and label markers.
//! 2. **Memory Layout:** Default stack and heap limits and the heap base address.
//! 3. **Frames:** Size of the organisational cells pushed by `call`.

use super::Word;

/// Starts a comment that runs to the end of the line.
pub const COMMENT_CHAR: char = '#';

/// Terminates a label definition (`loop:`).
pub const LABEL_SUFFIX: char = ':';

/// Default maximum operand stack depth in cells.
pub const DEFAULT_STACK_LIMIT: usize = 4096;

/// Default maximum number of heap cells a run may allocate.
pub const DEFAULT_HEAP_LIMIT: usize = 65_536;

/// Default word address of the first heap cell.
///
/// Well above any reachable stack address so that the two regions never
/// overlap and a stray stack address is never mistaken for a heap cell.
pub const DEFAULT_HEAP_BASE: Word = 0x1000_0000;

/// Number of cells `call` pushes: the saved frame pointer and the return address.
pub const FRAME_CELLS: usize = 2;

/// Frame-pointer-relative offset of the saved frame pointer.
pub const SAVED_FP_OFFSET: Word = -1;

/// Initial frame pointer of a fresh machine (top-level code has no frame).
pub const INITIAL_FP: Word = 0;
