//! Common utilities and types used throughout the C-Machine.
//!
//! This module provides the building blocks shared by the assembler and the
//! interpreter. It includes:
//! 1. **Machine Words:** The `Word` type every cell of stack and heap holds.
//! 2. **Locations:** Resolution of word addresses into stack or heap cells.
//! 3. **Constants:** Default limits and the reserved syntax characters.
//! 4. **Memory Access:** Classification of reads and writes for fault reports.
//! 5. **Error Handling:** Parse errors, runtime faults, and loader/config errors.

/// Word address resolution (stack or heap cell).
pub mod addr;

/// Common constants used throughout the machine.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types for assembly, execution, loading, and configuration.
pub mod error;

pub use addr::Location;
pub use data::AccessType;
pub use error::{ConfigError, Error, FaultKind, LoadError, ParseError, ParseErrorKind, RuntimeFault};

/// A machine word. Stack cells, heap cells, addresses and exit codes are all words.
///
/// Arithmetic on words wraps on overflow.
pub type Word = i32;
