//! Listing assembler.
//!
//! Turns C-Machine instruction listings into `Program`s. The assembler is a
//! pure function of its input: labels live only for the duration of one
//! `assemble` call and every error names the line it was found on.

/// Two-pass assembly entry point.
pub mod assembler;

/// Source-annotated rendering of parse errors.
pub mod diagnostic;

mod labels;
mod lexer;

pub use assembler::assemble;
pub use diagnostic::render_diagnostic;
