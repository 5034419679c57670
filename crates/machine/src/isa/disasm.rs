//! Program disassembler.
//!
//! Renders an assembled program as a readable listing for `cma disasm`,
//! trace output, and test diagnostics. Every control-flow target gets a
//! synthetic `L<addr>` label and every line carries its address as a
//! trailing comment, so the output is itself a valid listing.
//!
//! # Usage
//!
//! ```
//! use cmavm_core::asm::assemble;
//! use cmavm_core::isa::disasm::disassemble;
//!
//! let program = assemble("loadc 0\njumpz end\nloadc 1\nend: halt\n").unwrap();
//! let text = disassemble(&program);
//! assert!(text.contains("jumpz L3"));
//! assert!(text.contains("L3:"));
//! ```

use std::collections::BTreeSet;
use std::fmt::Write;

use super::{Instruction, Program};

/// Width of the instruction column before the address comment.
const INSTRUCTION_COLUMN: usize = 24;

/// Returns the synthetic label name for an address.
fn label(addr: usize) -> String {
    format!("L{addr}")
}

/// Renders one instruction, replacing its static target with a label.
fn render(inst: Instruction) -> String {
    match inst.target() {
        Some(addr) => format!("{} {}", inst.opcode().mnemonic(), label(addr)),
        None => inst.to_string(),
    }
}

/// Disassembles a whole program.
///
/// # Arguments
///
/// * `program` - The program to render.
///
/// # Returns
///
/// A listing with one instruction per line; targets become `L<addr>` labels.
pub fn disassemble(program: &Program) -> String {
    let targets: BTreeSet<usize> = program.iter().filter_map(|inst| inst.target()).collect();
    let mut out = String::new();

    for (addr, inst) in program.iter().enumerate() {
        if targets.contains(&addr) {
            let _ = writeln!(out, "{}:", label(addr));
        }
        let _ = writeln!(
            out,
            "    {:<width$}# {addr}",
            render(*inst),
            width = INSTRUCTION_COLUMN
        );
    }

    // A target equal to the program length is only possible in hand-built programs.
    if targets.contains(&program.len()) {
        let _ = writeln!(out, "{}:", label(program.len()));
    }

    out
}
