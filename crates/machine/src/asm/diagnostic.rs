//! Human-readable parse error reports.
//!
//! Renders a `ParseError` together with the offending source line, in the
//! style of compiler diagnostics:
//!
//! ```text
//! error: label `missing` is never defined
//!  --> fact.cma:2
//!   |
//! 2 |     jumpz missing
//!   |
//! ```

use std::fmt::Write;

use crate::common::ParseError;

/// Renders `error` against the listing it came from.
///
/// # Arguments
///
/// * `file` - Name shown in the location line.
/// * `source` - The full listing text that failed to assemble.
/// * `error` - The failure reported by `assemble`.
pub fn render_diagnostic(file: &str, source: &str, error: &ParseError) -> String {
    let gutter = error.line.to_string().len();
    let mut out = String::new();

    let _ = writeln!(out, "error: {}", error.kind);
    let _ = writeln!(out, "{:>gutter$}--> {file}:{}", "", error.line);
    let _ = writeln!(out, "{:>gutter$} |", "");
    if let Some(text) = source.lines().nth(error.line.saturating_sub(1)) {
        let _ = writeln!(out, "{} | {}", error.line, text.trim_end());
        let _ = writeln!(out, "{:>gutter$} |", "");
    }
    out
}
