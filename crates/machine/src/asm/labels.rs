//! Transient label table.
//!
//! Built by the first assembly pass and consumed by the second. The table is
//! owned by a single `assemble` call and dropped before the program is
//! returned; no label survives into a `Program`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::common::ParseErrorKind;

/// Returns `true` if `name` is a valid label identifier.
///
/// Labels start with an ASCII letter, `_` or `.`, followed by ASCII
/// alphanumerics, `_`, `.` or `$`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '.')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$'))
}

/// Mapping from label name to resolved instruction address.
#[derive(Debug, Default)]
pub(crate) struct LabelTable {
    labels: HashMap<String, usize>,
}

impl LabelTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `addr`.
    ///
    /// Fails with `DuplicateLabel` if the name is already bound.
    pub fn define(&mut self, name: &str, addr: usize) -> Result<(), ParseErrorKind> {
        match self.labels.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ParseErrorKind::DuplicateLabel(name.to_string())),
            Entry::Vacant(slot) => {
                let _ = slot.insert(addr);
                Ok(())
            }
        }
    }

    /// Resolves `name` to its address.
    ///
    /// Fails with `UnresolvedLabel` if the name was never defined.
    pub fn resolve(&self, name: &str) -> Result<usize, ParseErrorKind> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| ParseErrorKind::UnresolvedLabel(name.to_string()))
    }

    /// Number of labels defined.
    pub fn len(&self) -> usize {
        self.labels.len()
    }
}
