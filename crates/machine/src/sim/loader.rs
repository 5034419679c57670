//! Listing Loader.
//!
//! This module reads instruction listings from disk. It performs:
//! 1. **File reading:** UTF-8 listing text, with the path kept for error reports.
//! 2. **Assembly:** Hands the text to the assembler and attaches the path to any parse error.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::asm::assemble;
use crate::common::LoadError;
use crate::isa::Program;

/// Reads a listing file into a string.
///
/// # Arguments
///
/// * `path` - Path to the listing.
///
/// # Errors
///
/// `LoadError::Io` if the file cannot be read or is not valid UTF-8.
pub fn load_source(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Reads and assembles a listing file.
///
/// # Arguments
///
/// * `path` - Path to the listing.
///
/// # Returns
///
/// The assembled program.
///
/// # Errors
///
/// `LoadError::Io` on read failure, `LoadError::Parse` if the listing does not assemble.
pub fn load_program(path: impl AsRef<Path>) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let source = load_source(path)?;
    let program = assemble(&source).map_err(|error| LoadError::Parse {
        path: path.display().to_string(),
        error,
    })?;
    debug!(path = %path.display(), instructions = program.len(), "loaded program");
    Ok(program)
}
