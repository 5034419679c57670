//! Configuration for the C-Machine interpreter.
//!
//! This module defines the resource limits and diagnostics switches a run is
//! parameterized by. It provides:
//! 1. **Defaults:** Baseline stack and heap sizes and the heap base address.
//! 2. **Structure:** `MachineConfig`, deserializable from JSON with every field optional.
//! 3. **Validation:** Rejection of layouts where stack and heap addresses could collide.
//!
//! Configuration is supplied as JSON (`cma run --config`) or built with
//! `MachineConfig::default()` and adjusted field by field.

use serde::Deserialize;

use crate::common::constants::{DEFAULT_HEAP_BASE, DEFAULT_HEAP_LIMIT, DEFAULT_STACK_LIMIT};
use crate::common::{ConfigError, Word};

/// Resource limits and diagnostics for one interpreter.
///
/// # Example
///
/// ```
/// use cmavm_core::config::MachineConfig;
///
/// let json = r#"{
///     "stack_limit": 256,
///     "max_steps": 10000,
///     "trace_instructions": true
/// }"#;
///
/// let config = MachineConfig::from_json(json).unwrap();
/// assert_eq!(config.stack_limit, 256);
/// assert_eq!(config.heap_limit, 65_536);
/// assert_eq!(config.max_steps, Some(10_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    /// Maximum operand stack depth in cells.
    #[serde(default = "MachineConfig::default_stack_limit")]
    pub stack_limit: usize,

    /// Maximum number of heap cells a single run may allocate.
    #[serde(default = "MachineConfig::default_heap_limit")]
    pub heap_limit: usize,

    /// Word address of the first heap cell. Must lie above every stack address.
    #[serde(default = "MachineConfig::default_heap_base")]
    pub heap_base: Word,

    /// Step budget per run; `None` runs until `halt` or a fault.
    #[serde(default)]
    pub max_steps: Option<u64>,

    /// Emit a `trace` event for every executed instruction.
    #[serde(default)]
    pub trace_instructions: bool,
}

impl MachineConfig {
    fn default_stack_limit() -> usize {
        DEFAULT_STACK_LIMIT
    }

    fn default_heap_limit() -> usize {
        DEFAULT_HEAP_LIMIT
    }

    fn default_heap_base() -> Word {
        DEFAULT_HEAP_BASE
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed JSON or unknown fields, and
    /// the corresponding `ConfigError` variant if the limits are inconsistent.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the stack and heap regions are non-empty and disjoint.
    ///
    /// # Errors
    ///
    /// * `EmptyStack` if `stack_limit` is zero.
    /// * `HeapOverlapsStack` if `heap_base` is below `stack_limit`.
    /// * `HeapOutOfRange` if the last heap address would not fit in a word.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_limit == 0 {
            return Err(ConfigError::EmptyStack);
        }

        let base_above_stack =
            usize::try_from(self.heap_base).is_ok_and(|base| base >= self.stack_limit);
        if !base_above_stack {
            return Err(ConfigError::HeapOverlapsStack {
                heap_base: self.heap_base,
                stack_limit: self.stack_limit,
            });
        }

        let heap_end = i64::from(self.heap_base)
            .checked_add(i64::try_from(self.heap_limit).unwrap_or(i64::MAX));
        if heap_end.is_none_or(|end| end > i64::from(Word::MAX)) {
            return Err(ConfigError::HeapOutOfRange {
                heap_base: self.heap_base,
                heap_limit: self.heap_limit,
            });
        }

        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            stack_limit: Self::default_stack_limit(),
            heap_limit: Self::default_heap_limit(),
            heap_base: Self::default_heap_base(),
            max_steps: None,
            trace_instructions: false,
        }
    }
}
