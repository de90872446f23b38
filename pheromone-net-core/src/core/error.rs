//! Error types for the simulation kernel.
//!
//! Only construction paths (grid allocation, spawning, config loading) can
//! fail. The per-tick loop never returns an error.

use thiserror::Error;

/// Result alias for fallible kernel operations.
pub type SimResult<T> = Result<T, SimError>;

/// Fatal kernel errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// Backing arrays could not be allocated (or their size overflowed `usize`).
    #[error("failed to allocate {what}: {len} elements requested")]
    Allocation { what: &'static str, len: usize },

    /// Requested dimensions overflow the addressable buffer size.
    #[error("grid of {width}x{height} with {channels} channels overflows addressable memory")]
    GridTooLarge {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration boundary errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn out_of_range(
        field: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        ConfigError::OutOfRange {
            field,
            value: value.to_string(),
            expected,
        }
    }
}
