//! Error types for the counts crate.

use thiserror::Error;

/// Errors produced by counts containers and bitstring partitions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CountsError {
    /// The requested partition does not fit the measured register.
    #[error("invalid bitstring range [{start}, {end}) for {num_bits} bits:{conditions}")]
    InvalidRange {
        /// Start of the offending range.
        start: i32,
        /// End of the offending range.
        end: i32,
        /// Width of the measured register.
        num_bits: i32,
        /// The violated conditions, as " cond; cond" text.
        conditions: String,
    },

    /// Subsystem size requested beyond the measured register width.
    #[error("subsystem of {degree} qubits exceeds the {num_bits} qubits the register holds")]
    DegreeTooLarge {
        /// Requested subsystem size.
        degree: i32,
        /// Width of the measured register.
        num_bits: i32,
    },

    /// Subsystem size must be a natural number.
    #[error("subsystem size must be a natural number, got {0}")]
    NegativeDegree(i32),

    /// Hamming operands of differing length.
    #[error("bitstrings differ in length: {left} vs {right}")]
    LengthMismatch {
        /// Length of the left operand.
        left: usize,
        /// Length of the right operand.
        right: usize,
    },

    /// A counts map with no outcomes where at least one is required.
    #[error("counts map holds no outcomes")]
    EmptyCounts,

    /// Keys of a counts map differ in length.
    #[error("bitstring key '{key}' has length {found}, expected {expected}")]
    NonUniformKeys {
        /// The offending key.
        key: String,
        /// Its length.
        found: usize,
        /// The length of the first key seen.
        expected: usize,
    },

    /// Bit length beyond what the dummy generators support.
    #[error("bit length {bit_len} exceeds the supported maximum of {max}")]
    BitLengthTooLarge {
        /// Requested bit length.
        bit_len: u32,
        /// Supported maximum.
        max: u32,
    },

    /// More distinct bitstrings requested than the register can express.
    #[error("{requested} distinct bitstrings requested but {bit_len} bits only express {capacity}")]
    TooManyBitstrings {
        /// Requested number of distinct bitstrings.
        requested: usize,
        /// Register width.
        bit_len: u32,
        /// Number of distinct bitstrings of that width.
        capacity: usize,
    },
}

/// Result type for counts and partition operations.
pub type CountsResult<T> = Result<T, CountsError>;
