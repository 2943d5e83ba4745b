// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Error types.

// using `displaydoc` instead of `thiserror`, see
// https://github.com/dtolnay/thiserror/pull/64#issuecomment-735805334
// `thiserror` does not support #![no_std]

use displaydoc::Display;

/// Configuration errors of a Rescue-Prime instance. All of them are raised
/// before the first round executes.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum RescuePrimeError {
    /// Unsupported security level: {0} bits, only 128 and 160 are supported
    UnsupportedSecurityLevel(u32),
    /// Invalid state size {state_size} for capacity {capacity}: rate must be at least 1
    InvalidRate {
        /// state width `m`
        state_size: usize,
        /// capacity `c`
        capacity: usize,
    },
    /// S-box exponent {0} is too small, must be at least 2
    InvalidSboxExponent(u64),
    /// S-box exponent {0} is not coprime to p - 1, x^alpha is not a permutation
    NonInvertibleSbox(u64),
    /// No round count up to {0} reaches the requested security level
    RoundSearchExhausted(usize),
    /// MDS generator {generator} does not have {state_size}*2 distinct nonzero powers
    DegenerateMdsGenerator {
        /// the evaluation-point generator
        generator: u64,
        /// state width `m`
        state_size: usize,
    },
    /// Zero pivot in column {0} while reducing the MDS Vandermonde matrix
    SingularMdsMatrix(usize),
    /// Length mismatch for {what}: expected {expected}, got {actual}
    LengthMismatch {
        /// the offending input
        what: &'static str,
        /// length implied by the parameter set
        expected: usize,
        /// length supplied by the caller
        actual: usize,
    },
}

impl ark_std::error::Error for RescuePrimeError {}
