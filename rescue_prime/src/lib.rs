// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
//! The Rescue-Prime permutation <https://eprint.iacr.org/2020/1143>, over any
//! prime field, together with the derivation of its parameters:
//! - the number of rounds, from the Gröbner basis attack bound
//! - the MDS matrix, from a Vandermonde matrix in echelon form
//! - the round constants, from SHAKE256 seeded with the parameter set
//!
//! With the `gadgets` feature, `gadgets::RescuePrimeGadget` enforces the
//! same permutation in a Plonk circuit.
//!
//! ```
//! use ark_bls12_381::Fr;
//! use jf_rescue_prime::{Permutation, RescuePrimeConfig, SecurityLevel};
//!
//! let config = RescuePrimeConfig::<Fr>::new(3, 1, SecurityLevel::Bits128, 5).unwrap();
//! let perm = Permutation::new(config).unwrap();
//! let output = perm.eval(&[Fr::from(0u64), Fr::from(1u64), Fr::from(2u64)]).unwrap();
//! assert_eq!(output.len(), 3);
//! ```
#![deny(warnings)]

#[cfg(test)]
extern crate std;

pub mod errors;
#[cfg(feature = "gadgets")]
pub mod gadgets;
mod mds;
mod param;
mod permutation;
#[cfg(feature = "bls12-381")]
pub mod presets;
mod rescue_constants;
mod rounds;
mod structs;

pub use errors::RescuePrimeError;
pub use mds::{generate_mds, generate_mds_with_generator, MDS_GENERATOR};
pub use param::{RescuePrimeConfig, SecurityLevel};
pub use permutation::{permute, Permutation};
pub use rescue_constants::{
    bytes_per_constant, generate_round_constants, seed_string, XofStream,
};
pub use rounds::{estimate_rounds, ROUND_SEARCH_BOUND};
pub use structs::{RescueMatrix, RescueVector};
