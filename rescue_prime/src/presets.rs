// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Ready made instances over the scalar field of BLS12-381.

use crate::{
    errors::RescuePrimeError,
    param::{RescuePrimeConfig, SecurityLevel},
    permutation::Permutation,
};
use ark_bls12_381::Fr;

/// Rescue-Prime over the BLS12-381 scalar field with state size 3
/// (capacity 1, rate 2), S-box `x^5` and 128 bits of security, which gives
/// 14 rounds.
pub fn bls12_381_width3() -> Result<Permutation<Fr>, RescuePrimeError> {
    let config = RescuePrimeConfig::new(3, 1, SecurityLevel::Bits128, 5)?;
    Permutation::new(config)
}
