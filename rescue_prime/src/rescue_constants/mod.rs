// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Round constants derived from SHAKE256.
//!
//! The XOF is seeded with `Rescue-XLIX(p,m,c,security_level)`, all numbers in
//! decimal. Each constant is read as `ceil(log2(p) / 8) + 1` little-endian
//! bytes and reduced modulo `p`; the extra byte keeps the reduction bias
//! negligible.

use crate::{
    errors::RescuePrimeError,
    param::{modulus, RescuePrimeConfig, SecurityLevel},
};
use ark_ff::PrimeField;
use ark_std::{end_timer, format, start_timer, string::String, vec, vec::Vec};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

/// An owned cursor over the output stream of an extendable-output function.
///
/// Every generation run owns its own stream, so two runs never observe each
/// other's position.
pub struct XofStream<R> {
    reader: R,
    position: u64,
}

impl XofStream<<Shake256 as ExtendableOutput>::Reader> {
    /// Absorb `seed` into a fresh SHAKE256 instance and start squeezing.
    pub fn shake256(seed: &[u8]) -> Self {
        let mut hasher = Shake256::default();
        hasher.update(seed);
        Self::new(hasher.finalize_xof())
    }
}

impl<R: XofReader> XofStream<R> {
    /// Wrap an XOF reader positioned at the start of its output.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            position: 0,
        }
    }

    /// Fill `buf` with the next `buf.len()` bytes of the stream.
    pub fn read_into(&mut self, buf: &mut [u8]) {
        self.reader.read(buf);
        self.position += buf.len() as u64;
    }

    /// Read the next `len` bytes of the stream.
    pub fn read_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.read_into(&mut buf);
        buf
    }

    /// Read the next `num_bytes` bytes as a little-endian integer and reduce
    /// it modulo the field order.
    pub fn next_field_element<F: PrimeField>(&mut self, num_bytes: usize) -> F {
        F::from_le_bytes_mod_order(&self.read_bytes(num_bytes))
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }
}

/// Bytes sampled per constant: one more than needed to hold `p`.
pub fn bytes_per_constant<F: PrimeField>() -> usize {
    (F::MODULUS_BIT_SIZE as usize + 7) / 8 + 1
}

/// The domain separation string for `(p, m, c, security_level)`.
pub fn seed_string<F: PrimeField>(
    state_size: usize,
    capacity: usize,
    security_level: SecurityLevel,
) -> String {
    format!(
        "Rescue-XLIX({},{},{},{})",
        modulus::<F>(),
        state_size,
        capacity,
        security_level.bits()
    )
}

/// Generate the `2 * state_size * rounds` round constants of a Rescue-Prime
/// instance over `F`.
///
/// The security level is checked before anything is read from the XOF.
pub fn generate_round_constants<F: PrimeField>(
    security_bits: u32,
    state_size: usize,
    capacity: usize,
    rounds: usize,
) -> Result<Vec<F>, RescuePrimeError> {
    let security_level = SecurityLevel::try_from(security_bits)?;
    Ok(derive_constants(
        security_level,
        state_size,
        capacity,
        rounds,
    ))
}

impl<F: PrimeField> RescuePrimeConfig<F> {
    /// The round constants for this parameter set.
    pub fn round_constants(&self) -> Vec<F> {
        derive_constants(
            self.security_level(),
            self.state_size(),
            self.capacity(),
            self.rounds(),
        )
    }
}

fn derive_constants<F: PrimeField>(
    security_level: SecurityLevel,
    state_size: usize,
    capacity: usize,
    rounds: usize,
) -> Vec<F> {
    let num_constants = 2 * state_size * rounds;
    let timer = start_timer!(|| format!(
        "Rescue-Prime round constants: {} elements",
        num_constants
    ));
    let seed = seed_string::<F>(state_size, capacity, security_level);
    let mut stream = XofStream::shake256(seed.as_bytes());
    let num_bytes = bytes_per_constant::<F>();
    let constants = (0..num_constants)
        .map(|_| stream.next_field_element(num_bytes))
        .collect();
    end_timer!(timer);
    constants
}
