// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Parameter set of a Rescue-Prime instance.

use crate::{errors::RescuePrimeError, rounds::estimate_rounds};
use ark_ff::{BigInteger, PrimeField};
use ark_std::{fmt, marker::PhantomData, vec::Vec};
use num_bigint::BigUint;
use num_traits::One;

/// Security levels the round estimation and constant derivation support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecurityLevel {
    /// 128 bits of security
    Bits128,
    /// 160 bits of security
    Bits160,
}

impl SecurityLevel {
    /// The security level in bits.
    pub const fn bits(&self) -> u32 {
        match self {
            Self::Bits128 => 128,
            Self::Bits160 => 160,
        }
    }
}

impl TryFrom<u32> for SecurityLevel {
    type Error = RescuePrimeError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            128 => Ok(Self::Bits128),
            160 => Ok(Self::Bits160),
            _ => Err(RescuePrimeError::UnsupportedSecurityLevel(bits)),
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// The full configuration `(p, m, c, security_level, alpha, N)` of one
/// Rescue-Prime instance; `p` is the modulus of `F`.
///
/// Only constructed through [`RescuePrimeConfig::new`], which checks that
/// the parameters are consistent, so holding a value is proof that the
/// round constants and the MDS matrix can be derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RescuePrimeConfig<F> {
    state_size: usize,
    capacity: usize,
    security_level: SecurityLevel,
    alpha: u64,
    // alpha^-1 mod (p - 1)
    alpha_inv: BigUint,
    // little-endian u64 limbs of `alpha_inv`, as consumed by `Field::pow`
    alpha_inv_limbs: Vec<u64>,
    rounds: usize,
    _field: PhantomData<F>,
}

impl<F: PrimeField> RescuePrimeConfig<F> {
    /// Validate the parameters, derive `alpha^-1 mod (p - 1)` and estimate the
    /// number of rounds.
    ///
    /// * `state_size` - the state width `m = capacity + rate`
    /// * `capacity` - number of hidden state elements
    /// * `security_level` - target security in bits (128 or 160)
    /// * `alpha` - the S-box exponent, must be coprime to `p - 1`
    pub fn new(
        state_size: usize,
        capacity: usize,
        security_level: SecurityLevel,
        alpha: u64,
    ) -> Result<Self, RescuePrimeError> {
        let alpha_inv = Self::sbox_inverse_exponent(alpha)?;
        let rounds = estimate_rounds(state_size, capacity, security_level, alpha)?;
        Ok(Self {
            state_size,
            capacity,
            security_level,
            alpha,
            alpha_inv_limbs: alpha_inv.to_u64_digits(),
            alpha_inv,
            rounds,
            _field: PhantomData,
        })
    }

    /// Same as [`RescuePrimeConfig::new`], with the security level given in
    /// bits.
    pub fn from_security_bits(
        state_size: usize,
        capacity: usize,
        security_bits: u32,
        alpha: u64,
    ) -> Result<Self, RescuePrimeError> {
        Self::new(
            state_size,
            capacity,
            SecurityLevel::try_from(security_bits)?,
            alpha,
        )
    }

    /// Compute `alpha^-1 mod (p - 1)`, failing when `gcd(alpha, p - 1) != 1`.
    pub fn sbox_inverse_exponent(alpha: u64) -> Result<BigUint, RescuePrimeError> {
        if alpha < 2 {
            return Err(RescuePrimeError::InvalidSboxExponent(alpha));
        }
        let order = modulus::<F>() - BigUint::one();
        BigUint::from(alpha)
            .modinv(&order)
            .ok_or(RescuePrimeError::NonInvertibleSbox(alpha))
    }

    /// The state width `m`.
    #[inline]
    pub fn state_size(&self) -> usize {
        self.state_size
    }

    /// The capacity `c`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The rate `r = m - c`.
    #[inline]
    pub fn rate(&self) -> usize {
        self.state_size - self.capacity
    }

    /// The targeted security level.
    #[inline]
    pub fn security_level(&self) -> SecurityLevel {
        self.security_level
    }

    /// The S-box exponent.
    #[inline]
    pub fn alpha(&self) -> u64 {
        self.alpha
    }

    /// The inverse S-box exponent `alpha^-1 mod (p - 1)`.
    #[inline]
    pub fn alpha_inv(&self) -> &BigUint {
        &self.alpha_inv
    }

    /// The number of rounds `N`.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The number of round constants, `2 * m * N`.
    #[inline]
    pub fn num_round_constants(&self) -> usize {
        2 * self.state_size * self.rounds
    }

    pub(crate) fn alpha_inv_limbs(&self) -> &[u64] {
        &self.alpha_inv_limbs
    }
}

/// The field modulus `p` as an arbitrary precision integer.
pub(crate) fn modulus<F: PrimeField>() -> BigUint {
    BigUint::from_bytes_le(&F::MODULUS.to_bytes_le())
}
