// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Number of rounds from the Gröbner basis attack bound.
//!
//! For a candidate number of rounds `N`, the complexity of the best known
//! Gröbner basis attack is lower bounded by `binomial(v + dcon, v)^2` with
//!
//! ```text
//!   dcon(N) = floor(0.5 * (alpha - 1) * m * (N - 1) + 2)
//!   v(N)    = m * (N - 1) + rate
//! ```
//!
//! The smallest `N` that pushes this above `2^security_level` is then
//! multiplied by 1.5 (and never taken below 5) to leave a safety margin,
//! see <https://eprint.iacr.org/2020/1143> section 2.5.
//!
//! For `m = 3, rate = 2, alpha = 5`:
//!   sage: [N for N in range(1, 25) if binomial(v(N)+dcon(N), v(N))^2 > 2^128][0]
//!   9
//! which gives `ceil(1.5 * 9) = 14` rounds.

use crate::{errors::RescuePrimeError, param::SecurityLevel};
use ark_std::{end_timer, start_timer};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Upper bound (inclusive) of the candidate round numbers searched.
pub const ROUND_SEARCH_BOUND: usize = 24;

/// Lower bound on the attack-derived number of rounds before the margin is
/// applied.
const MIN_ROUNDS: usize = 5;

/// Estimate the number of rounds for a state of `state_size` elements with
/// `capacity` of them hidden, targeting `security_level`, with S-box
/// `x -> x^alpha`.
///
/// Fails if the rate is zero or if no candidate up to [`ROUND_SEARCH_BOUND`]
/// reaches the target.
pub fn estimate_rounds(
    state_size: usize,
    capacity: usize,
    security_level: SecurityLevel,
    alpha: u64,
) -> Result<usize, RescuePrimeError> {
    let rate = match state_size.checked_sub(capacity) {
        Some(rate) if rate >= 1 => rate,
        _ => {
            return Err(RescuePrimeError::InvalidRate {
                state_size,
                capacity,
            })
        },
    };
    if alpha < 2 {
        return Err(RescuePrimeError::InvalidSboxExponent(alpha));
    }

    let timer = start_timer!(|| "Rescue-Prime round estimation");
    let m = BigUint::from(state_size);
    let rate = BigUint::from(rate);
    let alpha_minus_one = BigUint::from(alpha - 1);
    let target = BigUint::one() << security_level.bits();
    let bound = (1..=ROUND_SEARCH_BOUND).find(|&i| {
        let steps = &m * (i - 1);
        // floor(0.5 * x + 2) for the non-negative integer x
        let dcon = &alpha_minus_one * &steps / 2u32 + 2u32;
        let v = steps + &rate;
        let complexity = binomial(&(&v + &dcon), &v);
        &complexity * &complexity > target
    });
    end_timer!(timer);

    let bound = bound.ok_or(RescuePrimeError::RoundSearchExhausted(ROUND_SEARCH_BOUND))?;
    // ceil(1.5 * x) == (3x + 1) / 2
    Ok((3 * bound.max(MIN_ROUNDS) + 1) / 2)
}

/// Binomial coefficient `n choose k` over arbitrary precision integers.
pub(crate) fn binomial(n: &BigUint, k: &BigUint) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let rest = n - k;
    let k = if &rest < k { rest } else { k.clone() };
    let offset = n - &k;
    // every partial product is itself a binomial coefficient, so the division
    // is exact
    let mut acc = BigUint::one();
    let mut j = BigUint::one();
    while j <= k {
        acc = acc * (&offset + &j) / &j;
        j += 1u32;
    }
    acc
}
