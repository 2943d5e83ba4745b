// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! The Rescue-Prime permutation.
//!
//! Each of the `N` rounds is
//!
//! ```text
//!   x -> x^alpha, x -> MDS * x + c_{2i}, x -> x^(1/alpha), x -> MDS * x + c_{2i+1}
//! ```
//!
//! where the two power maps are independent nonlinear layers: the inverse
//! S-box is applied to the already mixed state, it does not undo the forward
//! one.

use crate::{
    errors::RescuePrimeError, mds::generate_mds, param::RescuePrimeConfig,
    structs::{RescueMatrix, RescueVector},
};
use ark_ff::PrimeField;
use ark_std::{end_timer, start_timer, vec::Vec};

/// Apply the Rescue-Prime permutation defined by `config`, `mds` and
/// `constants` to `state`.
///
/// All dimensions are checked before the first round: `state` must have
/// `m` elements, `mds` must be `m x m` and `constants` must have `2 * m * N`
/// elements.
pub fn permute<F: PrimeField>(
    config: &RescuePrimeConfig<F>,
    mds: &RescueMatrix<F>,
    constants: &[F],
    state: &[F],
) -> Result<Vec<F>, RescuePrimeError> {
    check_parts(config, mds, constants)?;
    check_len("state", config.state_size(), state.len())?;
    let mut state = RescueVector::from(state);
    apply_rounds(config, mds, constants, &mut state);
    Ok(state.vec)
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), RescuePrimeError> {
    if expected != actual {
        return Err(RescuePrimeError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_parts<F: PrimeField>(
    config: &RescuePrimeConfig<F>,
    mds: &RescueMatrix<F>,
    constants: &[F],
) -> Result<(), RescuePrimeError> {
    check_len("MDS matrix", config.state_size(), mds.len())?;
    mds.check_square()?;
    check_len(
        "round constants",
        config.num_round_constants(),
        constants.len(),
    )
}

// dimensions are checked by the callers
fn apply_rounds<F: PrimeField>(
    config: &RescuePrimeConfig<F>,
    mds: &RescueMatrix<F>,
    constants: &[F],
    state: &mut RescueVector<F>,
) {
    let m = config.state_size();
    let timer = start_timer!(|| "Rescue-Prime permutation");
    for round_constants in constants.chunks_exact(2 * m) {
        let (first, second) = round_constants.split_at(m);
        state.pow(&[config.alpha()]);
        state.linear(mds, first);
        state.pow(config.alpha_inv_limbs());
        state.linear(mds, second);
    }
    end_timer!(timer);
}

/// A Rescue-Prime permutation instance: the parameter set together with the
/// MDS matrix and the round constants derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation<F: PrimeField> {
    config: RescuePrimeConfig<F>,
    mds: RescueMatrix<F>,
    round_constants: Vec<F>,
}

impl<F: PrimeField> Permutation<F> {
    /// Derive the MDS matrix and the round constants for `config`.
    pub fn new(config: RescuePrimeConfig<F>) -> Result<Self, RescuePrimeError> {
        let mds = generate_mds(config.state_size())?;
        let round_constants = config.round_constants();
        Ok(Self {
            config,
            mds,
            round_constants,
        })
    }

    /// Build an instance from a previously exported MDS matrix and round
    /// constants.
    pub fn from_parts(
        config: RescuePrimeConfig<F>,
        mds: RescueMatrix<F>,
        round_constants: Vec<F>,
    ) -> Result<Self, RescuePrimeError> {
        check_parts(&config, &mds, &round_constants)?;
        Ok(Self {
            config,
            mds,
            round_constants,
        })
    }

    /// Return a pointer to the parameter set.
    #[inline]
    pub fn config(&self) -> &RescuePrimeConfig<F> {
        &self.config
    }

    /// Return a pointer to the mds matrix.
    #[inline]
    pub fn mds_matrix_ref(&self) -> &RescueMatrix<F> {
        &self.mds
    }

    /// Return a pointer to the round constants.
    #[inline]
    pub fn round_constants_ref(&self) -> &[F] {
        &self.round_constants
    }

    /// The two constant vectors injected in round `round`, or `None` if the
    /// instance has fewer rounds.
    pub fn round_constants_at(&self, round: usize) -> Option<(&[F], &[F])> {
        let m = self.config.state_size();
        self.round_constants
            .chunks_exact(2 * m)
            .nth(round)
            .map(|chunk| chunk.split_at(m))
    }

    /// Compute the permutation on `input`.
    pub fn eval(&self, input: &[F]) -> Result<Vec<F>, RescuePrimeError> {
        check_len("state", self.config.state_size(), input.len())?;
        let mut state = RescueVector::from(input);
        apply_rounds(&self.config, &self.mds, &self.round_constants, &mut state);
        Ok(state.vec)
    }

    /// Compute the permutation on `state` in place.
    pub fn eval_mut(&self, state: &mut RescueVector<F>) -> Result<(), RescuePrimeError> {
        check_len("state", self.config.state_size(), state.len())?;
        apply_rounds(&self.config, &self.mds, &self.round_constants, state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        param::SecurityLevel,
        tests::{from_hex, Goldilocks},
    };
    use ark_bls12_381::Fr;
    use ark_std::{test_rng, vec, UniformRand};

    fn bls12_381_width3() -> Permutation<Fr> {
        let config = RescuePrimeConfig::new(3, 1, SecurityLevel::Bits128, 5).unwrap();
        Permutation::new(config).unwrap()
    }

    // cross checked with sage: rescue_permute(3, [0, 1, 2], ...) with
    // p = BLS12-381 scalar field, c = 1, r = 2, security_level = 128, alpha = 5
    #[test]
    fn fixed_test_vector() {
        let perm = bls12_381_width3();
        assert_eq!(perm.config().rounds(), 14);
        let output = perm
            .eval(&[Fr::from(0u64), Fr::from(1u64), Fr::from(2u64)])
            .unwrap();
        assert_eq!(
            output,
            vec![
                from_hex::<Fr>("2e1183b4ae571061ed9514118392ede2904ae1376d61653de09083cf0b31abce"),
                from_hex::<Fr>("38f9e521c67c329a53403dd42999b19c3bfe355e594752c87ada74da35c74b85"),
                from_hex::<Fr>("69a193e3c2734c26d85d191a1e521c1bc8024c9047bb5c79835ed5cfc2d8440e"),
            ]
        );
    }

    #[test]
    fn consistent_perm() {
        let perm = bls12_381_width3();
        let rng = &mut test_rng();
        for _ in 0..10 {
            let input1: Vec<Fr> = (0..3).map(|_| Fr::rand(rng)).collect();
            let input2: Vec<Fr> = (0..3).map(|_| Fr::rand(rng)).collect();

            // same input get the same permutated output
            assert_eq!(perm.eval(&input1).unwrap(), perm.eval(&input1).unwrap());
            // diff input get diff permutated output
            assert_ne!(perm.eval(&input1).unwrap(), perm.eval(&input2).unwrap());
        }
    }

    #[test]
    fn test_eval_variants_agree() {
        let perm = bls12_381_width3();
        let rng = &mut test_rng();
        let input: Vec<Fr> = (0..3).map(|_| Fr::rand(rng)).collect();

        let mut state = RescueVector::from(input.as_slice());
        perm.eval_mut(&mut state).unwrap();
        assert_eq!(state.elems(), perm.eval(&input).unwrap());

        let free = permute(
            perm.config(),
            perm.mds_matrix_ref(),
            perm.round_constants_ref(),
            &input,
        )
        .unwrap();
        assert_eq!(free, state.elems());
    }

    #[test]
    fn test_single_round_by_hand() {
        let config = RescuePrimeConfig::<Fr>::new(3, 1, SecurityLevel::Bits128, 5).unwrap();
        let mds = generate_mds::<Fr>(3).unwrap();
        let constants = config.round_constants();
        let input = [Fr::from(3u64), Fr::from(5u64), Fr::from(7u64)];

        // the first round spelled out
        let mut expected = RescueVector::from(&input[..]);
        expected.pow(&[5]);
        expected = mds.mul_vec(&expected);
        expected.add_assign_elems(&constants[0..3]);
        expected.pow(config.alpha_inv_limbs());
        expected = mds.mul_vec(&expected);
        expected.add_assign_elems(&constants[3..6]);

        let mut state = RescueVector::from(&input[..]);
        apply_rounds(&config, &mds, &constants[..6], &mut state);
        assert_eq!(state, expected);
    }

    #[test]
    fn test_round_constants_at() {
        let perm = bls12_381_width3();
        let all = perm.round_constants_ref();
        let (first, second) = perm.round_constants_at(2).unwrap();
        assert_eq!(first, &all[12..15]);
        assert_eq!(second, &all[15..18]);
        assert!(perm.round_constants_at(13).is_some());
        assert!(perm.round_constants_at(14).is_none());
    }

    #[test]
    fn test_dimension_checks() {
        let perm = bls12_381_width3();
        assert_eq!(
            perm.eval(&[Fr::from(1u64); 4]),
            Err(RescuePrimeError::LengthMismatch {
                what: "state",
                expected: 3,
                actual: 4
            })
        );
        let mut short = RescueVector::zero(2);
        assert!(perm.eval_mut(&mut short).is_err());
        // untouched on error
        assert_eq!(short, RescueVector::zero(2));

        let config = perm.config().clone();
        let constants = perm.round_constants_ref().to_vec();
        assert_eq!(
            Permutation::from_parts(
                config.clone(),
                perm.mds_matrix_ref().clone(),
                constants[1..].to_vec()
            ),
            Err(RescuePrimeError::LengthMismatch {
                what: "round constants",
                expected: 84,
                actual: 83
            })
        );
        assert_eq!(
            permute(
                &config,
                &generate_mds::<Fr>(4).unwrap(),
                &constants,
                &[Fr::from(0u64); 3]
            ),
            Err(RescuePrimeError::LengthMismatch {
                what: "MDS matrix",
                expected: 3,
                actual: 4
            })
        );
        let rebuilt =
            Permutation::from_parts(config, perm.mds_matrix_ref().clone(), constants).unwrap();
        assert_eq!(rebuilt, perm);
    }

    #[test]
    fn test_ragged_mds_rejected() {
        use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

        let perm = bls12_381_width3();
        // 3 rows of 2 elements, only reachable through unchecked deserialization
        let rows: Vec<RescueVector<Fr>> = (0..3u64)
            .map(|i| RescueVector::from(vec![Fr::from(i), Fr::from(7u64)]))
            .collect();
        let mut bytes = Vec::new();
        rows.serialize_compressed(&mut bytes).unwrap();
        let ragged =
            RescueMatrix::<Fr>::deserialize_compressed_unchecked(bytes.as_slice()).unwrap();
        assert_eq!(ragged.len(), 3);

        let mismatch = RescuePrimeError::LengthMismatch {
            what: "matrix row",
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            Permutation::from_parts(
                perm.config().clone(),
                ragged.clone(),
                perm.round_constants_ref().to_vec()
            ),
            Err(mismatch.clone())
        );
        let state = [Fr::from(0u64), Fr::from(1u64), Fr::from(2u64)];
        assert_eq!(
            permute(perm.config(), &ragged, perm.round_constants_ref(), &state),
            Err(mismatch)
        );
    }

    #[test]
    fn test_goldilocks_width12() {
        let config = RescuePrimeConfig::<Goldilocks>::new(12, 4, SecurityLevel::Bits128, 7)
            .unwrap();
        let perm = Permutation::new(config).unwrap();
        assert_eq!(perm.round_constants_ref().len(), 2 * 12 * 8);
        let rng = &mut test_rng();
        let input: Vec<Goldilocks> = (0..12).map(|_| Goldilocks::rand(rng)).collect();
        let output = perm.eval(&input).unwrap();
        assert_eq!(output.len(), 12);
        assert_ne!(output, input);
        assert_eq!(output, perm.eval(&input).unwrap());
    }
}
