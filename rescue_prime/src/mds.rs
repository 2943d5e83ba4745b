// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! MDS matrix generation.
//!
//! Take the `m x 2m` Vandermonde matrix `V[i][j] = g^(i*j)` over the
//! evaluation points `1, g, ..., g^(2m-1)` and bring it to reduced row
//! echelon form `[I | A]`. As long as the evaluation points are pairwise
//! distinct, every `m x m` minor of `V` is nonzero, hence every square
//! submatrix of `A` is invertible and `A^T` is MDS.
//!
//!   sage: V = matrix([[g^(i*j) for j in range(2*m)] for i in range(m)])
//!   sage: MDS = V.echelon_form()[:, m:].transpose()

use crate::{errors::RescuePrimeError, structs::RescueMatrix};
use ark_ff::PrimeField;
#[cfg(feature = "print-trace")]
use ark_std::format;
use ark_std::{end_timer, start_timer, vec::Vec};

/// The generator of the evaluation points.
pub const MDS_GENERATOR: u64 = 7;

/// Generate the `state_size x state_size` MDS matrix from [`MDS_GENERATOR`].
pub fn generate_mds<F: PrimeField>(state_size: usize) -> Result<RescueMatrix<F>, RescuePrimeError> {
    generate_mds_with_generator(state_size, MDS_GENERATOR)
}

/// Generate the `state_size x state_size` MDS matrix from the evaluation
/// points `generator^j` for `j < 2 * state_size`.
///
/// The first `2 * state_size` powers of `generator` must be nonzero and
/// pairwise distinct, otherwise a [`RescuePrimeError::DegenerateMdsGenerator`]
/// is returned.
pub fn generate_mds_with_generator<F: PrimeField>(
    state_size: usize,
    generator: u64,
) -> Result<RescueMatrix<F>, RescuePrimeError> {
    let timer = start_timer!(|| format!("Rescue-Prime MDS generation, m = {}", state_size));
    let width = 2 * state_size;
    let g = F::from(generator);

    let mut points = Vec::with_capacity(width);
    let mut acc = F::one();
    for _ in 0..width {
        points.push(acc);
        acc *= g;
    }
    let distinct = points
        .iter()
        .enumerate()
        .all(|(j, p)| !p.is_zero() && points[..j].iter().all(|q| q != p));
    if !distinct {
        end_timer!(timer);
        return Err(RescuePrimeError::DegenerateMdsGenerator {
            generator,
            state_size,
        });
    }

    // V[i][j] = points[j]^i
    let mut rows: Vec<Vec<F>> = Vec::with_capacity(state_size);
    let mut row: Vec<F> = points.iter().map(|_| F::one()).collect();
    for _ in 0..state_size {
        rows.push(row.clone());
        row.iter_mut().zip(points.iter()).for_each(|(v, p)| *v *= p);
    }

    let result = reduced_echelon_form(&mut rows, state_size).map(|_| {
        // transpose of the right half
        (0..state_size)
            .map(|i| rows.iter().map(|row| row[state_size + i]).collect())
            .collect::<Vec<Vec<F>>>()
    });
    end_timer!(timer);
    RescueMatrix::try_from(result?)
}

/// Gauss-Jordan elimination of `rows` (with `num_rows` rows) in place. Every
/// one of the first `num_rows` columns must yield a pivot.
fn reduced_echelon_form<F: PrimeField>(
    rows: &mut [Vec<F>],
    num_rows: usize,
) -> Result<(), RescuePrimeError> {
    for col in 0..num_rows {
        let pivot = (col..num_rows)
            .find(|&r| !rows[r][col].is_zero())
            .ok_or(RescuePrimeError::SingularMdsMatrix(col))?;
        rows.swap(pivot, col);

        let pivot_inv = rows[col][col]
            .inverse()
            .ok_or(RescuePrimeError::SingularMdsMatrix(col))?;
        rows[col].iter_mut().for_each(|v| *v *= pivot_inv);

        let pivot_row = rows[col].clone();
        for (r, row) in rows.iter_mut().enumerate() {
            let factor = row[col];
            if r == col || factor.is_zero() {
                continue;
            }
            row.iter_mut()
                .zip(pivot_row.iter())
                .for_each(|(v, p)| *v -= factor * p);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{from_hex, Goldilocks, F19};
    use ark_bls12_381::Fr;
    use ark_ff::Zero;

    // every k x k submatrix, for the small widths used in the tests
    fn all_minors_nonzero<F: PrimeField>(mds: &RescueMatrix<F>) -> bool {
        let m = mds.len();
        let subsets: Vec<Vec<usize>> = (1u32..(1 << m))
            .map(|mask| (0..m).filter(|i| mask & (1 << i) != 0).collect())
            .collect();
        subsets.iter().all(|rs| {
            subsets.iter().filter(|cs| cs.len() == rs.len()).all(|cs| {
                let sub: Vec<Vec<F>> = rs
                    .iter()
                    .map(|&r| cs.iter().map(|&c| mds.entry(r, c)).collect())
                    .collect();
                !RescueMatrix::try_from(sub).unwrap().determinant().is_zero()
            })
        })
    }

    #[test]
    fn test_bls12_381_width3() {
        // cross checked with sage
        let mds = generate_mds::<Fr>(3).unwrap();
        let expected = [
            [
                "0157",
                "73eda753299d7d483339d80809a1d80553bda402fffe5bfefffffffefffffe72",
                "39",
            ],
            [
                "4c5f",
                "73eda753299d7d483339d80809a1d80553bda402fffe5bfefffffffeffffa881",
                "0b22",
            ],
            [
                "0eea8e",
                "73eda753299d7d483339d80809a1d80553bda402fffe5bfefffffffeffeef262",
                "022312",
            ],
        ];
        for (i, row) in expected.iter().enumerate() {
            for (j, entry) in row.iter().enumerate() {
                assert_eq!(mds.entry(i, j), from_hex::<Fr>(entry), "entry ({i}, {j})");
            }
        }
        assert_eq!(
            mds.columns_hex()[0],
            ["0x157", "0x4c5f", "0xeea8e"].to_vec()
        );
    }

    #[test]
    fn test_mds_property() {
        for m in 1..=5 {
            let mds = generate_mds::<Fr>(m).unwrap();
            assert_eq!(mds.len(), m);
            assert!(!mds.determinant().is_zero());
            assert!(all_minors_nonzero(&mds), "m = {m}");
        }
        for m in [2, 4] {
            let mds = generate_mds::<Goldilocks>(m).unwrap();
            assert!(all_minors_nonzero(&mds), "m = {m}");
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            generate_mds::<Fr>(4).unwrap(),
            generate_mds::<Fr>(4).unwrap()
        );
        assert_ne!(
            generate_mds_with_generator::<Fr>(4, 5).unwrap(),
            generate_mds::<Fr>(4).unwrap()
        );
    }

    #[test]
    fn test_degenerate_generator() {
        // 7^3 = 343 = 18 * 19 + 1, so 7 has order 3 in F_19
        assert_eq!(
            generate_mds::<F19>(2),
            Err(RescuePrimeError::DegenerateMdsGenerator {
                generator: 7,
                state_size: 2
            })
        );
        // only 1 and 7 are needed for m = 1
        assert!(generate_mds::<F19>(1).is_ok());
        // 2 is a primitive root mod 19
        assert!(generate_mds_with_generator::<F19>(4, 2).is_ok());
        // powers of 1 all collide
        assert_eq!(
            generate_mds_with_generator::<Fr>(3, 1),
            Err(RescuePrimeError::DegenerateMdsGenerator {
                generator: 1,
                state_size: 3
            })
        );
        // 0 and its powers
        assert!(generate_mds_with_generator::<Fr>(3, 0).is_err());
        // 19 == 0 in F_19
        assert!(generate_mds_with_generator::<F19>(1, 19).is_err());
    }
}
