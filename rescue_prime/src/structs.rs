// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! This module defines vector and matrix structs for the Rescue-Prime
//! permutation. Unlike the fixed-width Rescue structs, the width is only known
//! at runtime, and is checked where vectors and matrices meet.

use crate::errors::RescuePrimeError;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
};
use ark_std::{format, string::String, vec, vec::Vec};
use num_bigint::BigUint;

#[derive(Clone, Debug, PartialEq, Eq, Default, CanonicalSerialize, CanonicalDeserialize)]
/// Data type for the Rescue-Prime state and for rows of the MDS matrix
pub struct RescueVector<F: PrimeField> {
    pub(crate) vec: Vec<F>,
}

// Public functions
impl<F: PrimeField> RescueVector<F> {
    /// zero vector of `len` elements
    pub fn zero(len: usize) -> RescueVector<F> {
        RescueVector {
            vec: vec![F::zero(); len],
        }
    }

    /// Return vector of the field elements
    /// WARNING: may expose the internal state.
    pub fn elems(&self) -> Vec<F> {
        self.vec.clone()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    /// Check if the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
}

// Private functions
impl<F: PrimeField> RescueVector<F> {
    /// `self = matrix * self + constants`; lengths are checked by the callers.
    pub(crate) fn linear(&mut self, matrix: &RescueMatrix<F>, constants: &[F]) {
        let mut aux = matrix.mul_vec(self);
        aux.add_assign_elems(constants);
        *self = aux
    }

    pub(crate) fn pow(&mut self, exp: &[u64]) {
        self.vec.iter_mut().for_each(|elem| {
            *elem = elem.pow(exp);
        });
    }

    pub(crate) fn add_assign_elems(&mut self, elems: &[F]) {
        debug_assert_eq!(elems.len(), self.vec.len());
        self.vec
            .iter_mut()
            .zip(elems.iter())
            .for_each(|(a, b)| a.add_assign(b));
    }

    fn dot_product(&self, vector: &RescueVector<F>) -> F {
        let mut r = F::zero();
        for (a, b) in self.vec.iter().zip(vector.vec.iter()) {
            r.add_assign(&a.mul(b));
        }
        r
    }
}

impl<F: PrimeField> From<&[F]> for RescueVector<F> {
    fn from(field_elems: &[F]) -> RescueVector<F> {
        RescueVector {
            vec: field_elems.to_vec(),
        }
    }
}

impl<F: PrimeField> From<Vec<F>> for RescueVector<F> {
    fn from(vec: Vec<F>) -> RescueVector<F> {
        RescueVector { vec }
    }
}

impl<F: PrimeField> AsRef<[F]> for RescueVector<F> {
    fn as_ref(&self) -> &[F] {
        &self.vec
    }
}

/// A square matrix stored as its rows.
///
/// Deserialization with validation rejects non-square input.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize)]
pub struct RescueMatrix<F: PrimeField> {
    matrix: Vec<RescueVector<F>>,
}

impl<F: PrimeField> TryFrom<Vec<Vec<F>>> for RescueMatrix<F> {
    type Error = RescuePrimeError;

    /// Build a matrix from its rows, rejecting non-square input.
    fn try_from(rows: Vec<Vec<F>>) -> Result<Self, Self::Error> {
        let matrix = Self {
            matrix: rows.into_iter().map(RescueVector::from).collect(),
        };
        matrix.check_square()?;
        Ok(matrix)
    }
}

impl<F: PrimeField> Valid for RescueMatrix<F> {
    fn check(&self) -> Result<(), SerializationError> {
        self.check_square()
            .map_err(|_| SerializationError::InvalidData)?;
        self.matrix.check()
    }
}

impl<F: PrimeField> CanonicalDeserialize for RescueMatrix<F> {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let matrix = Self {
            matrix: Vec::deserialize_with_mode(reader, compress, validate)?,
        };
        if let Validate::Yes = validate {
            matrix.check()?;
        }
        Ok(matrix)
    }
}

impl<F: PrimeField> RescueMatrix<F> {
    /// Fails on the first row whose length differs from the number of rows.
    pub(crate) fn check_square(&self) -> Result<(), RescuePrimeError> {
        let dim = self.matrix.len();
        match self.matrix.iter().find(|row| row.len() != dim) {
            Some(row) => Err(RescuePrimeError::LengthMismatch {
                what: "matrix row",
                expected: dim,
                actual: row.len(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn mul_vec(&self, vector: &RescueVector<F>) -> RescueVector<F> {
        RescueVector {
            vec: self
                .matrix
                .iter()
                .map(|row| row.dot_product(vector))
                .collect(),
        }
    }

    #[cfg(feature = "gadgets")]
    pub(crate) fn row(&self, i: usize) -> &[F] {
        &self.matrix[i].vec
    }

    /// Check if the matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Return the number of rows (equivalently columns) of the matrix.
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    /// The entry at row `i`, column `j`.
    pub fn entry(&self, i: usize, j: usize) -> F {
        self.matrix[i].vec[j]
    }

    /// The `j`-th column of the matrix.
    pub fn column(&self, j: usize) -> Vec<F> {
        self.matrix.iter().map(|row| row.vec[j]).collect()
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Self {
        Self {
            matrix: (0..self.len())
                .map(|j| RescueVector::from(self.column(j)))
                .collect(),
        }
    }

    /// Render the matrix column by column, each entry as `0x`-prefixed
    /// lowercase hex without leading zeros. This is the layout circuit
    /// implementations load their MDS constants from.
    pub fn columns_hex(&self) -> Vec<Vec<String>> {
        (0..self.len())
            .map(|j| {
                self.column(j)
                    .into_iter()
                    .map(|elem| {
                        let value = BigUint::from_bytes_le(&elem.into_bigint().to_bytes_le());
                        format!("{:#x}", value)
                    })
                    .collect()
            })
            .collect()
    }

    /// Determinant, by Gaussian elimination over the field.
    pub fn determinant(&self) -> F {
        let dim = self.len();
        let mut rows: Vec<Vec<F>> = self.matrix.iter().map(|row| row.vec.clone()).collect();
        let mut det = F::one();
        for col in 0..dim {
            let pivot = match (col..dim).find(|&r| !rows[r][col].is_zero()) {
                Some(pivot) => pivot,
                None => return F::zero(),
            };
            if pivot != col {
                rows.swap(pivot, col);
                det = -det;
            }
            let pivot_elem = rows[col][col];
            det *= pivot_elem;
            // nonzero by the choice of pivot
            let pivot_inv = pivot_elem.inverse().unwrap_or_else(F::zero);
            for r in col + 1..dim {
                let factor = rows[r][col] * pivot_inv;
                if factor.is_zero() {
                    continue;
                }
                for c in col..dim {
                    let sub = factor * rows[col][c];
                    rows[r][c] -= sub;
                }
            }
        }
        det
    }
}
