// Copyright (c) 2024 Espresso Systems (espressosys.com)
// This file is part of the Jellyfish library.

// You should have received a copy of the MIT License
// along with the Jellyfish library. If not, see <https://mit-license.org/>.

//! Circuit implementation of the Rescue-Prime permutation over the native
//! field.
//!
//! Every round is enforced as
//! - S-box: `y = x^alpha` by square-and-multiply
//! - affine layer: `y_i = <MDS_i, x> + c_i`, one linear combination per row
//! - inverse S-box: `y` is witnessed as `x^(1/alpha)` and `y^alpha = x` is
//!   enforced
//! - affine layer with the second constant vector

use crate::{param::RescuePrimeConfig, permutation::Permutation, structs::RescueMatrix};
use ark_ff::PrimeField;
use ark_std::{format, string::ToString, vec::Vec};
use jf_relation::{constants::GATE_WIDTH, Circuit, CircuitError, PlonkCircuit, Variable};

#[derive(Clone, Debug)]
/// Variables representing a Rescue-Prime state of any width.
pub struct RescuePrimeStateVar(pub(crate) Vec<Variable>);

impl From<Vec<Variable>> for RescuePrimeStateVar {
    fn from(vars: Vec<Variable>) -> Self {
        RescuePrimeStateVar(vars)
    }
}

impl RescuePrimeStateVar {
    /// Expose the state variables.
    pub fn vars(&self) -> &[Variable] {
        &self.0
    }

    /// Width of the state.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the state is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Trait for the Rescue-Prime permutation circuit over the native field.
pub trait RescuePrimeGadget<F: PrimeField> {
    /// Create variables holding `state`.
    fn create_rescue_prime_state_variable(
        &mut self,
        state: &[F],
    ) -> Result<RescuePrimeStateVar, CircuitError>;

    /// Enforce `output = input^alpha` elementwise.
    fn pow_alpha_state(
        &mut self,
        input_var: &RescuePrimeStateVar,
        alpha: u64,
    ) -> Result<RescuePrimeStateVar, CircuitError>;

    /// Enforce `output^alpha = input` elementwise, with `output` computed as
    /// `input^(1/alpha)`.
    fn pow_alpha_inv_state(
        &mut self,
        input_var: &RescuePrimeStateVar,
        config: &RescuePrimeConfig<F>,
    ) -> Result<RescuePrimeStateVar, CircuitError>;

    /// Enforce `output = matrix * input + constant`.
    fn affine_transform(
        &mut self,
        input_var: &RescuePrimeStateVar,
        matrix: &RescueMatrix<F>,
        constant: &[F],
    ) -> Result<RescuePrimeStateVar, CircuitError>;

    /// Given an input state st_0, return the variables of
    /// st_1 = rescue_prime_permutation(st_0) for the instance `perm`.
    fn rescue_prime_permutation(
        &mut self,
        perm: &Permutation<F>,
        input_var: &RescuePrimeStateVar,
    ) -> Result<RescuePrimeStateVar, CircuitError>;

    /// Mark every variable of the state as a public input, in order.
    fn expose_rescue_prime_state(
        &mut self,
        state_var: &RescuePrimeStateVar,
    ) -> Result<(), CircuitError>;
}

impl<F: PrimeField> RescuePrimeGadget<F> for PlonkCircuit<F> {
    fn create_rescue_prime_state_variable(
        &mut self,
        state: &[F],
    ) -> Result<RescuePrimeStateVar, CircuitError> {
        let vars = state
            .iter()
            .map(|elem| self.create_variable(*elem))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RescuePrimeStateVar(vars))
    }

    fn pow_alpha_state(
        &mut self,
        input_var: &RescuePrimeStateVar,
        alpha: u64,
    ) -> Result<RescuePrimeStateVar, CircuitError> {
        let vars = input_var
            .0
            .iter()
            .map(|&var| pow_var(self, var, alpha))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RescuePrimeStateVar(vars))
    }

    fn pow_alpha_inv_state(
        &mut self,
        input_var: &RescuePrimeStateVar,
        config: &RescuePrimeConfig<F>,
    ) -> Result<RescuePrimeStateVar, CircuitError> {
        let vars = input_var
            .0
            .iter()
            .map(|&var| {
                let root = self.witness(var)?.pow(config.alpha_inv_limbs());
                let root_var = self.create_variable(root)?;
                let back = pow_var(self, root_var, config.alpha())?;
                self.enforce_equal(back, var)?;
                Ok(root_var)
            })
            .collect::<Result<Vec<_>, CircuitError>>()?;
        Ok(RescuePrimeStateVar(vars))
    }

    fn affine_transform(
        &mut self,
        input_var: &RescuePrimeStateVar,
        matrix: &RescueMatrix<F>,
        constant: &[F],
    ) -> Result<RescuePrimeStateVar, CircuitError> {
        let width = input_var.len();
        if matrix.len() != width || constant.len() != width || matrix.check_square().is_err() {
            return Err(CircuitError::ParameterError(format!(
                "affine transform over a state of width {} needs a {}x{} matrix and {} constants",
                width, width, width, width
            )));
        }
        let vars = (0..width)
            .map(|i| lc_with_constant(self, &input_var.0, matrix.row(i), &constant[i]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RescuePrimeStateVar(vars))
    }

    fn rescue_prime_permutation(
        &mut self,
        perm: &Permutation<F>,
        input_var: &RescuePrimeStateVar,
    ) -> Result<RescuePrimeStateVar, CircuitError> {
        let config = perm.config();
        let m = config.state_size();
        if input_var.len() != m {
            return Err(CircuitError::ParameterError(format!(
                "state of width {} for a permutation of width {}",
                input_var.len(),
                m
            )));
        }
        let mds = perm.mds_matrix_ref();

        let mut state_var = input_var.clone();
        for round_constants in perm.round_constants_ref().chunks_exact(2 * m) {
            let (first, second) = round_constants.split_at(m);
            state_var = self.pow_alpha_state(&state_var, config.alpha())?;
            state_var = self.affine_transform(&state_var, mds, first)?;
            state_var = self.pow_alpha_inv_state(&state_var, config)?;
            state_var = self.affine_transform(&state_var, mds, second)?;
        }
        Ok(state_var)
    }

    fn expose_rescue_prime_state(
        &mut self,
        state_var: &RescuePrimeStateVar,
    ) -> Result<(), CircuitError> {
        state_var
            .0
            .iter()
            .try_for_each(|&var| self.set_variable_public(var))
    }
}

// x^exp by square-and-multiply, one multiplication gate per step
fn pow_var<F: PrimeField>(
    circuit: &mut PlonkCircuit<F>,
    x: Variable,
    exp: u64,
) -> Result<Variable, CircuitError> {
    if exp == 0 {
        return Err(CircuitError::ParameterError(
            "zero S-box exponent".to_string(),
        ));
    }
    let top_bit = u64::BITS - 1 - exp.leading_zeros();
    let mut acc = x;
    for bit in (0..top_bit).rev() {
        acc = circuit.mul(acc, acc)?;
        if (exp >> bit) & 1 == 1 {
            acc = circuit.mul(acc, x)?;
        }
    }
    Ok(acc)
}

// <coeffs, vars> + constant, folded into width-4 linear combination gates
fn lc_with_constant<F: PrimeField>(
    circuit: &mut PlonkCircuit<F>,
    vars: &[Variable],
    coeffs: &[F],
    constant: &F,
) -> Result<Variable, CircuitError> {
    let zero_var = circuit.zero();
    let mut terms = vars.iter().copied().zip(coeffs.iter().copied());

    let mut wires = [zero_var; GATE_WIDTH];
    let mut q = [F::zero(); GATE_WIDTH];
    for (wire, coeff) in wires.iter_mut().zip(q.iter_mut()) {
        if let Some((var, c)) = terms.next() {
            *wire = var;
            *coeff = c;
        }
    }
    let mut acc = circuit.lc(&wires, &q)?;

    // the accumulator takes the first wire of every following gate
    loop {
        let chunk: Vec<(Variable, F)> = terms.by_ref().take(GATE_WIDTH - 1).collect();
        if chunk.is_empty() {
            break;
        }
        let mut wires = [zero_var; GATE_WIDTH];
        let mut q = [F::zero(); GATE_WIDTH];
        wires[0] = acc;
        q[0] = F::one();
        for (k, (var, c)) in chunk.into_iter().enumerate() {
            wires[k + 1] = var;
            q[k + 1] = c;
        }
        acc = circuit.lc(&wires, &q)?;
    }
    circuit.add_constant(acc, constant)
}
