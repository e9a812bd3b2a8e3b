//! FRI cosets component
//!
//! Decomposes an index `x < 2^k` into bits and produces, for the first `n`
//! folding rounds, the coset pair `(s_i, -s_i)` together with the bit that
//! selects the sign.

use crate::components::Component;
use crate::field::{fe_to_hex, fe_to_u64};
use crate::{BlueprintError, Result};
use halo2_base::gates::GateInstructions;
use halo2_base::utils::ScalarField;
use halo2_base::QuantumCell::Constant;
use halo2_base::{AssignedValue, Context};

/// FRI cosets component
///
/// The bits of `x` (most significant first) drive a square-and-multiply
/// from 1 to `y_0 = omega^x`. Round `i` then outputs
/// `s_i = b_i ? -y_i : y_i` and `-s_i`, with `y_{i+1} = y_i^2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriCosets<F> {
    result_length: usize,
    total_bits: usize,
    omega: F,
}

impl<F: ScalarField> FriCosets<F> {
    /// # Arguments
    /// * `result_length` - Number of output triples `n`
    /// * `total_bits` - Bit width `k` of the input index, `n <= k <= 64`
    /// * `omega` - Generator of the evaluation domain
    pub fn new(result_length: usize, total_bits: usize, omega: F) -> Result<Self> {
        if result_length == 0 || result_length > total_bits || total_bits > 64 {
            return Err(BlueprintError::InvalidParameters(format!(
                "fri cosets need 1 <= result_length <= total_bits <= 64, \
                 got {result_length} and {total_bits}"
            ))
            .into());
        }
        Ok(Self { result_length, total_bits, omega })
    }

    pub fn result_length(&self) -> usize {
        self.result_length
    }

    pub fn total_bits(&self) -> usize {
        self.total_bits
    }
}

impl<F: ScalarField> Component<F> for FriCosets<F> {
    /// The index `x`
    type Input = AssignedValue<F>;
    /// `[s_i, -s_i, b_i]` for `i < result_length`
    type Output = Vec<[AssignedValue<F>; 3]>;

    fn synthesize(
        &self,
        ctx: &mut Context<F>,
        gate: &impl GateInstructions<F>,
        x: &AssignedValue<F>,
    ) -> Result<Vec<[AssignedValue<F>; 3]>> {
        let k = self.total_bits;
        let value = *x.value();
        if !fe_to_u64(&value).is_some_and(|index| k == 64 || index >> k == 0) {
            return Err(BlueprintError::ValueRange { value: fe_to_hex(&value), bits: k }.into());
        }
        // little endian, recomposition and booleanity constrained
        let bits = gate.num_to_bits(ctx, *x, k);

        let omega_minus_one = self.omega - F::ONE;
        let mut y = ctx.load_constant(F::ONE);
        for bit in bits.iter().rev() {
            let factor = gate.mul_add(ctx, *bit, Constant(omega_minus_one), Constant(F::ONE));
            let square = gate.mul(ctx, y, y);
            y = gate.mul(ctx, square, factor);
        }

        let mut output = Vec::with_capacity(self.result_length);
        for (round, bit) in bits.iter().rev().take(self.result_length).enumerate() {
            let neg_y = gate.neg(ctx, y);
            let s = gate.select(ctx, neg_y, y, *bit);
            let neg_s = gate.neg(ctx, s);
            output.push([s, neg_s, *bit]);
            if round + 1 < self.result_length {
                y = gate.mul(ctx, y, y);
            }
        }
        Ok(output)
    }
}
