//! Unified addition for short-Weierstrass curves with `a = 0`
//!
//! One layout covers every case of the group law: either input at infinity,
//! distinct abscissas, doubling, and `P + (-P)`. The point at infinity is
//! encoded as `(0, 0)`. `(0, 0)` is never on a curve `y^2 = x^3 + b` with
//! `b != 0`, while finite points with abscissa 0 (`(0, ±2)` on BLS12-381)
//! are added like any other point.

use crate::components::Component;
use crate::Result;
use halo2_base::gates::GateInstructions;
use halo2_base::utils::ScalarField;
use halo2_base::QuantumCell::Constant;
use halo2_base::{AssignedValue, Context};

/// Unified addition component
///
/// The slope is `3 x1^2 / 2 y1` for equal abscissas and
/// `(y2 - y1) / (x2 - x1)` otherwise. In the degenerate cases (an input
/// at infinity, or the inputs cancel) the slope is forced to `0 / 1` and
/// the result is picked by selects instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnifiedAddition;

#[derive(Debug, Clone, Copy)]
pub struct UnifiedAdditionInput<F: ScalarField> {
    pub p: [AssignedValue<F>; 2],
    pub q: [AssignedValue<F>; 2],
}

fn is_infinity<F: ScalarField>(
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    [x, y]: [AssignedValue<F>; 2],
) -> AssignedValue<F> {
    let x_zero = gate.is_zero(ctx, x);
    let y_zero = gate.is_zero(ctx, y);
    gate.and(ctx, x_zero, y_zero)
}

impl<F: ScalarField> Component<F> for UnifiedAddition {
    type Input = UnifiedAdditionInput<F>;
    type Output = [AssignedValue<F>; 2];

    fn synthesize(
        &self,
        ctx: &mut Context<F>,
        gate: &impl GateInstructions<F>,
        input: &UnifiedAdditionInput<F>,
    ) -> Result<[AssignedValue<F>; 2]> {
        let [x1, y1] = input.p;
        let [x2, y2] = input.q;

        let p_inf = is_infinity(ctx, gate, input.p);
        let q_inf = is_infinity(ctx, gate, input.q);
        let same_x = gate.is_equal(ctx, x1, x2);
        let same_y = gate.is_equal(ctx, y1, y2);
        let y1_zero = gate.is_zero(ctx, y1);
        // equal abscissas cancel unless it is a doubling of a point off the x axis
        let not_same_y = gate.not(ctx, same_y);
        let opposite = gate.or(ctx, not_same_y, y1_zero);
        let cancels = gate.and(ctx, same_x, opposite);
        let any_inf = gate.or(ctx, p_inf, q_inf);
        let degenerate = gate.or(ctx, any_inf, cancels);

        let x1_sq = gate.mul(ctx, x1, x1);
        let tangent_num = gate.mul(ctx, x1_sq, Constant(F::from(3u64)));
        let tangent_den = gate.add(ctx, y1, y1);
        let chord_num = gate.sub(ctx, y2, y1);
        let chord_den = gate.sub(ctx, x2, x1);
        let num = gate.select(ctx, tangent_num, chord_num, same_x);
        let den = gate.select(ctx, tangent_den, chord_den, same_x);
        let num = gate.select(ctx, Constant(F::ZERO), num, degenerate);
        let den = gate.select(ctx, Constant(F::ONE), den, degenerate);
        let lambda = gate.div_unsafe(ctx, num, den);

        let lambda_sq = gate.mul(ctx, lambda, lambda);
        let x3 = gate.sub(ctx, lambda_sq, x1);
        let x3 = gate.sub(ctx, x3, x2);
        let dx3 = gate.sub(ctx, x1, x3);
        let y3 = gate.mul(ctx, lambda, dx3);
        let y3 = gate.sub(ctx, y3, y1);

        let mut out = [x3, y3];
        for ((cell, p), q) in out.iter_mut().zip(input.p).zip(input.q) {
            let r = gate.select(ctx, Constant(F::ZERO), *cell, cancels);
            let r = gate.select(ctx, p, r, q_inf);
            *cell = gate.select(ctx, q, r, p_inf);
        }
        Ok(out)
    }
}
