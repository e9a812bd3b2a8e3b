//! Select component
//!
//! `res = condition != 0 ? true_val : false_val`

use crate::components::Component;
use crate::Result;
use halo2_base::gates::GateInstructions;
use halo2_base::utils::ScalarField;
use halo2_base::{AssignedValue, Context};

/// Select component
///
/// `is_zero` turns the condition into a constrained bit, which then drives
/// the gate chip's `select`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Select;

#[derive(Debug, Clone, Copy)]
pub struct SelectInput<F: ScalarField> {
    pub condition: AssignedValue<F>,
    pub true_val: AssignedValue<F>,
    pub false_val: AssignedValue<F>,
}

impl<F: ScalarField> Component<F> for Select {
    type Input = SelectInput<F>;
    type Output = AssignedValue<F>;

    fn synthesize(
        &self,
        ctx: &mut Context<F>,
        gate: &impl GateInstructions<F>,
        input: &SelectInput<F>,
    ) -> Result<AssignedValue<F>> {
        let is_zero = gate.is_zero(ctx, input.condition);
        Ok(gate.select(ctx, input.false_val, input.true_val, is_zero))
    }
}
