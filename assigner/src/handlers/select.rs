//! `select` handler

use crate::dispatch::AssignerState;
use crate::extract;
use crate::handlers::emit;
use crate::Result;
use assigner_ir::Instruction;
use blueprint::components::select::{Select, SelectInput};
use halo2_base::utils::ScalarField;

/// Operands: 0 condition, 1 true value, 2 false value
pub fn handle_select<F: ScalarField>(
    inst: &Instruction,
    state: &mut AssignerState<F>,
) -> Result<()> {
    let input = SelectInput {
        condition: extract::scalar(&state.frame, inst, 0)?,
        true_val: extract::scalar(&state.frame, inst, 1)?,
        false_val: extract::scalar(&state.frame, inst, 2)?,
    };
    let res = emit(&Select, &input, state)?;
    state.frame.bind_scalar(inst.id, res);
    Ok(())
}
