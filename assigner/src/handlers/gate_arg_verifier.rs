//! `gate_arg_verifier` handler

use crate::dispatch::AssignerState;
use crate::error::AssignerError;
use crate::extract;
use crate::handlers::emit;
use crate::Result;
use assigner_ir::Instruction;
use blueprint::components::gate_arg_verifier::GateArgInput;
use blueprint::components::GateArgVerifier;
use halo2_base::utils::ScalarField;

/// Operands: 0 selectors, 1 gates sizes, 2 gates amount, 3 constraints,
/// 4 constraints amount, 5 theta
pub fn handle_gate_arg_verifier<F: ScalarField>(
    inst: &Instruction,
    state: &mut AssignerState<F>,
) -> Result<()> {
    let gates_sizes = extract::constant_vector(inst, 1)?;
    let gates_amount = extract::constant_size(inst, 2)?;
    let constraints_amount = extract::constant_size(inst, 4)?;

    let sum = gates_sizes.iter().try_fold(0usize, |total, size| total.checked_add(*size));
    if gates_sizes.len() != gates_amount || sum != Some(constraints_amount) {
        let sum = sum.map_or_else(|| "overflow".to_string(), |sum| sum.to_string());
        tracing::error!(
            "Gate sizes do not match: {} gates, {} sizes; {} constraints, sizes sum to {}",
            gates_amount,
            gates_sizes.len(),
            constraints_amount,
            sum
        );
        return Err(AssignerError::SizeMismatch(format!(
            "gates amount {gates_amount}, sizes amount {}, constraints {constraints_amount}, \
             sizes sum {sum}",
            gates_sizes.len()
        ))
        .into());
    }

    let component = GateArgVerifier::new(gates_sizes)?;
    let input = GateArgInput {
        selectors: extract::input_vector(inst, 0, gates_amount, &state.frame, &state.memory)?,
        constraints: extract::input_vector(
            inst,
            3,
            constraints_amount,
            &state.frame,
            &state.memory,
        )?,
        theta: extract::scalar(&state.frame, inst, 5)?,
    };
    let res = emit(&component, &input, state)?;
    state.frame.bind_scalar(inst.id, res);
    Ok(())
}
