//! Instruction handlers
//!
//! One handler per opcode. Component handlers extract operands, construct the
//! component, emit it through [`emit`] and bind its output.

use crate::dispatch::AssignerState;
use crate::Result;
use blueprint::Component;
use halo2_base::utils::ScalarField;

pub mod basic;
pub mod curves;
pub mod fri_cosets;
pub mod gate_arg_verifier;
pub mod lookup_arg_verifier;
pub mod select;

/// Lay out `component` after the last cell of the main context
///
/// # Returns
/// The component's output cells
pub(crate) fn emit<F: ScalarField, C: Component<F>>(
    component: &C,
    input: &C::Input,
    state: &mut AssignerState<F>,
) -> Result<C::Output> {
    let AssignerState { builder, gate, .. } = state;
    component.synthesize(builder.main(0), gate, input)
}
