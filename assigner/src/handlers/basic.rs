//! Program inputs and memory: `param`, `alloca`, `load`

use crate::dispatch::AssignerState;
use crate::error::{AssignerError, MemoryFault};
use crate::extract;
use crate::memory::Pointer;
use crate::Result;
use anyhow::anyhow;
use assigner_ir::{InputValue, Instruction};
use blueprint::field::{element_bytes, fe_from_decimal};
use halo2_base::utils::ScalarField;
use halo2_base::AssignedValue;

/// Public-input column program inputs are appended to
const INPUT_COLUMN: usize = 0;

fn parse_inputs<F: ScalarField>(
    inst: &Instruction,
    index: usize,
    values: &[&String],
) -> Result<Vec<F>> {
    values
        .iter()
        .map(|text| {
            fe_from_decimal(text).ok_or_else(|| {
                AssignerError::MalformedOperand {
                    opcode: inst.opcode,
                    index: 0,
                    reason: format!("input {index} holds `{text}`, not a decimal field element"),
                }
                .into()
            })
        })
        .collect()
}

fn public_inputs<F: ScalarField>(
    state: &mut AssignerState<F>,
    values: Vec<F>,
) -> Result<Vec<AssignedValue<F>>> {
    let cells = state.ctx().assign_witnesses(values);
    let column = state
        .builder
        .assigned_instances
        .get_mut(INPUT_COLUMN)
        .ok_or_else(|| anyhow!("builder has no instance column {INPUT_COLUMN}"))?;
    column.extend(cells.iter().copied());
    Ok(cells)
}

/// Pointer value as a fixed constant
fn pointer_cell<F: ScalarField>(state: &mut AssignerState<F>, ptr: Pointer) -> AssignedValue<F> {
    state.ctx().load_constant(F::from(ptr as u64))
}

/// Bind input `operand 0` of the program
///
/// Field elements, vectors and curve points become public inputs bound in the
/// frame; arrays become public inputs stored in fresh memory, bound as a
/// pointer.
pub fn handle_param<F: ScalarField>(
    inst: &Instruction,
    inputs: &[InputValue],
    state: &mut AssignerState<F>,
) -> Result<()> {
    let index = extract::constant_size(inst, 0)?;
    let input = inputs.get(index).ok_or(AssignerError::UnknownInput(index))?;

    match input {
        InputValue::Field(text) => {
            let values = parse_inputs(inst, index, &[text])?;
            let cells = public_inputs(state, values)?;
            state.frame.bind_scalar(inst.id, cells[0]);
        }
        InputValue::Vector(texts) => {
            let values = parse_inputs(inst, index, &texts.iter().collect::<Vec<_>>())?;
            let cells = public_inputs(state, values)?;
            state.frame.bind_vector(inst.id, cells);
        }
        InputValue::Curve { x, y } => {
            let values = parse_inputs(inst, index, &[x, y])?;
            let cells = public_inputs(state, values)?;
            state.frame.bind_vector(inst.id, cells);
        }
        InputValue::Array(texts) => {
            let values = parse_inputs(inst, index, &texts.iter().collect::<Vec<_>>())?;
            let cells = public_inputs(state, values)?;
            let base = state.memory.allocate(cells.len(), element_bytes::<F>())?;
            for (offset, cell) in cells.into_iter().enumerate() {
                state.memory.store(base + offset, cell)?;
            }
            let ptr = pointer_cell(state, base);
            state.frame.bind_scalar(inst.id, ptr);
        }
    }
    Ok(())
}

/// Allocate `operand 0` cells and bind a pointer to the first
pub fn handle_alloca<F: ScalarField>(
    inst: &Instruction,
    state: &mut AssignerState<F>,
) -> Result<()> {
    let count = extract::constant_size(inst, 0)?;
    let base = state.memory.allocate(count, element_bytes::<F>())?;
    let ptr = pointer_cell(state, base);
    state.frame.bind_scalar(inst.id, ptr);
    Ok(())
}

/// Bind the cell stored at `operand 0 + operand 1`
pub fn handle_load<F: ScalarField>(inst: &Instruction, state: &mut AssignerState<F>) -> Result<()> {
    let base = extract::pointer(&state.frame, inst, 0)?;
    let offset = extract::constant_size(inst, 1)?;
    let ptr = base
        .checked_add(offset)
        .ok_or(AssignerError::Memory { pointer: base, fault: MemoryFault::OutOfBounds })?;
    let cell = state.memory.load(ptr)?;
    state.frame.bind_scalar(inst.id, cell);
    Ok(())
}
