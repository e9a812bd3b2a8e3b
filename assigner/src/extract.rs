//! Operand extraction
//!
//! Turns positional instruction operands into assigned cells, pointers
//! and decoded constants.

use crate::error::{AssignerError, MemoryFault};
use crate::memory::{Pointer, ProgramMemory};
use crate::stack::{Slot, StackFrame};
use crate::Result;
use assigner_ir::{Constant, Instruction, Operand, ValueId};
use blueprint::field::{fe_from_decimal, fe_to_hex, fe_to_u64, is_native};
use halo2_base::utils::ScalarField;
use halo2_base::AssignedValue;

fn malformed(inst: &Instruction, index: usize, reason: impl Into<String>) -> anyhow::Error {
    AssignerError::MalformedOperand { opcode: inst.opcode, index, reason: reason.into() }.into()
}

/// Operand at `index`
pub fn operand(inst: &Instruction, index: usize) -> Result<&Operand> {
    inst.operand(index).ok_or_else(|| {
        malformed(inst, index, format!("missing, {} operands given", inst.operands.len()))
    })
}

fn value_id(inst: &Instruction, index: usize) -> Result<ValueId> {
    operand(inst, index)?
        .value_id()
        .ok_or_else(|| malformed(inst, index, "expected a value, found a constant"))
}

fn constant(inst: &Instruction, index: usize) -> Result<&Constant> {
    match operand(inst, index)? {
        Operand::Constant(constant) => Ok(constant),
        Operand::Value { id, .. } => {
            Err(malformed(inst, index, format!("expected a constant, found {id}")))
        }
    }
}

/// Cell bound to a scalar value operand
pub fn scalar<F: ScalarField>(
    frame: &StackFrame<F>,
    inst: &Instruction,
    index: usize,
) -> Result<AssignedValue<F>> {
    frame.scalar(value_id(inst, index)?)
}

/// Cells bound to a vector value operand
pub fn vector<F: ScalarField>(
    frame: &StackFrame<F>,
    inst: &Instruction,
    index: usize,
) -> Result<Vec<AssignedValue<F>>> {
    Ok(frame.vector(value_id(inst, index)?)?.to_vec())
}

/// Two-element vector operand, such as a curve point
pub fn pair<F: ScalarField>(
    frame: &StackFrame<F>,
    inst: &Instruction,
    index: usize,
) -> Result<[AssignedValue<F>; 2]> {
    let cells = frame.vector(value_id(inst, index)?)?;
    <[AssignedValue<F>; 2]>::try_from(cells).map_err(|_| {
        AssignerError::SizeMismatch(format!(
            "{} operand {index} has {} elements, expected 2",
            inst.opcode,
            cells.len()
        ))
        .into()
    })
}

/// Integer constant, or a field constant small enough for `usize`
pub fn constant_size(inst: &Instruction, index: usize) -> Result<usize> {
    let value = match constant(inst, index)? {
        Constant::Int(value) => *value,
        Constant::Field { value, .. } => value
            .parse::<u64>()
            .map_err(|_| malformed(inst, index, format!("`{value}` is not a size")))?,
        Constant::Array(_) => return Err(malformed(inst, index, "expected a size, found an array")),
    };
    usize::try_from(value)
        .map_err(|_| malformed(inst, index, format!("{value} does not fit usize")))
}

/// Array-of-integers constant
pub fn constant_vector(inst: &Instruction, index: usize) -> Result<Vec<usize>> {
    match constant(inst, index)? {
        Constant::Array(values) => values
            .iter()
            .map(|value| {
                usize::try_from(*value)
                    .map_err(|_| malformed(inst, index, format!("{value} does not fit usize")))
            })
            .collect(),
        _ => Err(malformed(inst, index, "expected an array constant")),
    }
}

/// Field constant in the circuit field `F`
///
/// Integer constants are accepted as small field elements. Constants declared
/// over another field cannot be represented and are rejected.
pub fn field_constant<F: ScalarField>(inst: &Instruction, index: usize) -> Result<F> {
    match constant(inst, index)? {
        Constant::Int(value) => Ok(F::from(*value)),
        Constant::Field { kind, value } => {
            if !is_native::<F>(kind.modulus_hex()) {
                let reason = format!("non-native {kind} constant");
                return Err(AssignerError::Unimplemented(reason).into());
            }
            fe_from_decimal(value).ok_or_else(|| {
                malformed(inst, index, format!("`{value}` is not a decimal field element"))
            })
        }
        Constant::Array(_) => {
            Err(malformed(inst, index, "expected a field constant, found an array"))
        }
    }
}

/// Pointer held by a scalar operand
pub fn pointer<F: ScalarField>(
    frame: &StackFrame<F>,
    inst: &Instruction,
    index: usize,
) -> Result<Pointer> {
    let cell = scalar(frame, inst, index)?;
    let value = *cell.value();
    fe_to_u64(&value)
        .and_then(|ptr| Pointer::try_from(ptr).ok())
        .ok_or_else(|| {
            malformed(inst, index, format!("{} does not hold a pointer", fe_to_hex(&value)))
        })
}

/// `size` cells from a vector operand or from memory behind a pointer
pub fn input_vector<F: ScalarField>(
    inst: &Instruction,
    index: usize,
    size: usize,
    frame: &StackFrame<F>,
    memory: &ProgramMemory<F>,
) -> Result<Vec<AssignedValue<F>>> {
    match frame.get(value_id(inst, index)?)? {
        Slot::Vector(cells) => {
            if cells.len() != size {
                return Err(AssignerError::SizeMismatch(format!(
                    "{} operand {index} has {} elements, expected {size}",
                    inst.opcode,
                    cells.len()
                ))
                .into());
            }
            Ok(cells.clone())
        }
        Slot::Scalar(_) => {
            let base = pointer(frame, inst, index)?;
            (0..size)
                .map(|offset| {
                    let ptr = base.checked_add(offset).ok_or(AssignerError::Memory {
                        pointer: base,
                        fault: MemoryFault::OutOfBounds,
                    })?;
                    memory.load(ptr)
                })
                .collect()
        }
    }
}
