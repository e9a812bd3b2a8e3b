//! `fri_cosets` handler

use crate::dispatch::AssignerState;
use crate::error::{AssignerError, MemoryFault};
use crate::extract;
use crate::handlers::emit;
use crate::Result;
use assigner_ir::Instruction;
use blueprint::components::FriCosets;
use blueprint::field::element_bytes;
use halo2_base::utils::ScalarField;

/// Operands: 0 result pointer, 1 result length, 2 omega, 3 total bits, 4 input
///
/// Stores `[s_i, -s_i, b_i]` for every output round at consecutive cells
/// starting at the result pointer.
pub fn handle_fri_cosets<F: ScalarField>(
    inst: &Instruction,
    state: &mut AssignerState<F>,
) -> Result<()> {
    let result = extract::pointer(&state.frame, inst, 0)?;
    let result_length = extract::constant_size(inst, 1)?;
    let omega = extract::field_constant::<F>(inst, 2)?;
    let total_bits = extract::constant_size(inst, 3)?;
    let input = extract::scalar(&state.frame, inst, 4)?;
    let component = FriCosets::new(result_length, total_bits, omega)?;

    let end = 3usize
        .checked_mul(result_length)
        .and_then(|cells| result.checked_add(cells))
        .ok_or(AssignerError::Memory { pointer: result, fault: MemoryFault::OutOfBounds })?;
    let expected = element_bytes::<F>();
    for ptr in result..end {
        let size = state.memory.cell_size(ptr)?;
        if size != expected {
            tracing::error!(
                "fri_cosets result cell {} is {} bytes, field elements are {}",
                ptr,
                size,
                expected
            );
            return Err(AssignerError::SizeMismatch(format!(
                "result cell {ptr} holds {size} bytes, expected {expected}"
            ))
            .into());
        }
    }

    let output = emit(&component, &input, state)?;
    for (offset, cell) in output.iter().flatten().enumerate() {
        state.memory.store(result + offset, *cell)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssignerConfig;
    use crate::handlers::basic::{handle_alloca, handle_param};
    use assigner_ir::{FieldKind, InputValue, Opcode, Operand, Type, ValueId};
    use halo2_base::halo2_proofs::halo2curves::bn256::Fr;

    fn fri_cosets(n: u64, k: u64) -> Instruction {
        Instruction::new(
            ValueId(2),
            Opcode::FriCosets,
            vec![
                Operand::value(ValueId(1), Type::Pointer),
                Operand::int(n),
                Operand::int(3),
                Operand::int(k),
                Operand::value(ValueId(0), Type::Field(FieldKind::Bn254Scalar)),
            ],
        )
    }

    fn setup(cells: u64) -> AssignerState<Fr> {
        let mut state = AssignerState::<Fr>::new(&AssignerConfig::default()).unwrap();
        let inputs = vec![InputValue::Field("5".into())];
        let param = Instruction::new(ValueId(0), Opcode::Param, vec![Operand::int(0)]);
        handle_param(&param, &inputs, &mut state).unwrap();
        let alloca = Instruction::new(ValueId(1), Opcode::Alloca, vec![Operand::int(cells)]);
        handle_alloca(&alloca, &mut state).unwrap();
        state
    }

    fn stored(state: &AssignerState<Fr>, ptr: usize) -> Fr {
        *state.memory.load(ptr).unwrap().value()
    }

    fn bind_pointer(state: &mut AssignerState<Fr>, ptr: u64) {
        let cell = state.ctx().load_constant(Fr::from(ptr));
        state.frame.bind_scalar(ValueId(1), cell);
    }

    #[test]
    fn test_stores_cosets() {
        let mut state = setup(6);
        handle_fri_cosets(&fri_cosets(2, 4), &mut state).unwrap();

        // x = 0b0101, omega = 3: y_0 = 3^5, first bit 0, second bit 1
        let y0 = Fr::from(243u64);
        let y1 = Fr::from(59049u64);
        let expected = [y0, -y0, Fr::from(0u64), -y1, y1, Fr::from(1u64)];
        for (offset, value) in expected.into_iter().enumerate() {
            assert_eq!(stored(&state, 1 + offset), value, "cell {offset}");
        }
        state.check().unwrap();
    }

    #[test]
    fn test_result_cell_size_checked() {
        let mut state = setup(6);
        // a second allocation with a cell size that cannot hold a field element
        let narrow = state.memory.allocate(6, 8).unwrap();
        bind_pointer(&mut state, narrow as u64);
        let start = state.next_row();

        let err = handle_fri_cosets(&fri_cosets(2, 4), &mut state).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignerError>(),
            Some(AssignerError::SizeMismatch(_))
        ));
        assert_eq!(state.next_row(), start);
    }

    #[test]
    fn test_result_outside_allocation() {
        let mut state = setup(3);
        let err = handle_fri_cosets(&fri_cosets(2, 4), &mut state).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignerError>(),
            Some(AssignerError::Memory { pointer: 4, .. })
        ));
    }

    #[test]
    fn test_result_range_past_address_space() {
        let mut state = setup(6);
        bind_pointer(&mut state, u64::MAX - 2);
        let start = state.next_row();

        let err = handle_fri_cosets(&fri_cosets(2, 4), &mut state).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignerError>(),
            Some(AssignerError::Memory { fault: MemoryFault::OutOfBounds, .. })
        ));
        assert_eq!(state.next_row(), start);
    }

    #[test]
    fn test_parameters_checked_before_memory() {
        let mut state = setup(6);
        let err = handle_fri_cosets(&fri_cosets(u64::MAX / 2, 4), &mut state).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<blueprint::BlueprintError>(),
            Some(blueprint::BlueprintError::InvalidParameters(_))
        ));
    }
}
