//! `lookup_arg_verifier` handler
//!
//! Operand layout:
//!
//! | index | operand |
//! | --- | --- |
//! | 0 | options per table (array) |
//! | 1 | table size |
//! | 2 | columns per table (array) |
//! | 3 | table size, repeated |
//! | 4 | constraints per gate (array) |
//! | 5 | gate size |
//! | 6 | lookup inputs per constraint (array) |
//! | 7 | lookup constraints size |
//! | 8 + 2i, 9 + 2i | input vector `i` and its length |
//! | 26..=29 | theta, beta, gamma, L0 |
//! | 30..=32 | V_L values, q_last, q_blind pairs |
//!
//! Input vectors, in order: alphas, gate selectors, constraint table ids,
//! lookup inputs, table selectors, table options, shifted table selectors,
//! shifted table options, sorted columns.

use crate::dispatch::AssignerState;
use crate::error::AssignerError;
use crate::extract;
use crate::handlers::emit;
use crate::Result;
use assigner_ir::Instruction;
use blueprint::components::lookup_arg_verifier::LookupArgInput;
use blueprint::components::{LookupArgVerifier, LookupParams};
use halo2_base::utils::ScalarField;
use halo2_base::AssignedValue;

const FIRST_VECTOR: usize = 8;
const THETA: usize = 26;
const V_L_VALUES: usize = 30;

fn size_mismatch(message: String) -> anyhow::Error {
    tracing::error!("lookup_arg_verifier: {}", message);
    AssignerError::SizeMismatch(message).into()
}

/// Input vector `i` and its declared length
fn sized_vector<F: ScalarField>(
    inst: &Instruction,
    state: &AssignerState<F>,
    i: usize,
) -> Result<Vec<AssignedValue<F>>> {
    let index = FIRST_VECTOR + 2 * i;
    let size = extract::constant_size(inst, index + 1)?;
    extract::input_vector(inst, index, size, &state.frame, &state.memory)
}

fn verifier(inst: &Instruction) -> Result<LookupArgVerifier> {
    let table_size = extract::constant_size(inst, 1)?;
    let repeated = extract::constant_size(inst, 3)?;
    if repeated != table_size {
        return Err(size_mismatch(format!("table size {table_size}, repeated as {repeated}")));
    }
    let gate_size = extract::constant_size(inst, 5)?;

    let params = LookupParams {
        table_lookup_options_sizes: extract::constant_vector(inst, 0)?,
        table_columns_numbers: extract::constant_vector(inst, 2)?,
        gate_constraints_sizes: extract::constant_vector(inst, 4)?,
        constraints_lookup_input_sizes: extract::constant_vector(inst, 6)?,
    };
    let component = LookupArgVerifier::new(gate_size, table_size, params)?;
    let constraints = extract::constant_size(inst, 7)?;
    if constraints != component.constraints_size() {
        return Err(size_mismatch(format!(
            "{constraints} lookup constraints, gate constraint sizes sum to {}",
            component.constraints_size()
        )));
    }
    Ok(component)
}

/// Binds `[F0, F1, F2, F3]`
pub fn handle_lookup_arg_verifier<F: ScalarField>(
    inst: &Instruction,
    state: &mut AssignerState<F>,
) -> Result<()> {
    let component = verifier(inst)?;

    let frame = &state.frame;
    let input = LookupArgInput {
        alphas: sized_vector(inst, state, 0)?,
        gate_selectors: sized_vector(inst, state, 1)?,
        constraints_table_ids: sized_vector(inst, state, 2)?,
        constraints_lookup_inputs: sized_vector(inst, state, 3)?,
        table_selectors: sized_vector(inst, state, 4)?,
        table_lookup_options: sized_vector(inst, state, 5)?,
        shifted_table_selectors: sized_vector(inst, state, 6)?,
        shifted_table_lookup_options: sized_vector(inst, state, 7)?,
        sorted: sized_vector(inst, state, 8)?,
        theta: extract::scalar(frame, inst, THETA)?,
        beta: extract::scalar(frame, inst, THETA + 1)?,
        gamma: extract::scalar(frame, inst, THETA + 2)?,
        l0: extract::scalar(frame, inst, THETA + 3)?,
        v_l_values: extract::pair(frame, inst, V_L_VALUES)?,
        q_last: extract::pair(frame, inst, V_L_VALUES + 1)?,
        q_blind: extract::pair(frame, inst, V_L_VALUES + 2)?,
    };

    let res = emit(&component, &input, state)?;
    state.frame.bind_vector(inst.id, res.to_vec());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssignerConfig;
    use crate::handlers::basic::handle_param;
    use assigner_ir::{FieldKind, InputValue, Opcode, Operand, Type, ValueId};
    use halo2_base::halo2_proofs::halo2curves::bn256::Fr;

    /// One gate with one single-input constraint, one single-column table
    /// with one option, one sorted pair
    struct Fixture {
        inputs: Vec<InputValue>,
        operands: Vec<Operand>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut fixture = Fixture {
                inputs: Vec::new(),
                operands: vec![
                    Operand::array(vec![1]),
                    Operand::int(1),
                    Operand::array(vec![1]),
                    Operand::int(1),
                    Operand::array(vec![1]),
                    Operand::int(1),
                    Operand::array(vec![1]),
                    Operand::int(1),
                ],
            };
            let vectors: [&[&str]; 8] =
                [&[], &["1"], &["1"], &["4"], &["1"], &["6"], &["1"], &["8"]];
            for values in vectors {
                let len = values.len();
                fixture.input(
                    InputValue::Vector(values.iter().map(|v| v.to_string()).collect()),
                    Type::Vector { len },
                );
                fixture.operands.push(Operand::int(len as u64));
            }
            fixture.input(InputValue::Array(vec!["9".into(), "10".into()]), Type::Pointer);
            fixture.operands.push(Operand::int(2));

            for value in ["2", "3", "5", "7"] {
                fixture.input(InputValue::Field(value.into()), Type::Field(FieldKind::Bn254Scalar));
            }
            for [a, b] in [["11", "13"], ["17", "0"], ["19", "0"]] {
                let pair = InputValue::Vector(vec![a.into(), b.into()]);
                fixture.input(pair, Type::Vector { len: 2 });
            }
            fixture
        }

        fn input(&mut self, value: InputValue, ty: Type) {
            let id = ValueId(self.inputs.len() as u32);
            self.inputs.push(value);
            self.operands.push(Operand::value(id, ty));
        }

        /// State after every input is bound, the next free cell, and the result
        fn run(&self) -> (AssignerState<Fr>, usize, Result<()>) {
            let mut state = AssignerState::<Fr>::new(&AssignerConfig::default()).unwrap();
            for index in 0..self.inputs.len() {
                let operands = vec![Operand::int(index as u64)];
                let param = Instruction::new(ValueId(index as u32), Opcode::Param, operands);
                handle_param(&param, &self.inputs, &mut state).unwrap();
            }
            let inst = Instruction::new(
                ValueId(self.inputs.len() as u32),
                Opcode::LookupArgVerifier,
                self.operands.clone(),
            );
            let start = state.next_row();
            let result = handle_lookup_arg_verifier(&inst, &mut state);
            (state, start, result)
        }
    }

    #[test]
    fn test_lookup_values() {
        let fixture = Fixture::new();
        assert_eq!(fixture.operands.len(), Opcode::LookupArgVerifier.arity());
        let (mut state, _, result) = fixture.run();
        result.unwrap();

        // theta 2, beta 3, gamma 5, L0 7, V_L (11, 13), q_last 17, q_blind 19
        // g = (1 + 3)(5 + 1 + 2*4) * (5*4 + 13 + 3*17) = 56 * 84
        // h = 5*4 + 9 + 3*10 = 59
        let id = ValueId(fixture.inputs.len() as u32);
        let res = state.frame.vector(id).unwrap();
        let values: Vec<Fr> = res.iter().map(|cell| *cell.value()).collect();
        assert_eq!(values[0], -Fr::from(70u64));
        assert_eq!(values[1], Fr::from(17u64 * 110));
        assert_eq!(values[2], Fr::from(35u64 * (11 * 4704 - 13 * 59)));
        assert_eq!(values[3], Fr::from(0u64));
        state.check().unwrap();
    }

    #[test]
    fn test_table_size_cross_check() {
        let mut fixture = Fixture::new();
        fixture.operands[3] = Operand::int(2);
        let (mut state, start, result) = fixture.run();
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignerError>(),
            Some(AssignerError::SizeMismatch(_))
        ));
        assert_eq!(state.next_row(), start);
    }

    #[test]
    fn test_constraints_size_cross_check() {
        let mut fixture = Fixture::new();
        fixture.operands[7] = Operand::int(3);
        let err = fixture.run().2.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignerError>(),
            Some(AssignerError::SizeMismatch(_))
        ));
    }

    #[test]
    fn test_short_pair() {
        let mut fixture = Fixture::new();
        let last = fixture.inputs.len() - 1;
        fixture.inputs[last] = InputValue::Vector(vec!["19".into()]);
        let err = fixture.run().2.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignerError>(),
            Some(AssignerError::SizeMismatch(_))
        ));
    }
}
