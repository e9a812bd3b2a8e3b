//! `curve_add` handler and curve dispatch

use crate::dispatch::AssignerState;
use crate::error::AssignerError;
use crate::extract;
use crate::handlers::emit;
use crate::Result;
use assigner_ir::{CurveKind, Instruction, Type};
use blueprint::components::unified_addition::{UnifiedAddition, UnifiedAdditionInput};
use blueprint::field::is_native;
use halo2_base::utils::ScalarField;

fn curve_kind(inst: &Instruction, index: usize) -> Result<CurveKind> {
    match extract::operand(inst, index)?.ty() {
        Some(Type::Curve(kind)) => Ok(kind),
        other => Err(AssignerError::MalformedOperand {
            opcode: inst.opcode,
            index,
            reason: format!("expected a curve point, found {other:?}"),
        }
        .into()),
    }
}

/// Operands: 0, 1 points on the same curve; binds `[x, y]` of the sum
///
/// Points on a curve whose base field is the circuit field use the unified
/// addition component. Twisted Edwards addition and foreign-field arithmetic
/// are not available.
pub fn handle_curve_add<F: ScalarField>(
    inst: &Instruction,
    state: &mut AssignerState<F>,
) -> Result<()> {
    let kind = curve_kind(inst, 0)?;
    let other = curve_kind(inst, 1)?;
    if other != kind {
        return Err(AssignerError::MalformedOperand {
            opcode: inst.opcode,
            index: 1,
            reason: format!("cannot add a {other} point to a {kind} point"),
        }
        .into());
    }
    let native = is_native::<F>(kind.base_field().modulus_hex());

    let sum = match kind {
        CurveKind::Pallas
        | CurveKind::Vesta
        | CurveKind::Bn254
        | CurveKind::Secp256k1
        | CurveKind::Bls12381 => {
            if !native {
                let reason = format!("non-native {kind} addition");
                return Err(AssignerError::Unimplemented(reason).into());
            }
            let input = UnifiedAdditionInput {
                p: extract::pair(&state.frame, inst, 0)?,
                q: extract::pair(&state.frame, inst, 1)?,
            };
            emit(&UnifiedAddition, &input, state)?
        }
        CurveKind::Curve25519 => {
            let reason = if native {
                "native curve25519 addition"
            } else {
                "non-native curve25519 addition"
            };
            return Err(AssignerError::Unimplemented(reason.to_string()).into());
        }
    };
    state.frame.bind_vector(inst.id, sum.to_vec());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssignerConfig;
    use crate::handlers::basic::handle_param;
    use assigner_ir::{InputValue, Opcode, Operand, ValueId};
    use halo2_base::halo2_proofs::halo2curves::bn256::{Fq, Fr};

    fn program_state<F: ScalarField>(kind: CurveKind) -> (AssignerState<F>, Instruction) {
        let mut state = AssignerState::<F>::new(&AssignerConfig::default()).unwrap();
        let inputs = vec![
            InputValue::Curve { x: "1".into(), y: "2".into() },
            InputValue::Curve { x: "1".into(), y: "2".into() },
        ];
        for id in 0..2u32 {
            let index = Operand::int(u64::from(id));
            let inst = Instruction::new(ValueId(id), Opcode::Param, vec![index]);
            handle_param(&inst, &inputs, &mut state).unwrap();
        }
        let ty = Type::Curve(kind);
        let add = Instruction::new(
            ValueId(2),
            Opcode::CurveAdd,
            vec![Operand::value(ValueId(0), ty), Operand::value(ValueId(1), ty)],
        );
        (state, add)
    }

    fn unimplemented(err: anyhow::Error) -> bool {
        matches!(err.downcast_ref::<AssignerError>(), Some(AssignerError::Unimplemented(_)))
    }

    #[test]
    fn test_native_doubling() {
        let (mut state, add) = program_state::<Fq>(CurveKind::Bn254);
        handle_curve_add(&add, &mut state).unwrap();

        let sum = state.frame.vector(ValueId(2)).unwrap().to_vec();
        let x: Fq = blueprint::field::fe_from_decimal(
            "1368015179489954701390400359078579693043519447331113978918064868415326638035",
        )
        .unwrap();
        assert_eq!(*sum[0].value(), x);
        assert!(state.ctx().selector.iter().any(|enabled| *enabled));
        state.check().unwrap();
    }

    #[test]
    fn test_every_kind_is_handled() {
        for kind in CurveKind::ALL {
            let (mut state, add) = program_state::<Fr>(kind);
            // no curve has Fr as its base field
            let inputs_end = state.next_row();
            assert!(unimplemented(handle_curve_add(&add, &mut state).unwrap_err()), "{kind}");
            assert_eq!(state.next_row(), inputs_end);
        }
        for kind in CurveKind::ALL {
            let (mut state, add) = program_state::<Fq>(kind);
            let result = handle_curve_add(&add, &mut state);
            if kind == CurveKind::Bn254 {
                assert!(result.is_ok());
            } else {
                assert!(unimplemented(result.unwrap_err()), "{kind}");
            }
        }
    }

    #[test]
    fn test_mixed_curves_rejected() {
        let (mut state, mut add) = program_state::<Fq>(CurveKind::Bn254);
        add.operands[1] = Operand::value(ValueId(1), Type::Curve(CurveKind::Pallas));
        let err = handle_curve_add(&add, &mut state).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssignerError>(),
            Some(AssignerError::MalformedOperand { index: 1, .. })
        ));
    }
}
