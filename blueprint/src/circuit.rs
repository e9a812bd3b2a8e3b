//! Exported circuit records and the satisfiability check
//!
//! A mock-mode `BaseCircuitBuilder` keeps the gate selectors, constants and
//! copy constraints next to the advice values. [`CircuitDescription`] is the
//! structural half, [`AssignmentTable`] the witness half; [`check`] runs the
//! builder through halo2's `MockProver`.

use crate::field::{fe_from_hex, fe_to_hex};
use crate::{BlueprintError, Result};
use anyhow::anyhow;
use halo2_base::gates::circuit::{builder::BaseCircuitBuilder, BaseCircuitParams};
use halo2_base::halo2_proofs::dev::MockProver;
use halo2_base::utils::ScalarField;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Column layout, gate positions and copy constraints of one circuit
///
/// Offsets index the single advice column of the main context; the
/// physical column split is fixed by `advice_columns` and `k`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CircuitDescription {
    pub k: usize,
    pub advice_columns: usize,
    pub fixed_columns: usize,
    pub instance_columns: usize,
    /// Advice cells used
    pub rows: usize,
    /// Offsets where the basic gate `a + b * c = d` starts
    pub gates: Vec<usize>,
    /// Advice cells constrained equal, sorted
    pub copies: Vec<(usize, usize)>,
    /// Advice cells fixed to a constant (hex), sorted
    pub constants: Vec<(usize, String)>,
    /// Advice cells exposed in instance column 0, in order
    pub public_inputs: Vec<usize>,
}

impl CircuitDescription {
    /// Read the structure out of a synthesized builder
    pub fn from_builder<F: ScalarField>(
        builder: &mut BaseCircuitBuilder<F>,
        params: &BaseCircuitParams,
    ) -> Result<Self> {
        let public_inputs = builder
            .assigned_instances
            .first()
            .map(|column| {
                column.iter().filter_map(|value| value.cell.map(|cell| cell.offset)).collect()
            })
            .unwrap_or_default();

        let ctx = builder.main(0);
        let gates = ctx
            .selector
            .iter()
            .enumerate()
            .filter_map(|(offset, enabled)| enabled.then_some(offset))
            .collect();
        let rows = ctx.advice.len();

        let manager = ctx
            .copy_manager
            .lock()
            .map_err(|_| anyhow!("copy constraint manager lock poisoned"))?;
        let mut copies: Vec<(usize, usize)> = manager
            .advice_equalities
            .iter()
            .map(|(left, right)| (left.offset.min(right.offset), left.offset.max(right.offset)))
            .collect();
        copies.sort_unstable();
        let mut constants: Vec<(usize, String)> = manager
            .constant_equalities
            .iter()
            .map(|(constant, cell)| (cell.offset, fe_to_hex(constant)))
            .collect();
        constants.sort_unstable();

        Ok(Self {
            k: params.k,
            advice_columns: params.num_advice_per_phase.first().copied().unwrap_or(0),
            fixed_columns: params.num_fixed,
            instance_columns: params.num_instance_columns,
            rows,
            gates,
            copies,
            constants,
            public_inputs,
        })
    }

    /// SHA-256 of the serialized description, hex encoded
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

/// Advice and public-input values of one circuit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(bound = "F: ScalarField")]
pub struct AssignmentTable<F> {
    #[serde(with = "hex_values")]
    pub advice: Vec<F>,
    #[serde(with = "hex_values")]
    pub public_inputs: Vec<F>,
}

impl<F: ScalarField> AssignmentTable<F> {
    /// Read the witness out of a synthesized builder
    pub fn from_builder(builder: &mut BaseCircuitBuilder<F>) -> Self {
        let public_inputs = builder
            .assigned_instances
            .first()
            .map(|column| column.iter().map(|value| *value.value()).collect())
            .unwrap_or_default();
        let advice = builder.main(0).advice.iter().map(|cell| cell.evaluate()).collect();
        Self { advice, public_inputs }
    }

    pub fn rows_amount(&self) -> usize {
        self.advice.len()
    }

    pub fn value(&self, offset: usize) -> Option<F> {
        self.advice.get(offset).copied()
    }
}

mod hex_values {
    use crate::field::{fe_from_hex, fe_to_hex};
    use halo2_base::utils::ScalarField;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<F: ScalarField, S: Serializer>(
        values: &[F],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(fe_to_hex))
    }

    pub fn deserialize<'de, F: ScalarField, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<F>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|text| {
                fe_from_hex(text)
                    .ok_or_else(|| D::Error::custom(format!("invalid field element {text}")))
            })
            .collect()
    }
}

/// Constant (hex) at `offset` of `description`, decoded
pub fn constant_at<F: ScalarField>(description: &CircuitDescription, offset: usize) -> Option<F> {
    description
        .constants
        .iter()
        .find(|(cell, _)| *cell == offset)
        .and_then(|(_, text)| fe_from_hex(text))
}

/// Run the builder through `MockProver` with its assigned public inputs
///
/// Every failure is logged with the cell values halo2 reports for it.
/// The builder's parameters must already be fixed (see
/// [`PolicyManager::layout`](crate::PolicyManager::layout)).
pub fn check<F: ScalarField>(builder: &BaseCircuitBuilder<F>) -> Result<()> {
    let k = u32::try_from(builder.config_params.k)?;
    let instances: Vec<Vec<F>> = builder
        .assigned_instances
        .iter()
        .map(|column| column.iter().map(|value| *value.value()).collect())
        .collect();
    let prover = MockProver::run(k, builder, instances)
        .map_err(|err| anyhow!("mock prover failed: {err:?}"))?;
    if let Err(failures) = prover.verify() {
        for failure in &failures {
            tracing::error!("{failure}");
        }
        let first = failures.first().map(ToString::to_string).unwrap_or_default();
        return Err(BlueprintError::Unsatisfied { failures: failures.len(), first }.into());
    }
    tracing::debug!("MockProver satisfied at k = {k}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyManager;
    use halo2_base::gates::{GateChip, GateInstructions};
    use halo2_base::halo2_proofs::halo2curves::bn256::Fr;
    use halo2_base::QuantumCell::Constant;

    /// out = a * b + 5, with `a` exposed as a public input
    fn build(a: u64, b: u64) -> (BaseCircuitBuilder<Fr>, BaseCircuitParams) {
        let policy = PolicyManager::default();
        let mut builder = policy.builder::<Fr>();
        let gate = GateChip::<Fr>::default();
        let ctx = builder.main(0);
        let a = ctx.load_witness(Fr::from(a));
        let b = ctx.load_witness(Fr::from(b));
        let out = gate.mul_add(ctx, a, b, Constant(Fr::from(5)));
        let copy = ctx.load_witness(*out.value());
        ctx.constrain_equal(&out, &copy);
        builder.assigned_instances[0].push(a);
        let params = policy.layout(&mut builder).unwrap();
        (builder, params)
    }

    #[test]
    fn test_export() {
        let (mut builder, params) = build(6, 7);
        let circuit = CircuitDescription::from_builder(&mut builder, &params).unwrap();
        let table = AssignmentTable::from_builder(&mut builder);

        // a, b, then | 5 | a | b | 47 |, then the copy
        assert_eq!(circuit.rows, 7);
        assert_eq!(circuit.gates, vec![2]);
        assert_eq!(circuit.copies, vec![(0, 3), (1, 4), (5, 6)]);
        assert_eq!(circuit.public_inputs, vec![0]);
        assert_eq!(constant_at::<Fr>(&circuit, 2), Some(Fr::from(5)));
        assert_eq!(table.value(5), Some(Fr::from(47)));
        assert_eq!(table.public_inputs, vec![Fr::from(6)]);
        assert_eq!(table.rows_amount(), 7);

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<AssignmentTable<Fr>>(&json).unwrap(), table);
    }

    #[test]
    fn test_check() {
        let (builder, _) = build(6, 7);
        check(&builder).unwrap();
    }

    #[test]
    fn test_check_reports_cell_values() {
        let (mut builder, _) = build(6, 7);
        let ctx = builder.main(0);
        let out = ctx.get(5);
        out.debug_prank(ctx, Fr::from(46));

        let err = check(&builder).unwrap_err();
        match err.downcast_ref::<BlueprintError>() {
            Some(BlueprintError::Unsatisfied { failures, first }) => {
                assert!(*failures >= 1);
                assert!(first.contains("not satisfied"), "{first}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_fingerprint_ignores_values() {
        let (mut first, params) = build(6, 7);
        let (mut second, _) = build(2, 3);
        let a = CircuitDescription::from_builder(&mut first, &params).unwrap();
        let b = CircuitDescription::from_builder(&mut second, &params).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
        assert_ne!(
            AssignmentTable::from_builder(&mut first),
            AssignmentTable::from_builder(&mut second)
        );
    }

    #[test]
    fn test_table_rejects_bad_hex() {
        let json = r#"{"advice":["zz"],"public_inputs":[]}"#;
        assert!(serde_json::from_str::<AssignmentTable<Fr>>(json).is_err());
    }
}
