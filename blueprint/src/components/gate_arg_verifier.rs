//! Gate-argument verifier
//!
//! Folds gate constraint evaluations with powers of `theta` and weights each
//! gate by its selector:
//!
//! `F = sum_g q_g * sum_{j in g} theta^t(j) * C_j`
//!
//! where `t` counts constraints across all gates, starting at 0.

use crate::components::Component;
use crate::{BlueprintError, Result};
use halo2_base::gates::GateInstructions;
use halo2_base::utils::ScalarField;
use halo2_base::QuantumCell::Existing;
use halo2_base::{AssignedValue, Context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateArgVerifier {
    gates_sizes: Vec<usize>,
    constraints_amount: usize,
}

#[derive(Debug, Clone)]
pub struct GateArgInput<F: ScalarField> {
    pub theta: AssignedValue<F>,
    /// Constraint evaluations, gate after gate
    pub constraints: Vec<AssignedValue<F>>,
    /// One selector evaluation per gate
    pub selectors: Vec<AssignedValue<F>>,
}

impl GateArgVerifier {
    /// # Arguments
    /// * `gates_sizes` - Number of constraints of each gate; at least one gate
    pub fn new(gates_sizes: Vec<usize>) -> Result<Self> {
        if gates_sizes.is_empty() {
            return Err(BlueprintError::InvalidParameters(
                "gate argument verifier needs at least one gate".to_string(),
            )
            .into());
        }
        let constraints_amount = gates_sizes
            .iter()
            .try_fold(0usize, |total, size| total.checked_add(*size))
            .ok_or_else(|| BlueprintError::InvalidParameters("gate sizes overflow".to_string()))?;
        Ok(Self { gates_sizes, constraints_amount })
    }

    pub fn gates_sizes(&self) -> &[usize] {
        &self.gates_sizes
    }

    pub fn constraints_amount(&self) -> usize {
        self.constraints_amount
    }
}

pub(crate) fn check_length<T>(name: &'static str, expected: usize, cells: &[T]) -> Result<()> {
    if cells.len() != expected {
        return Err(BlueprintError::InputLength { name, expected, found: cells.len() }.into());
    }
    Ok(())
}

impl<F: ScalarField> Component<F> for GateArgVerifier {
    type Input = GateArgInput<F>;
    type Output = AssignedValue<F>;

    fn synthesize(
        &self,
        ctx: &mut Context<F>,
        gate: &impl GateInstructions<F>,
        input: &GateArgInput<F>,
    ) -> Result<AssignedValue<F>> {
        let total = self.constraints_amount;
        check_length("constraints", total, &input.constraints)?;
        check_length("selectors", self.gates_sizes.len(), &input.selectors)?;

        let mut powers = Vec::with_capacity(total);
        if total > 0 {
            powers.push(ctx.load_constant(F::ONE));
        }
        for i in 1..total {
            let next = gate.mul(ctx, powers[i - 1], input.theta);
            powers.push(next);
        }

        let mut offset = 0;
        let mut sums = Vec::with_capacity(self.gates_sizes.len());
        for size in &self.gates_sizes {
            let range = offset..offset + size;
            offset += size;
            let sum = gate.inner_product(
                ctx,
                input.constraints[range.clone()].iter().copied(),
                powers[range].iter().copied().map(Existing),
            );
            sums.push(sum);
        }
        Ok(gate.inner_product(ctx, input.selectors.iter().copied(), sums.into_iter().map(Existing)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo2_base::halo2_proofs::halo2curves::bn256::Fr;
    use halo2_base::utils::testing::base_test;

    fn expected(theta: Fr, sizes: &[usize], constraints: &[Fr], selectors: &[Fr]) -> Fr {
        let mut power = Fr::from(1u64);
        let mut result = Fr::from(0u64);
        let mut constraints = constraints.iter();
        for (size, selector) in sizes.iter().zip(selectors) {
            let mut sum = Fr::from(0u64);
            for c in constraints.by_ref().take(*size) {
                sum += power * c;
                power *= theta;
            }
            result += *selector * sum;
        }
        result
    }

    fn run(sizes: &[usize], theta: Fr, constraints: &[Fr], selectors: &[Fr]) -> Result<Fr> {
        let verifier = GateArgVerifier::new(sizes.to_vec())?;
        base_test().run_gate(|ctx, gate| {
            let input = GateArgInput {
                theta: ctx.load_witness(theta),
                constraints: ctx.assign_witnesses(constraints.iter().copied()),
                selectors: ctx.assign_witnesses(selectors.iter().copied()),
            };
            Ok(*verifier.synthesize(ctx, gate, &input)?.value())
        })
    }

    #[test]
    fn test_folds_gates() {
        let sizes = [2, 3, 1];
        let theta = Fr::from(7u64);
        let constraints: Vec<Fr> = (1..=6u64).map(|v| Fr::from(v * 11)).collect();
        let selectors = [Fr::from(3u64), Fr::from(0u64), -Fr::from(5u64)];
        assert_eq!(
            run(&sizes, theta, &constraints, &selectors).unwrap(),
            expected(theta, &sizes, &constraints, &selectors)
        );
    }

    #[test]
    fn test_single_constraint() {
        let result = run(&[1], Fr::from(2u64), &[Fr::from(9u64)], &[Fr::from(4u64)]).unwrap();
        assert_eq!(result, Fr::from(36u64));
    }

    #[test]
    fn test_empty_gate() {
        let constraints = [Fr::from(5u64), Fr::from(6u64)];
        let selectors = [Fr::from(2u64), Fr::from(9u64), Fr::from(3u64)];
        // the middle gate contributes nothing
        let result = run(&[1, 0, 1], Fr::from(10u64), &constraints, &selectors).unwrap();
        assert_eq!(result, Fr::from(2 * 5 + 3 * 60u64));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(GateArgVerifier::new(Vec::new()).is_err());
        let err = GateArgVerifier::new(vec![usize::MAX, 2]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BlueprintError>(),
            Some(BlueprintError::InvalidParameters(_))
        ));

        let err = run(&[2], Fr::from(1u64), &[Fr::from(1u64); 3], &[Fr::from(1u64)]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BlueprintError>(),
            Some(&BlueprintError::InputLength { name: "constraints", expected: 2, found: 3 })
        );
    }

    #[test]
    fn test_tampered_result() {
        base_test().expect_satisfied(false).run_gate(|ctx, gate| {
            let input = GateArgInput {
                theta: ctx.load_witness(Fr::from(3u64)),
                constraints: ctx.assign_witnesses([4u64, 5].map(Fr::from)),
                selectors: ctx.assign_witnesses([Fr::from(2u64)]),
            };
            let verifier = GateArgVerifier::new(vec![2]).unwrap();
            let result = verifier.synthesize(ctx, gate, &input).unwrap();
            result.debug_prank(ctx, *result.value() + Fr::from(1u64));
        });
    }
}
