//! Lookup-argument verifier
//!
//! Recomputes the four lookup-argument constraint values `F0..F3` from the
//! evaluations a verifier holds: lookup gate and table evaluations are
//! compressed with powers of `theta`, then folded into the grand-product
//! numerator `g` and the sorted-column denominator `h`.

use crate::components::gate_arg_verifier::check_length;
use crate::components::Component;
use crate::{BlueprintError, Result};
use halo2_base::gates::GateInstructions;
use halo2_base::utils::ScalarField;
use halo2_base::QuantumCell::{Constant, Existing};
use halo2_base::{AssignedValue, Context};
use std::iter;

/// Shape of the lookup gates and tables being verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupParams {
    /// Constraints per lookup gate
    pub gate_constraints_sizes: Vec<usize>,
    /// Lookup inputs per constraint, across all gates
    pub constraints_lookup_input_sizes: Vec<usize>,
    /// Options per lookup table
    pub table_lookup_options_sizes: Vec<usize>,
    /// Columns per lookup table
    pub table_columns_numbers: Vec<usize>,
}

fn checked_sum(mut sizes: impl Iterator<Item = Option<usize>>) -> Option<usize> {
    sizes.try_fold(0usize, |total, size| total.checked_add(size?))
}

impl LookupParams {
    pub fn gate_size(&self) -> usize {
        self.gate_constraints_sizes.len()
    }

    pub fn table_size(&self) -> usize {
        self.table_lookup_options_sizes.len()
    }

    /// Lookup constraints across all gates; `None` on overflow
    pub fn constraints_size(&self) -> Option<usize> {
        checked_sum(self.gate_constraints_sizes.iter().copied().map(Some))
    }

    /// Lookup inputs across all constraints; `None` on overflow
    pub fn lookup_inputs_size(&self) -> Option<usize> {
        checked_sum(self.constraints_lookup_input_sizes.iter().copied().map(Some))
    }

    /// Option cells across all tables, options times columns per table;
    /// `None` on overflow
    pub fn options_size(&self) -> Option<usize> {
        checked_sum(
            self.table_lookup_options_sizes
                .iter()
                .zip(&self.table_columns_numbers)
                .map(|(options, columns)| options.checked_mul(*columns)),
        )
    }
}

#[derive(Debug, Clone)]
pub struct LookupArgInput<F: ScalarField> {
    pub theta: AssignedValue<F>,
    pub beta: AssignedValue<F>,
    pub gamma: AssignedValue<F>,
    pub alphas: Vec<AssignedValue<F>>,
    pub v_l_values: [AssignedValue<F>; 2],
    pub q_last: [AssignedValue<F>; 2],
    pub q_blind: [AssignedValue<F>; 2],
    pub l0: AssignedValue<F>,
    pub gate_selectors: Vec<AssignedValue<F>>,
    pub constraints_table_ids: Vec<AssignedValue<F>>,
    pub constraints_lookup_inputs: Vec<AssignedValue<F>>,
    pub table_selectors: Vec<AssignedValue<F>>,
    pub table_lookup_options: Vec<AssignedValue<F>>,
    pub shifted_table_selectors: Vec<AssignedValue<F>>,
    pub shifted_table_lookup_options: Vec<AssignedValue<F>>,
    /// `[s_0, s'_0, s_1, s'_1, ...]`
    pub sorted: Vec<AssignedValue<F>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupArgVerifier {
    params: LookupParams,
    constraints_size: usize,
    lookup_inputs_size: usize,
    options_size: usize,
}

impl LookupArgVerifier {
    /// # Arguments
    /// * `gate_size` - Number of lookup gates, must match `gate_constraints_sizes`
    /// * `table_size` - Number of lookup tables, must match both table vectors
    /// * `params` - Per-gate and per-table sizes
    pub fn new(gate_size: usize, table_size: usize, params: LookupParams) -> Result<Self> {
        let invalid =
            |reason: String| -> anyhow::Error { BlueprintError::InvalidParameters(reason).into() };
        if params.gate_size() != gate_size {
            return Err(invalid(format!(
                "lookup gate size {gate_size} but {} constraint sizes",
                params.gate_size()
            )));
        }
        if params.table_size() != table_size || params.table_columns_numbers.len() != table_size {
            return Err(invalid(format!(
                "lookup table size {table_size} but {} option sizes and {} column numbers",
                params.table_size(),
                params.table_columns_numbers.len()
            )));
        }
        let (Some(constraints_size), Some(lookup_inputs_size), Some(options_size)) =
            (params.constraints_size(), params.lookup_inputs_size(), params.options_size())
        else {
            return Err(invalid("lookup sizes overflow".to_string()));
        };
        if params.constraints_lookup_input_sizes.len() != constraints_size {
            return Err(invalid(format!(
                "{constraints_size} lookup constraints but {} lookup input sizes",
                params.constraints_lookup_input_sizes.len()
            )));
        }
        Ok(Self { params, constraints_size, lookup_inputs_size, options_size })
    }

    pub fn params(&self) -> &LookupParams {
        &self.params
    }

    pub fn constraints_size(&self) -> usize {
        self.constraints_size
    }

    fn check_input<F: ScalarField>(&self, input: &LookupArgInput<F>) -> Result<()> {
        let p = &self.params;
        let sorted_pairs = (input.sorted.len() / 2).max(1);
        check_length("sorted", 2 * sorted_pairs, &input.sorted)?;
        check_length("alphas", sorted_pairs - 1, &input.alphas)?;
        check_length("gate_selectors", p.gate_size(), &input.gate_selectors)?;
        check_length("constraints_table_ids", self.constraints_size, &input.constraints_table_ids)?;
        check_length(
            "constraints_lookup_inputs",
            self.lookup_inputs_size,
            &input.constraints_lookup_inputs,
        )?;
        check_length("table_selectors", p.table_size(), &input.table_selectors)?;
        check_length("shifted_table_selectors", p.table_size(), &input.shifted_table_selectors)?;
        check_length("table_lookup_options", self.options_size, &input.table_lookup_options)?;
        check_length(
            "shifted_table_lookup_options",
            self.options_size,
            &input.shifted_table_lookup_options,
        )?;
        Ok(())
    }
}

/// Powers `theta^1 ..= theta^count`
fn theta_powers<F: ScalarField>(
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    theta: AssignedValue<F>,
    count: usize,
) -> Vec<AssignedValue<F>> {
    let mut powers = Vec::with_capacity(count);
    if count > 0 {
        powers.push(theta);
    }
    for i in 1..count {
        let next = gate.mul(ctx, powers[i - 1], theta);
        powers.push(next);
    }
    powers
}

/// `base + sum_k powers[k] * values[k]`
fn compress<F: ScalarField>(
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    base: AssignedValue<F>,
    powers: &[AssignedValue<F>],
    values: &[AssignedValue<F>],
) -> AssignedValue<F> {
    gate.inner_product(
        ctx,
        iter::once(base).chain(values.iter().copied()),
        iter::once(Constant(F::ONE)).chain(powers.iter().copied().map(Existing)),
    )
}

impl LookupArgVerifier {
    /// Product over table options of `gamma(1 + beta) + t + beta * t'`
    fn table_product<F: ScalarField>(
        &self,
        ctx: &mut Context<F>,
        gate: &impl GateInstructions<F>,
        input: &LookupArgInput<F>,
        powers: &[AssignedValue<F>],
        gamma_beta: AssignedValue<F>,
        mut acc: AssignedValue<F>,
    ) -> AssignedValue<F> {
        let p = &self.params;
        let mut offset = 0;
        let tables = p.table_lookup_options_sizes.iter().zip(&p.table_columns_numbers);
        for (t, (options, columns)) in tables.enumerate() {
            let table_id = ctx.load_constant(F::from(t as u64 + 1));
            for _ in 0..*options {
                let range = offset..offset + columns;
                offset += columns;
                let row = &input.table_lookup_options[range.clone()];
                let row = compress(ctx, gate, table_id, powers, row);
                let shifted = &input.shifted_table_lookup_options[range];
                let shifted = compress(ctx, gate, table_id, powers, shifted);
                let value = gate.mul(ctx, input.table_selectors[t], row);
                let shifted = gate.mul(ctx, input.shifted_table_selectors[t], shifted);

                let partial = gate.add(ctx, gamma_beta, value);
                let factor = gate.mul_add(ctx, input.beta, shifted, partial);
                acc = gate.mul(ctx, acc, factor);
            }
        }
        acc
    }
}

impl<F: ScalarField> Component<F> for LookupArgVerifier {
    type Input = LookupArgInput<F>;
    /// `[F0, F1, F2, F3]`
    type Output = [AssignedValue<F>; 4];

    fn synthesize(
        &self,
        ctx: &mut Context<F>,
        gate: &impl GateInstructions<F>,
        input: &LookupArgInput<F>,
    ) -> Result<[AssignedValue<F>; 4]> {
        self.check_input(input)?;
        let p = &self.params;
        let one = ctx.load_constant(F::ONE);

        let widest_input = p.constraints_lookup_input_sizes.iter().copied().max().unwrap_or(0);
        let widest_table = p.table_columns_numbers.iter().copied().max().unwrap_or(0);
        let powers = theta_powers(ctx, gate, input.theta, widest_input.max(widest_table));

        let one_plus_beta = gate.add(ctx, input.beta, one);
        let gamma_beta = gate.mul(ctx, input.gamma, one_plus_beta);

        // lookup gate side: (1 + beta)(gamma + f_c)
        let mut g = one;
        let mut offset = 0;
        let mut constraint = 0;
        for (selector, size) in input.gate_selectors.iter().zip(&p.gate_constraints_sizes) {
            for _ in 0..*size {
                let width = p.constraints_lookup_input_sizes[constraint];
                let values = &input.constraints_lookup_inputs[offset..offset + width];
                offset += width;
                let table_id = input.constraints_table_ids[constraint];
                let compressed = compress(ctx, gate, table_id, &powers, values);
                let f = gate.mul(ctx, *selector, compressed);
                let shifted = gate.add(ctx, input.gamma, f);
                let factor = gate.mul(ctx, one_plus_beta, shifted);
                g = gate.mul(ctx, g, factor);
                constraint += 1;
            }
        }
        let g = self.table_product(ctx, gate, input, &powers, gamma_beta, g);

        let mut h = one;
        for pair in input.sorted.chunks_exact(2) {
            let partial = gate.add(ctx, gamma_beta, pair[0]);
            let factor = gate.mul_add(ctx, input.beta, pair[1], partial);
            h = gate.mul(ctx, h, factor);
        }

        let [v_l, v_l_next] = input.v_l_values;
        let (q_last, q_blind) = (input.q_last[0], input.q_blind[0]);

        let not_v_l = gate.sub(ctx, one, v_l);
        let f0 = gate.mul(ctx, input.l0, not_v_l);

        let v_l_square = gate.mul(ctx, v_l, v_l);
        let v_l_boolean = gate.sub(ctx, v_l_square, v_l);
        let f1 = gate.mul(ctx, q_last, v_l_boolean);

        let q_inactive = gate.add(ctx, q_last, q_blind);
        let q_active = gate.sub(ctx, one, q_inactive);
        let next_h = gate.mul(ctx, v_l_next, h);
        let current_g = gate.mul(ctx, v_l, g);
        let step = gate.sub(ctx, next_h, current_g);
        let f2 = gate.mul(ctx, q_active, step);

        let pairs = input.sorted.len() / 2;
        let diffs: Vec<AssignedValue<F>> = (1..pairs)
            .map(|i| gate.sub(ctx, input.sorted[2 * i], input.sorted[2 * i - 1]))
            .collect();
        let links =
            gate.inner_product(ctx, input.alphas.iter().copied(), diffs.into_iter().map(Existing));
        let f3 = gate.mul(ctx, input.l0, links);

        Ok([f0, f1, f2, f3])
    }
}
