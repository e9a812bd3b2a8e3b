//! Policy manager: picks the circuit parameters for a synthesized builder

use crate::{BlueprintError, Result};
use halo2_base::gates::circuit::{builder::BaseCircuitBuilder, BaseCircuitParams};
use halo2_base::utils::ScalarField;
use serde::{Deserialize, Serialize};

/// Largest supported circuit size (2^k rows)
pub const MAX_K: usize = 26;

/// Limits for the circuit built from one program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// log2 of the number of rows
    pub k: usize,
    /// Rows reserved for blinding factors
    pub minimum_rows: usize,
    /// Advice columns the layout may use
    pub max_advice_columns: usize,
    /// Public-input columns
    pub instance_columns: usize,
}

impl PolicyConfig {
    pub fn new(
        k: usize,
        minimum_rows: usize,
        max_advice_columns: usize,
        instance_columns: usize,
    ) -> Self {
        Self { k, minimum_rows, max_advice_columns, instance_columns }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self { k: 12, minimum_rows: 9, max_advice_columns: 16, instance_columns: 1 }
    }
}

/// Deterministic parameter selection: equal circuits always get equal
/// parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyManager {
    config: PolicyConfig,
}

impl PolicyManager {
    pub fn new(config: PolicyConfig) -> Result<Self> {
        let PolicyConfig { k, minimum_rows, max_advice_columns, instance_columns } = config;
        if k == 0 || k > MAX_K {
            let reason = format!("k = {k} outside 1..={MAX_K}");
            return Err(BlueprintError::InvalidPolicy(reason).into());
        }
        if minimum_rows >= 1 << k {
            return Err(BlueprintError::InvalidPolicy(format!(
                "{minimum_rows} reserved rows leave no usable rows at k = {k}"
            ))
            .into());
        }
        if max_advice_columns == 0 || instance_columns == 0 {
            let reason = "column limits must be positive".to_string();
            return Err(BlueprintError::InvalidPolicy(reason).into());
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Empty mock-mode builder sized by this policy
    pub fn builder<F: ScalarField>(&self) -> BaseCircuitBuilder<F> {
        BaseCircuitBuilder::new(false)
            .use_k(self.config.k)
            .use_instance_columns(self.config.instance_columns)
    }

    /// Fix the column counts of a fully synthesized builder
    pub fn layout<F: ScalarField>(
        &self,
        builder: &mut BaseCircuitBuilder<F>,
    ) -> Result<BaseCircuitParams> {
        let mut params = builder.calculate_params(Some(self.config.minimum_rows));
        let advice = params.num_advice_per_phase.first().copied().unwrap_or(0);
        if advice > self.config.max_advice_columns {
            return Err(BlueprintError::UnsatisfiableLayout {
                needed: advice,
                available: self.config.max_advice_columns,
            }
            .into());
        }
        // halo2 needs at least one advice column even for an empty program
        if advice == 0 {
            match params.num_advice_per_phase.first_mut() {
                Some(first) => *first = 1,
                None => params.num_advice_per_phase.push(1),
            }
            builder.set_params(params.clone());
        }
        tracing::debug!(
            "Layout at k = {}: {:?} advice, {} fixed, {} instance columns",
            params.k,
            params.num_advice_per_phase,
            params.num_fixed,
            params.num_instance_columns
        );
        Ok(params)
    }
}
