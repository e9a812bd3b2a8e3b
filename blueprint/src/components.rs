//! Circuit components
//!
//! Each component is a halo2-base chip: it reads assigned cells, lays out
//! its gates through [`GateInstructions`] in the given [`Context`] and
//! returns the cells holding its outputs. In a mock-mode builder the same
//! call records the structure and computes the witness.

use crate::Result;
use halo2_base::gates::GateInstructions;
use halo2_base::utils::ScalarField;
use halo2_base::Context;

/// Trait for circuit components
pub trait Component<F: ScalarField> {
    /// Cells the component reads
    type Input;
    /// Cells the component produces
    type Output;

    /// Lay out the component after the last cell of `ctx`
    ///
    /// # Arguments
    /// * `ctx` - Context receiving the component's cells and constraints
    /// * `gate` - Gate chip for the basic `a + b * c = d` gate
    /// * `input` - Assigned cells holding the component's inputs
    ///
    /// # Returns
    /// The assigned cells holding the component's outputs
    fn synthesize(
        &self,
        ctx: &mut Context<F>,
        gate: &impl GateInstructions<F>,
        input: &Self::Input,
    ) -> Result<Self::Output>;
}

pub mod fri_cosets;
pub mod gate_arg_verifier;
pub mod lookup_arg_verifier;
pub mod select;
pub mod unified_addition;

pub use fri_cosets::FriCosets;
pub use gate_arg_verifier::{GateArgInput, GateArgVerifier};
pub use lookup_arg_verifier::{LookupArgInput, LookupArgVerifier, LookupParams};
pub use select::{Select, SelectInput};
pub use unified_addition::{UnifiedAddition, UnifiedAdditionInput};
