//! Assigner - translates IR programs into a circuit and its assignment table
//!
//! This crate walks an [`assigner_ir::Program`] instruction by instruction,
//! extracts typed operands from the stack frame and program memory, and
//! lays out the matching `blueprint` component in a mock-mode halo2-base
//! builder. After the last instruction the builder's layout is fixed, checked
//! with `MockProver` and exported as a circuit description plus an
//! assignment table.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod memory;
pub mod output;
pub mod stack;

pub use config::AssignerConfig;
pub use dispatch::{Assigner, AssignerState};
pub use error::{AssignerError, MemoryFault};
pub use memory::{Pointer, ProgramMemory};
pub use output::AssignerOutput;
pub use stack::{Slot, StackFrame};

use assigner_ir::Program;
use halo2_base::utils::ScalarField;

/// Result type for assigner operations
pub type Result<T> = anyhow::Result<T>;

/// High-level API: translate a program over the circuit field `F`
///
/// Returns the circuit description and the assignment table. When
/// `config.check_validity` is set the circuit is run through `MockProver`
/// before returning.
pub fn assign_program<F: ScalarField>(
    program: &Program,
    config: AssignerConfig,
) -> Result<AssignerOutput<F>> {
    let output = Assigner::new(config)?.run(program)?;
    tracing::debug!("Assignment table has {} rows", output.rows_amount());
    Ok(output)
}
