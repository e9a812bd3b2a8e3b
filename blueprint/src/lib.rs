//! Blueprint - circuit components over halo2-base
//!
//! Components (select, unified curve addition, FRI cosets, gate and lookup
//! argument verifiers) are written against halo2-base's [`Context`] and
//! [`GateInstructions`], like any other halo2-base chip. A
//! `BaseCircuitBuilder` in mock mode records both halves of the circuit:
//!
//! * structure: gate selectors, fixed constants and copy constraints,
//!   exported as [`CircuitDescription`]
//! * witness: the advice values, exported as [`AssignmentTable`]
//!
//! The column layout comes from the [`PolicyManager`] and satisfiability is
//! checked by halo2's `MockProver` through [`check`].
//!
//! [`Context`]: halo2_base::Context
//! [`GateInstructions`]: halo2_base::gates::GateInstructions

pub mod circuit;
pub mod components;
pub mod field;
pub mod policy;

pub use circuit::{check, AssignmentTable, CircuitDescription};
pub use components::Component;
pub use policy::{PolicyConfig, PolicyManager};

/// Result type for circuit construction
pub type Result<T> = anyhow::Result<T>;

/// Errors raised while building or checking circuits
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlueprintError {
    #[error("circuit needs {needed} advice columns, the policy allows {available}")]
    UnsatisfiableLayout { needed: usize, available: usize },
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("invalid component parameters: {0}")]
    InvalidParameters(String),
    #[error("input `{name}` has {found} elements, component expects {expected}")]
    InputLength { name: &'static str, expected: usize, found: usize },
    #[error("value 0x{value} does not fit in {bits} bits")]
    ValueRange { value: String, bits: usize },
    #[error("circuit is not satisfied ({failures} failures), first: {first}")]
    Unsatisfied { failures: usize, first: String },
}
