//! Stack frame: IR values bound to assigned cells

use crate::error::AssignerError;
use crate::Result;
use assigner_ir::ValueId;
use halo2_base::utils::ScalarField;
use halo2_base::AssignedValue;
use std::collections::HashMap;

/// What an IR value is bound to
#[derive(Debug, Clone)]
pub enum Slot<F: ScalarField> {
    Scalar(AssignedValue<F>),
    Vector(Vec<AssignedValue<F>>),
}

impl<F: ScalarField> Slot<F> {
    fn kind(&self) -> &'static str {
        match self {
            Slot::Scalar(_) => "scalar",
            Slot::Vector(_) => "vector",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StackFrame<F: ScalarField> {
    slots: HashMap<ValueId, Slot<F>>,
}

impl<F: ScalarField> Default for StackFrame<F> {
    fn default() -> Self {
        Self { slots: HashMap::new() }
    }
}

impl<F: ScalarField> StackFrame<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id`, replacing any earlier binding
    pub fn bind(&mut self, id: ValueId, slot: Slot<F>) {
        self.slots.insert(id, slot);
    }

    pub fn bind_scalar(&mut self, id: ValueId, cell: AssignedValue<F>) {
        self.bind(id, Slot::Scalar(cell));
    }

    pub fn bind_vector(&mut self, id: ValueId, cells: Vec<AssignedValue<F>>) {
        self.bind(id, Slot::Vector(cells));
    }

    pub fn get(&self, id: ValueId) -> Result<&Slot<F>> {
        self.slots.get(&id).ok_or_else(|| AssignerError::MissingSymbol(id).into())
    }

    pub fn scalar(&self, id: ValueId) -> Result<AssignedValue<F>> {
        match self.get(id)? {
            Slot::Scalar(cell) => Ok(*cell),
            slot => {
                Err(AssignerError::SymbolKind { id, expected: "scalar", found: slot.kind() }.into())
            }
        }
    }

    pub fn vector(&self, id: ValueId) -> Result<&[AssignedValue<F>]> {
        match self.get(id)? {
            Slot::Vector(cells) => Ok(cells.as_slice()),
            slot => {
                Err(AssignerError::SymbolKind { id, expected: "vector", found: slot.kind() }.into())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Unplaced cell holding `value`, for tests that never reach a circuit
#[cfg(test)]
pub(crate) fn detached<F: ScalarField>(value: u64) -> AssignedValue<F> {
    use halo2_base::halo2_proofs::plonk::Assigned;
    AssignedValue { value: Assigned::Trivial(F::from(value)), cell: None }
}
