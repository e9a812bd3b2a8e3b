//! Program memory: linear cells holding assigned values

use crate::error::{AssignerError, MemoryFault};
use crate::Result;
use halo2_base::utils::ScalarField;
use halo2_base::AssignedValue;

/// Index of a memory cell
pub type Pointer = usize;

/// Most cells a program may allocate, the null cell included
pub const MAX_CELLS: usize = 1 << 24;

#[derive(Debug, Clone)]
struct Cell<F: ScalarField> {
    size: usize,
    value: Option<AssignedValue<F>>,
}

/// Linear memory; cell 0 is the null cell and is never accessible
#[derive(Debug, Clone)]
pub struct ProgramMemory<F: ScalarField> {
    cells: Vec<Cell<F>>,
}

impl<F: ScalarField> Default for ProgramMemory<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ScalarField> ProgramMemory<F> {
    pub fn new() -> Self {
        Self { cells: vec![Cell { size: 0, value: None }] }
    }

    /// Reserve `count` consecutive cells of `size` bytes; returns the first
    pub fn allocate(&mut self, count: usize, size: usize) -> Result<Pointer> {
        let ptr = self.cells.len();
        let exhausted = || AssignerError::Memory { pointer: ptr, fault: MemoryFault::Exhausted };
        match ptr.checked_add(count) {
            Some(end) if end <= MAX_CELLS => {}
            _ => return Err(exhausted().into()),
        }
        self.cells.try_reserve(count).map_err(|_| exhausted())?;
        self.cells.extend(std::iter::repeat(Cell { size, value: None }).take(count));
        Ok(ptr)
    }

    fn cell(&self, ptr: Pointer) -> Result<&Cell<F>> {
        if ptr == 0 {
            return Err(AssignerError::Memory { pointer: ptr, fault: MemoryFault::Null }.into());
        }
        self.cells.get(ptr).ok_or_else(|| {
            AssignerError::Memory { pointer: ptr, fault: MemoryFault::OutOfBounds }.into()
        })
    }

    pub fn store(&mut self, ptr: Pointer, cell: AssignedValue<F>) -> Result<()> {
        self.cell(ptr)?;
        self.cells[ptr].value = Some(cell);
        Ok(())
    }

    pub fn load(&self, ptr: Pointer) -> Result<AssignedValue<F>> {
        self.cell(ptr)?.value.ok_or_else(|| {
            AssignerError::Memory { pointer: ptr, fault: MemoryFault::Uninitialized }.into()
        })
    }

    /// Byte size of the cell at `ptr`
    pub fn cell_size(&self, ptr: Pointer) -> Result<usize> {
        Ok(self.cell(ptr)?.size)
    }

    /// Number of cells, the null cell included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::detached;
    use halo2_base::halo2_proofs::halo2curves::bn256::Fr;

    fn fault(err: anyhow::Error) -> Option<MemoryFault> {
        match err.downcast_ref::<AssignerError>() {
            Some(AssignerError::Memory { fault, .. }) => Some(*fault),
            _ => None,
        }
    }

    #[test]
    fn test_allocate_store_load() {
        let mut memory = ProgramMemory::<Fr>::new();
        assert!(memory.is_empty());
        let a = memory.allocate(3, 32).unwrap();
        let b = memory.allocate(1, 8).unwrap();
        assert_eq!((a, b), (1, 4));
        memory.store(a + 2, detached(7)).unwrap();
        assert_eq!(*memory.load(a + 2).unwrap().value(), Fr::from(7u64));
        assert_eq!(memory.cell_size(b).unwrap(), 8);
        assert_eq!(memory.len(), 5);
    }

    #[test]
    fn test_faults() {
        let mut memory = ProgramMemory::<Fr>::new();
        let ptr = memory.allocate(2, 32).unwrap();
        assert_eq!(fault(memory.load(0).unwrap_err()), Some(MemoryFault::Null));
        assert_eq!(fault(memory.load(ptr + 2).unwrap_err()), Some(MemoryFault::OutOfBounds));
        assert_eq!(fault(memory.load(ptr).unwrap_err()), Some(MemoryFault::Uninitialized));
        assert_eq!(fault(memory.store(0, detached(0)).unwrap_err()), Some(MemoryFault::Null));
    }

    #[test]
    fn test_allocation_limit() {
        let mut memory = ProgramMemory::<Fr>::new();
        assert_eq!(
            fault(memory.allocate(usize::MAX, 32).unwrap_err()),
            Some(MemoryFault::Exhausted)
        );
        assert_eq!(
            fault(memory.allocate(MAX_CELLS, 32).unwrap_err()),
            Some(MemoryFault::Exhausted)
        );
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.allocate(MAX_CELLS - 1, 0).unwrap(), 1);
    }
}
