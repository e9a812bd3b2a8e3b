//! Errors raised while translating instructions

use assigner_ir::{Opcode, ValueId};
use std::fmt;

/// Why a memory access failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFault {
    Null,
    OutOfBounds,
    Uninitialized,
    Exhausted,
}

impl fmt::Display for MemoryFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            MemoryFault::Null => "null pointer",
            MemoryFault::OutOfBounds => "out of bounds",
            MemoryFault::Uninitialized => "cell was never stored",
            MemoryFault::Exhausted => "allocation exceeds the memory limit",
        };
        f.write_str(reason)
    }
}

/// Errors of the instruction handlers
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssignerError {
    #[error("value {0} is not bound in the stack frame")]
    MissingSymbol(ValueId),
    #[error("value {id} is bound as a {found}, expected a {expected}")]
    SymbolKind { id: ValueId, expected: &'static str, found: &'static str },
    #[error("{opcode} operand {index}: {reason}")]
    MalformedOperand { opcode: Opcode, index: usize, reason: String },
    #[error("size mismatch: {0}")]
    SizeMismatch(String),
    #[error("not implemented: {0}")]
    Unimplemented(String),
    #[error("memory access at {pointer}: {fault}")]
    Memory { pointer: usize, fault: MemoryFault },
    #[error("program has no input {0}")]
    UnknownInput(usize),
}
