//! Data structures for the instruction stream

use crate::types::{FieldKind, Type};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identity of an IR value (the result of one instruction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Decoded constant operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    /// Unsigned integer (sizes, counts, offsets)
    Int(u64),
    /// Field element written in decimal
    Field { kind: FieldKind, value: String },
    /// Constant array of integers (lists of sizes)
    Array(Vec<u64>),
}

/// Instruction operand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// Reference to a value defined by an earlier instruction
    Value { id: ValueId, ty: Type },
    /// Inline constant
    Constant(Constant),
}

impl Operand {
    /// Reference to `id` declared with type `ty`
    pub fn value(id: ValueId, ty: Type) -> Self {
        Operand::Value { id, ty }
    }

    /// Integer constant operand
    pub fn int(value: u64) -> Self {
        Operand::Constant(Constant::Int(value))
    }

    /// Array-of-integers constant operand
    pub fn array(values: impl Into<Vec<u64>>) -> Self {
        Operand::Constant(Constant::Array(values.into()))
    }

    /// Field constant operand
    pub fn field(kind: FieldKind, value: impl Into<String>) -> Self {
        Operand::Constant(Constant::Field { kind, value: value.into() })
    }

    /// Id of the referenced value, if this is not a constant
    pub fn value_id(&self) -> Option<ValueId> {
        match self {
            Operand::Value { id, .. } => Some(*id),
            Operand::Constant(_) => None,
        }
    }

    /// Declared type of the referenced value, if this is not a constant
    pub fn ty(&self) -> Option<Type> {
        match self {
            Operand::Value { ty, .. } => Some(*ty),
            Operand::Constant(_) => None,
        }
    }
}

/// Instruction kinds understood by the assigner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    /// Bind one of the program inputs
    Param,
    /// Allocate cells in program memory
    Alloca,
    /// Read one cell of program memory
    Load,
    /// `condition != 0 ? true_val : false_val`
    Select,
    /// Elliptic curve point addition
    CurveAdd,
    /// FRI coset computation
    FriCosets,
    /// Placeholder gate argument verification
    GateArgVerifier,
    /// Placeholder lookup argument verification
    LookupArgVerifier,
}

impl Opcode {
    /// Number of operands the positional convention of this opcode expects
    pub fn arity(self) -> usize {
        match self {
            Opcode::Param | Opcode::Alloca => 1,
            Opcode::Load | Opcode::CurveAdd => 2,
            Opcode::Select => 3,
            Opcode::FriCosets => 5,
            Opcode::GateArgVerifier => 6,
            Opcode::LookupArgVerifier => 33,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Opcode::Param => "param",
            Opcode::Alloca => "alloca",
            Opcode::Load => "load",
            Opcode::Select => "select",
            Opcode::CurveAdd => "curve_add",
            Opcode::FriCosets => "fri_cosets",
            Opcode::GateArgVerifier => "gate_arg_verifier",
            Opcode::LookupArgVerifier => "lookup_arg_verifier",
        };
        f.write_str(name)
    }
}

/// A single instruction of the stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Value defined by this instruction
    pub id: ValueId,
    /// Instruction kind
    pub opcode: Opcode,
    /// Operands in the positional order fixed by the opcode
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create a new instruction
    pub fn new(id: ValueId, opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self { id, opcode, operands }
    }

    /// Operand at `index`, if present
    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }
}

/// Concrete value supplied for a `param` instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputValue {
    /// Single native field element (decimal)
    Field(String),
    /// Vector of native field elements kept in the stack frame
    Vector(Vec<String>),
    /// Affine point `[x, y]`
    Curve { x: String, y: String },
    /// Array placed in program memory, passed by pointer
    Array(Vec<String>),
}

/// Structural defects found by [`Program::validate`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IrError {
    #[error("instruction {id} ({opcode}) expects {expected} operands, got {found}")]
    Arity { id: ValueId, opcode: Opcode, expected: usize, found: usize },
    #[error("instruction {id} uses {operand} before it is defined")]
    UseBeforeDef { id: ValueId, operand: ValueId },
    #[error("value {0} is defined more than once")]
    Redefinition(ValueId),
}

/// Complete program handed to the assigner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Values bound by `param` instructions, by index
    pub inputs: Vec<InputValue>,
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Create new empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Check operand arity and def-before-use ordering
    pub fn validate(&self) -> std::result::Result<(), IrError> {
        let mut defined = HashSet::new();
        for inst in &self.instructions {
            let expected = inst.opcode.arity();
            if inst.operands.len() != expected {
                return Err(IrError::Arity {
                    id: inst.id,
                    opcode: inst.opcode,
                    expected,
                    found: inst.operands.len(),
                });
            }
            for operand in inst.operands.iter().filter_map(Operand::value_id) {
                if !defined.contains(&operand) {
                    return Err(IrError::UseBeforeDef { id: inst.id, operand });
                }
            }
            if !defined.insert(inst.id) {
                return Err(IrError::Redefinition(inst.id));
            }
        }
        Ok(())
    }

    /// Serialize the program to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a program from its JSON encoding
    pub fn from_json(json: &str) -> Result<Self> {
        let program: Program = serde_json::from_str(json)?;
        tracing::debug!(
            "Loaded program: {} instructions, {} inputs",
            program.instruction_count(),
            program.inputs.len()
        );
        Ok(program)
    }
}
