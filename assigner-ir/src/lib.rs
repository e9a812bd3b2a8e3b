//! Assigner IR - typed instruction stream consumed by the circuit assigner
//!
//! This crate defines the already-typed intermediate representation that the
//! assigner translates into a PLONK circuit and its assignment table.
//!
//! # Overview
//!
//! A [`Program`] is a flat list of [`Instruction`]s plus the concrete input
//! values its `param` instructions refer to:
//!
//! * every instruction defines one value, identified by its [`ValueId`]
//! * operands are either references to earlier values (with their declared
//!   [`Type`]) or decoded [`Constant`]s
//! * operand positions follow a fixed convention per [`Opcode`]
//!
//! # Usage
//!
//! ```
//! use assigner_ir::{Constant, InputValue, Instruction, Opcode, Operand, Program, ValueId};
//!
//! let program = Program {
//!     inputs: vec![InputValue::Field("7".into())],
//!     instructions: vec![Instruction::new(
//!         ValueId(0),
//!         Opcode::Param,
//!         vec![Operand::Constant(Constant::Int(0))],
//!     )],
//! };
//! program.validate().unwrap();
//! assert_eq!(program.instruction_count(), 1);
//! ```
//!
//! # Limitations
//!
//! * There is no textual front-end: programs are built in code or loaded from
//!   their JSON encoding with [`Program::from_json`].

pub mod ir;
pub mod types;

pub use ir::{Constant, InputValue, Instruction, IrError, Opcode, Operand, Program, ValueId};
pub use types::{CurveKind, FieldKind, Type};

/// Result type for IR operations
pub type Result<T> = anyhow::Result<T>;
