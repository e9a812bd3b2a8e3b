//! Instruction dispatch
//!
//! [`Assigner`] walks a program in order and hands every instruction to the
//! handler of its opcode. Component handlers lay out their gates after the
//! last cell of the builder's main context.

use crate::config::AssignerConfig;
use crate::handlers;
use crate::memory::ProgramMemory;
use crate::output::AssignerOutput;
use crate::stack::StackFrame;
use crate::Result;
use assigner_ir::{Instruction, Opcode, Program};
use blueprint::{AssignmentTable, CircuitDescription, PolicyManager};
use halo2_base::gates::circuit::{builder::BaseCircuitBuilder, BaseCircuitParams};
use halo2_base::gates::GateChip;
use halo2_base::utils::ScalarField;
use halo2_base::Context;

/// Everything handlers read and write while a program is translated
#[derive(Debug)]
pub struct AssignerState<F: ScalarField> {
    pub frame: StackFrame<F>,
    pub memory: ProgramMemory<F>,
    /// Mock-mode builder recording cells, gates and copy constraints
    pub builder: BaseCircuitBuilder<F>,
    pub gate: GateChip<F>,
    pub policy: PolicyManager,
}

impl<F: ScalarField> AssignerState<F> {
    pub fn new(config: &AssignerConfig) -> Result<Self> {
        let policy = PolicyManager::new(config.policy)?;
        Ok(Self {
            frame: StackFrame::new(),
            memory: ProgramMemory::new(),
            builder: policy.builder(),
            gate: GateChip::default(),
            policy,
        })
    }

    /// Context every component is laid out in
    pub fn ctx(&mut self) -> &mut Context<F> {
        self.builder.main(0)
    }

    /// Offset of the next free advice cell
    pub fn next_row(&mut self) -> usize {
        self.ctx().advice.len()
    }

    /// Fix the circuit parameters and run the mock prover
    pub fn check(&mut self) -> Result<BaseCircuitParams> {
        let params = self.policy.layout(&mut self.builder)?;
        blueprint::check(&self.builder)?;
        Ok(params)
    }
}

/// Translates programs into a circuit and its assignment table
#[derive(Debug)]
pub struct Assigner<F: ScalarField> {
    config: AssignerConfig,
    state: AssignerState<F>,
}

impl<F: ScalarField> Assigner<F> {
    pub fn new(config: AssignerConfig) -> Result<Self> {
        let state = AssignerState::new(&config)?;
        Ok(Self { config, state })
    }

    pub fn state(&self) -> &AssignerState<F> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AssignerState<F> {
        &mut self.state
    }

    /// Translate one instruction
    pub fn handle(&mut self, program: &Program, inst: &Instruction) -> Result<()> {
        let start_row = self.state.next_row();
        let state = &mut self.state;
        match inst.opcode {
            Opcode::Param => handlers::basic::handle_param(inst, &program.inputs, state)?,
            Opcode::Alloca => handlers::basic::handle_alloca(inst, state)?,
            Opcode::Load => handlers::basic::handle_load(inst, state)?,
            Opcode::Select => handlers::select::handle_select(inst, state)?,
            Opcode::CurveAdd => handlers::curves::handle_curve_add(inst, state)?,
            Opcode::FriCosets => handlers::fri_cosets::handle_fri_cosets(inst, state)?,
            Opcode::GateArgVerifier => {
                handlers::gate_arg_verifier::handle_gate_arg_verifier(inst, state)?
            }
            Opcode::LookupArgVerifier => {
                handlers::lookup_arg_verifier::handle_lookup_arg_verifier(inst, state)?
            }
        }
        tracing::debug!(
            "{} {}: start row {}, {} cells",
            inst.id,
            inst.opcode,
            start_row,
            self.state.next_row() - start_row
        );
        Ok(())
    }

    /// Fix the layout, check it if configured and export the builder
    pub fn finish(&mut self) -> Result<AssignerOutput<F>> {
        let params = if self.config.check_validity {
            self.state.check()?
        } else {
            self.state.policy.layout(&mut self.state.builder)?
        };
        let circuit = CircuitDescription::from_builder(&mut self.state.builder, &params)?;
        let table = AssignmentTable::from_builder(&mut self.state.builder);
        tracing::info!(
            "Circuit has {} gates, {} copy constraints, {} rows over {} advice columns",
            circuit.gates.len(),
            circuit.copies.len(),
            table.rows_amount(),
            circuit.advice_columns
        );
        Ok(AssignerOutput { circuit, table })
    }

    /// Translate a whole program and return the circuit and assignment table
    pub fn run(mut self, program: &Program) -> Result<AssignerOutput<F>> {
        program.validate()?;
        tracing::info!(
            "Assigning program with {} instructions, {} inputs",
            program.instruction_count(),
            program.inputs.len()
        );

        for inst in &program.instructions {
            self.handle(program, inst)?;
        }
        self.finish()
    }
}
