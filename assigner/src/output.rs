//! Translation output
//!
//! The circuit description and assignment table produced for a program, and
//! their on-disk form.

use crate::config::AssignerConfig;
use crate::Result;
use anyhow::Context;
use blueprint::{AssignmentTable, CircuitDescription};
use halo2_base::utils::ScalarField;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Circuit and assignment table of one program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: ScalarField")]
pub struct AssignerOutput<F> {
    /// Column layout, gates, constants and copy constraints
    pub circuit: CircuitDescription,
    /// Advice and public-input values
    pub table: AssignmentTable<F>,
}

impl<F: ScalarField> AssignerOutput<F> {
    /// Number of rows used by the assignment table
    pub fn rows_amount(&self) -> usize {
        self.table.rows_amount()
    }

    /// Fingerprint of the circuit structure
    pub fn fingerprint(&self) -> Result<String> {
        self.circuit.fingerprint()
    }

    /// Serialize output to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize output from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Write circuit and assignment table under the configured directory
    ///
    /// Both files are named by the circuit fingerprint, which is returned.
    pub fn save(&self, config: &AssignerConfig) -> Result<String> {
        fs::create_dir_all(&config.output_dir)
            .context("Failed to create output directory")?;

        let fingerprint = self.fingerprint()?;
        tracing::info!("Saving circuit {} to {:?}", fingerprint, config.output_dir);

        write_json(&self.circuit, &config.circuit_path(&fingerprint))
            .context("Failed to save circuit description")?;
        write_json(&self.table, &config.assignment_path(&fingerprint))
            .context("Failed to save assignment table")?;

        Ok(fingerprint)
    }

    /// Load an output written by [`AssignerOutput::save`]
    pub fn load(config: &AssignerConfig, fingerprint: &str) -> Result<Self> {
        tracing::info!("Loading circuit {} from {:?}", fingerprint, config.output_dir);

        let circuit: CircuitDescription = read_json(&config.circuit_path(fingerprint))
            .context("Failed to load circuit description")?;
        let table = read_json(&config.assignment_path(fingerprint))
            .context("Failed to load assignment table")?;

        Ok(Self { circuit, table })
    }

    /// Check if both files exist for the given fingerprint
    pub fn exists(config: &AssignerConfig, fingerprint: &str) -> bool {
        config.circuit_path(fingerprint).exists() && config.assignment_path(fingerprint).exists()
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer(writer, value)
        .with_context(|| format!("Failed to serialize to {:?}", path))?;

    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {:?}", path))?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize from {:?}", path))
}
