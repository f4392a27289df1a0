//! High-level program API.
//!
//! A [`Program`] collects builder-level circuits and handles compilation
//! and bundling internally, for callers that do not need to manage
//! [`JobBundle`]s themselves.

use rimfax_compile::{compile_circuit, CompileOptions};
use rimfax_hal::Backend;
use rimfax_ir::Circuit;

use crate::bundle::{JobBundle, RunConfig};
use crate::error::RunResult;
use crate::runner::{run_bundle, BundleResults};

/// A batch of circuits compiled and executed together.
pub struct Program {
    circuits: Vec<Circuit>,
    options: CompileOptions,
}

impl Program {
    /// Create an empty program with the default compile options.
    pub fn new() -> Self {
        Self {
            circuits: Vec::new(),
            options: CompileOptions::default(),
        }
    }

    /// Create a program with explicit compile options.
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            circuits: Vec::new(),
            options,
        }
    }

    /// Add a circuit. Results are keyed by the circuit's name.
    pub fn add_circuit(&mut self, circuit: Circuit) -> &mut Self {
        self.circuits.push(circuit);
        self
    }

    /// Number of circuits in the program.
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// Whether the program has no circuits.
    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    /// Compile the circuits into a bundle for the given backend.
    pub fn compile(
        &self,
        backend_name: &str,
        shots: u32,
        seed: Option<u64>,
    ) -> RunResult<JobBundle> {
        let mut config = RunConfig::new(backend_name, shots);
        config.seed = seed;
        config.basis_gates = self.options.basis_gates.to_vec();

        let mut bundle = JobBundle::new(config);
        for circuit in &self.circuits {
            let compiled = compile_circuit(circuit, &self.options)?;
            bundle.add(circuit.name().to_string(), compiled)?;
        }
        Ok(bundle)
    }

    /// Compile and execute every circuit on the backend.
    pub async fn execute(
        &self,
        backend: &dyn Backend,
        shots: u32,
        seed: Option<u64>,
    ) -> RunResult<BundleResults> {
        let bundle = self.compile(backend.name(), shots, seed)?;
        run_bundle(backend, &bundle).await
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
