//! Seeded random circuit generator.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use rimfax_ir::{Circuit, QubitId, StandardGate};

use crate::error::{GenError, GenResult};
use crate::signature::op_signature;

/// Generates measured random circuits within size and depth bounds.
///
/// Qubit count and depth are drawn uniformly per circuit (bounds
/// inclusive); each depth step applies one operation from the basis to
/// distinct randomly chosen qubits, with angles drawn from [0, 2π).
/// Every circuit ends with a measurement of all qubits.
pub struct RandomCircuitGenerator {
    min_qubits: u32,
    max_qubits: u32,
    min_depth: u32,
    max_depth: u32,
    rng: StdRng,
    circuits: Vec<Circuit>,
}

impl RandomCircuitGenerator {
    /// Create a generator. `seed` of `None` draws from entropy.
    pub fn new(
        min_qubits: u32,
        max_qubits: u32,
        min_depth: u32,
        max_depth: u32,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            min_qubits,
            max_qubits,
            min_depth,
            max_depth,
            rng,
            circuits: Vec::new(),
        }
    }

    /// Generate `count` circuits drawing operations from `basis` and
    /// append them.
    pub fn add_circuits(&mut self, count: usize, basis: &[String]) -> GenResult<()> {
        if self.min_qubits == 0 || self.min_qubits > self.max_qubits {
            return Err(GenError::InvalidBounds(format!(
                "qubit range {}..={} is empty or starts at zero",
                self.min_qubits, self.max_qubits
            )));
        }
        if self.min_depth > self.max_depth {
            return Err(GenError::InvalidBounds(format!(
                "depth range {}..={} is empty",
                self.min_depth, self.max_depth
            )));
        }
        for op in basis {
            if op_signature(op).is_none() {
                return Err(GenError::UnknownOp(op.clone()));
            }
        }

        for _ in 0..count {
            let circuit = self.generate_one(basis)?;
            self.circuits.push(circuit);
        }
        Ok(())
    }

    fn generate_one(&mut self, basis: &[String]) -> GenResult<Circuit> {
        let num_qubits = self.rng.gen_range(self.min_qubits..=self.max_qubits);
        let depth = self.rng.gen_range(self.min_depth..=self.max_depth);

        // Only operations that fit on this circuit can be sampled.
        let applicable: Vec<&String> = basis
            .iter()
            .filter(|op| {
                op_signature(op).is_some_and(|sig| sig.num_qubits <= num_qubits)
            })
            .collect();
        if applicable.is_empty() {
            return Err(GenError::NoApplicableOps {
                basis: basis.to_vec(),
                num_qubits,
            });
        }

        let name = format!("random_{}", self.circuits.len());
        debug!(circuit = %name, num_qubits, depth, "generating circuit");
        let mut circuit = Circuit::with_size(name, num_qubits, num_qubits);

        for _ in 0..depth {
            let op = applicable
                .choose(&mut self.rng)
                .expect("applicable is non-empty");
            let sig = op_signature(op).expect("basis was checked");

            let qubits: Vec<QubitId> =
                sample(&mut self.rng, num_qubits as usize, sig.num_qubits as usize)
                    .iter()
                    .map(|i| QubitId(i as u32))
                    .collect();

            if op.as_str() == "reset" {
                circuit
                    .reset(qubits[0])
                    .expect("sampled qubit is in range");
                continue;
            }

            let params: Vec<f64> = (0..sig.num_params)
                .map(|_| self.rng.gen_range(0.0..TAU))
                .collect();
            let gate = StandardGate::from_name(op, &params)
                .expect("signature and params are consistent");
            circuit
                .push_gate(gate, qubits)
                .expect("sampled qubits are distinct and in range");
        }

        circuit.measure_all().expect("clbits match qubits");
        Ok(circuit)
    }

    /// The generated circuits, in generation order.
    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    /// Number of circuits generated so far.
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// Whether no circuits have been generated.
    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }
}
