//! Preformatted job bundles.
//!
//! A [`JobBundle`] is the execution-ready form of a batch: compiled
//! circuits plus the run configuration they were compiled against. It is
//! serializable so a batch can be archived and re-run byte-for-byte.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rimfax_ir::CompiledCircuit;

use crate::error::{RunError, RunResult};

/// Execution configuration for a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Name of the backend the bundle targets.
    pub backend: String,
    /// Shots per circuit.
    pub shots: u32,
    /// Sampling seed shared by every circuit in the bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Basis the circuits were compiled to.
    pub basis_gates: Vec<String>,
    /// Optional credit ceiling for metered backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_credits: Option<u32>,
    /// Optional physical qubit layout. `None` means trivial layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<u32>>,
}

impl RunConfig {
    /// Configuration with the standard simulator basis.
    pub fn new(backend: impl Into<String>, shots: u32) -> Self {
        Self {
            backend: backend.into(),
            shots,
            seed: None,
            basis_gates: vec!["id".into(), "u".into(), "cx".into()],
            max_credits: None,
            layout: None,
        }
    }

    /// Set the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the credit ceiling.
    #[must_use]
    pub fn with_max_credits(mut self, credits: u32) -> Self {
        self.max_credits = Some(credits);
        self
    }
}

/// A compiled circuit with the name results are keyed by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedCircuit {
    /// Result lookup key.
    pub name: String,
    /// The compiled circuit.
    pub compiled: CompiledCircuit,
}

/// A batch of compiled circuits ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobBundle {
    /// Bundle identifier.
    pub id: String,
    /// Execution configuration.
    pub config: RunConfig,
    /// The circuits, in submission order.
    pub circuits: Vec<NamedCircuit>,
}

impl JobBundle {
    /// Create an empty bundle.
    pub fn new(config: RunConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            circuits: Vec::new(),
        }
    }

    /// Add a compiled circuit under its own name.
    ///
    /// Names must be unique within a bundle; results are keyed by them.
    pub fn add(&mut self, name: impl Into<String>, compiled: CompiledCircuit) -> RunResult<()> {
        let name = name.into();
        if self.circuits.iter().any(|c| c.name == name) {
            return Err(RunError::DuplicateCircuit(name));
        }
        self.circuits.push(NamedCircuit { name, compiled });
        Ok(())
    }

    /// Number of circuits in the bundle.
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// Whether the bundle has no circuits.
    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    /// Circuit names in submission order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.circuits.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimfax_compile::{compile_circuit, CompileOptions};
    use rimfax_ir::Circuit;

    #[test]
    fn test_duplicate_names_rejected() {
        let compiled =
            compile_circuit(&Circuit::bell().unwrap(), &CompileOptions::default()).unwrap();
        let mut bundle = JobBundle::new(RunConfig::new("sv", 100));
        bundle.add("bell", compiled.clone()).unwrap();
        let err = bundle.add("bell", compiled).unwrap_err();
        assert!(matches!(err, RunError::DuplicateCircuit(_)));
    }

    #[test]
    fn test_bundle_round_trips_through_json() {
        let compiled =
            compile_circuit(&Circuit::bell().unwrap(), &CompileOptions::default()).unwrap();
        let mut bundle = JobBundle::new(RunConfig::new("sv", 100).with_seed(88));
        bundle.add("bell", compiled).unwrap();

        let json = serde_json::to_string(&bundle).unwrap();
        let restored: JobBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, bundle.id);
        assert_eq!(restored.config.seed, Some(88));
        assert_eq!(restored.names().collect::<Vec<_>>(), vec!["bell"]);
    }

    #[test]
    fn test_max_credits_only_serialized_when_set() {
        let plain = serde_json::to_string(&RunConfig::new("sv", 100)).unwrap();
        assert!(!plain.contains("max_credits"));

        let metered = RunConfig::new("sv", 100).with_max_credits(5);
        let json = serde_json::to_string(&metered).unwrap();
        let restored: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.max_credits, Some(5));
    }
}
