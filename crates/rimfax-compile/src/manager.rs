//! Pass manager for orchestrating compilation.

use rimfax_ir::Circuit;
use tracing::{debug, info, instrument};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::BasisTranslation;
use crate::property::{BasisGates, PropertySet};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// The standard pipeline targeting the given basis.
    pub fn for_basis(basis: BasisGates) -> (Self, PropertySet) {
        let mut pm = Self::new();
        pm.add_pass(BasisTranslation);
        (pm, PropertySet::new().with_basis(basis))
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!(
                    "Pass {} completed, instructions: {}",
                    pass.name(),
                    circuit.num_instructions()
                );
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_pipeline() {
        let (pm, mut props) = PassManager::for_basis(BasisGates::simulator());
        assert_eq!(pm.len(), 1);

        let mut circuit = Circuit::bell().unwrap();
        pm.run(&mut circuit, &mut props).unwrap();
        for inst in circuit.instructions().filter(|i| i.is_gate()) {
            assert!(props.basis_gates.as_ref().unwrap().contains(inst.name()));
        }
    }

    #[test]
    fn test_empty_manager_is_noop() {
        let pm = PassManager::new();
        assert!(pm.is_empty());

        let mut circuit = Circuit::bell().unwrap();
        let before = circuit.num_instructions();
        pm.run(&mut circuit, &mut PropertySet::new()).unwrap();
        assert_eq!(circuit.num_instructions(), before);
    }
}
