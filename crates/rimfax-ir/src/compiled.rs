//! The backend-neutral compiled circuit form.
//!
//! A [`CompiledCircuit`] is what backends actually consume: a flattened
//! instruction list whose gates all belong to a declared basis, plus the
//! register shape needed to interpret measurement results. It carries no
//! builder state and is cheap to clone into job bundles.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;

/// A circuit lowered to a basis gate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledCircuit {
    /// Name inherited from the source circuit.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: u32,
    /// Number of classical bits.
    pub num_clbits: u32,
    /// The basis gate names the instruction list is expressed in.
    pub basis_gates: Vec<String>,
    /// Instructions in application order.
    pub instructions: Vec<Instruction>,
}

impl CompiledCircuit {
    /// Assemble a compiled circuit, verifying that every gate is in the basis.
    pub fn new(
        name: impl Into<String>,
        num_qubits: u32,
        num_clbits: u32,
        basis_gates: Vec<String>,
        instructions: Vec<Instruction>,
    ) -> IrResult<Self> {
        for inst in &instructions {
            if inst.is_gate() && !basis_gates.iter().any(|b| b == inst.name()) {
                return Err(IrError::GateOutsideBasis {
                    gate: inst.name().to_string(),
                    basis: basis_gates,
                });
            }
        }
        Ok(Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            basis_gates,
            instructions,
        })
    }

    /// Iterate the instructions in application order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// True if any measurement has gate or reset operations after it on the
    /// same qubit (i.e. measurement is not terminal).
    pub fn has_mid_circuit_measurement(&self) -> bool {
        let mut measured = vec![false; self.num_qubits as usize];
        for inst in &self.instructions {
            if inst.is_measure() {
                for q in &inst.qubits {
                    measured[q.0 as usize] = true;
                }
            } else if inst.is_gate() || inst.is_reset() {
                if inst.qubits.iter().any(|q| measured[q.0 as usize]) {
                    return true;
                }
            }
        }
        false
    }

    /// True if the circuit contains a reset operation.
    pub fn has_reset(&self) -> bool {
        self.instructions.iter().any(Instruction::is_reset)
    }

    /// Serialize to the JSON interchange form.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from the JSON interchange form.
    pub fn from_json(json: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;
    use crate::qubit::{ClbitId, QubitId};

    fn basis() -> Vec<String> {
        vec!["id".into(), "u".into(), "cx".into()]
    }

    #[test]
    fn test_basis_enforced() {
        let bad = CompiledCircuit::new(
            "bad",
            1,
            0,
            basis(),
            vec![Instruction::gate(StandardGate::H, [QubitId(0)])],
        );
        assert!(matches!(bad, Err(IrError::GateOutsideBasis { .. })));
    }

    #[test]
    fn test_mid_circuit_measurement_detected() {
        let compiled = CompiledCircuit::new(
            "mid",
            1,
            1,
            basis(),
            vec![
                Instruction::measure(QubitId(0), ClbitId(0)),
                Instruction::gate(StandardGate::U(0.1, 0.0, 0.0), [QubitId(0)]),
            ],
        )
        .unwrap();
        assert!(compiled.has_mid_circuit_measurement());

        let terminal = CompiledCircuit::new(
            "terminal",
            1,
            1,
            basis(),
            vec![
                Instruction::gate(StandardGate::U(0.1, 0.0, 0.0), [QubitId(0)]),
                Instruction::measure(QubitId(0), ClbitId(0)),
            ],
        )
        .unwrap();
        assert!(!terminal.has_mid_circuit_measurement());
    }

    #[test]
    fn test_json_round_trip() {
        let compiled = CompiledCircuit::new(
            "rt",
            2,
            2,
            basis(),
            vec![
                Instruction::gate(StandardGate::U(1.0, 2.0, 3.0), [QubitId(0)]),
                Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1)]),
                Instruction::measure(QubitId(0), ClbitId(0)),
            ],
        )
        .unwrap();

        let json = compiled.to_json().unwrap();
        let back = CompiledCircuit::from_json(&json).unwrap();
        assert_eq!(compiled, back);
    }
}
