//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A quantum circuit: declared registers plus an ordered instruction list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with anonymous qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Add a single anonymous qubit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.qubits.len() as u32);
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register of `size` qubits, returning their ids.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = QubitId(self.qubits.len() as u32);
                self.qubits.push(Qubit::in_register(id, &name, i));
                id
            })
            .collect()
    }

    /// Add a single anonymous classical bit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.clbits.len() as u32);
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register of `size` bits, returning their ids.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = ClbitId(self.clbits.len() as u32);
                self.clbits.push(Clbit::in_register(id, &name, i));
                id
            })
            .collect()
    }

    fn check_qubits(&self, gate_name: &str, qubits: &[QubitId]) -> IrResult<()> {
        for (i, q) in qubits.iter().enumerate() {
            if q.0 as usize >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit: *q,
                    circuit: self.name.clone(),
                });
            }
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate: gate_name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Append a gate to the circuit.
    pub fn push_gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        self.check_qubits(gate.name(), &qubits)?;
        self.instructions.push(Instruction::gate(gate, qubits));
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::I, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::X, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Y, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Z, [qubit])
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::H, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::S, [qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Sdg, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::T, [qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Tdg, [qubit])
    }

    /// Apply Rx rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Rx(theta), [qubit])
    }

    /// Apply Ry rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Ry(theta), [qubit])
    }

    /// Apply Rz rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Rz(theta), [qubit])
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::P(theta), [qubit])
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::U(theta, phi, lambda), [qubit])
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CX, [control, target])
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CY, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CZ, [control, target])
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CH, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::Swap, [q1, q2])
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CP(theta), [control, target])
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CRz(theta), [control, target])
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push_gate(StandardGate::CCX, [c1, c2, target])
    }

    // =========================================================================
    // Non-gate operations
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        if qubit.0 as usize >= self.qubits.len() {
            return Err(IrError::QubitNotFound {
                qubit,
                circuit: self.name.clone(),
            });
        }
        if clbit.0 as usize >= self.clbits.len() {
            return Err(IrError::ClbitNotFound {
                clbit,
                circuit: self.name.clone(),
            });
        }
        self.instructions.push(Instruction::measure(qubit, clbit));
        Ok(self)
    }

    /// Measure every qubit into the classical bit with the same index,
    /// adding classical bits as needed.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }
        for i in 0..self.qubits.len() as u32 {
            self.instructions
                .push(Instruction::measure(QubitId(i), ClbitId(i)));
        }
        Ok(self)
    }

    /// Reset a qubit to |0⟩.
    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        if qubit.0 as usize >= self.qubits.len() {
            return Err(IrError::QubitNotFound {
                qubit,
                circuit: self.name.clone(),
            });
        }
        self.instructions.push(Instruction::reset(qubit));
        Ok(self)
    }

    /// Apply a barrier to the given qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        self.check_qubits("barrier", &qubits)?;
        self.instructions.push(Instruction::barrier(qubits));
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the circuit.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Iterate the instructions in application order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    /// Number of instructions (barriers included).
    pub fn num_instructions(&self) -> usize {
        self.instructions.len()
    }

    /// Replace the instruction list wholesale.
    ///
    /// Used by compilation passes that rewrite the circuit. The caller is
    /// responsible for only referencing declared qubits and bits.
    pub fn replace_instructions(&mut self, instructions: Vec<Instruction>) {
        self.instructions = instructions;
    }

    /// Circuit depth: longest chain of non-barrier instructions per qubit
    /// frontier. Parallel measurements on distinct qubits count as one layer.
    pub fn depth(&self) -> usize {
        let mut frontier = vec![0usize; self.qubits.len()];
        for inst in &self.instructions {
            if matches!(inst.kind, InstructionKind::Barrier) {
                continue;
            }
            let layer = inst
                .qubits
                .iter()
                .map(|q| frontier[q.0 as usize])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                frontier[q.0 as usize] = layer;
            }
        }
        frontier.into_iter().max().unwrap_or(0)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a measured Bell-state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?
            .measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }

    /// Create a measured GHZ-state circuit on `n` qubits.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }
        let mut circuit = Self::with_size("ghz", n, n);
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(0), QubitId(i))?;
        }
        for i in 0..n {
            circuit.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_registers() {
        let mut circuit = Circuit::new("test");
        let qr = circuit.add_qreg("q", 4);
        let cr = circuit.add_creg("c", 2);
        assert_eq!(qr.len(), 4);
        assert_eq!(cr.len(), 2);
        assert_eq!(circuit.qubits()[2].to_string(), "q[2]");
    }

    #[test]
    fn test_two_registers_share_id_space() {
        let mut circuit = Circuit::new("test");
        let q1 = circuit.add_qreg("q1", 2);
        let q2 = circuit.add_qreg("q2", 3);
        assert_eq!(q1, vec![QubitId(0), QubitId(1)]);
        assert_eq!(q2, vec![QubitId(2), QubitId(3), QubitId(4)]);
        assert_eq!(circuit.num_qubits(), 5);
    }

    #[test]
    fn test_bell_depth() {
        let circuit = Circuit::bell().unwrap();
        // H, CX, then measurements on distinct qubits in one layer.
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_ghz() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 5);
        assert_eq!(
            circuit.instructions().filter(|i| i.is_measure()).count(),
            5
        );
    }

    #[test]
    fn test_unknown_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 1, 1);
        assert!(matches!(
            circuit.h(QubitId(3)),
            Err(IrError::QubitNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        assert!(matches!(
            circuit.cx(QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .u(PI / 2.0, 0.0, PI, QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap();
        assert_eq!(circuit.num_instructions(), 3);
    }
}
