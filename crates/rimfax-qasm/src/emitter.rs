//! Emit a [`Circuit`] as QASM source text.

use std::fmt::Write;

use rimfax_ir::{Circuit, InstructionKind};

/// Render a circuit as QASM source.
///
/// Qubits and classical bits without register membership are grouped into
/// fallback registers named `q` and `c`.
pub fn emit(circuit: &Circuit) -> String {
    let mut out = String::new();
    out.push_str("OPENQASM 3.0;\n");
    out.push_str("include \"stdgates.inc\";\n");

    // Per-bit rendered operand names, plus register declarations in
    // first-seen order.
    let mut qregs: Vec<(String, u32)> = Vec::new();
    let mut qubit_names = Vec::with_capacity(circuit.num_qubits());
    for qubit in circuit.qubits() {
        let (reg, index) = match (&qubit.register, qubit.index) {
            (Some(reg), Some(index)) => (reg.clone(), index),
            _ => {
                let next = qregs
                    .iter()
                    .find(|(name, _)| name == "q")
                    .map_or(0, |(_, size)| *size);
                ("q".to_string(), next)
            }
        };
        match qregs.iter_mut().find(|(name, _)| *name == reg) {
            Some((_, size)) => *size = (*size).max(index + 1),
            None => qregs.push((reg.clone(), index + 1)),
        }
        qubit_names.push(format!("{reg}[{index}]"));
    }

    let mut cregs: Vec<(String, u32)> = Vec::new();
    let mut clbit_names = Vec::with_capacity(circuit.num_clbits());
    for clbit in circuit.clbits() {
        let (reg, index) = match (&clbit.register, clbit.index) {
            (Some(reg), Some(index)) => (reg.clone(), index),
            _ => {
                let next = cregs
                    .iter()
                    .find(|(name, _)| name == "c")
                    .map_or(0, |(_, size)| *size);
                ("c".to_string(), next)
            }
        };
        match cregs.iter_mut().find(|(name, _)| *name == reg) {
            Some((_, size)) => *size = (*size).max(index + 1),
            None => cregs.push((reg.clone(), index + 1)),
        }
        clbit_names.push(format!("{reg}[{index}]"));
    }

    for (name, size) in &qregs {
        let _ = writeln!(out, "qubit[{size}] {name};");
    }
    for (name, size) in &cregs {
        let _ = writeln!(out, "bit[{size}] {name};");
    }

    for instruction in circuit.instructions() {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                out.push_str(gate.name());
                let params = gate.params();
                if !params.is_empty() {
                    let rendered: Vec<String> =
                        params.iter().map(|p| format!("{p}")).collect();
                    let _ = write!(out, "({})", rendered.join(", "));
                }
                let operands: Vec<&str> = instruction
                    .qubits
                    .iter()
                    .map(|q| qubit_names[q.0 as usize].as_str())
                    .collect();
                let _ = writeln!(out, " {};", operands.join(", "));
            }
            InstructionKind::Measure => {
                let qubit = &qubit_names[instruction.qubits[0].0 as usize];
                let clbit = &clbit_names[instruction.clbits[0].0 as usize];
                let _ = writeln!(out, "{clbit} = measure {qubit};");
            }
            InstructionKind::Reset => {
                let qubit = &qubit_names[instruction.qubits[0].0 as usize];
                let _ = writeln!(out, "reset {qubit};");
            }
            InstructionKind::Barrier => {
                let operands: Vec<&str> = instruction
                    .qubits
                    .iter()
                    .map(|q| qubit_names[q.0 as usize].as_str())
                    .collect();
                let _ = writeln!(out, "barrier {};", operands.join(", "));
            }
        }
    }

    out
}
