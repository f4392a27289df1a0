//! Top-level compile entry points.

use rimfax_ir::{Circuit, CompiledCircuit};

use crate::error::CompileResult;
use crate::manager::PassManager;
use crate::property::BasisGates;

/// Options controlling compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Target basis gate set.
    pub basis_gates: BasisGates,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            basis_gates: BasisGates::simulator(),
        }
    }
}

impl CompileOptions {
    /// Options for the given basis.
    pub fn with_basis(basis: BasisGates) -> Self {
        Self { basis_gates: basis }
    }
}

/// Compile a circuit to the target basis.
pub fn compile_circuit(
    circuit: &Circuit,
    options: &CompileOptions,
) -> CompileResult<CompiledCircuit> {
    let (pm, mut props) = PassManager::for_basis(options.basis_gates.clone());
    let mut working = circuit.clone();
    pm.run(&mut working, &mut props)?;

    let compiled = CompiledCircuit::new(
        working.name(),
        working.num_qubits() as u32,
        working.num_clbits() as u32,
        options.basis_gates.to_vec(),
        working.instructions().cloned().collect(),
    )?;
    Ok(compiled)
}

/// Parse QASM source and compile it to the target basis.
pub fn compile_source(source: &str, options: &CompileOptions) -> CompileResult<CompiledCircuit> {
    let circuit = rimfax_qasm::parse(source)?;
    compile_circuit(&circuit, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_bell() {
        let circuit = Circuit::bell().unwrap();
        let compiled = compile_circuit(&circuit, &CompileOptions::default()).unwrap();

        assert_eq!(compiled.num_qubits, 2);
        assert_eq!(compiled.num_clbits, 2);
        assert_eq!(compiled.basis_gates, vec!["id", "u", "cx"]);
        assert!(!compiled.has_mid_circuit_measurement());
    }

    #[test]
    fn test_compile_source() {
        let compiled = compile_source(
            r#"
            OPENQASM 3.0;
            qubit[2] q;
            bit[2] c;
            h q[0];
            cx q[0], q[1];
            c = measure q;
            "#,
            &CompileOptions::default(),
        )
        .unwrap();

        assert_eq!(compiled.num_qubits, 2);
        assert_eq!(
            compiled
                .instructions()
                .filter(|i| i.is_measure())
                .count(),
            2
        );
    }

    #[test]
    fn test_compile_preserves_input() {
        let circuit = Circuit::bell().unwrap();
        let before = circuit.num_instructions();
        compile_circuit(&circuit, &CompileOptions::default()).unwrap();
        assert_eq!(circuit.num_instructions(), before);
    }
}
