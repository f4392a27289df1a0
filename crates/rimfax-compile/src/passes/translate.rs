//! Basis translation pass.
//!
//! Rewrites every gate outside the target basis into an equivalent
//! sequence over the basis, applying decomposition rules to a fixed
//! point. Single-qubit gates translate to the general `u(θ, φ, λ)`
//! rotation (global phase discarded); controlled and three-qubit gates
//! translate to `cx` plus single-qubit gates.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use rimfax_ir::{Circuit, Instruction, QubitId, StandardGate};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::pass::Pass;
use crate::property::{BasisGates, PropertySet};

/// Recorded by [`BasisTranslation`] for the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Gates rewritten into the basis.
    pub gates_translated: usize,
}

/// Translate gates to the target basis.
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &str {
        "basis-translation"
    }

    fn should_run(&self, circuit: &Circuit, properties: &PropertySet) -> bool {
        match &properties.basis_gates {
            Some(basis) => circuit
                .instructions()
                .any(|inst| inst.is_gate() && !basis.contains(inst.name())),
            None => false,
        }
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .clone()
            .ok_or(CompileError::EmptyBasis)?;
        if basis.names().is_empty() {
            return Err(CompileError::EmptyBasis);
        }

        let mut stats = TranslationStats::default();
        let mut out = Vec::with_capacity(circuit.num_instructions());
        for inst in circuit.instructions() {
            translate_into(inst, &basis, &mut out, &mut stats)?;
        }
        debug!(
            gates_translated = stats.gates_translated,
            "basis translation complete"
        );
        circuit.replace_instructions(out);
        properties.insert(stats);
        Ok(())
    }
}

fn translate_into(
    inst: &Instruction,
    basis: &BasisGates,
    out: &mut Vec<Instruction>,
    stats: &mut TranslationStats,
) -> CompileResult<()> {
    let Some(gate) = inst.as_gate() else {
        out.push(inst.clone());
        return Ok(());
    };
    if basis.contains(gate.name()) {
        out.push(inst.clone());
        return Ok(());
    }

    let rewritten = decompose(gate, &inst.qubits).ok_or_else(|| {
        CompileError::UnsupportedGate {
            gate: gate.name().to_string(),
            basis: basis.to_vec(),
        }
    })?;
    stats.gates_translated += 1;

    // Rules may emit gates that are themselves outside the basis; recurse
    // until everything lands in it. Every rule strictly reduces toward
    // u/cx, so this terminates.
    for (gate, qubits) in rewritten {
        translate_into(&Instruction::gate(gate, qubits), basis, out, stats)?;
    }
    Ok(())
}

type Rewrite = Vec<(StandardGate, Vec<QubitId>)>;

/// One-level decomposition of a gate toward the u/cx basis.
///
/// Returns `None` for gates with no rule (`u` and `cx` themselves: if the
/// basis excludes them there is nowhere further to go).
fn decompose(gate: &StandardGate, qubits: &[QubitId]) -> Option<Rewrite> {
    use StandardGate::*;

    let q = |i: usize| qubits[i];
    let rewrite = match gate {
        I => vec![(U(0.0, 0.0, 0.0), vec![q(0)])],
        X => vec![(U(PI, 0.0, PI), vec![q(0)])],
        Y => vec![(U(PI, FRAC_PI_2, FRAC_PI_2), vec![q(0)])],
        Z => vec![(U(0.0, 0.0, PI), vec![q(0)])],
        H => vec![(U(FRAC_PI_2, 0.0, PI), vec![q(0)])],
        S => vec![(U(0.0, 0.0, FRAC_PI_2), vec![q(0)])],
        Sdg => vec![(U(0.0, 0.0, -FRAC_PI_2), vec![q(0)])],
        T => vec![(U(0.0, 0.0, FRAC_PI_4), vec![q(0)])],
        Tdg => vec![(U(0.0, 0.0, -FRAC_PI_4), vec![q(0)])],
        Rx(theta) => vec![(U(*theta, -FRAC_PI_2, FRAC_PI_2), vec![q(0)])],
        Ry(theta) => vec![(U(*theta, 0.0, 0.0), vec![q(0)])],
        Rz(lambda) => vec![(U(0.0, 0.0, *lambda), vec![q(0)])],
        P(lambda) => vec![(U(0.0, 0.0, *lambda), vec![q(0)])],
        Swap => vec![
            (CX, vec![q(0), q(1)]),
            (CX, vec![q(1), q(0)]),
            (CX, vec![q(0), q(1)]),
        ],
        CZ => vec![
            (H, vec![q(1)]),
            (CX, vec![q(0), q(1)]),
            (H, vec![q(1)]),
        ],
        CY => vec![
            (Sdg, vec![q(1)]),
            (CX, vec![q(0), q(1)]),
            (S, vec![q(1)]),
        ],
        CH => vec![
            (S, vec![q(1)]),
            (H, vec![q(1)]),
            (T, vec![q(1)]),
            (CX, vec![q(0), q(1)]),
            (Tdg, vec![q(1)]),
            (H, vec![q(1)]),
            (Sdg, vec![q(1)]),
        ],
        CP(lambda) => vec![
            (P(lambda / 2.0), vec![q(0)]),
            (CX, vec![q(0), q(1)]),
            (P(-lambda / 2.0), vec![q(1)]),
            (CX, vec![q(0), q(1)]),
            (P(lambda / 2.0), vec![q(1)]),
        ],
        CRz(lambda) => vec![
            (Rz(lambda / 2.0), vec![q(1)]),
            (CX, vec![q(0), q(1)]),
            (Rz(-lambda / 2.0), vec![q(1)]),
            (CX, vec![q(0), q(1)]),
        ],
        CCX => vec![
            (H, vec![q(2)]),
            (CX, vec![q(1), q(2)]),
            (Tdg, vec![q(2)]),
            (CX, vec![q(0), q(2)]),
            (T, vec![q(2)]),
            (CX, vec![q(1), q(2)]),
            (Tdg, vec![q(2)]),
            (CX, vec![q(0), q(2)]),
            (T, vec![q(1)]),
            (T, vec![q(2)]),
            (H, vec![q(2)]),
            (CX, vec![q(0), q(1)]),
            (T, vec![q(0)]),
            (Tdg, vec![q(1)]),
            (CX, vec![q(0), q(1)]),
        ],
        U(..) | CX => return None,
    };
    Some(rewrite)
}
