//! Property-based tests for the circuit builder.
//!
//! Tests that the serde form of a circuit round-trips exactly, that the
//! reported depth stays within its bounds, and that the builder rejects
//! invalid qubit references without mutating the circuit.

use proptest::prelude::*;
use rimfax_ir::{Circuit, QubitId};

/// Generate a random builder-constructed circuit.
///
/// Generates circuits with 1-5 qubits and 0-12 gates drawn from a mix of
/// parameterless, rotation, and multi-qubit gates, fully measured at the end.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        (
            Just(num_qubits),
            prop::collection::vec(arb_gate_op(num_qubits), 0..=12),
        )
            .prop_map(move |(nq, ops)| {
                let mut circuit = Circuit::with_size("prop", nq, nq);
                for op in ops {
                    op.apply(&mut circuit);
                }
                circuit.measure_all().expect("clbits match qubits");
                circuit
            })
    })
}

#[derive(Debug, Clone)]
enum GateOp {
    T(u32),
    Ry(f64, u32),
    Cp(f64, u32, u32),
    Ccx(u32, u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        match self {
            GateOp::T(q) => {
                let _ = circuit.t(QubitId(q));
            }
            GateOp::Ry(theta, q) => {
                let _ = circuit.ry(theta, QubitId(q));
            }
            GateOp::Cp(theta, c, t) => {
                let _ = circuit.cp(theta, QubitId(c), QubitId(t));
            }
            GateOp::Ccx(c1, c2, t) => {
                let _ = circuit.ccx(QubitId(c1), QubitId(c2), QubitId(t));
            }
        }
    }
}

fn arb_angle() -> impl Strategy<Value = f64> {
    0.0..std::f64::consts::TAU
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let single = prop_oneof![
        (0..num_qubits).prop_map(GateOp::T),
        (arb_angle(), 0..num_qubits).prop_map(|(t, q)| GateOp::Ry(t, q)),
    ];
    if num_qubits < 3 {
        single.boxed()
    } else {
        prop_oneof![
            single,
            (arb_angle(), 0..num_qubits, 0..num_qubits)
                .prop_filter("Control and target must differ", |(_, c, t)| c != t)
                .prop_map(|(theta, c, t)| GateOp::Cp(theta, c, t)),
            (0..num_qubits, 0..num_qubits, 0..num_qubits)
                .prop_filter("Qubits must be distinct", |(a, b, c)| {
                    a != b && a != c && b != c
                })
                .prop_map(|(c1, c2, t)| GateOp::Ccx(c1, c2, t)),
        ]
        .boxed()
    }
}

proptest! {
    /// Test that circuit → JSON → circuit preserves structure and exact
    /// instruction content, angles included.
    #[test]
    fn test_circuit_serde_roundtrip_is_exact(circuit in arb_circuit()) {
        let json = serde_json::to_string(&circuit).expect("Failed to serialize circuit");
        let parsed: Circuit = serde_json::from_str(&json).expect("Failed to deserialize circuit");

        prop_assert_eq!(parsed.name(), circuit.name());
        prop_assert_eq!(parsed.num_qubits(), circuit.num_qubits());
        prop_assert_eq!(parsed.num_clbits(), circuit.num_clbits());
        prop_assert_eq!(parsed.num_instructions(), circuit.num_instructions());
        for (a, b) in parsed.instructions().zip(circuit.instructions()) {
            prop_assert_eq!(a, b, "Instruction mismatch after roundtrip");
        }
    }

    /// Test that depth never exceeds the instruction count and that a
    /// fully-measured circuit always has at least one layer.
    #[test]
    fn test_depth_stays_within_bounds(circuit in arb_circuit()) {
        let depth = circuit.depth();
        prop_assert!(depth <= circuit.num_instructions(),
            "depth {} exceeds instruction count {}", depth, circuit.num_instructions());
        prop_assert!(depth >= 1, "measured circuit reports zero depth");
    }

    /// Test that an out-of-range qubit is rejected and leaves the circuit
    /// untouched.
    #[test]
    fn test_out_of_range_qubit_is_rejected(circuit in arb_circuit(), offset in 0_u32..4) {
        let mut circuit = circuit;
        let before = circuit.num_instructions();
        let bad = QubitId(circuit.num_qubits() as u32 + offset);

        prop_assert!(circuit.x(bad).is_err());
        prop_assert!(circuit.cp(1.0, QubitId(0), bad).is_err());
        prop_assert_eq!(circuit.num_instructions(), before,
            "rejected gate mutated the circuit");
    }

    /// Test that a gate naming the same qubit twice is rejected.
    #[test]
    fn test_duplicate_qubit_is_rejected(num_qubits in 1_u32..=5) {
        let mut circuit = Circuit::with_size("dup", num_qubits, num_qubits);
        prop_assert!(circuit.cx(QubitId(0), QubitId(0)).is_err());
        prop_assert_eq!(circuit.num_instructions(), 0);
    }
}
