//! The standard gate set.
//!
//! Angles are concrete `f64` radians. Rimfax circuits are always fully bound
//! by the time they reach a backend, so there is no symbolic parameter layer.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X.
    Rx(f64),
    /// Rotation around Y.
    Ry(f64),
    /// Rotation around Z.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),
    /// Controlled-X (CNOT).
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled-phase gate.
    CP(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Toffoli gate.
    CCX,
}

impl StandardGate {
    /// The OpenQASM name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(..) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CP(_) => "cp",
            StandardGate::CRz(_) => "crz",
            StandardGate::CCX => "ccx",
        }
    }

    /// The number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(..) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CP(_)
            | StandardGate::CRz(_) => 2,

            StandardGate::CCX => 3,
        }
    }

    /// Angle parameters carried by this gate.
    pub fn params(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(t)
            | StandardGate::Ry(t)
            | StandardGate::Rz(t)
            | StandardGate::P(t)
            | StandardGate::CP(t)
            | StandardGate::CRz(t) => vec![*t],
            StandardGate::U(t, p, l) => vec![*t, *p, *l],
            _ => vec![],
        }
    }

    /// Qubit arity of a gate name, or `None` for an unknown name.
    ///
    /// Used by the QASM parser and the random circuit generator, which work
    /// with textual gate identifiers before concrete angles are chosen.
    pub fn arity_of(name: &str) -> Option<u32> {
        let arity = match name {
            "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "rx" | "ry" | "rz"
            | "p" | "u" => 1,
            "cx" | "cy" | "cz" | "ch" | "swap" | "cp" | "crz" => 2,
            "ccx" => 3,
            _ => return None,
        };
        Some(arity)
    }

    /// Number of angle parameters a gate name expects, or `None` if unknown.
    pub fn param_count_of(name: &str) -> Option<u32> {
        let count = match name {
            "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "cx" | "cy" | "cz"
            | "ch" | "swap" | "ccx" => 0,
            "rx" | "ry" | "rz" | "p" | "cp" | "crz" => 1,
            "u" => 3,
            _ => return None,
        };
        Some(count)
    }

    /// Construct a gate from its name and angle parameters.
    ///
    /// Returns `None` for unknown names or wrong parameter counts.
    pub fn from_name(name: &str, params: &[f64]) -> Option<Self> {
        if Self::param_count_of(name)? as usize != params.len() {
            return None;
        }
        let gate = match name {
            "id" => StandardGate::I,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "h" => StandardGate::H,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "rx" => StandardGate::Rx(params[0]),
            "ry" => StandardGate::Ry(params[0]),
            "rz" => StandardGate::Rz(params[0]),
            "p" => StandardGate::P(params[0]),
            "u" => StandardGate::U(params[0], params[1], params[2]),
            "cx" => StandardGate::CX,
            "cy" => StandardGate::CY,
            "cz" => StandardGate::CZ,
            "ch" => StandardGate::CH,
            "swap" => StandardGate::Swap,
            "cp" => StandardGate::CP(params[0]),
            "crz" => StandardGate::CRz(params[0]),
            "ccx" => StandardGate::CCX,
            _ => return None,
        };
        Some(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::CP(PI).name(), "cp");
        assert_eq!(StandardGate::U(PI, 0.0, PI).params().len(), 3);
    }

    #[test]
    fn test_from_name_round_trip() {
        let gate = StandardGate::from_name("rx", &[PI / 2.0]).unwrap();
        assert_eq!(gate, StandardGate::Rx(PI / 2.0));
        assert_eq!(gate.name(), "rx");

        assert!(StandardGate::from_name("rx", &[]).is_none());
        assert!(StandardGate::from_name("nope", &[]).is_none());
    }

    #[test]
    fn test_arity_of() {
        assert_eq!(StandardGate::arity_of("h"), Some(1));
        assert_eq!(StandardGate::arity_of("swap"), Some(2));
        assert_eq!(StandardGate::arity_of("ccx"), Some(3));
        assert_eq!(StandardGate::arity_of("reset"), None);
    }
}
