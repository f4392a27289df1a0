//! Operation signatures for sampling.

use rimfax_ir::StandardGate;

/// Shape of an operation the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSignature {
    /// Qubits the operation acts on.
    pub num_qubits: u32,
    /// Angle parameters it takes.
    pub num_params: u32,
}

/// Look up the signature of an operation by OpenQASM name.
///
/// Covers every standard gate plus `reset`. Measurement is not sampled;
/// the generator always appends terminal measurements itself.
pub fn op_signature(name: &str) -> Option<OpSignature> {
    if name == "reset" {
        return Some(OpSignature {
            num_qubits: 1,
            num_params: 0,
        });
    }
    let num_qubits = StandardGate::arity_of(name)?;
    let num_params = StandardGate::param_count_of(name)?;
    Some(OpSignature {
        num_qubits,
        num_params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures() {
        assert_eq!(
            op_signature("h"),
            Some(OpSignature {
                num_qubits: 1,
                num_params: 0
            })
        );
        assert_eq!(
            op_signature("u"),
            Some(OpSignature {
                num_qubits: 1,
                num_params: 3
            })
        );
        assert_eq!(
            op_signature("ccx"),
            Some(OpSignature {
                num_qubits: 3,
                num_params: 0
            })
        );
        assert_eq!(
            op_signature("reset"),
            Some(OpSignature {
                num_qubits: 1,
                num_params: 0
            })
        );
        assert_eq!(op_signature("frobnicate"), None);
    }
}
