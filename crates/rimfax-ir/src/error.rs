//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not declared in the circuit.
    #[error("qubit {qubit} not found in circuit '{circuit}'")]
    QubitNotFound {
        /// The missing qubit.
        qubit: QubitId,
        /// The circuit name.
        circuit: String,
    },

    /// Classical bit not declared in the circuit.
    #[error("classical bit {clbit} not found in circuit '{circuit}'")]
    ClbitNotFound {
        /// The missing classical bit.
        clbit: ClbitId,
        /// The circuit name.
        circuit: String,
    },

    /// Gate applied to repeated qubit operands.
    #[error("duplicate qubit {qubit} in '{gate}' operands")]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: QubitId,
        /// The gate name.
        gate: String,
    },

    /// Measurement with mismatched operand counts.
    #[error("measure: qubit count ({qubits}) does not match clbit count ({clbits})")]
    MeasureArityMismatch {
        /// Number of qubits.
        qubits: usize,
        /// Number of classical bits.
        clbits: usize,
    },

    /// Compiled circuit contains a gate outside its declared basis.
    #[error("gate '{gate}' is not in the basis {basis:?}")]
    GateOutsideBasis {
        /// The offending gate name.
        gate: String,
        /// The declared basis.
        basis: Vec<String>,
    },

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
