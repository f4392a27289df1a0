//! Error types for circuit generation.

use thiserror::Error;

/// Errors produced while generating random circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenError {
    /// An operation name with no known signature.
    #[error("unknown operation '{0}'")]
    UnknownOp(String),

    /// The sampled basis contains no operation the circuit can hold.
    #[error("no operation in {basis:?} fits a circuit with {num_qubits} qubit(s)")]
    NoApplicableOps {
        /// The sampled basis.
        basis: Vec<String>,
        /// Qubits in the circuit being generated.
        num_qubits: u32,
    },

    /// Degenerate size bounds.
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),
}

/// Result type for generation operations.
pub type GenResult<T> = Result<T, GenError>;
