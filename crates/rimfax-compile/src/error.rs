//! Error types for compilation.

use rimfax_ir::IrError;
use rimfax_qasm::ParseError;
use thiserror::Error;

/// Errors produced during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// A gate cannot be expressed in the target basis.
    #[error("gate '{gate}' cannot be translated to basis {basis:?}")]
    UnsupportedGate {
        /// The gate that could not be translated.
        gate: String,
        /// The target basis.
        basis: Vec<String>,
    },

    /// The target basis is empty.
    #[error("target basis gate set is empty")]
    EmptyBasis,

    /// Error from the IR layer.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Error parsing QASM input.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
