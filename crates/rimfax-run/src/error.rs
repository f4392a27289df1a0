//! Error types for execution orchestration.

use rimfax_compile::CompileError;
use rimfax_hal::HalError;
use thiserror::Error;

/// Errors produced while assembling or running job bundles.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    /// A circuit failed backend validation.
    #[error("circuit '{circuit}' rejected by backend '{backend}': {reasons}")]
    ValidationFailed {
        /// The circuit name.
        circuit: String,
        /// The backend name.
        backend: String,
        /// Joined rejection reasons.
        reasons: String,
    },

    /// A circuit name was added twice to one bundle.
    #[error("bundle already contains a circuit named '{0}'")]
    DuplicateCircuit(String),

    /// Lookup of a result by circuit name failed.
    #[error("no result for circuit '{0}'")]
    CircuitNotFound(String),

    /// Compilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Backend error.
    #[error(transparent)]
    Hal(#[from] HalError),
}

/// Result type for run operations.
pub type RunResult<T> = Result<T, RunError>;
