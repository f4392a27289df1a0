//! Error types for equivalence checking.

use rimfax_compile::CompileError;
use rimfax_run::RunError;
use thiserror::Error;

/// Errors produced while checking backend equivalence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyError {
    /// The two histograms cover different outcomes above the noise floor.
    #[error(
        "outcome support mismatch: {left_only:?} only on the left, {right_only:?} only on the right"
    )]
    SupportMismatch {
        /// Outcomes only the left histogram contains.
        left_only: Vec<String>,
        /// Outcomes only the right histogram contains.
        right_only: Vec<String>,
    },

    /// Compilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Bundle execution failed.
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Result type for verify operations.
pub type VerifyResult<T> = Result<T, VerifyError>;
